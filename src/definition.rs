//! Stylesheet definitions as supplied by callers.
//!
//! A definition is either a fixed, ordered list of [`Slots`] or a themed
//! factory that builds the slots from the active theme. Each slot is tagged
//! once as [`SlotDefinition::Static`] or [`SlotDefinition::Dynamic`].

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::resolve::ThemeContext;
use crate::style::Style;

/// Signature of a dynamic slot: call arguments in, style-shaped value out.
pub type StyleFn = dyn Fn(&[Value]) -> Value + Send + Sync;

/// Signature of a themed definition factory.
pub type ThemedFn = dyn Fn(&ThemeContext) -> Slots + Send + Sync;

/// One entry of a stylesheet definition.
#[derive(Clone)]
pub enum SlotDefinition {
    /// A fixed style.
    Static(Style),
    /// A function evaluated with caller-supplied arguments.
    Dynamic(Arc<StyleFn>),
}

impl SlotDefinition {
    /// Wraps a closure as a dynamic slot.
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        SlotDefinition::Dynamic(Arc::new(f))
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, SlotDefinition::Dynamic(_))
    }
}

impl From<Style> for SlotDefinition {
    fn from(style: Style) -> Self {
        SlotDefinition::Static(style)
    }
}

impl fmt::Debug for SlotDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotDefinition::Static(style) => f.debug_tuple("Static").field(style).finish(),
            SlotDefinition::Dynamic(_) => f.write_str("Dynamic(<fn>)"),
        }
    }
}

/// An ordered list of named slots.
///
/// Adding a name that already exists replaces the earlier entry in place.
///
/// # Example
///
/// ```rust
/// use varistyle::{Slots, Style};
/// use serde_json::json;
///
/// let slots = Slots::new()
///     .add("box", Style::new().with("color", "red"))
///     .dynamic("text", |args| json!({ "fontSize": args.first().cloned() }));
///
/// assert_eq!(slots.names().collect::<Vec<_>>(), vec!["box", "text"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Slots {
    entries: Vec<(String, SlotDefinition)>,
}

impl Slots {
    /// Creates an empty slot list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a slot, returning the updated list for chaining.
    pub fn add<V: Into<SlotDefinition>>(mut self, name: &str, value: V) -> Self {
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name.to_string(), value)),
        }
        self
    }

    /// Adds a dynamic slot, returning the updated list for chaining.
    pub fn dynamic<F>(self, name: &str, f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.add(name, SlotDefinition::dynamic(f))
    }

    pub fn get(&self, name: &str) -> Option<&SlotDefinition> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, slot)| slot)
    }

    /// Iterates slot names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Iterates slots in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SlotDefinition)> {
        self.entries.iter().map(|(name, slot)| (name.as_str(), slot))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The abstract stylesheet handed to `create`.
#[derive(Clone)]
pub enum StylesheetDefinition {
    /// A fixed list of slots.
    Slots(Slots),
    /// A factory evaluated against the active theme.
    Themed(Arc<ThemedFn>),
}

impl StylesheetDefinition {
    /// Wraps a themed factory.
    ///
    /// # Example
    ///
    /// ```rust
    /// use varistyle::{Slots, Style, StylesheetDefinition};
    ///
    /// let definition = StylesheetDefinition::themed(|ctx| {
    ///     let primary = ctx.theme["colors"]["primary"].clone();
    ///     Slots::new().add("title", Style::new().with("color", primary))
    /// });
    /// assert!(definition.is_themed());
    /// ```
    pub fn themed<F>(factory: F) -> Self
    where
        F: Fn(&ThemeContext) -> Slots + Send + Sync + 'static,
    {
        StylesheetDefinition::Themed(Arc::new(factory))
    }

    pub fn is_themed(&self) -> bool {
        matches!(self, StylesheetDefinition::Themed(_))
    }
}

impl From<Slots> for StylesheetDefinition {
    fn from(slots: Slots) -> Self {
        StylesheetDefinition::Slots(slots)
    }
}

impl fmt::Debug for StylesheetDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StylesheetDefinition::Slots(slots) => f.debug_tuple("Slots").field(slots).finish(),
            StylesheetDefinition::Themed(_) => f.write_str("Themed(<fn>)"),
        }
    }
}
