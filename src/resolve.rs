//! Computed-stylesheet resolution.
//!
//! A [`StylesheetResolver`] turns a [`StylesheetDefinition`] into a
//! [`ComputedStylesheet`]: one [`ResolvedSlot`] per slot, in definition
//! order. Resolvers must not mutate the definition.
//!
//! The default [`ThemeResolver`] evaluates themed factories against the
//! active theme of the engine configuration and copies fixed slot lists.
//! It does not compute breakpoints or merge themes.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::definition::{SlotDefinition, Slots, StyleFn, StylesheetDefinition};
use crate::error::Result;
use crate::state::InitState;
use crate::style::Style;

/// What a themed definition factory sees.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeContext {
    /// Name of the active theme, if any theme is configured.
    pub theme_name: Option<String>,
    /// The active theme; an empty object when none is configured.
    pub theme: Value,
    /// Configured breakpoints by name.
    pub breakpoints: BTreeMap<String, u32>,
}

impl ThemeContext {
    /// Builds the context from the engine state.
    pub fn from_state(state: &InitState) -> Self {
        let Some(config) = state.config() else {
            return Self::empty();
        };
        let (theme_name, theme) = match config.active_theme() {
            Some((name, theme)) => (Some(name.to_string()), theme.clone()),
            None => (None, Value::Object(Default::default())),
        };
        Self {
            theme_name,
            theme,
            breakpoints: config.breakpoints.clone(),
        }
    }

    /// A context with no theme and no breakpoints.
    pub fn empty() -> Self {
        Self {
            theme_name: None,
            theme: Value::Object(Default::default()),
            breakpoints: BTreeMap::new(),
        }
    }
}

/// The resolved value of one slot.
#[derive(Clone)]
pub enum ResolvedSlot {
    /// A style ready to use.
    Static(Style),
    /// A function deferred until invoked with arguments.
    Dynamic(Arc<StyleFn>),
}

impl fmt::Debug for ResolvedSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedSlot::Static(style) => f.debug_tuple("Static").field(style).finish(),
            ResolvedSlot::Dynamic(_) => f.write_str("Dynamic(<fn>)"),
        }
    }
}

impl From<&SlotDefinition> for ResolvedSlot {
    fn from(slot: &SlotDefinition) -> Self {
        match slot {
            SlotDefinition::Static(style) => ResolvedSlot::Static(style.clone()),
            SlotDefinition::Dynamic(f) => ResolvedSlot::Dynamic(Arc::clone(f)),
        }
    }
}

/// Resolved slots in definition order.
#[derive(Debug, Clone, Default)]
pub struct ComputedStylesheet {
    slots: Vec<(String, ResolvedSlot)>,
}

impl ComputedStylesheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a resolved slot.
    pub fn push(&mut self, name: impl Into<String>, slot: ResolvedSlot) {
        self.slots.push((name.into(), slot));
    }

    pub fn get(&self, name: &str) -> Option<&ResolvedSlot> {
        self.slots
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, slot)| slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResolvedSlot)> {
        self.slots.iter().map(|(name, slot)| (name.as_str(), slot))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl From<&Slots> for ComputedStylesheet {
    fn from(slots: &Slots) -> Self {
        Self {
            slots: slots
                .iter()
                .map(|(name, slot)| (name.to_string(), ResolvedSlot::from(slot)))
                .collect(),
        }
    }
}

/// Resolves a definition into per-slot values.
pub trait StylesheetResolver: Send + Sync {
    /// Resolves every slot of `definition`, preserving slot order.
    ///
    /// # Errors
    ///
    /// Any failure aborts the whole materialization.
    fn resolve(&self, definition: &StylesheetDefinition) -> Result<ComputedStylesheet>;
}

/// Resolves definitions against the active theme of an [`InitState`].
#[derive(Debug, Clone)]
pub struct ThemeResolver {
    state: Arc<InitState>,
}

impl ThemeResolver {
    pub fn new(state: Arc<InitState>) -> Self {
        Self { state }
    }
}

impl StylesheetResolver for ThemeResolver {
    fn resolve(&self, definition: &StylesheetDefinition) -> Result<ComputedStylesheet> {
        match definition {
            StylesheetDefinition::Slots(slots) => Ok(ComputedStylesheet::from(slots)),
            StylesheetDefinition::Themed(factory) => {
                let ctx = ThemeContext::from_state(&self.state);
                tracing::trace!(theme = ?ctx.theme_name, "evaluating themed stylesheet");
                Ok(ComputedStylesheet::from(&factory(&ctx)))
            }
        }
    }
}
