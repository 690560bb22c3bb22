//! Provenance metadata carried alongside resolved styles.
//!
//! [`Traced`] pairs a value with its [`Provenance`] without merging the two:
//! serialization, equality and dereferencing all see the plain value, while
//! [`Traced::metadata`] (or [`metadata_of`]) exposes where it came from.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use varistyle::{attach, metadata_of, Provenance, Slots, Style, StylesheetDefinition, Variants};
//!
//! let definition = Arc::new(StylesheetDefinition::from(Slots::new()));
//! let style = Style::new().with("color", "red");
//! let provenance = Provenance::new("box", definition, None, Variants::new());
//!
//! let traced = attach(style.clone(), provenance.clone());
//! assert_eq!(traced, style);
//! assert_eq!(serde_json::to_value(&traced).unwrap(), serde_json::to_value(&style).unwrap());
//! assert_eq!(metadata_of(&traced), &provenance);
//! ```

use std::ops::Deref;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::definition::StylesheetDefinition;
use crate::error::Result;
use crate::style::Style;
use crate::variants::Variants;

pub(crate) mod private {
    pub trait Sealed {}
}

/// Values metadata can be attached to: style objects and style functions.
pub trait Shaped: private::Sealed {}

impl private::Sealed for Style {}
impl Shaped for Style {}

/// Where a resolved value came from.
#[derive(Debug, Clone)]
pub struct Provenance {
    key: String,
    stylesheet: Arc<StylesheetDefinition>,
    args: Option<Vec<Value>>,
    variants: Variants,
}

impl Provenance {
    pub fn new(
        key: impl Into<String>,
        stylesheet: Arc<StylesheetDefinition>,
        args: Option<Vec<Value>>,
        variants: Variants,
    ) -> Self {
        Self {
            key: key.into(),
            stylesheet,
            args,
            variants,
        }
    }

    /// Name of the originating slot.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The full original definition.
    pub fn stylesheet(&self) -> &Arc<StylesheetDefinition> {
        &self.stylesheet
    }

    /// Invocation arguments; `None` for static slots.
    pub fn args(&self) -> Option<&[Value]> {
        self.args.as_deref()
    }

    /// The variant selection active when the value was produced.
    pub fn variants(&self) -> &Variants {
        &self.variants
    }
}

impl PartialEq for Provenance {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && Arc::ptr_eq(&self.stylesheet, &other.stylesheet)
            && self.args == other.args
            && self.variants == other.variants
    }
}

/// A value with provenance metadata attached out of band.
#[derive(Debug, Clone)]
pub struct Traced<T> {
    value: T,
    provenance: Arc<Provenance>,
}

impl<T> Traced<T> {
    /// The plain value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// The attached metadata.
    pub fn metadata(&self) -> &Provenance {
        &self.provenance
    }

    /// Drops the metadata and returns the plain value.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> Deref for Traced<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: Serialize> Serialize for Traced<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<T: PartialEq> PartialEq for Traced<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialEq<Style> for Traced<Style> {
    fn eq(&self, other: &Style) -> bool {
        &self.value == other
    }
}

/// Attaches `provenance` to an object- or function-shaped value.
pub fn attach<T: Shaped>(value: T, provenance: Provenance) -> Traced<T> {
    Traced {
        value,
        provenance: Arc::new(provenance),
    }
}

/// Attaches `provenance` to a JSON value produced by a slot.
///
/// # Errors
///
/// Returns [`Error::NotAnObject`](crate::Error::NotAnObject) when `value` is
/// not an object.
pub fn attach_value(value: Value, provenance: Provenance) -> Result<Traced<Style>> {
    let style = Style::from_value(provenance.key(), value)?;
    Ok(attach(style, provenance))
}

/// Returns the metadata attached to `traced`.
pub fn metadata_of<T>(traced: &Traced<T>) -> &Provenance {
    traced.metadata()
}
