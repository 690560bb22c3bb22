//! Variant selections used when re-resolving a stylesheet.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The value selected on one variant axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariantValue {
    /// A named option, e.g. `size: "small"`.
    Str(String),
    /// A toggle, e.g. `disabled: true`.
    Bool(bool),
    /// The axis is present but explicitly unset.
    Unset,
}

impl From<&str> for VariantValue {
    fn from(value: &str) -> Self {
        VariantValue::Str(value.to_string())
    }
}

impl From<String> for VariantValue {
    fn from(value: String) -> Self {
        VariantValue::Str(value)
    }
}

impl From<bool> for VariantValue {
    fn from(value: bool) -> Self {
        VariantValue::Bool(value)
    }
}

impl<T: Into<VariantValue>> From<Option<T>> for VariantValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(VariantValue::Unset, Into::into)
    }
}

/// A mapping from variant axis name to the selected value.
///
/// The empty selection is the default and means "no override".
///
/// # Example
///
/// ```rust
/// use varistyle::{Variants, VariantValue};
///
/// let variants = Variants::new()
///     .with("size", "small")
///     .with("disabled", true);
///
/// assert_eq!(variants.get("size"), Some(&VariantValue::Str("small".into())));
/// assert_eq!(variants.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Variants {
    axes: BTreeMap<String, VariantValue>,
}

impl Variants {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects a value on an axis, returning the updated selection for chaining.
    pub fn with<V: Into<VariantValue>>(mut self, axis: &str, value: V) -> Self {
        self.axes.insert(axis.to_string(), value.into());
        self
    }

    /// Returns the value selected on an axis.
    pub fn get(&self, axis: &str) -> Option<&VariantValue> {
        self.axes.get(axis)
    }

    /// Iterates axes in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VariantValue)> {
        self.axes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.axes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }
}

impl<K: Into<String>, V: Into<VariantValue>> FromIterator<(K, V)> for Variants {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            axes: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
