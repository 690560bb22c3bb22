//! The object-shaped style value.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// An ordered map of style properties.
///
/// Serializes exactly as its properties, so two styles with the same
/// properties are indistinguishable to structural consumers.
///
/// # Example
///
/// ```rust
/// use varistyle::Style;
/// use serde_json::json;
///
/// let style = Style::new()
///     .with("color", "red")
///     .with("fontSize", 12);
///
/// assert_eq!(style.get("color"), Some(&json!("red")));
/// assert_eq!(serde_json::to_value(&style).unwrap(), json!({"color": "red", "fontSize": 12}));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Style {
    props: Map<String, Value>,
}

impl Style {
    /// Creates an empty style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a property, returning the updated style for chaining.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.props.insert(name.to_string(), value.into());
        self
    }

    /// Converts a JSON value produced by `slot` into a style.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAnObject`] for any non-object value.
    pub fn from_value(slot: &str, value: Value) -> Result<Self> {
        match value {
            Value::Object(props) => Ok(Self { props }),
            other => Err(Error::NotAnObject {
                slot: slot.to_string(),
                found: value_kind(&other),
            }),
        }
    }

    /// Returns a property by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.props.get(name)
    }

    /// Inserts or replaces a property.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.props.insert(name.into(), value.into())
    }

    /// Removes a property, preserving the order of the remaining ones.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.props.shift_remove(name)
    }

    /// Keeps only the properties for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &Value) -> bool) {
        self.props.retain(|name, value| keep(name, value));
    }

    /// Returns true if the style has the named property.
    pub fn contains(&self, name: &str) -> bool {
        self.props.contains_key(name)
    }

    /// Iterates properties in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.props.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.props.len()
    }

    /// Returns true if the style has no properties.
    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// Returns the style as a JSON object value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.props.clone())
    }
}

impl From<Map<String, Value>> for Style {
    fn from(props: Map<String, Value>) -> Self {
        Self { props }
    }
}

impl From<Style> for Value {
    fn from(style: Style) -> Self {
        Value::Object(style.props)
    }
}

/// Returns a short name for the kind of a JSON value.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_style_with_preserves_order() {
        let style = Style::new().with("b", 1).with("a", 2).with("c", 3);
        let names: Vec<&str> = style.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_style_from_object_value() {
        let style = Style::from_value("box", json!({"color": "red"})).unwrap();
        assert_eq!(style.get("color"), Some(&json!("red")));
        assert_eq!(style.len(), 1);
    }

    #[test]
    fn test_style_from_primitive_is_rejected() {
        let err = Style::from_value("box", json!(12)).unwrap_err();
        match err {
            Error::NotAnObject { slot, found } => {
                assert_eq!(slot, "box");
                assert_eq!(found, "number");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_style_serializes_as_plain_object() {
        let style = Style::new().with("margin", 4);
        assert_eq!(serde_json::to_string(&style).unwrap(), r#"{"margin":4}"#);
    }

    #[test]
    fn test_style_remove_and_retain() {
        let mut style = Style::new().with("a", 1).with("b", 2).with("c", 3);
        assert_eq!(style.remove("a"), Some(json!(1)));
        style.retain(|name, _| name != "c");
        assert_eq!(style.to_value(), json!({"b": 2}));
        assert!(!style.contains("c"));
    }

    #[test]
    fn test_value_kind_names() {
        assert_eq!(value_kind(&json!(null)), "null");
        assert_eq!(value_kind(&json!(true)), "boolean");
        assert_eq!(value_kind(&json!("x")), "string");
        assert_eq!(value_kind(&json!([1])), "array");
        assert_eq!(value_kind(&json!({})), "object");
    }
}
