//! Style values carried by stylesheet slots.
//!
//! This module provides:
//!
//! - [`Style`]: An ordered, object-shaped map of style properties
//! - [`value_kind`]: Human-readable kind of a JSON value, used in errors
//!
//! Styles are always object-shaped. Primitive payloads (numbers, strings,
//! booleans, null, arrays) are rejected when converting into a [`Style`].

mod value;

pub use value::{value_kind, Style};
