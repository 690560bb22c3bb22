//! Inline-style normalization.
//!
//! Resolved styles may carry transient, inline-only markers. A normalizer
//! strips them before provenance metadata is attached.

use crate::error::Result;
use crate::style::Style;

/// Properties starting with this prefix are inline-only markers.
pub const INLINE_MARKER_PREFIX: &str = "__inline";

/// Normalizes one resolved style.
pub trait InlineNormalizer: Send + Sync {
    /// Returns `style` without inline-only markers.
    ///
    /// # Errors
    ///
    /// Any failure aborts the whole materialization or slot invocation.
    fn normalize(&self, slot: &str, style: Style) -> Result<Style>;
}

/// Leaves styles untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl InlineNormalizer for Identity {
    fn normalize(&self, _slot: &str, style: Style) -> Result<Style> {
        Ok(style)
    }
}

/// Removes every property named with [`INLINE_MARKER_PREFIX`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StripInlineMarkers;

impl InlineNormalizer for StripInlineMarkers {
    fn normalize(&self, slot: &str, mut style: Style) -> Result<Style> {
        let before = style.len();
        style.retain(|name, _| !name.starts_with(INLINE_MARKER_PREFIX));
        if style.len() != before {
            tracing::trace!(slot, removed = before - style.len(), "stripped inline markers");
        }
        Ok(style)
    }
}
