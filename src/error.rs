//! Errors produced while materializing stylesheets.

/// Error returned by materialization, hydration and slot invocation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `create` was called without the stylesheet identifier.
    ///
    /// The identifier is injected by the build-time transform. This is a
    /// setup mistake that must be fixed in the build configuration.
    #[error(
        "stylesheet is not initialized correctly: no identifier was supplied. \
         Enable the build-time stylesheet transform in your build configuration"
    )]
    MissingIdentifier,

    /// A caller-defined slot uses the reserved variant entry point name.
    #[error("slot '{key}' uses a reserved name")]
    ReservedSlot { key: String },

    /// A slot produced something other than a style object.
    #[error("slot '{slot}' must be object-shaped, found {found}")]
    NotAnObject { slot: String, found: &'static str },

    /// The computed-stylesheet resolver failed.
    #[error("failed to resolve slot '{slot}': {message}")]
    Resolve { slot: String, message: String },

    /// The inline-style normalizer failed.
    #[error("failed to normalize slot '{slot}': {message}")]
    Normalize { slot: String, message: String },

    /// The hydration snapshot could not be decoded.
    #[error("invalid hydration snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
