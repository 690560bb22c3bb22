//! # Varistyle
//!
//! Materializes stylesheet definitions into runtime stylesheets whose values
//! carry provenance metadata, with an entry point to re-resolve the whole
//! stylesheet under a different variant selection.
//!
//! ## Quick Start
//!
//! ```rust
//! use varistyle::{create, Slots, Style, StylesheetDefinition, Variants, VARIANTS_SLOT};
//! use serde_json::json;
//!
//! let definition = StylesheetDefinition::from(
//!     Slots::new()
//!         .add("box", Style::new().with("color", "red"))
//!         .dynamic("text", |args| json!({ "fontSize": args[0] })),
//! );
//!
//! // The identifier is normally injected by the build-time transform.
//! let styles = create(definition, Some("abc")).unwrap();
//!
//! let boxed = styles.style("box").unwrap();
//! assert_eq!(boxed.get("color"), Some(&json!("red")));
//! assert_eq!(boxed.metadata().key(), "box");
//!
//! let text = styles.dynamic("text").unwrap().call(&[json!(12)]).unwrap();
//! assert_eq!(text.get("fontSize"), Some(&json!(12)));
//!
//! let keys: Vec<&str> = styles.keys().collect();
//! assert_eq!(keys, vec!["box", "text", VARIANTS_SLOT]);
//!
//! let again = styles.use_variants(Variants::new()).unwrap();
//! assert_eq!(again.style("box").unwrap().get("color"), Some(&json!("red")));
//! ```
//!
//! ## Concepts
//!
//! - [`StylesheetDefinition`]: ordered [`Slots`], each [`SlotDefinition::Static`]
//!   or [`SlotDefinition::Dynamic`], or a themed factory
//! - [`Traced`]: a value with [`Provenance`] attached out of band; equality,
//!   serialization and dereferencing see only the plain value
//! - [`Materializer`]: orchestrates hydration, resolution and wrapping, with
//!   injectable [`StylesheetResolver`], [`InlineNormalizer`] and
//!   [`SnapshotSource`]
//! - [`InitState`]: the once-only engine configuration, hydrated on the client
//!   from a server-published snapshot
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events and never installs a subscriber.

pub mod definition;
mod error;
pub mod hydrate;
mod materialize;
pub mod metadata;
pub mod normalize;
pub mod resolve;
pub mod state;
pub mod style;
mod variants;

pub use definition::{SlotDefinition, Slots, StyleFn, StylesheetDefinition, ThemedFn};
pub use error::{Error, Result};
pub use hydrate::{
    hydrate, is_server_context, publish_snapshot, set_server_detector, EnvSnapshot,
    GlobalSnapshot, Hydration, SnapshotSource, StaticSnapshot,
};
pub use materialize::{
    create, DynamicStyle, MaterializedSlot, MaterializedStylesheet, Materializer,
    ReservedSlotPolicy, VariantResolver, VARIANTS_SLOT,
};
pub use metadata::{attach, attach_value, metadata_of, Provenance, Shaped, Traced};
pub use normalize::{Identity, InlineNormalizer, StripInlineMarkers, INLINE_MARKER_PREFIX};
pub use resolve::{ComputedStylesheet, ResolvedSlot, StylesheetResolver, ThemeContext, ThemeResolver};
pub use state::{global_state, EngineConfig, InitState, Settings};
pub use style::Style;
pub use variants::{VariantValue, Variants};
