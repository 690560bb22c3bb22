//! Stylesheet materialization.
//!
//! [`Materializer::create`] turns a [`StylesheetDefinition`] into a
//! [`MaterializedStylesheet`]:
//!
//! 1. **Validation**: the build-time identifier must be present
//! 2. **Hydration**: outside a server context, an uninitialized engine is
//!    initialized from the published snapshot (best effort, once)
//! 3. **Resolution**: the resolver computes every slot once
//! 4. **Wrapping**: static slots are normalized and traced; dynamic slots are
//!    wrapped so each invocation result is normalized and traced
//! 5. **Variant entry point**: a reserved [`VARIANTS_SLOT`] is appended
//!
//! Re-resolving with new variants re-runs the wrapping step over the
//! computed stylesheet from step 3. The definition (including a themed
//! factory) is not evaluated again, and earlier stylesheets are left as is.
//!
//! # Example
//!
//! ```rust
//! use varistyle::{Materializer, Slots, Style, StylesheetDefinition, Variants};
//! use serde_json::json;
//!
//! let definition = StylesheetDefinition::from(
//!     Slots::new()
//!         .add("box", Style::new().with("color", "red"))
//!         .dynamic("text", |args| json!({ "fontSize": args[0] })),
//! );
//!
//! let sheet = Materializer::default().create(definition, Some("abc")).unwrap();
//! assert_eq!(sheet.style("box").unwrap().get("color"), Some(&json!("red")));
//!
//! let text = sheet.dynamic("text").unwrap().call(&[json!(12)]).unwrap();
//! assert_eq!(text.get("fontSize"), Some(&json!(12)));
//!
//! let small = sheet.use_variants(Variants::new().with("size", "small")).unwrap();
//! assert_eq!(small.style("box").unwrap().get("color"), Some(&json!("red")));
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::definition::{StyleFn, StylesheetDefinition};
use crate::error::{Error, Result};
use crate::hydrate::{self, GlobalSnapshot, SnapshotSource};
use crate::metadata::{attach, private, Provenance, Shaped, Traced};
use crate::normalize::{InlineNormalizer, StripInlineMarkers};
use crate::resolve::{ComputedStylesheet, ResolvedSlot, StylesheetResolver, ThemeResolver};
use crate::state::{global_state, InitState};
use crate::style::Style;
use crate::variants::Variants;

/// Name of the reserved variant re-resolution slot.
pub const VARIANTS_SLOT: &str = "useVariants";

/// What happens when a definition declares a slot named [`VARIANTS_SLOT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReservedSlotPolicy {
    /// The caller's slot is replaced by the variant entry point.
    #[default]
    Overwrite,
    /// Materialization fails with [`Error::ReservedSlot`].
    Reject,
}

/// Orchestrates hydration, resolution and metadata attachment.
///
/// Collaborators are injected; [`Materializer::default`] uses the
/// process-wide state, the [`ThemeResolver`], [`StripInlineMarkers`], the
/// [`GlobalSnapshot`] and [`hydrate::is_server_context`].
pub struct Materializer {
    state: Arc<InitState>,
    resolver: Arc<dyn StylesheetResolver>,
    normalizer: Arc<dyn InlineNormalizer>,
    snapshot: Arc<dyn SnapshotSource>,
    server_detector: fn() -> bool,
    reserved_policy: ReservedSlotPolicy,
}

impl Materializer {
    /// Creates a materializer bound to `state` with default collaborators.
    pub fn new(state: Arc<InitState>) -> Self {
        Self {
            resolver: Arc::new(ThemeResolver::new(Arc::clone(&state))),
            state,
            normalizer: Arc::new(StripInlineMarkers),
            snapshot: Arc::new(GlobalSnapshot),
            server_detector: hydrate::is_server_context,
            reserved_policy: ReservedSlotPolicy::default(),
        }
    }

    /// Replaces the computed-stylesheet resolver.
    pub fn resolver(mut self, resolver: impl StylesheetResolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    /// Replaces the inline-style normalizer.
    pub fn normalizer(mut self, normalizer: impl InlineNormalizer + 'static) -> Self {
        self.normalizer = Arc::new(normalizer);
        self
    }

    /// Replaces the hydration snapshot source.
    pub fn snapshot_source(mut self, source: impl SnapshotSource + 'static) -> Self {
        self.snapshot = Arc::new(source);
        self
    }

    /// Replaces the server-context detector.
    pub fn server_detector(mut self, detector: fn() -> bool) -> Self {
        self.server_detector = detector;
        self
    }

    /// Sets the policy for slots named [`VARIANTS_SLOT`].
    pub fn reserved_slot_policy(mut self, policy: ReservedSlotPolicy) -> Self {
        self.reserved_policy = policy;
        self
    }

    /// The initialization state this materializer hydrates and resolves against.
    pub fn state(&self) -> &Arc<InitState> {
        &self.state
    }

    /// Materializes `definition`.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingIdentifier`] when `identifier` is absent or empty
    /// - [`Error::ReservedSlot`] under [`ReservedSlotPolicy::Reject`]
    /// - any resolver or normalizer failure, unmodified
    ///
    /// A malformed hydration snapshot is logged and otherwise ignored.
    pub fn create(
        &self,
        definition: StylesheetDefinition,
        identifier: Option<&str>,
    ) -> Result<MaterializedStylesheet> {
        let identifier = match identifier {
            Some(id) if !id.is_empty() => id,
            _ => return Err(Error::MissingIdentifier),
        };

        let is_server = (self.server_detector)();
        if let Err(err) = hydrate::hydrate(&self.state, is_server, self.snapshot.as_ref()) {
            tracing::warn!(error = %err, "ignoring unusable hydration snapshot");
        }

        let definition = Arc::new(definition);
        let computed = self.resolver.resolve(&definition)?;
        if computed.get(VARIANTS_SLOT).is_some() {
            match self.reserved_policy {
                ReservedSlotPolicy::Reject => {
                    return Err(Error::ReservedSlot {
                        key: VARIANTS_SLOT.to_string(),
                    })
                }
                ReservedSlotPolicy::Overwrite => {
                    tracing::debug!(
                        identifier,
                        slot = VARIANTS_SLOT,
                        "reserved slot replaced by variant entry point"
                    );
                }
            }
        }

        tracing::debug!(identifier, slots = computed.len(), "materializing stylesheet");
        let origin = Arc::new(Origin {
            identifier: identifier.to_string(),
            definition,
            computed,
            normalizer: Arc::clone(&self.normalizer),
        });
        origin.materialize(Variants::default())
    }
}

impl Default for Materializer {
    fn default() -> Self {
        Self::new(global_state())
    }
}

impl fmt::Debug for Materializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Materializer")
            .field("state", &self.state)
            .field("reserved_policy", &self.reserved_policy)
            .finish_non_exhaustive()
    }
}

/// Materializes `definition` with the process-wide defaults.
///
/// Equivalent to `Materializer::default().create(definition, identifier)`.
pub fn create(
    definition: StylesheetDefinition,
    identifier: Option<&str>,
) -> Result<MaterializedStylesheet> {
    Materializer::default().create(definition, identifier)
}

/// Everything a stylesheet needs to be wrapped again under new variants.
struct Origin {
    identifier: String,
    definition: Arc<StylesheetDefinition>,
    computed: ComputedStylesheet,
    normalizer: Arc<dyn InlineNormalizer>,
}

impl Origin {
    fn provenance(&self, key: &str, args: Option<Vec<Value>>, variants: &Variants) -> Provenance {
        Provenance::new(key, Arc::clone(&self.definition), args, variants.clone())
    }

    fn materialize(self: &Arc<Self>, variants: Variants) -> Result<MaterializedStylesheet> {
        let mut slots = Vec::with_capacity(self.computed.len() + 1);
        for (key, resolved) in self.computed.iter() {
            if key == VARIANTS_SLOT {
                continue;
            }
            tracing::trace!(slot = key, "wrapping slot");
            let slot = match resolved {
                ResolvedSlot::Static(style) => {
                    let style = self.normalizer.normalize(key, style.clone())?;
                    MaterializedSlot::Static(attach(style, self.provenance(key, None, &variants)))
                }
                ResolvedSlot::Dynamic(f) => {
                    let dynamic = DynamicStyle {
                        key: key.to_string(),
                        f: Arc::clone(f),
                        origin: Arc::clone(self),
                        variants: variants.clone(),
                    };
                    MaterializedSlot::Dynamic(attach(
                        dynamic,
                        self.provenance(key, None, &variants),
                    ))
                }
            };
            slots.push((key.to_string(), slot));
        }
        slots.push((
            VARIANTS_SLOT.to_string(),
            MaterializedSlot::Variants(VariantResolver {
                origin: Arc::clone(self),
            }),
        ));

        Ok(MaterializedStylesheet {
            slots,
            variants,
            origin: Arc::clone(self),
        })
    }
}

/// A dynamic slot: invoking it produces a traced style.
#[derive(Clone)]
pub struct DynamicStyle {
    key: String,
    f: Arc<StyleFn>,
    origin: Arc<Origin>,
    variants: Variants,
}

impl DynamicStyle {
    /// Invokes the slot with `args`.
    ///
    /// Each call gets its own metadata recording `args`.
    ///
    /// # Errors
    ///
    /// Fails when the function returns a non-object or the normalizer fails.
    pub fn call(&self, args: &[Value]) -> Result<Traced<Style>> {
        let style = Style::from_value(&self.key, (self.f)(args))?;
        let style = self.origin.normalizer.normalize(&self.key, style)?;
        Ok(attach(
            style,
            self.origin
                .provenance(&self.key, Some(args.to_vec()), &self.variants),
        ))
    }
}

impl private::Sealed for DynamicStyle {}
impl Shaped for DynamicStyle {}

impl fmt::Debug for DynamicStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicStyle")
            .field("key", &self.key)
            .field("variants", &self.variants)
            .finish_non_exhaustive()
    }
}

/// The reserved variant entry point of a materialized stylesheet.
#[derive(Clone)]
pub struct VariantResolver {
    origin: Arc<Origin>,
}

impl VariantResolver {
    /// Materializes a fresh stylesheet under `variants`.
    pub fn call(&self, variants: Variants) -> Result<MaterializedStylesheet> {
        tracing::debug!(
            identifier = %self.origin.identifier,
            axes = variants.len(),
            "re-resolving stylesheet with variants"
        );
        self.origin.materialize(variants)
    }
}

impl fmt::Debug for VariantResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantResolver")
            .field("identifier", &self.origin.identifier)
            .finish()
    }
}

/// One slot of a materialized stylesheet.
#[derive(Debug, Clone)]
pub enum MaterializedSlot {
    /// A traced style.
    Static(Traced<Style>),
    /// A traced style function.
    Dynamic(Traced<DynamicStyle>),
    /// The reserved variant entry point.
    Variants(VariantResolver),
}

/// The runtime stylesheet returned by [`Materializer::create`].
///
/// Holds every caller slot in definition order, followed by the reserved
/// [`VARIANTS_SLOT`].
#[derive(Debug, Clone)]
pub struct MaterializedStylesheet {
    slots: Vec<(String, MaterializedSlot)>,
    variants: Variants,
    origin: Arc<Origin>,
}

impl fmt::Debug for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Origin")
            .field("identifier", &self.identifier)
            .field("definition", &self.definition)
            .finish_non_exhaustive()
    }
}

impl MaterializedStylesheet {
    pub fn get(&self, key: &str) -> Option<&MaterializedSlot> {
        self.slots
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, slot)| slot)
    }

    /// Returns a static slot.
    pub fn style(&self, key: &str) -> Option<&Traced<Style>> {
        match self.get(key)? {
            MaterializedSlot::Static(style) => Some(style),
            _ => None,
        }
    }

    /// Returns a dynamic slot.
    pub fn dynamic(&self, key: &str) -> Option<&Traced<DynamicStyle>> {
        match self.get(key)? {
            MaterializedSlot::Dynamic(dynamic) => Some(dynamic),
            _ => None,
        }
    }

    /// Iterates slot names, ending with [`VARIANTS_SLOT`].
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MaterializedSlot)> {
        self.slots.iter().map(|(key, slot)| (key.as_str(), slot))
    }

    /// Number of slots, including the reserved one.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The variant selection this stylesheet was materialized with.
    pub fn variants(&self) -> &Variants {
        &self.variants
    }

    /// The build-time identifier passed to `create`.
    pub fn identifier(&self) -> &str {
        &self.origin.identifier
    }

    /// The definition this stylesheet was materialized from.
    pub fn definition(&self) -> &Arc<StylesheetDefinition> {
        &self.origin.definition
    }

    /// Materializes a fresh stylesheet for the same definition under `variants`.
    pub fn use_variants(&self, variants: Variants) -> Result<MaterializedStylesheet> {
        self.origin.materialize(variants)
    }

    /// Plain view of the static slots as a JSON object, metadata excluded.
    pub fn to_static_value(&self) -> Value {
        Value::Object(
            self.slots
                .iter()
                .filter_map(|(key, slot)| match slot {
                    MaterializedSlot::Static(style) => Some((key.clone(), style.to_value())),
                    _ => None,
                })
                .collect(),
        )
    }
}
