//! Integration tests for stylesheet materialization.
//!
//! These tests exercise the public surface end to end: identifier checks,
//! metadata transparency, dynamic slots, variant re-resolution and
//! process-wide hydration.

use std::sync::Arc;

use proptest::prelude::*;
use serde_json::{json, Map, Value};
use serial_test::serial;
use varistyle::{
    attach, create, global_state, metadata_of, publish_snapshot, set_server_detector,
    EngineConfig, Error, InitState, MaterializedSlot, Materializer, Provenance, Slots,
    StaticSnapshot, Style, StylesheetDefinition, Variants, VARIANTS_SLOT,
};

fn example_definition() -> StylesheetDefinition {
    StylesheetDefinition::from(
        Slots::new()
            .add("box", Style::new().with("color", "red"))
            .dynamic("text", |args| json!({ "fontSize": args[0] })),
    )
}

fn isolated() -> Materializer {
    Materializer::new(Arc::new(InitState::new()))
        .server_detector(|| false)
        .snapshot_source(StaticSnapshot(None))
}

fn plain_style() -> impl Strategy<Value = Style> {
    prop::collection::btree_map("[a-zA-Z]{1,12}", any::<i32>(), 0..8).prop_map(|props| {
        props
            .into_iter()
            .fold(Style::new(), |style, (name, value)| style.with(&name, value))
    })
}

#[test]
fn test_example_stylesheet() {
    let sheet = isolated().create(example_definition(), Some("abc")).unwrap();

    assert_eq!(sheet.style("box").unwrap().get("color"), Some(&json!("red")));
    let text = sheet.dynamic("text").unwrap().call(&[json!(12)]).unwrap();
    assert_eq!(text.get("fontSize"), Some(&json!(12)));

    let fresh = sheet.use_variants(Variants::new()).unwrap();
    assert_eq!(fresh.style("box").unwrap().get("color"), Some(&json!("red")));
}

#[test]
fn test_missing_identifier_for_any_definition() {
    let definitions = vec![
        StylesheetDefinition::from(Slots::new()),
        example_definition(),
        StylesheetDefinition::themed(|_| Slots::new().add("a", Style::new())),
    ];
    for definition in definitions {
        let err = isolated().create(definition, None).unwrap_err();
        assert!(matches!(err, Error::MissingIdentifier));
    }
}

#[test]
fn test_dynamic_invocations_have_independent_metadata() {
    let sheet = isolated().create(example_definition(), Some("abc")).unwrap();
    let text = sheet.dynamic("text").unwrap();

    let small = text.call(&[json!(10)]).unwrap();
    let large = text.call(&[json!(32)]).unwrap();

    assert_eq!(small.metadata().args(), Some(&[json!(10)][..]));
    assert_eq!(large.metadata().args(), Some(&[json!(32)][..]));
    assert_eq!(small.get("fontSize"), Some(&json!(10)));
    assert_eq!(large.get("fontSize"), Some(&json!(32)));
}

#[test]
fn test_variant_resolution_is_pure() {
    let sheet = isolated().create(example_definition(), Some("abc")).unwrap();
    let before = sheet.to_static_value();
    let selection = Variants::new().with("size", "large").with("disabled", false);

    let first = sheet.use_variants(selection.clone()).unwrap();
    let second = sheet.use_variants(selection.clone()).unwrap();

    assert_eq!(first.to_static_value(), second.to_static_value());
    assert_eq!(first.keys().collect::<Vec<_>>(), second.keys().collect::<Vec<_>>());
    assert_eq!(first.variants(), &selection);
    assert_eq!(second.variants(), &selection);

    assert_eq!(sheet.to_static_value(), before);
    assert!(sheet.variants().is_empty());
    assert!(sheet.style("box").unwrap().metadata().variants().is_empty());
}

#[test]
fn test_variant_slot_chains() {
    let sheet = isolated().create(example_definition(), Some("abc")).unwrap();
    let outer = Variants::new().with("tone", "muted");

    let resolved = match sheet.get(VARIANTS_SLOT) {
        Some(MaterializedSlot::Variants(resolver)) => resolver.call(outer.clone()).unwrap(),
        other => panic!("unexpected slot: {other:?}"),
    };
    let nested = resolved.use_variants(Variants::new()).unwrap();

    assert_eq!(resolved.variants(), &outer);
    assert!(nested.variants().is_empty());
    assert_eq!(nested.identifier(), "abc");
}

#[test]
#[serial]
fn test_global_hydration_happens_once() {
    set_server_detector(|| false);
    publish_snapshot(EngineConfig::default().breakpoint("md", 768));

    create(example_definition(), Some("first")).unwrap();
    assert!(global_state().is_initialized());
    let config = global_state().config().cloned();

    create(example_definition(), Some("second")).unwrap();
    assert!(global_state().is_initialized());
    assert_eq!(global_state().config().cloned(), config);
    assert!(!global_state().init(EngineConfig::default()));
}

#[test]
#[serial]
fn test_server_context_leaves_state_uninitialized() {
    set_server_detector(|| true);
    let state = Arc::new(InitState::new());
    let materializer = Materializer::new(Arc::clone(&state))
        .snapshot_source(StaticSnapshot(Some(EngineConfig::default())));

    materializer.create(example_definition(), Some("abc")).unwrap();
    assert!(!state.is_initialized());
    set_server_detector(|| false);
}

#[test]
fn test_themed_definition_sees_hydrated_theme() {
    let state = Arc::new(InitState::new());
    let config = EngineConfig::default().theme("light", json!({"colors": {"text": "#111"}}));
    let materializer = Materializer::new(Arc::clone(&state))
        .server_detector(|| false)
        .snapshot_source(StaticSnapshot(Some(config)));

    let definition = StylesheetDefinition::themed(|ctx| {
        Slots::new().add(
            "label",
            Style::new().with("color", ctx.theme["colors"]["text"].clone()),
        )
    });
    let sheet = materializer.create(definition, Some("abc")).unwrap();

    assert_eq!(sheet.style("label").unwrap().get("color"), Some(&json!("#111")));
}

proptest! {
    #[test]
    fn prop_attach_preserves_shape(style in plain_style(), key in "[a-z]{1,8}") {
        let provenance = Provenance::new(
            key,
            Arc::new(StylesheetDefinition::from(Slots::new())),
            None,
            Variants::new(),
        );
        let traced = attach(style.clone(), provenance.clone());

        prop_assert_eq!(serde_json::to_value(&traced).unwrap(), serde_json::to_value(&style).unwrap());
        prop_assert_eq!(traced.iter().count(), style.len());
        prop_assert_eq!(metadata_of(&traced), &provenance);
    }

    #[test]
    fn prop_static_slots_keep_plain_content(style in plain_style()) {
        let definition = StylesheetDefinition::from(Slots::new().add("slot", style.clone()));
        let sheet = isolated().create(definition, Some("abc")).unwrap();
        let traced = sheet.style("slot").unwrap();

        prop_assert_eq!(traced, &style);
        prop_assert_eq!(traced.metadata().key(), "slot");
    }

    #[test]
    fn prop_dynamic_slot_matches_function(size in any::<i64>(), weight in "[a-z]{1,6}") {
        let sheet = isolated().create(
            StylesheetDefinition::from(Slots::new().dynamic("text", |args| {
                let mut props = Map::new();
                props.insert("fontSize".to_string(), args[0].clone());
                props.insert("fontWeight".to_string(), args[1].clone());
                Value::Object(props)
            })),
            Some("abc"),
        ).unwrap();

        let out = sheet.dynamic("text").unwrap().call(&[json!(size), json!(weight)]).unwrap();
        prop_assert_eq!(out.to_value(), json!({"fontSize": size, "fontWeight": weight}));
    }
}
