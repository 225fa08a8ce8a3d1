#![forbid(unsafe_code)]

//! Configuration and step catalog loading from TOML and JSON.
//!
//! Run:
//!   cargo test -p tour-runtime --features config --test config_loading

use std::io::Write;

use tour_core::{Placement, Size};
use tour_runtime::{TourConfig, TourConfigError, load_steps_json, load_steps_toml};
use web_time::Duration;

#[test]
fn partial_toml_keeps_defaults() {
    let config = TourConfig::from_toml_str(
        r#"
        [placement]
        margin = 8.0

        [measure]
        refine_delay_ms = 400
        "#,
    )
    .expect("valid config");

    assert_eq!(config.placement.margin, 8.0);
    assert_eq!(config.placement.anchor_padding, 12.0);
    assert_eq!(config.measure.estimated_size(), Size::new(320.0, 180.0));
    assert_eq!(config.measure.refine_delay(), Duration::from_millis(400));
    assert!(config.viewport.coalesce);
}

#[test]
fn empty_toml_is_default() {
    let config = TourConfig::from_toml_str("").expect("empty config");
    assert_eq!(config, TourConfig::default());
}

#[test]
fn toml_round_trips_through_file() {
    let original = TourConfig::default().coalesce_viewport(false);
    let text = original.to_toml_string().expect("serialize");

    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(text.as_bytes()).expect("write");

    let loaded = TourConfig::from_toml_file(file.path()).expect("load");
    assert_eq!(loaded, original);
}

#[test]
fn json_file_loads() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(br#"{ "measure": { "estimated_width": 400.0, "estimated_height": 220.0 } }"#)
        .expect("write");

    let config = TourConfig::from_json_file(file.path()).expect("load");
    assert_eq!(config.measure.estimated_width, 400.0);
    assert_eq!(config.measure.estimated_height, 220.0);
}

#[test]
fn invalid_values_are_rejected_with_every_reason() {
    let err = TourConfig::from_toml_str(
        r#"
        [placement]
        margin = -5.0

        [measure]
        refine_delay_ms = 0
        "#,
    )
    .expect_err("invalid config");

    match err {
        TourConfigError::Validation(errors) => {
            assert_eq!(errors.len(), 2, "{errors:?}");
        }
        other => panic!("expected validation error, got {other}"),
    }
}

#[test]
fn malformed_input_maps_to_parser_errors() {
    assert!(matches!(
        TourConfig::from_toml_str("[placement\nmargin = 1"),
        Err(TourConfigError::Toml(_))
    ));
    assert!(matches!(
        TourConfig::from_json_str("{ not json"),
        Err(TourConfigError::Json(_))
    ));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = TourConfig::from_toml_file(dir.path().join("absent.toml")).expect_err("missing");
    assert!(matches!(err, TourConfigError::Io(_)));
    assert!(err.to_string().starts_with("I/O error"));
}

// ── Step catalogs ─────────────────────────────────────────────────────────

#[test]
fn json_catalog_accepts_bare_array() {
    let steps = load_steps_json(
        r#"[
            { "targetId": "nav-orders", "title": "Orders", "content": "All orders." },
            {
                "targetId": "btn-export",
                "title": "Export",
                "content": "Download a CSV.",
                "placement": "bottom-left",
                "tip": "Shift+E",
                "demoTriggerCount": 3
            }
        ]"#,
    )
    .expect("catalog");

    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].placement, Placement::Bottom);
    assert_eq!(steps[1].placement, Placement::BottomLeft);
    assert_eq!(steps[1].tip.as_deref(), Some("Shift+E"));
    assert_eq!(steps[1].demo_trigger_count, Some(3));
}

#[test]
fn json_catalog_accepts_wrapped_object() {
    let steps = load_steps_json(
        r#"{ "steps": [ { "targetId": "a", "title": "A", "content": "a", "placement": "left" } ] }"#,
    )
    .expect("catalog");
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].placement, Placement::Left);
}

#[test]
fn toml_catalog_loads() {
    let steps = load_steps_toml(
        r#"
        [[steps]]
        targetId = "search"
        title = "Search"
        content = "Find anything."
        placement = "top"

        [[steps]]
        targetId = "profile"
        title = "Profile"
        content = "Your settings."
        "#,
    )
    .expect("catalog");
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].placement, Placement::Top);
    assert_eq!(steps[1].target_id, "profile");
}

#[test]
fn blank_target_ids_are_rejected() {
    let err = load_steps_json(r#"[ { "targetId": "  ", "title": "", "content": "" } ]"#)
        .expect_err("blank target");
    assert!(err.to_string().contains("steps[0].targetId"));
}

#[test]
fn unknown_placement_is_a_parse_error() {
    let err = load_steps_json(
        r#"[ { "targetId": "a", "title": "A", "content": "a", "placement": "diagonal" } ]"#,
    )
    .expect_err("bad placement");
    assert!(matches!(err, TourConfigError::Json(_)));
}
