//! Sheet configuration loaded from JSON.
//!
//! The `serde` feature is switched on for test builds through `snapsheet-test-utils`.

#![cfg(feature = "serde")]

use snapsheet::{EasingFunction, SheetConfig, SheetController, SheetPhase, SnapPoint};

#[test]
fn test_mixed_snap_points_from_json() {
    let config: SheetConfig = serde_json::from_str(
        r#"{
            "snap_points": ["25%", 420, "600", "abc%"],
            "index": 1,
            "enable_pan_down_to_close": false
        }"#,
    )
    .unwrap();

    assert_eq!(
        config.snap_points,
        vec![
            SnapPoint::Percent(25),
            SnapPoint::Pixels(420.0),
            SnapPoint::Pixels(600.0),
            SnapPoint::Malformed("abc%".to_string()),
        ]
    );
    assert_eq!(config.index, 1);
    assert!(!config.enable_pan_down_to_close);
    // Unspecified fields keep their defaults.
    assert_eq!(config.over_drag_resistance_factor, 2.5);
    assert_eq!(config.tuning.velocity_threshold, 0.3);
}

#[test]
fn test_tuning_and_easing_from_json() {
    let config: SheetConfig = serde_json::from_str(
        r#"{
            "snap_points": ["50%"],
            "easing": "linear",
            "animation_duration": 0.5,
            "tuning": { "max_distance": 80.0 }
        }"#,
    )
    .unwrap();

    assert_eq!(config.easing, EasingFunction::Linear);
    assert_eq!(config.animation_duration, 0.5);
    assert_eq!(config.tuning.max_distance, 80.0);
    assert_eq!(config.tuning.distance_ratio, 0.2);
}

#[test]
fn test_serialize_keeps_descriptor_shape() {
    let config = SheetConfig::new(vec![SnapPoint::Percent(30), SnapPoint::Pixels(500.0)]);
    let value = serde_json::to_value(&config).unwrap();

    assert_eq!(value["snap_points"][0], "30%");
    assert_eq!(value["snap_points"][1], 500.0);

    let back: SheetConfig = serde_json::from_value(value).unwrap();
    assert_eq!(back, config);
}

#[test]
fn test_json_configured_sheet_opens() {
    let config: SheetConfig = serde_json::from_str(r#"{ "snap_points": ["50%", "100%"] }"#).unwrap();
    let mut sheet = SheetController::with_config(config, 640.0);

    sheet.present();
    sheet.tick(1.0);

    assert_eq!(sheet.phase(), SheetPhase::Open(0));
    assert_eq!(sheet.translate_y(), 320.0);
}
