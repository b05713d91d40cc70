use serde_json::json;

use super::*;
use crate::foundation::error::ErrorKind;

#[test]
fn empty_object_is_default() {
    let cfg = BadgeConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, BadgeConfig::default());
    assert_eq!(cfg.output_dir, PathBuf::from("badges"));
    assert_eq!(cfg.anchor, Anchor::BottomCenter);
    assert_eq!(cfg.batch.to_opts(), BatchOpts::default());
}

#[test]
fn full_config_parses() {
    let v = json!({
        "output_dir": "/tmp/out",
        "style": { "backgroundColor": "#112233", "corner_radius": 6 },
        "anchor": "top-left",
        "batch": { "parallel": true, "threads": 2, "timeout_ms": 1500 },
        "font_dirs": ["fonts"]
    });
    let cfg = BadgeConfig::from_json_str(&v.to_string()).unwrap();
    assert_eq!(cfg.output_dir, PathBuf::from("/tmp/out"));
    assert_eq!(cfg.style.background_color.to_svg_rgb(), "#112233");
    assert_eq!(cfg.style.corner_radius, 6);
    assert_eq!(cfg.anchor, Anchor::TopLeft);
    assert_eq!(
        cfg.batch.to_opts(),
        BatchOpts {
            parallel: true,
            threads: Some(2),
            timeout: Some(Duration::from_millis(1500)),
        }
    );
    assert_eq!(cfg.font_dirs, vec![PathBuf::from("fonts")]);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = BadgeConfig::from_json_str(r#"{"outptu_dir": "x"}"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn invalid_values_are_rejected() {
    for bad in [
        json!({ "output_dir": "" }),
        json!({ "batch": { "threads": 0 } }),
        json!({ "batch": { "timeout_ms": 0 } }),
        json!({ "style": { "font_family": " " } }),
        json!({ "anchor": "middle" }),
    ] {
        let err = BadgeConfig::from_json_str(&bad.to_string()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "{bad}");
    }
}

#[test]
fn missing_file_names_the_path() {
    let err = BadgeConfig::from_path("/nonexistent/badgeforge.json").unwrap_err();
    assert!(format!("{err:#}").contains("badgeforge.json"));
}

#[test]
fn config_serializes_back_to_json() {
    let cfg = BadgeConfig::default();
    let v = serde_json::to_value(&cfg).unwrap();
    assert_eq!(v["anchor"], json!("bottom-center"));
    assert_eq!(v["style"]["background_color"], json!("#ff6b35"));
    let back: BadgeConfig = serde_json::from_value(v).unwrap();
    assert_eq!(back, cfg);
}
