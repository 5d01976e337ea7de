#![allow(clippy::float_cmp)]

use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

// =============================================================
// Parsing
// =============================================================

#[test]
fn defaults_when_unset() {
    let settings = Settings::from_lookup(lookup(&[])).unwrap();
    assert_eq!(settings, Settings::default());
    assert!(settings.auto_scale);
    assert_eq!(settings.max_image_size, 1200.0);
    assert_eq!(settings.canvas_size, Size::new(10_000.0, 10_000.0));
}

#[test]
fn reads_overrides() {
    let settings =
        Settings::from_lookup(lookup(&[(ENV_AUTO_SCALE, "false"), (ENV_MAX_IMAGE_SIZE, "800")])).unwrap();
    assert!(!settings.auto_scale);
    assert_eq!(settings.max_image_size, 800.0);
}

#[test]
fn accepts_numeric_booleans() {
    let settings = Settings::from_lookup(lookup(&[(ENV_AUTO_SCALE, "0")])).unwrap();
    assert!(!settings.auto_scale);
}

#[test]
fn rejects_malformed_bool() {
    let err = Settings::from_lookup(lookup(&[(ENV_AUTO_SCALE, "maybe")])).unwrap_err();
    assert_eq!(err, ConfigError::Parse { var: ENV_AUTO_SCALE, value: "maybe".into() });
}

#[test]
fn rejects_non_positive_size() {
    for bad in ["0", "-5", "abc", "inf"] {
        let err = Settings::from_lookup(lookup(&[(ENV_MAX_IMAGE_SIZE, bad)])).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { var: ENV_MAX_IMAGE_SIZE, .. }), "{bad}");
    }
}

#[test]
fn error_message_names_variable() {
    let err = ConfigError::Parse { var: ENV_MAX_IMAGE_SIZE, value: "x".into() };
    assert!(err.to_string().contains(ENV_MAX_IMAGE_SIZE));
}

// =============================================================
// Scaling
// =============================================================

#[test]
fn small_images_are_untouched() {
    let settings = Settings::default();
    assert_eq!(settings.scaled_size(Size::new(1200.0, 800.0)), Size::new(1200.0, 800.0));
}

#[test]
fn disabled_scaling_is_identity() {
    let mut settings = Settings::default();
    settings.toggle_auto_scale();
    assert_eq!(settings.scaled_size(Size::new(5000.0, 4000.0)), Size::new(5000.0, 4000.0));
}

#[test]
fn large_images_are_damped_logarithmically() {
    // 2400 px: ratio 0.5, damping 1 - log10(2)/3 ≈ 0.89966
    let scaled = Settings::default().scaled_size(Size::new(2400.0, 1200.0));
    assert_eq!(scaled, Size::new(1080.0, 540.0));
}

#[test]
fn scale_never_drops_below_floor() {
    let mut settings = Settings::default();
    settings.set_max_image_size(10.0);
    let scaled = settings.scaled_size(Size::new(100_000.0, 50_000.0));
    assert_eq!(scaled, Size::new(10_000.0, 5_000.0));
}
