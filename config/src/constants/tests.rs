//! Tests for the global configuration snapshot.

use super::*;

/// Ensures default constants are sane and positive.
#[test]
fn default_constants_are_valid() {
    let cfg = GlobalConfig::default();
    assert!(cfg.tolerance > 0.0);
    assert!(cfg.default_divisions >= MIN_DIVISIONS);
}

/// Validates the constructor rejects invalid values.
#[test]
fn new_validates_inputs() {
    assert_eq!(
        GlobalConfig::new(0.0, 24).unwrap_err(),
        ConfigError::InvalidTolerance(0.0)
    );
    assert_eq!(
        GlobalConfig::new(1.0e-9, 2).unwrap_err(),
        ConfigError::InvalidDivisions(2)
    );
    assert!(GlobalConfig::new(f64::NAN, 24).is_err());
}

#[test]
fn error_messages_name_the_value() {
    let message = ConfigError::InvalidDivisions(1).to_string();
    assert!(message.contains("default_divisions"));
    assert!(message.contains('1'));
}
