//! Unit tests for seraa-core.

#[test]
fn test_crate_structure() {
    // Smoke test - verifies the public surface fits together
    use crate::{SeraaConfig, SeraaError, TernaryValue};

    let config = SeraaConfig::default();
    assert!(config.validate().is_ok());

    let err: SeraaError = seraa_ternary::TernaryValue::value_of(7).unwrap_err().into();
    assert!(err.to_string().starts_with("Ternary error"));

    assert_eq!(TernaryValue::default(), TernaryValue::Neutral);
}
