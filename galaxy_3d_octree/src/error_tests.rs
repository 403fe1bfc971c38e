//! Unit tests for error.rs
//!
//! Tests all Error variants and their implementations (Display, Debug, Clone, std::error::Error).

use crate::error::{precondition_violation, Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_invalid_config_display() {
    let err = Error::InvalidConfig("max_depth 40 exceeds 20".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Invalid config"));
    assert!(display.contains("max_depth 40 exceeds 20"));
}

#[test]
fn test_degenerate_bounds_display() {
    let err = Error::DegenerateBounds("min > max".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Degenerate bounds"));
    assert!(display.contains("min > max"));
}

#[test]
fn test_unknown_entity_display() {
    let err = Error::UnknownEntity("EntityKey(3v1)".to_string());
    assert_eq!(format!("{}", err), "Unknown entity: EntityKey(3v1)");
}

#[test]
fn test_duplicate_entity_display() {
    let err = Error::DuplicateEntity("EntityKey(1v1)".to_string());
    assert!(format!("{}", err).contains("Duplicate entity"));
}

#[test]
fn test_malformed_frustum_display() {
    let err = Error::MalformedFrustum(4);
    assert_eq!(format!("{}", err), "Malformed frustum: expected 6 planes, got 4");
}

#[test]
fn test_invariant_violation_display() {
    let err = Error::InvariantViolation("count mismatch".to_string());
    assert!(format!("{}", err).contains("count mismatch"));
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::MalformedFrustum(0);
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_debug() {
    let debug = format!("{:?}", Error::UnknownEntity("k".to_string()));
    assert!(debug.contains("UnknownEntity"));
}

#[test]
fn test_error_clone_and_eq() {
    let err = Error::InvalidConfig("bad".to_string());
    assert_eq!(err.clone(), err);
    assert_ne!(err, Error::InvalidConfig("other".to_string()));
}

#[test]
fn test_result_alias() {
    fn fails() -> Result<u32> {
        Err(Error::MalformedFrustum(5))
    }
    assert!(fails().is_err());
}

// ============================================================================
// PRECONDITION VIOLATION
// ============================================================================

#[test]
#[should_panic(expected = "remove failed: Unknown entity")]
fn test_precondition_violation_panics_with_context() {
    precondition_violation(
        "galaxy3d::Test",
        "remove",
        Error::UnknownEntity("EntityKey(9v1)".to_string()),
    );
}
