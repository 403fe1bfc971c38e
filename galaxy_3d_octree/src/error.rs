//! Error types for the Galaxy3D octree
//!
//! This module defines the error types used by the scene index,
//! including configuration validation and precondition violations.

use std::fmt;

/// Result type for Galaxy3D octree operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D octree errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid index configuration (world bounds, depth, etc.)
    InvalidConfig(String),

    /// Null, inverted or non-finite bounding box where a valid one is required
    DegenerateBounds(String),

    /// Entity is not known to the index
    UnknownEntity(String),

    /// Entity is already present in the index
    DuplicateEntity(String),

    /// Frustum does not have exactly six planes (carries the plane count)
    MalformedFrustum(usize),

    /// Internal bookkeeping is inconsistent (entity membership or counts)
    InvariantViolation(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
            Error::DegenerateBounds(msg) => write!(f, "Degenerate bounds: {}", msg),
            Error::UnknownEntity(msg) => write!(f, "Unknown entity: {}", msg),
            Error::DuplicateEntity(msg) => write!(f, "Duplicate entity: {}", msg),
            Error::MalformedFrustum(count) => {
                write!(f, "Malformed frustum: expected 6 planes, got {}", count)
            }
            Error::InvariantViolation(msg) => write!(f, "Invariant violation: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Log a precondition violation and abort the current operation.
///
/// Precondition violations are caller-side bookkeeping bugs. Continuing
/// with a corrupted tree would silently drop or duplicate objects, so the
/// violation is logged with file:line and turned into a panic carrying
/// the operation name and the offending error.
#[track_caller]
pub(crate) fn precondition_violation(source: &str, operation: &str, error: Error) -> ! {
    let location = std::panic::Location::caller();
    crate::log::log_detailed(
        crate::log::LogSeverity::Error,
        source,
        format!("{} failed: {}", operation, error),
        location.file(),
        location.line(),
    );
    panic!("{}: {} failed: {}", source, operation, error);
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
