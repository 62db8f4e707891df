//! # Error Types
//!
//! Error types for mesh construction and processing.
//!
//! ## Error Policy
//!
//! - Invalid caller input (mismatched buffer lengths, too few points) fails
//!   immediately with [`MeshError::Shape`], before any partial mutation
//! - Absent required collections fail with [`MeshError::MissingData`]
//! - Polygons that cannot be triangulated are NOT errors: triangulators
//!   return `None` and builders skip the face
//! - Numerically degenerate geometry is handled by fallbacks, not errors

use config::constants::ConfigError;
use thiserror::Error;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur during mesh construction and processing.
///
/// ## Example
///
/// ```rust
/// use mesh_kit::{MeshBuilder, MeshError, Point3};
///
/// let mut builder = MeshBuilder::new(true, false, false);
/// let result = builder.add_triangles(&[Point3::ZERO, Point3::X], None, None);
/// assert!(matches!(result, Err(MeshError::Shape { .. })));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// Caller-supplied buffers have mismatched lengths, wrong multiples or
    /// counts below an algorithmic minimum.
    #[error("Invalid shape: {message}")]
    Shape {
        /// Description of the violated constraint
        message: String,
    },

    /// A collection required by the operation's contract was absent.
    #[error("Missing data: {name} must be provided")]
    MissingData {
        /// Name of the missing collection
        name: &'static str,
    },

    /// A mesh failed structural validation.
    #[error("Validation failed: {message}")]
    Validation {
        /// Every problem found, one per line
        message: String,
    },

    /// Builder configuration was rejected.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl MeshError {
    /// Creates a shape (invalid argument) error.
    pub fn shape(message: impl Into<String>) -> Self {
        Self::Shape {
            message: message.into(),
        }
    }

    /// Creates a missing data error for the named collection.
    pub fn missing(name: &'static str) -> Self {
        Self::MissingData { name }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

// =============================================================================
// RESULT TYPE ALIAS
// =============================================================================

/// Result type alias for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;

/// Fails with [`MeshError::Shape`] unless `actual == expected`.
pub(crate) fn ensure_len(what: &str, actual: usize, expected: usize) -> MeshResult<()> {
    if actual != expected {
        return Err(MeshError::shape(format!(
            "{what} has {actual} elements, expected {expected}"
        )));
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MeshError::shape("odd number of segment points");
        assert!(err.to_string().contains("Invalid shape"));
        assert!(err.to_string().contains("odd"));

        let err = MeshError::missing("normals");
        assert_eq!(err.to_string(), "Missing data: normals must be provided");
    }

    #[test]
    fn test_config_error_converts() {
        let err: MeshError = ConfigError::InvalidDivisions(2).into();
        assert!(matches!(err, MeshError::Config(ConfigError::InvalidDivisions(2))));
    }

    #[test]
    fn test_ensure_len() {
        assert!(ensure_len("normals", 3, 3).is_ok());
        let err = ensure_len("normals", 2, 3).unwrap_err();
        assert!(err.to_string().contains("normals has 2 elements, expected 3"));
    }

    /// Errors cross thread boundaries when meshes are built in parallel.
    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MeshError>();
    }
}
