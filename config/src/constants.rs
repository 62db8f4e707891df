//! # Configuration Constants
//!
//! Centralized constants for the mesh toolkit. Triangulation predicates,
//! tessellation defaults and the quadric simplifier heuristics all read
//! their values from here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Resolution**: Default tessellation divisions
//! - **Simplification**: Quadric edge-collapse tuning values
//! - **Global**: Validated configuration snapshot shared between crates

use std::fmt;

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for general geometric comparisons (zero-length vectors,
/// coincident points, degenerate cross products).
///
/// # Example
///
/// ```rust
/// use config::constants::GEOMETRY_EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < GEOMETRY_EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-12));
/// ```
pub const GEOMETRY_EPSILON: f64 = 1e-10;

/// Tolerance used by the sweep-line triangulator when searching the status
/// structure and testing orientation of monotone chains.
///
/// # Example
///
/// ```rust
/// use config::constants::TRIANGULATION_EPSILON;
/// assert!(TRIANGULATION_EPSILON < 1e-6);
/// ```
pub const TRIANGULATION_EPSILON: f64 = 1e-7;

/// Minimum signed area for a candidate ear to count as non-degenerate.
///
/// # Example
///
/// ```rust
/// use config::constants::EAR_CLIP_EPSILON;
/// assert!(EAR_CLIP_EPSILON > 0.0);
/// ```
pub const EAR_CLIP_EPSILON: f64 = 1e-10;

/// Negative slack allowed on the cross products of the point-in-triangle test
/// used by ear clipping. Points on an ear's boundary count as inside.
///
/// # Example
///
/// ```rust
/// use config::constants::EAR_CLIP_INSIDE_EPSILON;
/// assert!(EAR_CLIP_INSIDE_EPSILON > 0.0);
/// ```
pub const EAR_CLIP_INSIDE_EPSILON: f64 = 1e-10;

// =============================================================================
// RESOLUTION CONSTANTS
// =============================================================================

/// Default number of angular divisions around a revolution axis.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_THETA_DIV;
/// assert_eq!(DEFAULT_THETA_DIV, 32);
/// ```
pub const DEFAULT_THETA_DIV: u32 = 32;

/// Default number of latitude divisions for spheres and ellipsoids.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_PHI_DIV;
/// assert_eq!(DEFAULT_PHI_DIV, 32);
/// ```
pub const DEFAULT_PHI_DIV: u32 = 32;

/// Minimum number of divisions for any closed circular section.
///
/// A circle needs at least three points to enclose an area.
pub const MIN_DIVISIONS: u32 = 3;

// =============================================================================
// SIMPLIFICATION CONSTANTS
// =============================================================================

/// Default aggressiveness exponent of the simplifier threshold formula.
pub const SIMPLIFY_DEFAULT_AGGRESSIVENESS: f64 = 7.0;

/// Iteration cap of the bounded (target triangle count) simplification mode.
pub const SIMPLIFY_MAX_ITERATIONS: usize = 100;

/// Iteration cap of the lossless simplification mode.
pub const SIMPLIFY_LOSSLESS_MAX_ITERATIONS: usize = 9999;

/// The vertex-to-triangle adjacency is rebuilt every this many iterations
/// in bounded mode.
pub const SIMPLIFY_REBUILD_INTERVAL: usize = 5;

/// Scale of the threshold formula `scale * (iteration + 3)^aggressiveness`.
pub const SIMPLIFY_THRESHOLD_SCALE: f64 = 0.000_000_001;

/// Fixed collapse threshold used by lossless simplification.
pub const SIMPLIFY_LOSSLESS_THRESHOLD: f64 = f64::EPSILON;

/// Minimum dot product between a triangle's old and new normal for a
/// collapse to be accepted.
pub const SIMPLIFY_MIN_NORMAL_DOT: f64 = 0.2;

/// Maximum cosine between the two edges leaving the collapsed vertex
/// in any touched triangle. Larger values mean a near-degenerate sliver.
pub const SIMPLIFY_MAX_EDGE_COSINE: f64 = 0.999;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Checks if two floating-point values are approximately equal.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_equal;
///
/// assert!(approx_equal(1.0, 1.0 + 1e-12));
/// assert!(!approx_equal(1.0, 1.1));
/// ```
#[inline]
pub fn approx_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < GEOMETRY_EPSILON
}

/// Checks if a floating-point value is approximately zero.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_zero;
///
/// assert!(approx_zero(1e-12));
/// assert!(!approx_zero(0.1));
/// ```
#[inline]
pub fn approx_zero(value: f64) -> bool {
    value.abs() < GEOMETRY_EPSILON
}

/// Clamps a requested division count to [`MIN_DIVISIONS`].
///
/// # Example
///
/// ```rust
/// use config::constants::{clamp_divisions, MIN_DIVISIONS};
///
/// assert_eq!(clamp_divisions(1), MIN_DIVISIONS);
/// assert_eq!(clamp_divisions(16), 16);
/// ```
#[inline]
pub fn clamp_divisions(divisions: u32) -> u32 {
    divisions.max(MIN_DIVISIONS)
}

// =============================================================================
// GLOBAL CONFIGURATION
// =============================================================================

/// Immutable snapshot of global configuration settings that can be shared
/// between crates.
///
/// # Examples
/// ```
/// use config::constants::GlobalConfig;
/// let config = GlobalConfig::default();
/// assert!(config.tolerance > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalConfig {
    /// Numeric tolerance propagated into geometry kernels.
    pub tolerance: f64,
    /// Default division count for generators that take no explicit resolution.
    pub default_divisions: u32,
}

impl GlobalConfig {
    /// Builds a configuration enforcing strict validation of the supplied
    /// tolerance and default divisions.
    ///
    /// # Examples
    /// ```
    /// use config::constants::GlobalConfig;
    /// let cfg = GlobalConfig::new(1.0e-6, 24).expect("valid config");
    /// assert_eq!(cfg.default_divisions, 24);
    /// ```
    pub fn new(tolerance: f64, default_divisions: u32) -> Result<Self, ConfigError> {
        if tolerance <= 0.0 || !tolerance.is_finite() {
            return Err(ConfigError::InvalidTolerance(tolerance));
        }
        if default_divisions < MIN_DIVISIONS {
            return Err(ConfigError::InvalidDivisions(default_divisions));
        }
        Ok(Self {
            tolerance,
            default_divisions,
        })
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            tolerance: GEOMETRY_EPSILON,
            default_divisions: DEFAULT_THETA_DIV,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Raised when tolerance is zero, negative or not finite.
    InvalidTolerance(f64),
    /// Raised when the requested division count is too small to form a polygon.
    InvalidDivisions(u32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTolerance(value) => {
                write!(f, "tolerance must be positive and finite: {value}")
            }
            ConfigError::InvalidDivisions(value) => {
                write!(f, "default_divisions must be >= {MIN_DIVISIONS}: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests;
