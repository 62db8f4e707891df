//! Builder-level configuration on top of the shared `config` crate.
//!
//! Generators read tolerances and default resolutions from here instead of
//! hard-coding literals.

use config::constants::{GlobalConfig, DEFAULT_PHI_DIV, DEFAULT_THETA_DIV, GEOMETRY_EPSILON};

use crate::error::MeshResult;

/// Mesh builder configuration.
///
/// # Examples
/// ```
/// use mesh_kit::config::BuilderConfig;
/// let cfg = BuilderConfig::default();
/// assert!(cfg.tolerance > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuilderConfig {
    /// Distance below which points coincide and vectors count as degenerate.
    pub tolerance: f64,
    /// Angular divisions used by generators called without a resolution.
    pub theta_div: u32,
    /// Latitude divisions used by sphere-like generators called without a
    /// resolution.
    pub phi_div: u32,
}

impl BuilderConfig {
    /// Creates a configuration from explicit values.
    ///
    /// # Examples
    /// ```
    /// use mesh_kit::config::BuilderConfig;
    /// let cfg = BuilderConfig::new(1.0e-8, 48).unwrap();
    /// assert_eq!(cfg.theta_div, 48);
    /// assert!(BuilderConfig::new(-1.0, 48).is_err());
    /// ```
    pub fn new(tolerance: f64, divisions: u32) -> MeshResult<Self> {
        let global = GlobalConfig::new(tolerance, divisions)?;
        Ok(Self::from(global))
    }
}

impl From<GlobalConfig> for BuilderConfig {
    fn from(global: GlobalConfig) -> Self {
        Self {
            tolerance: global.tolerance,
            theta_div: global.default_divisions,
            phi_div: global.default_divisions,
        }
    }
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            tolerance: GEOMETRY_EPSILON,
            theta_div: DEFAULT_THETA_DIV,
            phi_div: DEFAULT_PHI_DIV,
        }
    }
}
