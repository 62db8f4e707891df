//! # Config Crate
//!
//! Centralized configuration constants for the mesh toolkit.
//! All tolerances, default tessellation divisions and simplifier tuning
//! values are defined here so the geometry crates never carry bare literals.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{GEOMETRY_EPSILON, DEFAULT_THETA_DIV};
//!
//! // Use GEOMETRY_EPSILON for floating-point comparisons
//! let value: f64 = 1e-12;
//! assert!(value.abs() < GEOMETRY_EPSILON);
//!
//! // Use division defaults for tessellation
//! let requested = 0;
//! let divisions = if requested > 0 { requested } else { DEFAULT_THETA_DIV };
//! assert_eq!(divisions, DEFAULT_THETA_DIV);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Parity**: Simplifier constants match the quadric decimation heuristics
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;

#[cfg(test)]
mod tests;
