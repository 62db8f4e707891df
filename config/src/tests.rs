//! # Tests for Config Constants
//!
//! Unit tests verifying the correctness of configuration constants
//! and helper functions.

use crate::constants::*;

// =============================================================================
// PRECISION TESTS
// =============================================================================

#[test]
fn test_geometry_epsilon_is_small() {
    assert!(GEOMETRY_EPSILON > 0.0);
    assert!(GEOMETRY_EPSILON < 1e-6, "GEOMETRY_EPSILON should be small for precision");
}

#[test]
fn test_triangulation_epsilon_is_looser_than_geometry_epsilon() {
    assert!(TRIANGULATION_EPSILON >= GEOMETRY_EPSILON);
}

// =============================================================================
// RESOLUTION TESTS
// =============================================================================

#[test]
fn test_min_divisions_at_least_three() {
    assert!(MIN_DIVISIONS >= 3);
    assert!(DEFAULT_THETA_DIV >= MIN_DIVISIONS);
    assert!(DEFAULT_PHI_DIV >= MIN_DIVISIONS);
}

#[test]
fn test_clamp_divisions() {
    assert_eq!(clamp_divisions(0), MIN_DIVISIONS);
    assert_eq!(clamp_divisions(64), 64);
}

// =============================================================================
// SIMPLIFICATION TESTS
// =============================================================================

#[test]
fn test_simplifier_defaults() {
    assert_eq!(SIMPLIFY_DEFAULT_AGGRESSIVENESS, 7.0);
    assert_eq!(SIMPLIFY_MAX_ITERATIONS, 100);
    assert_eq!(SIMPLIFY_REBUILD_INTERVAL, 5);
    assert!(SIMPLIFY_LOSSLESS_MAX_ITERATIONS > SIMPLIFY_MAX_ITERATIONS);
}

#[test]
fn test_threshold_grows_with_iteration() {
    let threshold =
        |iteration: usize| SIMPLIFY_THRESHOLD_SCALE * ((iteration + 3) as f64).powf(SIMPLIFY_DEFAULT_AGGRESSIVENESS);
    assert!(threshold(0) < threshold(1));
    assert!(threshold(10) > 100.0 * threshold(0));
}

#[test]
fn test_flip_limits_in_range() {
    assert!(SIMPLIFY_MIN_NORMAL_DOT > 0.0 && SIMPLIFY_MIN_NORMAL_DOT < 1.0);
    assert!(SIMPLIFY_MAX_EDGE_COSINE > 0.9 && SIMPLIFY_MAX_EDGE_COSINE < 1.0);
}

// =============================================================================
// APPROX TESTS
// =============================================================================

#[test]
fn test_approx_equal_within_epsilon() {
    let small_diff = GEOMETRY_EPSILON / 2.0;
    assert!(approx_equal(1.0, 1.0 + small_diff));
    assert!(!approx_equal(1.0, 1.0 + GEOMETRY_EPSILON * 2.0));
}

#[test]
fn test_approx_zero() {
    assert!(approx_zero(0.0));
    assert!(approx_zero(-GEOMETRY_EPSILON / 2.0));
    assert!(!approx_zero(0.1));
}
