//! # Polygon Triangulation
//!
//! Turns 2D point loops into triangle index lists.
//!
//! ## Algorithms
//!
//! - [`sweep_line`] - monotone decomposition, O(n log n), supports holes
//! - [`ear_clip`] - ear cutting, O(n²), single contour only
//!
//! Both return `None` for input they cannot triangulate. Callers treat that
//! as "skip this face", never as a fatal error.

pub mod ear_clip;
pub mod sweep_line;

use log::trace;

use crate::vector::Point2;

/// Triangulates with the sweep line and falls back to ear clipping when the
/// sweep fails on a contour without holes.
///
/// # Example
///
/// ```rust
/// use mesh_kit::triangulate::triangulate;
/// use mesh_kit::Point2;
///
/// let l_shape = [
///     Point2::new(0.0, 0.0),
///     Point2::new(2.0, 0.0),
///     Point2::new(2.0, 1.0),
///     Point2::new(1.0, 1.0),
///     Point2::new(1.0, 2.0),
///     Point2::new(0.0, 2.0),
/// ];
/// let indices = triangulate(&l_shape, &[]).unwrap();
/// assert_eq!(indices.len(), 3 * 4);
/// ```
pub fn triangulate(contour: &[Point2], holes: &[Vec<Point2>]) -> Option<Vec<u32>> {
    if let Some(indices) = sweep_line::triangulate(contour, holes) {
        return Some(indices);
    }
    if holes.is_empty() {
        trace!("sweep line failed, falling back to ear clipping");
        return ear_clip::triangulate(contour);
    }
    None
}
