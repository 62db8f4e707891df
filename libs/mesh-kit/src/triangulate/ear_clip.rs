//! # Ear Clipping
//!
//! O(n²) triangulation of a single simple contour. Slower than the sweep but
//! has no status structure to get wrong, which makes it the fallback for
//! small faces and for contours the sweep rejects.

use config::constants::{EAR_CLIP_EPSILON, EAR_CLIP_INSIDE_EPSILON};
use log::trace;

use crate::vector::{cross2, orient2d, signed_area, Point2};

/// Triangulates `contour` by repeatedly cutting ears.
///
/// Indices refer to `contour` as passed in; triangles are counter-clockwise.
/// Returns `None` for fewer than three points or when no ear can be found
/// within `2 * remaining` attempts (typical of self-intersecting input).
///
/// # Example
///
/// ```rust
/// use mesh_kit::triangulate::ear_clip;
/// use mesh_kit::Point2;
///
/// let triangle = [Point2::ZERO, Point2::X, Point2::Y];
/// assert_eq!(ear_clip::triangulate(&triangle), Some(vec![2, 0, 1]));
/// ```
pub fn triangulate(contour: &[Point2]) -> Option<Vec<u32>> {
    let mut n = contour.len();
    if n > 3 && contour[0] == contour[n - 1] {
        n -= 1;
    }
    if n < 3 {
        return None;
    }
    let points = &contour[..n];

    let mut active: Vec<usize> = if signed_area(points) > 0.0 {
        (0..n).collect()
    } else {
        (0..n).rev().collect()
    };

    let mut result = Vec::with_capacity(3 * (n - 2));
    let mut remaining = n;
    let mut attempts = 2 * remaining;
    let mut v = remaining - 1;

    while remaining > 2 {
        if attempts == 0 {
            trace!("ear clip: gave up with {remaining} vertices left");
            return None;
        }
        attempts -= 1;

        let u = if v < remaining { v } else { 0 };
        v = if u + 1 < remaining { u + 1 } else { 0 };
        let w = if v + 1 < remaining { v + 1 } else { 0 };

        if is_ear(points, &active, u, v, w) {
            result.extend([active[u] as u32, active[v] as u32, active[w] as u32]);
            active.remove(v);
            remaining -= 1;
            attempts = 2 * remaining;
        }
    }

    Some(result)
}

/// True if `(u, v, w)` is a counter-clockwise triangle containing no other
/// active vertex.
fn is_ear(points: &[Point2], active: &[usize], u: usize, v: usize, w: usize) -> bool {
    let a = points[active[u]];
    let b = points[active[v]];
    let c = points[active[w]];
    if orient2d(a, b, c) < EAR_CLIP_EPSILON {
        return false;
    }
    !active
        .iter()
        .enumerate()
        .filter(|&(slot, _)| slot != u && slot != v && slot != w)
        .any(|(_, &p)| inside_triangle(a, b, c, points[p]))
}

/// Point-in-triangle via three same-sign cross products. Points on an edge
/// count as inside.
pub(crate) fn inside_triangle(a: Point2, b: Point2, c: Point2, p: Point2) -> bool {
    cross2(c - b, p - b) >= -EAR_CLIP_INSIDE_EPSILON
        && cross2(a - c, p - c) >= -EAR_CLIP_INSIDE_EPSILON
        && cross2(b - a, p - a) >= -EAR_CLIP_INSIDE_EPSILON
}
