//! Vector math shared across the toolkit.
//!
//! Positions and normals are `glam::DVec3`, 2D points are `glam::DVec2`.
//! The aliases keep signatures readable; the free functions cover the few
//! operations glam does not provide directly.

use config::constants::GEOMETRY_EPSILON;
use glam::{DVec2, DVec3};

/// A 2D point (polygon vertex, texture coordinate, revolution profile sample).
pub type Point2 = DVec2;

/// A 3D position.
pub type Point3 = DVec3;

/// A 3D direction or normal.
pub type Vector3 = DVec3;

/// Returns the z component of the 3D cross product of two 2D vectors.
///
/// # Examples
/// ```
/// use mesh_kit::vector::{cross2, Point2};
/// assert_eq!(cross2(Point2::X, Point2::Y), 1.0);
/// ```
#[inline]
pub fn cross2(a: Point2, b: Point2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Twice the signed area of triangle `(a, b, c)`; positive when counter-clockwise.
#[inline]
pub fn orient2d(a: Point2, b: Point2, c: Point2) -> f64 {
    cross2(b - a, c - a)
}

/// Signed area of a closed 2D loop (shoelace formula, no epsilon).
///
/// # Examples
/// ```
/// use mesh_kit::vector::{signed_area, Point2};
/// let square = [Point2::ZERO, Point2::X, Point2::ONE, Point2::Y];
/// assert_eq!(signed_area(&square), 1.0);
/// ```
pub fn signed_area(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let p = points[i];
        let q = points[(i + 1) % n];
        sum += p.x * q.y - q.x * p.y;
    }
    sum * 0.5
}

/// Returns some unit vector perpendicular to `n`.
///
/// Crosses with the Y axis first and falls back to the X axis when `n` is
/// nearly parallel to Y.
///
/// # Examples
/// ```
/// use mesh_kit::vector::{find_any_perpendicular, Vector3};
/// let n = Vector3::new(0.0, 0.0, 1.0);
/// assert!(find_any_perpendicular(n).dot(n).abs() < 1e-12);
/// ```
pub fn find_any_perpendicular(n: Vector3) -> Vector3 {
    let n = n.normalize_or_zero();
    let mut u = Vector3::Y.cross(n);
    if u.length_squared() < 1e-6 {
        u = Vector3::X.cross(n);
    }
    u.normalize_or_zero()
}

/// Unit normal of triangle `(a, b, c)` following the right-hand rule, or zero
/// when the triangle is degenerate.
pub fn triangle_normal(a: Point3, b: Point3, c: Point3) -> Vector3 {
    let n = (b - a).cross(c - a);
    if n.length_squared() <= GEOMETRY_EPSILON * GEOMETRY_EPSILON {
        return Vector3::ZERO;
    }
    n.normalize()
}

/// Area of triangle `(a, b, c)`.
#[inline]
pub fn triangle_area(a: Point3, b: Point3, c: Point3) -> f64 {
    0.5 * (b - a).cross(c - a).length()
}

/// Angle in radians between two vectors, zero if either is degenerate.
pub fn angle_between(a: Vector3, b: Vector3) -> f64 {
    let la = a.length();
    let lb = b.length();
    if la < GEOMETRY_EPSILON || lb < GEOMETRY_EPSILON {
        return 0.0;
    }
    (a.dot(b) / (la * lb)).clamp(-1.0, 1.0).acos()
}

/// True if any component is NaN or infinite.
#[inline]
pub fn is_undefined(v: Vector3) -> bool {
    !v.is_finite()
}

/// Newell normal of a 3D loop: robust for non-convex and slightly non-planar
/// polygons. Not normalized; its length is twice the projected area.
pub fn newell_normal(points: &[Point3]) -> Vector3 {
    let mut n = Vector3::ZERO;
    let count = points.len();
    for i in 0..count {
        let p = points[i];
        let q = points[(i + 1) % count];
        n.x += (p.y - q.y) * (p.z + q.z);
        n.y += (p.z - q.z) * (p.x + q.x);
        n.z += (p.x - q.x) * (p.y + q.y);
    }
    n
}

#[cfg(test)]
mod tests;
