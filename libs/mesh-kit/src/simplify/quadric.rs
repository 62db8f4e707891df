//! Symmetric 4×4 error quadric.

use std::ops::{Add, AddAssign};

use crate::vector::{Point3, Vector3};

/// Sum of squared plane distances as a symmetric 4×4 matrix.
///
/// Only the upper triangle is stored, row by row:
///
/// ```text
/// | 0 1 2 3 |
/// |   4 5 6 |
/// |     7 8 |
/// |       9 |
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Quadric {
    m: [f64; 10],
}

impl Quadric {
    /// Quadric of the plane `a x + b y + c z + d = 0`.
    pub fn from_plane(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self {
            m: [
                a * a,
                a * b,
                a * c,
                a * d,
                b * b,
                b * c,
                b * d,
                c * c,
                c * d,
                d * d,
            ],
        }
    }

    /// Quadric of the plane through `point` with unit `normal`.
    pub fn from_point_normal(point: Point3, normal: Vector3) -> Self {
        Self::from_plane(normal.x, normal.y, normal.z, -normal.dot(point))
    }

    /// Stored coefficient `i`.
    #[inline]
    pub fn coefficient(&self, i: usize) -> f64 {
        self.m[i]
    }

    /// Determinant of the 3×3 matrix picked by nine coefficient slots.
    #[allow(clippy::too_many_arguments)]
    fn det(
        &self,
        a11: usize,
        a12: usize,
        a13: usize,
        a21: usize,
        a22: usize,
        a23: usize,
        a31: usize,
        a32: usize,
        a33: usize,
    ) -> f64 {
        let m = &self.m;
        m[a11] * m[a22] * m[a33] + m[a13] * m[a21] * m[a32] + m[a12] * m[a23] * m[a31]
            - m[a13] * m[a22] * m[a31]
            - m[a11] * m[a23] * m[a32]
            - m[a12] * m[a21] * m[a33]
    }

    /// Error of placing a vertex at `p`: `vᵀ Q v` with `v = (p, 1)`.
    pub fn error(&self, p: Point3) -> f64 {
        let m = &self.m;
        let (x, y, z) = (p.x, p.y, p.z);
        m[0] * x * x + 2.0 * m[1] * x * y + 2.0 * m[2] * x * z + 2.0 * m[3] * x
            + m[4] * y * y
            + 2.0 * m[5] * y * z
            + 2.0 * m[6] * y
            + m[7] * z * z
            + 2.0 * m[8] * z
            + m[9]
    }

    /// Point of minimal error, or `None` when the quadratic part is singular
    /// below `epsilon`.
    pub fn minimizer(&self, epsilon: f64) -> Option<Point3> {
        let det = self.det(0, 1, 2, 1, 4, 5, 2, 5, 7);
        if det.abs() <= epsilon {
            return None;
        }
        let inv = 1.0 / det;
        Some(Point3::new(
            -inv * self.det(1, 2, 3, 4, 5, 6, 5, 7, 8),
            inv * self.det(0, 2, 3, 1, 5, 6, 2, 7, 8),
            -inv * self.det(0, 1, 3, 1, 4, 6, 2, 5, 8),
        ))
    }
}

impl Add for Quadric {
    type Output = Quadric;

    fn add(mut self, rhs: Quadric) -> Quadric {
        self += rhs;
        self
    }
}

impl AddAssign for Quadric {
    fn add_assign(&mut self, rhs: Quadric) {
        for (a, b) in self.m.iter_mut().zip(rhs.m) {
            *a += b;
        }
    }
}
