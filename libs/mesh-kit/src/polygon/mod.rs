//! # Polygon Types
//!
//! Planar loops consumed by the triangulators and the builder's polygon
//! faces.
//!
//! - [`Polygon`] - 2D loop with an implicit closing edge
//! - [`PolygonWithHoles`] - outer loop plus inner loops
//! - [`Polygon3D`] - planar 3D loop that can be flattened into a [`Polygon`]

use serde::{Deserialize, Serialize};

use crate::triangulate;
use crate::vector::{find_any_perpendicular, newell_normal, signed_area, Point2, Point3, Vector3};

// =============================================================================
// 2D POLYGON
// =============================================================================

/// A simple closed 2D loop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    /// Loop vertices; the last connects back to the first.
    pub points: Vec<Point2>,
}

impl Polygon {
    /// Creates a polygon from its vertices.
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// Shoelace area; positive for counter-clockwise loops.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area(&self.points)
    }

    /// True if the loop winds counter-clockwise.
    #[must_use]
    pub fn is_counter_clockwise(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Returns the loop with opposite winding.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    /// Triangulates with the sweep line, indices into [`Self::points`].
    #[must_use]
    pub fn triangulate(&self) -> Option<Vec<u32>> {
        triangulate::sweep_line::triangulate(&self.points, &[])
    }
}

// =============================================================================
// POLYGON WITH HOLES
// =============================================================================

/// An outer loop with zero or more holes strictly inside it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolygonWithHoles {
    /// Outer boundary.
    pub outer: Polygon,
    /// Inner loops. Winding is normalized during triangulation.
    pub holes: Vec<Polygon>,
}

impl PolygonWithHoles {
    /// Creates a polygon with holes.
    pub fn new(outer: Polygon, holes: Vec<Polygon>) -> Self {
        Self { outer, holes }
    }

    /// All vertices, outer loop first, then each hole in order. Triangulation
    /// indices refer to this list.
    #[must_use]
    pub fn all_points(&self) -> Vec<Point2> {
        self.outer
            .points
            .iter()
            .chain(self.holes.iter().flat_map(|h| h.points.iter()))
            .copied()
            .collect()
    }

    /// Net area: outer area minus hole areas.
    #[must_use]
    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(|h| h.signed_area().abs()).sum();
        self.outer.signed_area().abs() - holes
    }

    /// Triangulates with the sweep line, indices into [`Self::all_points`].
    #[must_use]
    pub fn triangulate(&self) -> Option<Vec<u32>> {
        let holes: Vec<Vec<Point2>> = self.holes.iter().map(|h| h.points.clone()).collect();
        triangulate::sweep_line::triangulate(&self.outer.points, &holes)
    }
}

// =============================================================================
// 3D POLYGON
// =============================================================================

/// A planar loop in 3D space.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon3D {
    /// Loop vertices.
    pub points: Vec<Point3>,
}

impl Polygon3D {
    /// Creates a 3D polygon from its vertices.
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    /// Unit normal by Newell's method, zero for degenerate loops.
    #[must_use]
    pub fn normal(&self) -> Vector3 {
        newell_normal(&self.points).normalize_or_zero()
    }

    /// Projects the loop into its own plane.
    ///
    /// The 2D frame has its origin at the first point and axes
    /// `(r, normal × r)` where `r` is any unit vector perpendicular to the
    /// normal. The frame is right-handed around the normal, so a loop that is
    /// counter-clockwise seen from the normal's tip stays counter-clockwise.
    #[must_use]
    pub fn flatten(&self) -> Polygon {
        let Some(&origin) = self.points.first() else {
            return Polygon::default();
        };
        let normal = self.normal();
        let r = find_any_perpendicular(normal);
        let u = normal.cross(r);
        Polygon::new(
            self.points
                .iter()
                .map(|&p| {
                    let d = p - origin;
                    Point2::new(d.dot(r), d.dot(u))
                })
                .collect(),
        )
    }

    /// True if every vertex lies within `tolerance` of the plane through the
    /// first vertex.
    #[must_use]
    pub fn is_planar(&self, tolerance: f64) -> bool {
        let Some(&origin) = self.points.first() else {
            return true;
        };
        let normal = self.normal();
        self.points
            .iter()
            .all(|&p| (p - origin).dot(normal).abs() <= tolerance)
    }
}
