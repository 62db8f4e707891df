//! # Mesh Module
//!
//! The finished, immutable mesh record handed to renderers, the simplifier
//! and the geometry helpers.
//!
//! ## Structure
//!
//! - `MeshGeometry3D` - parallel vertex attribute buffers plus triangle indices
//! - `BoundingBox` - axis-aligned bounds of a point set
//!
//! ## Example
//!
//! ```rust
//! use mesh_kit::{MeshBuilder, Point3};
//!
//! let mut builder = MeshBuilder::new(true, true, false);
//! builder.add_triangle(Point3::ZERO, Point3::X, Point3::Y);
//! let mesh = builder.to_mesh();
//! assert_eq!(mesh.triangle_count(), 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::vector::{Point2, Point3, Vector3};

// =============================================================================
// MESH STRUCT
// =============================================================================

/// Indexed triangle mesh with optional per-vertex attributes.
///
/// ## Invariants
///
/// - Every non-empty attribute buffer has exactly `positions.len()` entries
/// - `indices.len()` is a multiple of 3
/// - Every index is `< positions.len()`
///
/// An empty attribute buffer means the attribute is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshGeometry3D {
    /// Vertex positions; the vertex index is the position in this list.
    pub positions: Vec<Point3>,
    /// Unit vertex normals, or empty.
    pub normals: Vec<Vector3>,
    /// Texture coordinates, or empty.
    pub texcoords: Vec<Point2>,
    /// Tangent vectors, or empty.
    pub tangents: Vec<Vector3>,
    /// Bitangent vectors, or empty.
    pub bitangents: Vec<Vector3>,
    /// Triangle list: each consecutive triple names one triangle.
    pub indices: Vec<u32>,
}

impl MeshGeometry3D {
    // =========================================================================
    // CONSTRUCTORS
    // =========================================================================

    /// Creates an empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mesh holding only positions and indices.
    #[must_use]
    pub fn from_positions(positions: Vec<Point3>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            indices,
            ..Self::default()
        }
    }

    // =========================================================================
    // QUERY METHODS
    // =========================================================================

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// True when the mesh has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// True when the mesh carries normals.
    #[must_use]
    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    /// True when the mesh carries texture coordinates.
    #[must_use]
    pub fn has_texcoords(&self) -> bool {
        !self.texcoords.is_empty()
    }

    /// Vertex indices of triangle `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= triangle_count()`.
    #[must_use]
    pub fn triangle(&self, i: usize) -> [u32; 3] {
        [self.indices[3 * i], self.indices[3 * i + 1], self.indices[3 * i + 2]]
    }

    /// Iterates over all triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Axis-aligned bounds of the positions, or `None` for an empty mesh.
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(&self.positions)
    }
}

// =============================================================================
// BOUNDING BOX
// =============================================================================

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl BoundingBox {
    /// Creates a box from its two corners.
    #[must_use]
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing all `points`, or `None` when empty.
    #[must_use]
    pub fn from_points(points: &[Point3]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p)));
        Some(Self { min, max })
    }

    /// Edge lengths along each axis.
    #[must_use]
    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Point3 {
        (self.min + self.max) * 0.5
    }

    /// The eight corners; bit 0 of the index selects x, bit 1 y, bit 2 z.
    #[must_use]
    pub fn corners(&self) -> [Point3; 8] {
        let mut corners = [Point3::ZERO; 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            *corner = Point3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
        }
        corners
    }
}

// =============================================================================
// TESTS
// =============================================================================
