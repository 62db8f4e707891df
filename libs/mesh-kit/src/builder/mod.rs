//! # Mesh Builder
//!
//! Stateful accumulator of vertex attribute buffers and triangle indices.
//!
//! ## Mode Flags
//!
//! A builder is created with three switches: track normals, track texture
//! coordinates, track tangents. Positions are always tracked. Every
//! operation that adds N positions adds exactly N entries to every tracked
//! attribute, so the buffers stay parallel at all times. Tangent tracking
//! implies normals and texture coordinates.
//!
//! ## Generator Families
//!
//! - Primitive appends (this file): nodes, triangles, quads, fans, strips,
//!   whole buffers, other builders and meshes
//! - [`flat`]: cube faces, boxes, polygons, extrusions, lofts
//! - [`grid`]: rectangular point grids and their index patterns
//! - [`revolution`]: revolved profiles, cones, cylinders, pipes, arrows,
//!   tori, spheres
//! - [`tube`]: sections swept along a path
//! - [`polyhedra`]: regular polyhedra and pyramids
//! - [`transform`]: mesh-wide scale, subdivision, normals, tangents,
//!   corner chamfer
//!
//! Operations that take caller buffers validate them up front and fail with
//! [`MeshError::Shape`] or [`MeshError::MissingData`] before touching the
//! builder. Generators that take only scalars cannot fail; division counts
//! below three are raised to three.
//!
//! ## Example
//!
//! ```rust
//! use mesh_kit::{BoxFaces, MeshBuilder, Point3};
//!
//! let mut builder = MeshBuilder::new(true, true, false);
//! builder.add_box(Point3::ZERO, 2.0, 2.0, 2.0, BoxFaces::ALL);
//! builder.add_sphere(Point3::new(0.0, 0.0, 2.0), 0.5, 16, 8);
//! let mesh = builder.to_mesh();
//! assert_eq!(mesh.normals.len(), mesh.positions.len());
//! ```

pub mod cache;
pub mod flat;
pub mod grid;
pub mod polyhedra;
pub mod revolution;
pub mod transform;
pub mod tube;

pub use flat::BoxFaces;
pub use tube::TubeOptions;

use crate::config::BuilderConfig;
use crate::error::{ensure_len, MeshError, MeshResult};
use crate::helpers::calculate_tangents;
use crate::mesh::MeshGeometry3D;
use crate::vector::{triangle_normal, Point2, Point3, Vector3};

// =============================================================================
// BUILDER STRUCT
// =============================================================================

/// Accumulates a triangle mesh from shape generators.
#[derive(Debug, Clone)]
pub struct MeshBuilder {
    positions: Vec<Point3>,
    normals: Option<Vec<Vector3>>,
    texcoords: Option<Vec<Point2>>,
    tangents: Option<Vec<Vector3>>,
    bitangents: Option<Vec<Vector3>>,
    indices: Vec<u32>,
    config: BuilderConfig,
}

impl Default for MeshBuilder {
    /// Tracks normals and texture coordinates.
    fn default() -> Self {
        Self::new(true, true, false)
    }
}

impl MeshBuilder {
    // =========================================================================
    // CONSTRUCTORS
    // =========================================================================

    /// Creates an empty builder with the default configuration.
    pub fn new(generate_normals: bool, generate_texcoords: bool, generate_tangents: bool) -> Self {
        Self::with_config(
            generate_normals,
            generate_texcoords,
            generate_tangents,
            BuilderConfig::default(),
        )
    }

    /// Creates an empty builder with an explicit configuration.
    pub fn with_config(
        generate_normals: bool,
        generate_texcoords: bool,
        generate_tangents: bool,
        config: BuilderConfig,
    ) -> Self {
        Self {
            positions: Vec::new(),
            normals: (generate_normals || generate_tangents).then(Vec::new),
            texcoords: (generate_texcoords || generate_tangents).then(Vec::new),
            tangents: generate_tangents.then(Vec::new),
            bitangents: generate_tangents.then(Vec::new),
            indices: Vec::new(),
            config,
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Vertex positions.
    #[must_use]
    pub fn positions(&self) -> &[Point3] {
        &self.positions
    }

    /// Vertex normals, `None` when not tracked.
    #[must_use]
    pub fn normals(&self) -> Option<&[Vector3]> {
        self.normals.as_deref()
    }

    /// Texture coordinates, `None` when not tracked.
    #[must_use]
    pub fn texcoords(&self) -> Option<&[Point2]> {
        self.texcoords.as_deref()
    }

    /// Tangents, `None` when not tracked. Zero until computed.
    #[must_use]
    pub fn tangents(&self) -> Option<&[Vector3]> {
        self.tangents.as_deref()
    }

    /// Bitangents, `None` when not tracked. Zero until computed.
    #[must_use]
    pub fn bitangents(&self) -> Option<&[Vector3]> {
        self.bitangents.as_deref()
    }

    /// Triangle indices.
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Number of vertices added so far.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles added so far.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// True if nothing has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// True if normals are tracked.
    #[must_use]
    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// True if texture coordinates are tracked.
    #[must_use]
    pub fn has_texcoords(&self) -> bool {
        self.texcoords.is_some()
    }

    /// True if tangents and bitangents are tracked.
    #[must_use]
    pub fn has_tangents(&self) -> bool {
        self.tangents.is_some()
    }

    // =========================================================================
    // EXPORT
    // =========================================================================

    /// Exports the accumulated buffers. Tangents, when tracked, are computed
    /// from the final geometry.
    #[must_use]
    pub fn to_mesh(&self) -> MeshGeometry3D {
        let mut mesh = MeshGeometry3D {
            positions: self.positions.clone(),
            normals: self.normals.clone().unwrap_or_default(),
            texcoords: self.texcoords.clone().unwrap_or_default(),
            tangents: Vec::new(),
            bitangents: Vec::new(),
            indices: self.indices.clone(),
        };
        if self.has_tangents() {
            let (tangents, bitangents) =
                calculate_tangents(&mesh.positions, &mesh.normals, &mesh.texcoords, &mesh.indices);
            mesh.tangents = tangents;
            mesh.bitangents = bitangents;
        }
        mesh
    }

    // =========================================================================
    // PRIMITIVE APPENDS
    // =========================================================================

    /// Appends one vertex and returns its index. Attributes that are not
    /// tracked are ignored.
    pub fn add_node(&mut self, position: Point3, normal: Vector3, texcoord: Point2) -> u32 {
        let index = self.next_index();
        self.positions.push(position);
        if let Some(normals) = &mut self.normals {
            normals.push(normal);
        }
        if let Some(texcoords) = &mut self.texcoords {
            texcoords.push(texcoord);
        }
        if let Some(tangents) = &mut self.tangents {
            tangents.push(Vector3::ZERO);
        }
        if let Some(bitangents) = &mut self.bitangents {
            bitangents.push(Vector3::ZERO);
        }
        index
    }

    /// Adds a flat triangle with texture coordinates (0,0), (1,0), (0,1).
    pub fn add_triangle(&mut self, p0: Point3, p1: Point3, p2: Point3) {
        self.add_triangle_with_texcoords(p0, p1, p2, Point2::ZERO, Point2::X, Point2::Y);
    }

    /// Adds a flat triangle with explicit texture coordinates.
    pub fn add_triangle_with_texcoords(
        &mut self,
        p0: Point3,
        p1: Point3,
        p2: Point3,
        uv0: Point2,
        uv1: Point2,
        uv2: Point2,
    ) {
        let n = triangle_normal(p0, p1, p2);
        let i0 = self.add_node(p0, n, uv0);
        let i1 = self.add_node(p1, n, uv1);
        let i2 = self.add_node(p2, n, uv2);
        self.push_triangle(i0, i1, i2);
    }

    /// Adds a flat quad `p0 p1 p2 p3` (counter-clockwise from the front).
    pub fn add_quad(&mut self, p0: Point3, p1: Point3, p2: Point3, p3: Point3) {
        self.add_quad_with_texcoords(
            [p0, p1, p2, p3],
            [Point2::ZERO, Point2::X, Point2::ONE, Point2::Y],
        );
    }

    /// Adds a flat quad with explicit texture coordinates.
    pub fn add_quad_with_texcoords(&mut self, points: [Point3; 4], uvs: [Point2; 4]) {
        let n = (points[1] - points[0])
            .cross(points[3] - points[0])
            .normalize_or_zero();
        let i0 = self.next_index();
        for (p, uv) in points.into_iter().zip(uvs) {
            self.add_node(p, n, uv);
        }
        self.push_quad(i0, i0 + 1, i0 + 2, i0 + 3);
    }

    /// Adds independent triangles, three consecutive positions each.
    ///
    /// # Errors
    ///
    /// [`MeshError::Shape`] if the position count is not a multiple of 3 or
    /// an attribute slice has a different length; [`MeshError::MissingData`]
    /// if a tracked attribute is not supplied.
    pub fn add_triangles(
        &mut self,
        positions: &[Point3],
        normals: Option<&[Vector3]>,
        texcoords: Option<&[Point2]>,
    ) -> MeshResult<()> {
        ensure_multiple("positions", positions.len(), 3)?;
        self.check_attributes(positions.len(), normals, texcoords)?;
        let i0 = self.push_vertices(positions, normals, texcoords);
        self.indices.extend(i0..i0 + positions.len() as u32);
        Ok(())
    }

    /// Adds independent quads, four consecutive positions each.
    ///
    /// # Errors
    ///
    /// As [`Self::add_triangles`], with a multiple of 4.
    pub fn add_quads(
        &mut self,
        positions: &[Point3],
        normals: Option<&[Vector3]>,
        texcoords: Option<&[Point2]>,
    ) -> MeshResult<()> {
        ensure_multiple("positions", positions.len(), 4)?;
        self.check_attributes(positions.len(), normals, texcoords)?;
        let i0 = self.push_vertices(positions, normals, texcoords);
        for q in (i0..i0 + positions.len() as u32).step_by(4) {
            self.push_quad(q, q + 1, q + 2, q + 3);
        }
        Ok(())
    }

    /// Adds a triangle fan around the first position.
    ///
    /// # Errors
    ///
    /// [`MeshError::Shape`] for fewer than 3 positions or mismatched
    /// attributes; [`MeshError::MissingData`] for a missing tracked attribute.
    pub fn add_triangle_fan(
        &mut self,
        positions: &[Point3],
        normals: Option<&[Vector3]>,
        texcoords: Option<&[Point2]>,
    ) -> MeshResult<()> {
        ensure_at_least("positions", positions.len(), 3)?;
        self.check_attributes(positions.len(), normals, texcoords)?;
        let i0 = self.push_vertices(positions, normals, texcoords);
        for k in 1..positions.len() as u32 - 1 {
            self.push_triangle(i0, i0 + k, i0 + k + 1);
        }
        Ok(())
    }

    /// Appends `positions` and adds a fan over `fan`, whose entries index
    /// into `positions`.
    ///
    /// # Errors
    ///
    /// [`MeshError::Shape`] for fewer than 3 fan entries, an entry outside
    /// `positions` or mismatched attributes; [`MeshError::MissingData`] for a
    /// missing tracked attribute.
    pub fn add_triangle_fan_indices(
        &mut self,
        fan: &[u32],
        positions: &[Point3],
        normals: Option<&[Vector3]>,
        texcoords: Option<&[Point2]>,
    ) -> MeshResult<()> {
        ensure_at_least("fan indices", fan.len(), 3)?;
        ensure_in_range("fan indices", fan, positions.len())?;
        self.check_attributes(positions.len(), normals, texcoords)?;
        let i0 = self.push_vertices(positions, normals, texcoords);
        for k in 1..fan.len() - 1 {
            self.push_triangle(i0 + fan[0], i0 + fan[k], i0 + fan[k + 1]);
        }
        Ok(())
    }

    /// Adds a triangle strip; every other triangle is rewound so all face
    /// the same way.
    ///
    /// # Errors
    ///
    /// As [`Self::add_triangle_fan`].
    pub fn add_triangle_strip(
        &mut self,
        positions: &[Point3],
        normals: Option<&[Vector3]>,
        texcoords: Option<&[Point2]>,
    ) -> MeshResult<()> {
        ensure_at_least("positions", positions.len(), 3)?;
        self.check_attributes(positions.len(), normals, texcoords)?;
        let i0 = self.push_vertices(positions, normals, texcoords);
        for k in 0..positions.len() as u32 - 2 {
            let i = i0 + k;
            if k % 2 == 0 {
                self.push_triangle(i, i + 1, i + 2);
            } else {
                self.push_triangle(i + 1, i, i + 2);
            }
        }
        Ok(())
    }

    // =========================================================================
    // APPEND
    // =========================================================================

    /// Appends whole buffers; `indices` refer to `positions`.
    ///
    /// # Errors
    ///
    /// [`MeshError::Shape`] if the index count is not a multiple of 3, an
    /// index is out of range or an attribute has the wrong length;
    /// [`MeshError::MissingData`] for a missing tracked attribute.
    pub fn append(
        &mut self,
        positions: &[Point3],
        indices: &[u32],
        normals: Option<&[Vector3]>,
        texcoords: Option<&[Point2]>,
    ) -> MeshResult<()> {
        ensure_multiple("indices", indices.len(), 3)?;
        ensure_in_range("indices", indices, positions.len())?;
        self.check_attributes(positions.len(), normals, texcoords)?;
        let i0 = self.push_vertices(positions, normals, texcoords);
        self.indices.extend(indices.iter().map(|&i| i0 + i));
        Ok(())
    }

    /// Appends everything another builder has accumulated.
    ///
    /// # Errors
    ///
    /// [`MeshError::MissingData`] if this builder tracks an attribute the
    /// other does not.
    pub fn append_builder(&mut self, other: &MeshBuilder) -> MeshResult<()> {
        self.append(
            &other.positions,
            &other.indices,
            other.normals.as_deref(),
            other.texcoords.as_deref(),
        )
    }

    /// Appends a finished mesh.
    ///
    /// # Errors
    ///
    /// As [`Self::append`]; an empty attribute buffer counts as missing.
    pub fn append_mesh(&mut self, mesh: &MeshGeometry3D) -> MeshResult<()> {
        let normals = (!mesh.normals.is_empty()).then_some(mesh.normals.as_slice());
        let texcoords = (!mesh.texcoords.is_empty()).then_some(mesh.texcoords.as_slice());
        self.append(&mesh.positions, &mesh.indices, normals, texcoords)
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn next_index(&self) -> u32 {
        self.positions.len() as u32
    }

    fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend([a, b, c]);
    }

    fn push_quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.indices.extend([a, b, c, c, d, a]);
    }

    /// Appends validated vertex data and returns the first new index.
    fn push_vertices(
        &mut self,
        positions: &[Point3],
        normals: Option<&[Vector3]>,
        texcoords: Option<&[Point2]>,
    ) -> u32 {
        let i0 = self.next_index();
        for (i, &p) in positions.iter().enumerate() {
            let n = normals.map_or(Vector3::ZERO, |n| n[i]);
            let uv = texcoords.map_or(Point2::ZERO, |t| t[i]);
            self.add_node(p, n, uv);
        }
        i0
    }

    /// Caller attributes must match `count` and cover every tracked buffer.
    fn check_attributes(
        &self,
        count: usize,
        normals: Option<&[Vector3]>,
        texcoords: Option<&[Point2]>,
    ) -> MeshResult<()> {
        match normals {
            Some(n) => ensure_len("normals", n.len(), count)?,
            None if self.has_normals() => return Err(MeshError::missing("normals")),
            None => {}
        }
        match texcoords {
            Some(t) => ensure_len("texcoords", t.len(), count)?,
            None if self.has_texcoords() => return Err(MeshError::missing("texcoords")),
            None => {}
        }
        Ok(())
    }

    /// Overwrites tracked normals of vertices from `first_vertex` on with
    /// angle-weighted normals of the triangles from `first_index` on.
    fn fill_normals(&mut self, first_vertex: usize, first_index: usize) {
        let Some(normals) = self.normals.as_mut() else {
            return;
        };
        let computed = crate::helpers::calculate_normals(&self.positions, &self.indices[first_index..]);
        normals[first_vertex..].copy_from_slice(&computed[first_vertex..]);
    }

    /// Moves the buffers out as a mesh, leaving the builder empty.
    fn take_mesh(&mut self) -> MeshGeometry3D {
        MeshGeometry3D {
            positions: std::mem::take(&mut self.positions),
            normals: self.normals.as_mut().map(std::mem::take).unwrap_or_default(),
            texcoords: self.texcoords.as_mut().map(std::mem::take).unwrap_or_default(),
            tangents: self.tangents.as_mut().map(std::mem::take).unwrap_or_default(),
            bitangents: self.bitangents.as_mut().map(std::mem::take).unwrap_or_default(),
            indices: std::mem::take(&mut self.indices),
        }
    }

    /// Replaces the buffers with `mesh`, keeping the mode flags. Tracked
    /// attributes the mesh lacks are zero-filled.
    fn restore_mesh(&mut self, mesh: MeshGeometry3D) {
        let n = mesh.positions.len();
        let fill = |v: Vec<Vector3>| if v.len() == n { v } else { vec![Vector3::ZERO; n] };
        if self.normals.is_some() {
            self.normals = Some(fill(mesh.normals));
        }
        if self.texcoords.is_some() {
            let uv = if mesh.texcoords.len() == n {
                mesh.texcoords
            } else {
                vec![Point2::ZERO; n]
            };
            self.texcoords = Some(uv);
        }
        if self.tangents.is_some() {
            self.tangents = Some(fill(mesh.tangents));
            self.bitangents = Some(fill(mesh.bitangents));
        }
        self.positions = mesh.positions;
        self.indices = mesh.indices;
    }
}

fn ensure_multiple(what: &str, len: usize, factor: usize) -> MeshResult<()> {
    if len % factor != 0 {
        return Err(MeshError::shape(format!(
            "{what} has {len} elements, expected a multiple of {factor}"
        )));
    }
    Ok(())
}

fn ensure_at_least(what: &str, len: usize, min: usize) -> MeshResult<()> {
    if len < min {
        return Err(MeshError::shape(format!(
            "{what} has {len} elements, expected at least {min}"
        )));
    }
    Ok(())
}

fn ensure_in_range(what: &str, indices: &[u32], len: usize) -> MeshResult<()> {
    if let Some(&bad) = indices.iter().find(|&&i| i as usize >= len) {
        return Err(MeshError::shape(format!(
            "{what} contains {bad}, expected < {len}"
        )));
    }
    Ok(())
}
