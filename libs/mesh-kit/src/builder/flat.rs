//! Flat-faced generators: cube faces, boxes, arbitrary polygons,
//! extrusions of 2D profiles and lofts between 3D sections.

use bitflags::bitflags;
use log::warn;

use super::{ensure_at_least, ensure_in_range, MeshBuilder};
use crate::error::{MeshError, MeshResult};
use crate::mesh::BoundingBox;
use crate::polygon::Polygon3D;
use crate::triangulate::{self, ear_clip, sweep_line};
use crate::vector::{find_any_perpendicular, signed_area, Point2, Point3, Vector3};

bitflags! {
    /// Faces emitted by [`MeshBuilder::add_box`].
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct BoxFaces: u8 {
        /// Face with normal +Z.
        const TOP = 1;
        /// Face with normal -Z.
        const BOTTOM = 1 << 1;
        /// Face with normal -Y.
        const LEFT = 1 << 2;
        /// Face with normal +Y.
        const RIGHT = 1 << 3;
        /// Face with normal +X.
        const FRONT = 1 << 4;
        /// Face with normal -X.
        const BACK = 1 << 5;

        /// Every face except the top.
        const ALL_EXCEPT_TOP = Self::BOTTOM.bits()
            | Self::LEFT.bits()
            | Self::RIGHT.bits()
            | Self::FRONT.bits()
            | Self::BACK.bits();
        /// Every face except the bottom.
        const ALL_EXCEPT_BOTTOM = Self::TOP.bits()
            | Self::LEFT.bits()
            | Self::RIGHT.bits()
            | Self::FRONT.bits()
            | Self::BACK.bits();
        /// All six faces.
        const ALL = Self::ALL_EXCEPT_TOP.bits() | Self::TOP.bits();
    }
}

impl Default for BoxFaces {
    fn default() -> Self {
        Self::ALL
    }
}

impl MeshBuilder {
    // =========================================================================
    // BOXES
    // =========================================================================

    /// Adds one face of a cuboid: a `width` × `height` rectangle at distance
    /// `dist / 2` from `center` along `normal`, with `up` along its height.
    pub fn add_cube_face(
        &mut self,
        center: Point3,
        normal: Vector3,
        up: Vector3,
        dist: f64,
        width: f64,
        height: f64,
    ) {
        let normal = normal.normalize_or_zero();
        let up = up.normalize_or_zero();
        let right = normal.cross(up);
        let n = normal * dist / 2.0;
        let up = up * height / 2.0;
        let right = right * width / 2.0;

        let i0 = self.next_index();
        self.add_node(center + n - up - right, normal, Point2::new(1.0, 1.0));
        self.add_node(center + n - up + right, normal, Point2::new(0.0, 1.0));
        self.add_node(center + n + up + right, normal, Point2::new(0.0, 0.0));
        self.add_node(center + n + up - right, normal, Point2::new(1.0, 0.0));
        self.push_triangle(i0 + 2, i0 + 1, i0);
        self.push_triangle(i0, i0 + 3, i0 + 2);
    }

    /// Adds an axis-aligned box centered at `center`. Each face has its own
    /// four vertices so normals stay flat.
    pub fn add_box(&mut self, center: Point3, x_length: f64, y_length: f64, z_length: f64, faces: BoxFaces) {
        if faces.contains(BoxFaces::FRONT) {
            self.add_cube_face(center, Vector3::X, Vector3::Z, x_length, y_length, z_length);
        }
        if faces.contains(BoxFaces::BACK) {
            self.add_cube_face(center, -Vector3::X, Vector3::Z, x_length, y_length, z_length);
        }
        if faces.contains(BoxFaces::LEFT) {
            self.add_cube_face(center, -Vector3::Y, Vector3::Z, y_length, x_length, z_length);
        }
        if faces.contains(BoxFaces::RIGHT) {
            self.add_cube_face(center, Vector3::Y, Vector3::Z, y_length, x_length, z_length);
        }
        if faces.contains(BoxFaces::TOP) {
            self.add_cube_face(center, Vector3::Z, Vector3::Y, z_length, x_length, y_length);
        }
        if faces.contains(BoxFaces::BOTTOM) {
            self.add_cube_face(center, -Vector3::Z, Vector3::Y, z_length, x_length, y_length);
        }
    }

    /// Adds the box spanned by `bounds`.
    pub fn add_box_from_bounds(&mut self, bounds: &BoundingBox, faces: BoxFaces) {
        let size = bounds.size();
        self.add_box(bounds.center(), size.x, size.y, size.z, faces);
    }

    /// Adds the twelve edges of `bounds` as capped cylinders of `diameter`.
    pub fn add_bounding_box(&mut self, bounds: &BoundingBox, diameter: f64) {
        let corners = bounds.corners();
        for i in 0..8 {
            for bit in [1, 2, 4] {
                if i & bit == 0 {
                    self.add_cylinder(corners[i], corners[i | bit], diameter, 10, true, true);
                }
            }
        }
    }

    // =========================================================================
    // POLYGONS
    // =========================================================================

    /// Adds a convex planar polygon as a fan around its first point.
    ///
    /// # Errors
    ///
    /// [`MeshError::Shape`] for fewer than 3 points.
    pub fn add_polygon(&mut self, points: &[Point3]) -> MeshResult<()> {
        ensure_at_least("polygon points", points.len(), 3)?;
        let polygon = Polygon3D::new(points.to_vec());
        let normal = polygon.normal();
        let flat = polygon.flatten();

        let i0 = self.next_index();
        for (&p, &uv) in points.iter().zip(&flat.points) {
            self.add_node(p, normal, uv);
        }
        for k in 1..points.len() as u32 - 1 {
            self.push_triangle(i0, i0 + k, i0 + k + 1);
        }
        Ok(())
    }

    /// Adds an arbitrary simple planar polygon.
    ///
    /// The loop is flattened into its own plane and triangulated there.
    /// Loops that cannot be triangulated are skipped with a warning.
    ///
    /// # Errors
    ///
    /// [`MeshError::Shape`] for fewer than 3 points.
    pub fn add_polygon_by_triangulation(&mut self, points: &[Point3]) -> MeshResult<()> {
        ensure_at_least("polygon points", points.len(), 3)?;
        let polygon = Polygon3D::new(points.to_vec());
        let flat = polygon.flatten();
        let Some(local) = triangulate::triangulate(&flat.points, &[]) else {
            warn!("skipping polygon face with {} points: no triangulation", points.len());
            return Ok(());
        };

        let normal = polygon.normal();
        let i0 = self.next_index();
        for (&p, &uv) in points.iter().zip(&flat.points) {
            self.add_node(p, normal, uv);
        }
        self.indices.extend(local.iter().map(|&i| i0 + i));
        Ok(())
    }

    /// Triangulates the polygon formed by existing vertices with the sweep
    /// line. Faces that cannot be triangulated are skipped with a warning.
    ///
    /// # Errors
    ///
    /// [`MeshError::Shape`] for fewer than 3 indices or an unknown vertex.
    pub fn add_polygon_indices_by_triangulation(&mut self, vertex_indices: &[u32]) -> MeshResult<()> {
        let flat = self.flatten_existing(vertex_indices)?;
        match sweep_line::triangulate(&flat, &[]) {
            Some(local) => self.push_mapped(vertex_indices, &local),
            None => warn!("skipping indexed polygon face: no triangulation"),
        }
        Ok(())
    }

    /// Triangulates the polygon formed by existing vertices by ear clipping.
    /// Faces that cannot be triangulated are skipped with a warning.
    ///
    /// # Errors
    ///
    /// [`MeshError::Shape`] for fewer than 3 indices or an unknown vertex.
    pub fn add_polygon_by_cutting_ears(&mut self, vertex_indices: &[u32]) -> MeshResult<()> {
        let flat = self.flatten_existing(vertex_indices)?;
        match ear_clip::triangulate(&flat) {
            Some(local) => self.push_mapped(vertex_indices, &local),
            None => warn!("skipping indexed polygon face: no ear found"),
        }
        Ok(())
    }

    fn flatten_existing(&self, vertex_indices: &[u32]) -> MeshResult<Vec<Point2>> {
        ensure_at_least("polygon indices", vertex_indices.len(), 3)?;
        ensure_in_range("polygon indices", vertex_indices, self.positions.len())?;
        let points = vertex_indices
            .iter()
            .map(|&i| self.positions[i as usize])
            .collect();
        Ok(Polygon3D::new(points).flatten().points)
    }

    fn push_mapped(&mut self, vertex_indices: &[u32], local: &[u32]) {
        self.indices
            .extend(local.iter().map(|&i| vertex_indices[i as usize]));
    }

    // =========================================================================
    // EXTRUSIONS
    // =========================================================================

    /// Extrudes independent 2D segments from `p0` to `p1`.
    ///
    /// `segments` holds point pairs in the plane spanned by `axis_x` and
    /// `axis_x × (p1 - p0)`. Each segment becomes a quad facing the right
    /// side of its direction.
    ///
    /// # Errors
    ///
    /// [`MeshError::Shape`] if the point count is odd.
    pub fn add_extruded_segments(
        &mut self,
        segments: &[Point2],
        axis_x: Vector3,
        p0: Point3,
        p1: Point3,
    ) -> MeshResult<()> {
        if segments.len() % 2 != 0 {
            return Err(MeshError::shape(format!(
                "segment points: {} is odd, expected pairs",
                segments.len()
            )));
        }
        let (ax, ay) = extrusion_frame(axis_x, p1 - p0);
        let to_3d = |p: Point2| ax * p.x + ay * p.y;
        let last = (segments.len().max(2) - 1) as f64;

        for (k, pair) in segments.chunks_exact(2).enumerate() {
            let (a, b) = (pair[0], pair[1]);
            let e = b - a;
            let normal = to_3d(Point2::new(e.y, -e.x)).normalize_or_zero();
            let (va, vb) = ((2 * k) as f64 / last, (2 * k + 1) as f64 / last);

            let i0 = self.next_index();
            self.add_node(p0 + to_3d(a), normal, Point2::new(0.0, va));
            self.add_node(p1 + to_3d(a), normal, Point2::new(1.0, va));
            self.add_node(p1 + to_3d(b), normal, Point2::new(1.0, vb));
            self.add_node(p0 + to_3d(b), normal, Point2::new(0.0, vb));
            self.push_quad(i0, i0 + 1, i0 + 2, i0 + 3);
        }
        Ok(())
    }

    /// Extrudes a closed 2D profile from `p0` to `p1` into a smooth-shaded
    /// wall. Faces point away from the profile interior whatever its
    /// winding. The ends are left open.
    ///
    /// # Errors
    ///
    /// [`MeshError::Shape`] for fewer than 3 profile points.
    pub fn add_extruded_geometry(
        &mut self,
        profile: &[Point2],
        axis_x: Vector3,
        p0: Point3,
        p1: Point3,
    ) -> MeshResult<()> {
        ensure_at_least("profile points", profile.len(), 3)?;
        let (ax, ay) = extrusion_frame(axis_x, p1 - p0);
        let n = profile.len();
        let outward = if signed_area(profile) < 0.0 { -1.0 } else { 1.0 };

        let segment_normal = |k: usize| {
            let e = profile[(k + 1) % n] - profile[k];
            Point2::new(e.y, -e.x).normalize_or_zero() * outward
        };

        let i0 = self.next_index();
        for (k, &p) in profile.iter().enumerate() {
            let n2 = (segment_normal((k + n - 1) % n) + segment_normal(k)).normalize_or_zero();
            let normal = ax * n2.x + ay * n2.y;
            let offset = ax * p.x + ay * p.y;
            let u = k as f64 / n as f64;
            self.add_node(p0 + offset, normal, Point2::new(u, 0.0));
            self.add_node(p1 + offset, normal, Point2::new(u, 1.0));
        }
        for k in 0..n as u32 {
            let a0 = i0 + 2 * k;
            let a1 = a0 + 1;
            let b0 = i0 + 2 * ((k + 1) % n as u32);
            let b1 = b0 + 1;
            if outward > 0.0 {
                self.push_quad(a0, a1, b1, b0);
            } else {
                self.push_quad(a0, b0, b1, a1);
            }
        }
        Ok(())
    }

    /// Lofts a surface through 3D sections of equal point count.
    ///
    /// Section `i`, point `j` lands at grid row `i`, column `j`; texture
    /// coordinates are `(j / (m - 1), i / (n - 1))` and normals are computed
    /// from the new faces.
    ///
    /// # Errors
    ///
    /// [`MeshError::Shape`] for fewer than 2 sections, sections shorter than
    /// 2 points or sections of different lengths.
    pub fn add_lofted_geometry(&mut self, sections: &[Vec<Point3>]) -> MeshResult<()> {
        ensure_at_least("sections", sections.len(), 2)?;
        let columns = sections[0].len();
        ensure_at_least("section points", columns, 2)?;
        if let Some(bad) = sections.iter().find(|s| s.len() != columns) {
            return Err(MeshError::shape(format!(
                "section has {} points, expected {columns}",
                bad.len()
            )));
        }
        let points: Vec<Point3> = sections.iter().flatten().copied().collect();
        self.add_rectangular_mesh(&points, columns)
    }
}

/// In-plane axes of an extrusion along `direction`: `axis_x` made
/// perpendicular to it, and `axis_x × direction`.
fn extrusion_frame(axis_x: Vector3, direction: Vector3) -> (Vector3, Vector3) {
    let dir = direction.normalize_or_zero();
    let mut ax = (axis_x - dir * axis_x.dot(dir)).normalize_or_zero();
    if ax == Vector3::ZERO {
        ax = find_any_perpendicular(dir);
    }
    let ay = ax.cross(dir).normalize_or_zero();
    (ax, ay)
}
