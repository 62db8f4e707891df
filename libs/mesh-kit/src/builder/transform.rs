//! # Mesh-Wide Transforms
//!
//! Operations over everything the builder holds: axis scaling, linear
//! subdivision, normal and tangent recomputation, corner chamfering.

use std::collections::HashMap;

use log::{debug, warn};

use super::MeshBuilder;
use crate::error::{MeshError, MeshResult};
use crate::helpers::{calculate_normals, calculate_tangents, no_shared_vertices};
use crate::mesh::MeshGeometry3D;
use crate::vector::{triangle_normal, Point2, Point3, Vector3};

impl MeshBuilder {
    // =========================================================================
    // SCALE
    // =========================================================================

    /// Scales every position per axis. Normals follow the inverse transpose
    /// and the winding flips when the scale mirrors the mesh.
    pub fn scale(&mut self, sx: f64, sy: f64, sz: f64) {
        let s = Vector3::new(sx, sy, sz);
        for p in &mut self.positions {
            *p *= s;
        }
        // Inverse transpose up to the determinant's magnitude.
        let determinant = sx * sy * sz;
        let cofactor = Vector3::new(sy * sz, sx * sz, sx * sy) * determinant.signum();
        if let Some(normals) = &mut self.normals {
            for n in normals.iter_mut() {
                *n = (*n * cofactor).normalize_or_zero();
            }
        }
        for tangents in [&mut self.tangents, &mut self.bitangents].into_iter().flatten() {
            for t in tangents.iter_mut() {
                *t = (*t * s).normalize_or_zero();
            }
        }
        if determinant < 0.0 {
            for t in self.indices.chunks_exact_mut(3) {
                t.swap(1, 2);
            }
        }
    }

    // =========================================================================
    // SUBDIVISION
    // =========================================================================

    /// Splits every triangle in place.
    ///
    /// The plain split cuts each triangle into four at its edge midpoints.
    /// With `barycentric` each triangle becomes six around its centroid.
    /// Edge midpoints are shared between neighbouring triangles; attributes
    /// of new vertices are interpolated.
    pub fn subdivide_linear(&mut self, barycentric: bool) {
        let old = std::mem::take(&mut self.indices);
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
        let mut indices = Vec::with_capacity(old.len() * if barycentric { 6 } else { 4 });

        for t in old.chunks_exact(3) {
            let (a, b, c) = (t[0], t[1], t[2]);
            let ab = self.midpoint(&mut midpoints, a, b);
            let bc = self.midpoint(&mut midpoints, b, c);
            let ca = self.midpoint(&mut midpoints, c, a);
            if barycentric {
                let m = self.interpolated_node(&[a, b, c]);
                indices.extend([a, ab, m, ab, b, m, b, bc, m, bc, c, m, c, ca, m, ca, a, m]);
            } else {
                indices.extend([a, ab, ca, ab, b, bc, ca, bc, c, ab, bc, ca]);
            }
        }
        self.indices = indices;
    }

    fn midpoint(&mut self, cache: &mut HashMap<(u32, u32), u32>, a: u32, b: u32) -> u32 {
        let key = (a.min(b), a.max(b));
        if let Some(&index) = cache.get(&key) {
            return index;
        }
        let index = self.interpolated_node(&[a, b]);
        cache.insert(key, index);
        index
    }

    /// Adds a vertex at the average of `parents`.
    fn interpolated_node(&mut self, parents: &[u32]) -> u32 {
        let w = 1.0 / parents.len() as f64;
        let position = parents
            .iter()
            .map(|&i| self.positions[i as usize])
            .sum::<Point3>()
            * w;
        let normal = self.normals.as_ref().map_or(Vector3::ZERO, |n| {
            parents
                .iter()
                .map(|&i| n[i as usize])
                .sum::<Vector3>()
                .normalize_or_zero()
        });
        let uv = self.texcoords.as_ref().map_or(Point2::ZERO, |uv| {
            parents.iter().map(|&i| uv[i as usize]).sum::<Point2>() * w
        });
        self.add_node(position, normal, uv)
    }

    // =========================================================================
    // NORMALS AND TANGENTS
    // =========================================================================

    /// Recomputes angle-weighted normals, enabling the normal buffer if it
    /// was off. With `tangent_space` and texture coordinates present,
    /// tangents and bitangents are computed and tracked as well.
    pub fn compute_normals_and_tangents(&mut self, tangent_space: bool) {
        self.normals = Some(calculate_normals(&self.positions, &self.indices));
        if !tangent_space {
            return;
        }
        if self.texcoords.is_none() {
            debug!("tangent space requested without texture coordinates, skipping tangents");
            return;
        }
        if let Err(err) = self.compute_tangents() {
            warn!("tangent computation failed: {err}");
        }
    }

    /// Computes tangents and bitangents from the current normals and
    /// texture coordinates and keeps tracking them.
    ///
    /// # Errors
    ///
    /// [`MeshError::MissingData`] if normals or texture coordinates are not
    /// tracked.
    pub fn compute_tangents(&mut self) -> MeshResult<()> {
        let normals = self.normals.as_deref().ok_or(MeshError::missing("normals"))?;
        let texcoords = self.texcoords.as_deref().ok_or(MeshError::missing("texcoords"))?;
        let (tangents, bitangents) = calculate_tangents(&self.positions, normals, texcoords, &self.indices);
        self.tangents = Some(tangents);
        self.bitangents = Some(bitangents);
        Ok(())
    }

    // =========================================================================
    // CHAMFER
    // =========================================================================

    /// Cuts the corner at `p` with a plane `distance` inward along the
    /// corner's averaged face normal.
    ///
    /// Vertices stop being shared. Every triangle with a corner within `eps`
    /// of `p` is shortened to the plane and a fan around the projected
    /// corner closes the cut. The new cut points are appended to
    /// `chamfer_points` when given, without duplicates.
    pub fn chamfer_corner(
        &mut self,
        p: Point3,
        distance: f64,
        eps: f64,
        mut chamfer_points: Option<&mut Vec<Point3>>,
    ) {
        let Some(corner_normal) = self.corner_normal(p, eps) else {
            warn!("no triangle touches chamfer corner {p}");
            return;
        };

        let mut mesh = no_shared_vertices(&self.take_mesh());
        let has_uv = !mesh.texcoords.is_empty();
        let has_normals = !mesh.normals.is_empty();
        let has_tangents = !mesh.tangents.is_empty();
        let push_vertex = |mesh: &mut MeshGeometry3D, position: Point3, uv: Point2| {
            mesh.positions.push(position);
            if has_uv {
                mesh.texcoords.push(uv);
            }
            if has_normals {
                mesh.normals.push(corner_normal);
            }
            if has_tangents {
                mesh.tangents.push(Vector3::ZERO);
                mesh.bitangents.push(Vector3::ZERO);
            }
            (mesh.positions.len() - 1) as u32
        };

        let plane_point = p - corner_normal * distance;
        let corner = push_vertex(&mut mesh, plane_point, Point2::ZERO);
        let crossing = |a: Point3, b: Point3| {
            let denominator = (b - a).dot(corner_normal);
            if denominator.abs() < f64::EPSILON {
                return None;
            }
            let t = (plane_point - a).dot(corner_normal) / denominator;
            (0.0..=1.0).contains(&t).then_some(t)
        };

        let triangle_count = mesh.indices.len() / 3;
        let mut cut = 0;
        for k in 0..triangle_count {
            let t = [mesh.indices[3 * k], mesh.indices[3 * k + 1], mesh.indices[3 * k + 2]];
            let Some(slot) = t
                .iter()
                .position(|&i| mesh.positions[i as usize].distance(p) < eps)
            else {
                continue;
            };
            let (c, b1, b2) = (t[slot], t[(slot + 1) % 3], t[(slot + 2) % 3]);
            let (pc, p1, p2) = (
                mesh.positions[c as usize],
                mesh.positions[b1 as usize],
                mesh.positions[b2 as usize],
            );
            let (Some(t1), Some(t2)) = (crossing(pc, p1), crossing(pc, p2)) else {
                continue;
            };
            let p01 = pc.lerp(p1, t1);
            let p02 = pc.lerp(p2, t2);
            let uv02 = if has_uv {
                let (uc, u1, u2) = (
                    mesh.texcoords[c as usize],
                    mesh.texcoords[b1 as usize],
                    mesh.texcoords[b2 as usize],
                );
                mesh.texcoords[c as usize] = uc.lerp(u1, t1);
                uc.lerp(u2, t2)
            } else {
                Point2::ZERO
            };

            // The corner vertex slides to the first cut point.
            mesh.positions[c as usize] = p01;
            let v02 = push_vertex(&mut mesh, p02, uv02);
            mesh.indices.extend([c, b2, v02, corner, c, v02]);
            cut += 1;

            if let Some(points) = chamfer_points.as_deref_mut() {
                for q in [p01, p02] {
                    if !points.iter().any(|x| x.distance(q) < eps) {
                        points.push(q);
                    }
                }
            }
        }
        debug!("chamfer at {p}: {cut} triangles cut");

        self.restore_mesh(mesh);
        self.fill_normals(0, 0);
    }

    /// Normalized sum of the face normals of triangles with a corner within
    /// `eps` of `p`.
    fn corner_normal(&self, p: Point3, eps: f64) -> Option<Vector3> {
        let sum: Vector3 = self
            .indices
            .chunks_exact(3)
            .filter(|t| t.iter().any(|&i| self.positions[i as usize].distance(p) < eps))
            .map(|t| {
                triangle_normal(
                    self.positions[t[0] as usize],
                    self.positions[t[1] as usize],
                    self.positions[t[2] as usize],
                )
            })
            .sum();
        let n = sum.normalize_or_zero();
        (n != Vector3::ZERO).then_some(n)
    }
}
