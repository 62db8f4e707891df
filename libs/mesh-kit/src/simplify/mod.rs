//! # Mesh Simplification
//!
//! Quadric-error edge-collapse decimation.
//!
//! ## Working Set
//!
//! Triangles, vertices and refs live in flat arrays addressed by index. The
//! refs array is a compressed vertex→triangle adjacency: vertex `v` owns
//! `refs[v.tstart..v.tstart + v.tcount]`. It is rebuilt periodically and
//! patched in place after each collapse.
//!
//! ## Passes
//!
//! Every pass walks the live triangles and collapses at most one edge per
//! triangle whose cached error is under a threshold that grows with the
//! iteration count. Border vertices only collapse with border vertices, and
//! a collapse is refused if any surviving neighbour would flip or become a
//! sliver. The final compaction drops deleted triangles and unreferenced
//! vertices.
//!
//! ## Example
//!
//! ```rust
//! use mesh_kit::simplify::{simplify, SimplifyOptions};
//! use mesh_kit::MeshBuilder;
//!
//! let mut builder = MeshBuilder::new(true, false, false);
//! builder.add_sphere(mesh_kit::Point3::ZERO, 1.0, 32, 16);
//! let mesh = builder.to_mesh();
//!
//! let options = SimplifyOptions::default().with_target(mesh.triangle_count() / 4);
//! let reduced = simplify(&mesh, &options);
//! assert!(reduced.triangle_count() < mesh.triangle_count());
//! assert_eq!(reduced.normals.len(), reduced.positions.len());
//! ```

pub mod quadric;

pub use quadric::Quadric;

use config::constants::{
    GEOMETRY_EPSILON, SIMPLIFY_DEFAULT_AGGRESSIVENESS, SIMPLIFY_LOSSLESS_MAX_ITERATIONS,
    SIMPLIFY_LOSSLESS_THRESHOLD, SIMPLIFY_MAX_EDGE_COSINE, SIMPLIFY_MAX_ITERATIONS,
    SIMPLIFY_MIN_NORMAL_DOT, SIMPLIFY_REBUILD_INTERVAL, SIMPLIFY_THRESHOLD_SCALE,
};
use log::debug;

use crate::helpers::calculate_normals;
use crate::mesh::MeshGeometry3D;
use crate::vector::{Point3, Vector3};

// =============================================================================
// OPTIONS
// =============================================================================

/// Parameters for [`simplify`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimplifyOptions {
    /// Stop once at most this many triangles remain. Ignored when lossless.
    pub target_triangle_count: usize,
    /// Exponent of the threshold growth; higher collapses faster and
    /// coarser.
    pub aggressiveness: f64,
    /// Only collapse edges with (numerically) zero error, until nothing
    /// changes.
    pub lossless: bool,
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        Self {
            target_triangle_count: 0,
            aggressiveness: SIMPLIFY_DEFAULT_AGGRESSIVENESS,
            lossless: false,
        }
    }
}

impl SimplifyOptions {
    /// Sets the triangle budget.
    pub fn with_target(mut self, target_triangle_count: usize) -> Self {
        self.target_triangle_count = target_triangle_count;
        self
    }

    /// Sets the aggressiveness.
    pub fn with_aggressiveness(mut self, aggressiveness: f64) -> Self {
        self.aggressiveness = aggressiveness;
        self
    }

    /// Switches lossless mode.
    pub fn with_lossless(mut self, lossless: bool) -> Self {
        self.lossless = lossless;
        self
    }
}

/// Simplifies `mesh` into a new mesh. The input is not modified.
///
/// Normals are recomputed for the reduced geometry when the input has
/// them. Other vertex attributes are dropped.
pub fn simplify(mesh: &MeshGeometry3D, options: &SimplifyOptions) -> MeshGeometry3D {
    let mut simplifier = MeshSimplifier::new(mesh);
    if options.lossless {
        simplifier.simplify_lossless();
    } else {
        simplifier.simplify(options.target_triangle_count, options.aggressiveness);
    }
    let stats = simplifier.stats();
    debug!(
        "simplified {} -> {} triangles in {} iterations",
        mesh.triangle_count(),
        simplifier.triangle_count(),
        stats.iterations
    );
    simplifier.to_mesh()
}

// =============================================================================
// WORKING SET
// =============================================================================

#[derive(Debug, Clone)]
struct Triangle {
    v: [usize; 3],
    /// Collapse error of edges (0,1), (1,2), (2,0), then their minimum.
    err: [f64; 4],
    deleted: bool,
    dirty: bool,
    n: Vector3,
}

#[derive(Debug, Clone)]
struct Vertex {
    p: Point3,
    tstart: usize,
    tcount: usize,
    q: Quadric,
    border: bool,
}

#[derive(Debug, Clone, Copy)]
struct Ref {
    tid: usize,
    tvertex: usize,
}

/// Counters from the last simplification run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimplifyStats {
    /// Passes executed.
    pub iterations: usize,
    /// Triangles removed by collapses.
    pub deleted_triangles: usize,
}

/// Quadric-error edge-collapse simplifier over a private copy of a mesh.
#[derive(Debug, Clone)]
pub struct MeshSimplifier {
    triangles: Vec<Triangle>,
    vertices: Vec<Vertex>,
    refs: Vec<Ref>,
    had_normals: bool,
    stats: SimplifyStats,
}

impl MeshSimplifier {
    /// Copies positions and triangles out of `mesh`.
    pub fn new(mesh: &MeshGeometry3D) -> Self {
        let vertices = mesh
            .positions
            .iter()
            .map(|&p| Vertex {
                p,
                tstart: 0,
                tcount: 0,
                q: Quadric::default(),
                border: false,
            })
            .collect();
        let triangles = mesh
            .triangles()
            .map(|[a, b, c]| Triangle {
                v: [a as usize, b as usize, c as usize],
                err: [0.0; 4],
                deleted: false,
                dirty: false,
                n: Vector3::ZERO,
            })
            .collect();
        Self {
            triangles,
            vertices,
            refs: Vec::new(),
            had_normals: !mesh.normals.is_empty(),
            stats: SimplifyStats::default(),
        }
    }

    /// Live triangle count.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.iter().filter(|t| !t.deleted).count()
    }

    /// Vertex count, exact after a run.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Counters from the last run.
    #[must_use]
    pub fn stats(&self) -> SimplifyStats {
        self.stats
    }

    /// Collapses edges until at most `target_count` triangles remain or
    /// the iteration budget runs out.
    pub fn simplify(&mut self, target_count: usize, aggressiveness: f64) {
        for t in &mut self.triangles {
            t.deleted = false;
        }
        let triangle_count = self.triangles.len();
        let mut deleted = 0;
        let mut iterations = 0;

        for iteration in 0..SIMPLIFY_MAX_ITERATIONS {
            if triangle_count - deleted <= target_count {
                break;
            }
            iterations = iteration + 1;
            if iteration % SIMPLIFY_REBUILD_INTERVAL == 0 {
                self.update_mesh(iteration);
            }
            for t in &mut self.triangles {
                t.dirty = false;
            }

            let threshold = SIMPLIFY_THRESHOLD_SCALE * (iteration as f64 + 3.0).powf(aggressiveness);
            deleted += self.collapse_pass(threshold, Some(triangle_count - deleted - target_count));
            debug!(
                "simplify iteration {iteration}: {} triangles left, threshold {threshold:e}",
                triangle_count - deleted
            );
        }

        self.compact_mesh();
        self.stats = SimplifyStats {
            iterations,
            deleted_triangles: deleted,
        };
    }

    /// Collapses only edges whose error is within floating point noise of
    /// zero, until a pass deletes nothing.
    pub fn simplify_lossless(&mut self) {
        for t in &mut self.triangles {
            t.deleted = false;
        }
        let mut total = 0;
        let mut iterations = 0;

        for iteration in 0..SIMPLIFY_LOSSLESS_MAX_ITERATIONS {
            iterations = iteration + 1;
            self.update_mesh(iteration);
            for t in &mut self.triangles {
                t.dirty = false;
            }
            let deleted = self.collapse_pass(SIMPLIFY_LOSSLESS_THRESHOLD, None);
            debug!("lossless iteration {iteration}: {deleted} triangles removed");
            if deleted == 0 {
                break;
            }
            total += deleted;
        }

        self.compact_mesh();
        self.stats = SimplifyStats {
            iterations,
            deleted_triangles: total,
        };
    }

    /// Exports the current geometry. Call after a run so deleted triangles
    /// and orphan vertices are gone.
    #[must_use]
    pub fn to_mesh(&self) -> MeshGeometry3D {
        let positions: Vec<Point3> = self.vertices.iter().map(|v| v.p).collect();
        let indices: Vec<u32> = self
            .triangles
            .iter()
            .filter(|t| !t.deleted)
            .flat_map(|t| t.v.map(|i| i as u32))
            .collect();
        let normals = if self.had_normals {
            calculate_normals(&positions, &indices)
        } else {
            Vec::new()
        };
        MeshGeometry3D {
            positions,
            normals,
            indices,
            ..MeshGeometry3D::default()
        }
    }

    // =========================================================================
    // COLLAPSE PASS
    // =========================================================================

    /// One walk over the triangles. Returns the number deleted; stops early
    /// once `budget` triangles are gone.
    fn collapse_pass(&mut self, threshold: f64, budget: Option<usize>) -> usize {
        let mut deleted = 0;
        let mut deleted0: Vec<bool> = Vec::new();
        let mut deleted1: Vec<bool> = Vec::new();

        for tid in 0..self.triangles.len() {
            let t = &self.triangles[tid];
            if t.err[3] > threshold || t.deleted || t.dirty {
                continue;
            }

            for j in 0..3 {
                let t = &self.triangles[tid];
                if t.err[j] >= threshold {
                    continue;
                }
                let i0 = t.v[j];
                let i1 = t.v[(j + 1) % 3];
                if self.vertices[i0].border != self.vertices[i1].border {
                    continue;
                }

                let (_, p) = self.calculate_error(i0, i1);
                deleted0.clear();
                deleted0.resize(self.vertices[i0].tcount, false);
                deleted1.clear();
                deleted1.resize(self.vertices[i1].tcount, false);

                if self.flipped(p, i0, i1, &mut deleted0) || self.flipped(p, i1, i0, &mut deleted1) {
                    continue;
                }

                let q1 = self.vertices[i1].q;
                let v0 = &mut self.vertices[i0];
                v0.p = p;
                v0.q += q1;

                let tstart = self.refs.len();
                deleted += self.update_triangles(i0, i0, &deleted0);
                deleted += self.update_triangles(i0, i1, &deleted1);
                let tcount = self.refs.len() - tstart;

                let v0 = &self.vertices[i0];
                if tcount <= v0.tcount {
                    // Reuse the old slot to keep the refs array from growing.
                    let old = v0.tstart;
                    self.refs.copy_within(tstart..tstart + tcount, old);
                    self.refs.truncate(tstart);
                } else {
                    self.vertices[i0].tstart = tstart;
                }
                self.vertices[i0].tcount = tcount;
                break;
            }

            if budget.is_some_and(|b| deleted >= b) {
                break;
            }
        }
        deleted
    }

    /// True if moving `i0` to `p` would flip or sliver a triangle that
    /// survives the collapse of edge `i0`–`i1`. Marks the triangles that do
    /// not survive in `deleted`.
    fn flipped(&self, p: Point3, i0: usize, i1: usize, deleted: &mut [bool]) -> bool {
        let v0 = &self.vertices[i0];
        for k in 0..v0.tcount {
            let r = self.refs[v0.tstart + k];
            let t = &self.triangles[r.tid];
            if t.deleted {
                continue;
            }
            let id1 = t.v[(r.tvertex + 1) % 3];
            let id2 = t.v[(r.tvertex + 2) % 3];
            if id1 == i1 || id2 == i1 {
                deleted[k] = true;
                continue;
            }

            let d1 = (self.vertices[id1].p - p).normalize_or_zero();
            let d2 = (self.vertices[id2].p - p).normalize_or_zero();
            if d1.dot(d2).abs() > SIMPLIFY_MAX_EDGE_COSINE {
                return true;
            }
            let n = d1.cross(d2).normalize_or_zero();
            deleted[k] = false;
            if n.dot(t.n) < SIMPLIFY_MIN_NORMAL_DOT {
                return true;
            }
        }
        false
    }

    /// Repoints the live triangles of vertex `from` to `i0`, deleting the
    /// ones marked in `deleted`. Returns the number deleted.
    fn update_triangles(&mut self, i0: usize, from: usize, deleted: &[bool]) -> usize {
        let (tstart, tcount) = (self.vertices[from].tstart, self.vertices[from].tcount);
        let mut removed = 0;
        for k in 0..tcount {
            let r = self.refs[tstart + k];
            if self.triangles[r.tid].deleted {
                continue;
            }
            if deleted[k] {
                self.triangles[r.tid].deleted = true;
                removed += 1;
                continue;
            }
            let v = {
                let t = &mut self.triangles[r.tid];
                t.v[r.tvertex] = i0;
                t.dirty = true;
                t.v
            };
            let err = [
                self.calculate_error(v[0], v[1]).0,
                self.calculate_error(v[1], v[2]).0,
                self.calculate_error(v[2], v[0]).0,
            ];
            self.triangles[r.tid].err = [err[0], err[1], err[2], err[0].min(err[1]).min(err[2])];
            self.refs.push(r);
        }
        removed
    }

    // =========================================================================
    // ADJACENCY AND QUADRICS
    // =========================================================================

    /// Drops deleted triangles (after the first iteration), rebuilds the
    /// refs and border flags, and on the first iteration seeds quadrics and
    /// edge errors.
    fn update_mesh(&mut self, iteration: usize) {
        if iteration > 0 {
            self.triangles.retain(|t| !t.deleted);
        }

        for v in &mut self.vertices {
            v.tstart = 0;
            v.tcount = 0;
        }
        for t in &self.triangles {
            for &i in &t.v {
                self.vertices[i].tcount += 1;
            }
        }
        let mut tstart = 0;
        for v in &mut self.vertices {
            v.tstart = tstart;
            tstart += v.tcount;
            v.tcount = 0;
        }
        self.refs.clear();
        self.refs.resize(self.triangles.len() * 3, Ref { tid: 0, tvertex: 0 });
        for (tid, t) in self.triangles.iter().enumerate() {
            for (tvertex, &i) in t.v.iter().enumerate() {
                let v = &mut self.vertices[i];
                self.refs[v.tstart + v.tcount] = Ref { tid, tvertex };
                v.tcount += 1;
            }
        }

        self.mark_borders();

        if iteration == 0 {
            for v in &mut self.vertices {
                v.q = Quadric::default();
            }
            for t in &mut self.triangles {
                let [p0, p1, p2] = t.v.map(|i| self.vertices[i].p);
                let n = (p1 - p0).cross(p2 - p0).normalize_or_zero();
                t.n = n;
                let q = Quadric::from_point_normal(p0, n);
                for &i in &t.v {
                    self.vertices[i].q += q;
                }
            }
            for tid in 0..self.triangles.len() {
                let v = self.triangles[tid].v;
                let err = [
                    self.calculate_error(v[0], v[1]).0,
                    self.calculate_error(v[1], v[2]).0,
                    self.calculate_error(v[2], v[0]).0,
                ];
                self.triangles[tid].err = [err[0], err[1], err[2], err[0].min(err[1]).min(err[2])];
            }
        }
    }

    /// A vertex is on the border if some neighbour shares exactly one of
    /// its triangles with it.
    fn mark_borders(&mut self) {
        for v in &mut self.vertices {
            v.border = false;
        }
        let mut neighbours: Vec<(usize, usize)> = Vec::new();
        for vid in 0..self.vertices.len() {
            neighbours.clear();
            let (tstart, tcount) = (self.vertices[vid].tstart, self.vertices[vid].tcount);
            for r in &self.refs[tstart..tstart + tcount] {
                for &id in &self.triangles[r.tid].v {
                    match neighbours.iter_mut().find(|(n, _)| *n == id) {
                        Some((_, count)) => *count += 1,
                        None => neighbours.push((id, 1)),
                    }
                }
            }
            for &(id, count) in &neighbours {
                if count == 1 {
                    self.vertices[id].border = true;
                }
            }
        }
    }

    /// Error and position of collapsing edge `a`–`b`.
    fn calculate_error(&self, a: usize, b: usize) -> (f64, Point3) {
        let (va, vb) = (&self.vertices[a], &self.vertices[b]);
        let q = va.q + vb.q;
        let border = va.border && vb.border;

        if !border {
            if let Some(p) = q.minimizer(GEOMETRY_EPSILON) {
                return (q.error(p), p);
            }
        }
        let mid = (va.p + vb.p) / 2.0;
        [va.p, vb.p, mid]
            .into_iter()
            .map(|p| (q.error(p), p))
            .fold((f64::INFINITY, mid), |best, c| if c.0 < best.0 { c } else { best })
    }

    /// Removes deleted triangles and unreferenced vertices and remaps the
    /// indices. Triangles left with a repeated vertex are dropped as well.
    fn compact_mesh(&mut self) {
        self.triangles
            .retain(|t| !t.deleted && t.v[0] != t.v[1] && t.v[1] != t.v[2] && t.v[2] != t.v[0]);

        let mut remap = vec![usize::MAX; self.vertices.len()];
        for t in &self.triangles {
            for &i in &t.v {
                remap[i] = 0;
            }
        }
        let mut next = 0;
        let mut kept = Vec::with_capacity(self.vertices.len());
        for (i, v) in self.vertices.iter().enumerate() {
            if remap[i] != usize::MAX {
                remap[i] = next;
                next += 1;
                kept.push(v.clone());
            }
        }
        for t in &mut self.triangles {
            t.v = t.v.map(|i| remap[i]);
        }
        self.vertices = kept;
        self.refs.clear();
    }
}

#[cfg(test)]
mod tests;
