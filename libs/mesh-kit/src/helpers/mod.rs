//! # Mesh Geometry Helpers
//!
//! Analysis and repair functions over finished meshes: normal and tangent
//! recomputation, edge and border extraction, validation, vertex
//! un-sharing, plane contours and plane cuts.
//!
//! Everything here is a free function taking buffers or a
//! [`MeshGeometry3D`] by reference and returning new data; inputs are never
//! mutated.

use std::collections::{HashMap, HashSet, VecDeque};

use config::constants::GEOMETRY_EPSILON;

use crate::error::{MeshError, MeshResult};
use crate::mesh::MeshGeometry3D;
use crate::vector::{angle_between, find_any_perpendicular, triangle_normal, Point2, Point3, Vector3};

// =============================================================================
// NORMALS AND TANGENTS
// =============================================================================

/// Angle-weighted vertex normals.
///
/// Each triangle adds its unit normal to each of its corners, weighted by the
/// angle the triangle subtends at that corner. Vertices touched only by
/// degenerate triangles get a zero normal.
///
/// # Example
///
/// ```rust
/// use mesh_kit::helpers::calculate_normals;
/// use mesh_kit::Point3;
///
/// let normals = calculate_normals(&[Point3::ZERO, Point3::X, Point3::Y], &[0, 1, 2]);
/// assert_eq!(normals[0], Point3::Z);
/// ```
pub fn calculate_normals(positions: &[Point3], indices: &[u32]) -> Vec<Vector3> {
    let mut normals = vec![Vector3::ZERO; positions.len()];
    for t in indices.chunks_exact(3) {
        let [a, b, c] = [t[0] as usize, t[1] as usize, t[2] as usize];
        let (pa, pb, pc) = (positions[a], positions[b], positions[c]);
        let n = triangle_normal(pa, pb, pc);
        if n == Vector3::ZERO {
            continue;
        }
        normals[a] += n * angle_between(pb - pa, pc - pa);
        normals[b] += n * angle_between(pc - pb, pa - pb);
        normals[c] += n * angle_between(pa - pc, pb - pc);
    }
    for n in &mut normals {
        *n = n.normalize_or_zero();
    }
    normals
}

/// Per-vertex tangents and bitangents from texture coordinate gradients.
///
/// Tangents are Gram-Schmidt orthogonalized against the normal; bitangents
/// are `normal × tangent` with the sign of the texture-space handedness.
/// Vertices without a usable gradient get an arbitrary perpendicular frame.
/// `normals` and `texcoords` must run parallel to `positions`.
pub fn calculate_tangents(
    positions: &[Point3],
    normals: &[Vector3],
    texcoords: &[Point2],
    indices: &[u32],
) -> (Vec<Vector3>, Vec<Vector3>) {
    let n = positions.len();
    let mut tan1 = vec![Vector3::ZERO; n];
    let mut tan2 = vec![Vector3::ZERO; n];

    for t in indices.chunks_exact(3) {
        let [a, b, c] = [t[0] as usize, t[1] as usize, t[2] as usize];
        let e1 = positions[b] - positions[a];
        let e2 = positions[c] - positions[a];
        let d1 = texcoords[b] - texcoords[a];
        let d2 = texcoords[c] - texcoords[a];
        let det = d1.x * d2.y - d2.x * d1.y;
        if det.abs() < GEOMETRY_EPSILON {
            continue;
        }
        let r = 1.0 / det;
        let sdir = (e1 * d2.y - e2 * d1.y) * r;
        let tdir = (e2 * d1.x - e1 * d2.x) * r;
        for v in [a, b, c] {
            tan1[v] += sdir;
            tan2[v] += tdir;
        }
    }

    let mut tangents = Vec::with_capacity(n);
    let mut bitangents = Vec::with_capacity(n);
    for v in 0..n {
        let normal = normals[v];
        let mut tangent = (tan1[v] - normal * normal.dot(tan1[v])).normalize_or_zero();
        if tangent == Vector3::ZERO {
            tangent = find_any_perpendicular(normal);
        }
        let handedness = if normal.cross(tangent).dot(tan2[v]) < 0.0 {
            -1.0
        } else {
            1.0
        };
        tangents.push(tangent);
        bitangents.push(normal.cross(tangent) * handedness);
    }
    (tangents, bitangents)
}

// =============================================================================
// EDGES AND BORDERS
// =============================================================================

fn edge_key(a: u32, b: u32) -> (u32, u32) {
    (a.min(b), a.max(b))
}

/// Every distinct undirected edge, in order of first appearance, as
/// `[low, high]` pairs.
pub fn find_edges(indices: &[u32]) -> Vec<[u32; 2]> {
    let mut seen = HashSet::new();
    let mut edges = Vec::new();
    for t in indices.chunks_exact(3) {
        for (a, b) in [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])] {
            let key = edge_key(a, b);
            if seen.insert(key) {
                edges.push([key.0, key.1]);
            }
        }
    }
    edges
}

/// Edges shared by two triangles whose normals differ by more than
/// `min_angle_degrees`.
///
/// Only edges whose vertices are shared by index are found; meshes with
/// duplicated vertices along creases report nothing there.
pub fn find_sharp_edges(positions: &[Point3], indices: &[u32], min_angle_degrees: f64) -> Vec<[u32; 2]> {
    let min_angle = min_angle_degrees.to_radians();
    let mut first_normal: HashMap<(u32, u32), Vector3> = HashMap::new();
    let mut edges = Vec::new();
    for t in indices.chunks_exact(3) {
        let n = triangle_normal(
            positions[t[0] as usize],
            positions[t[1] as usize],
            positions[t[2] as usize],
        );
        for (a, b) in [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])] {
            let key = edge_key(a, b);
            match first_normal.get(&key) {
                Some(&other) => {
                    if angle_between(n, other) > min_angle {
                        edges.push([key.0, key.1]);
                    }
                }
                None => {
                    first_normal.insert(key, n);
                }
            }
        }
    }
    edges
}

/// Directed edges used by exactly one triangle, oriented as in that triangle.
pub fn find_border_edges(indices: &[u32]) -> Vec<[u32; 2]> {
    let mut count: HashMap<(u32, u32), usize> = HashMap::new();
    for t in indices.chunks_exact(3) {
        for (a, b) in [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])] {
            *count.entry(edge_key(a, b)).or_insert(0) += 1;
        }
    }
    let mut borders = Vec::new();
    for t in indices.chunks_exact(3) {
        for (a, b) in [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])] {
            if count.get(&edge_key(a, b)) == Some(&1) {
                borders.push([a, b]);
            }
        }
    }
    borders
}

/// Border edges chained into vertex loops.
///
/// Each loop lists its vertices once, following the border edge direction.
/// Open chains (possible on non-manifold input) are returned as they are.
pub fn find_borders(indices: &[u32]) -> Vec<Vec<u32>> {
    let edges = find_border_edges(indices);
    let mut next: HashMap<u32, Vec<usize>> = HashMap::new();
    for (i, e) in edges.iter().enumerate() {
        next.entry(e[0]).or_default().push(i);
    }

    let mut used = vec![false; edges.len()];
    let mut loops = Vec::new();
    for start in 0..edges.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let first = edges[start][0];
        let mut chain = vec![first];
        let mut current = edges[start][1];
        while current != first {
            chain.push(current);
            let candidate = next
                .get(&current)
                .and_then(|outs| outs.iter().copied().find(|&e| !used[e]));
            let Some(e) = candidate else {
                break;
            };
            used[e] = true;
            current = edges[e][1];
        }
        loops.push(chain);
    }
    loops
}

// =============================================================================
// REPAIR
// =============================================================================

/// Copies `mesh` without vertices that no triangle references.
pub fn remove_isolated_vertices(mesh: &MeshGeometry3D) -> MeshGeometry3D {
    let mut remap = vec![u32::MAX; mesh.positions.len()];
    let mut order = Vec::new();
    for &i in &mesh.indices {
        let slot = &mut remap[i as usize];
        if *slot == u32::MAX {
            *slot = order.len() as u32;
            order.push(i as usize);
        }
    }
    // Keep the original vertex order among survivors.
    order.sort_unstable();
    for (new, &old) in order.iter().enumerate() {
        remap[old] = new as u32;
    }

    MeshGeometry3D {
        positions: pick(&mesh.positions, &order),
        normals: pick(&mesh.normals, &order),
        texcoords: pick(&mesh.texcoords, &order),
        tangents: pick(&mesh.tangents, &order),
        bitangents: pick(&mesh.bitangents, &order),
        indices: mesh.indices.iter().map(|&i| remap[i as usize]).collect(),
    }
}

fn pick<T: Copy>(values: &[T], order: &[usize]) -> Vec<T> {
    if values.is_empty() {
        return Vec::new();
    }
    order.iter().map(|&i| values[i]).collect()
}

/// Copies `mesh` so that every triangle corner owns a distinct vertex.
pub fn no_shared_vertices(mesh: &MeshGeometry3D) -> MeshGeometry3D {
    let order: Vec<usize> = mesh.indices.iter().map(|&i| i as usize).collect();
    MeshGeometry3D {
        positions: pick(&mesh.positions, &order),
        normals: pick(&mesh.normals, &order),
        texcoords: pick(&mesh.texcoords, &order),
        tangents: pick(&mesh.tangents, &order),
        bitangents: pick(&mesh.bitangents, &order),
        indices: (0..order.len() as u32).collect(),
    }
}

/// Checks every structural invariant of `mesh`.
///
/// # Errors
///
/// [`MeshError::Validation`] listing every problem found, one per line.
pub fn validate(mesh: &MeshGeometry3D) -> MeshResult<()> {
    let mut problems = Vec::new();
    let n = mesh.positions.len();

    let attributes = [
        ("normals", mesh.normals.len()),
        ("texcoords", mesh.texcoords.len()),
        ("tangents", mesh.tangents.len()),
        ("bitangents", mesh.bitangents.len()),
    ];
    for (name, len) in attributes {
        if len != 0 && len != n {
            problems.push(format!("{name}: {len} entries for {n} positions"));
        }
    }
    if mesh.indices.len() % 3 != 0 {
        problems.push(format!("indices: length {} is not a multiple of 3", mesh.indices.len()));
    }
    if let Some(bad) = mesh.indices.iter().find(|&&i| i as usize >= n) {
        problems.push(format!("indices: {bad} out of range for {n} positions"));
    }
    if let Some(i) = mesh.positions.iter().position(|p| !p.is_finite()) {
        problems.push(format!("positions: vertex {i} is not finite"));
    }
    if let Some(i) = mesh.normals.iter().position(|p| !p.is_finite()) {
        problems.push(format!("normals: vertex {i} is not finite"));
    }
    let degenerate = mesh
        .indices
        .chunks_exact(3)
        .filter(|t| t[0] == t[1] || t[1] == t[2] || t[2] == t[0])
        .count();
    if degenerate > 0 {
        problems.push(format!("indices: {degenerate} triangles repeat a vertex"));
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(MeshError::validation(problems.join("\n")))
    }
}

// =============================================================================
// PLANE OPERATIONS
// =============================================================================

/// Segments where the plane through `plane_position` with normal
/// `plane_normal` crosses the mesh, as consecutive point pairs.
pub fn get_contour_segments(mesh: &MeshGeometry3D, plane_position: Point3, plane_normal: Vector3) -> Vec<Point3> {
    let normal = plane_normal.normalize_or_zero();
    let distance = |p: Point3| (p - plane_position).dot(normal);
    let mut segments = Vec::new();
    for t in mesh.indices.chunks_exact(3) {
        let p = [
            mesh.positions[t[0] as usize],
            mesh.positions[t[1] as usize],
            mesh.positions[t[2] as usize],
        ];
        let d = [distance(p[0]), distance(p[1]), distance(p[2])];
        let mut hits = Vec::with_capacity(2);
        for (a, b) in [(0, 1), (1, 2), (2, 0)] {
            if (d[a] >= 0.0) != (d[b] >= 0.0) {
                let t = d[a] / (d[a] - d[b]);
                hits.push(p[a].lerp(p[b], t));
            }
        }
        if hits.len() == 2 {
            segments.extend(hits);
        }
    }
    segments
}

/// Chains point-pair segments into polylines, joining endpoints closer than
/// `eps`. A closed contour repeats its first point at the end.
pub fn combine_segments(segments: &[Point3], eps: f64) -> Vec<Vec<Point3>> {
    let mut pending: Vec<(Point3, Point3)> = segments.chunks_exact(2).map(|s| (s[0], s[1])).collect();
    let close = |a: Point3, b: Point3| a.distance_squared(b) < eps * eps;
    let mut contours = Vec::new();

    while let Some((start, end)) = pending.pop() {
        let mut contour = VecDeque::from([start, end]);
        loop {
            let (Some(&head), Some(&tail)) = (contour.front(), contour.back()) else {
                break;
            };
            if contour.len() > 2 && close(head, tail) {
                break;
            }
            let found = pending.iter().position(|&(a, b)| {
                close(a, tail) || close(b, tail) || close(a, head) || close(b, head)
            });
            let Some(i) = found else {
                break;
            };
            let (a, b) = pending.swap_remove(i);
            if close(a, tail) {
                contour.push_back(b);
            } else if close(b, tail) {
                contour.push_back(a);
            } else if close(b, head) {
                contour.push_front(a);
            } else {
                contour.push_front(b);
            }
        }
        contours.push(contour.into_iter().collect());
    }
    contours
}

/// Keeps the part of `mesh` on the side of the plane its normal points to,
/// splitting triangles that cross the plane. Attributes of new vertices are
/// interpolated along the cut edges.
pub fn cut(mesh: &MeshGeometry3D, plane_position: Point3, plane_normal: Vector3) -> MeshGeometry3D {
    let normal = plane_normal.normalize_or_zero();
    let mut out = mesh.clone();
    out.indices.clear();
    let distances: Vec<f64> = mesh
        .positions
        .iter()
        .map(|&p| (p - plane_position).dot(normal))
        .collect();

    let mut splits: HashMap<(u32, u32), u32> = HashMap::new();
    for t in mesh.indices.chunks_exact(3) {
        let inside = |v: u32| distances[v as usize] >= 0.0;
        let kept = t.iter().filter(|&&v| inside(v)).count();
        if kept == 3 {
            out.indices.extend_from_slice(t);
            continue;
        }
        if kept == 0 {
            continue;
        }

        // Sutherland-Hodgman against one plane: at most four corners survive.
        let mut polygon: Vec<u32> = Vec::with_capacity(4);
        for k in 0..3 {
            let (a, b) = (t[k], t[(k + 1) % 3]);
            if inside(a) {
                polygon.push(a);
            }
            if inside(a) != inside(b) {
                let key = edge_key(a, b);
                let v = *splits
                    .entry(key)
                    .or_insert_with(|| split_vertex(&mut out, &distances, key.0, key.1));
                polygon.push(v);
            }
        }
        for k in 1..polygon.len().saturating_sub(1) {
            out.indices.extend([polygon[0], polygon[k], polygon[k + 1]]);
        }
    }
    remove_isolated_vertices(&out)
}

/// Appends the vertex where edge `(a, b)` meets the cut plane.
fn split_vertex(out: &mut MeshGeometry3D, distances: &[f64], a: u32, b: u32) -> u32 {
    let (ia, ib) = (a as usize, b as usize);
    let t = distances[ia] / (distances[ia] - distances[ib]);
    let index = out.positions.len() as u32;
    out.positions.push(out.positions[ia].lerp(out.positions[ib], t));
    if !out.normals.is_empty() {
        let n = out.normals[ia].lerp(out.normals[ib], t).normalize_or_zero();
        out.normals.push(n);
    }
    if !out.texcoords.is_empty() {
        let uv = out.texcoords[ia].lerp(out.texcoords[ib], t);
        out.texcoords.push(uv);
    }
    if !out.tangents.is_empty() {
        let v = out.tangents[ia].lerp(out.tangents[ib], t).normalize_or_zero();
        out.tangents.push(v);
    }
    if !out.bitangents.is_empty() {
        let v = out.bitangents[ia].lerp(out.bitangents[ib], t).normalize_or_zero();
        out.bitangents.push(v);
    }
    index
}

#[cfg(test)]
mod tests;
