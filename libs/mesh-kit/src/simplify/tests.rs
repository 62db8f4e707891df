//! Mesh simplification tests.

use super::*;
use crate::builder::MeshBuilder;
use crate::vector::triangle_normal;

/// Flat `n × n` vertex grid in the z = 0 plane with shared vertices.
fn flat_grid(n: usize) -> MeshGeometry3D {
    let points: Vec<Point3> = (0..n)
        .flat_map(|i| (0..n).map(move |j| Point3::new(j as f64, i as f64, 0.0)))
        .collect();
    let mut builder = MeshBuilder::new(true, false, false);
    builder.add_rectangular_mesh(&points, n).unwrap();
    builder.to_mesh()
}

fn sphere(subdivisions: u32) -> MeshGeometry3D {
    let mut builder = MeshBuilder::new(true, false, false);
    builder.add_subdivision_sphere(Point3::ZERO, 1.0, subdivisions);
    builder.to_mesh()
}

fn face_normals(mesh: &MeshGeometry3D) -> Vec<Vector3> {
    mesh.triangles()
        .map(|t| {
            let [a, b, c] = t.map(|i| mesh.positions[i as usize]);
            triangle_normal(a, b, c)
        })
        .collect()
}

fn assert_indices_valid(mesh: &MeshGeometry3D) {
    assert_eq!(mesh.indices.len() % 3, 0);
    assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.positions.len()));
    for [a, b, c] in mesh.triangles() {
        assert!(a != b && b != c && c != a, "degenerate triangle {a} {b} {c}");
    }
}

// =============================================================================
// TARGETED SIMPLIFICATION
// =============================================================================

#[test]
fn test_sphere_reaches_target() {
    let mesh = sphere(3);
    assert_eq!(mesh.triangle_count(), 1280);

    let reduced = simplify(&mesh, &SimplifyOptions::default().with_target(300));
    assert!(reduced.triangle_count() <= 300);
    assert!(reduced.triangle_count() > 0);
    assert_indices_valid(&reduced);
}

#[test]
fn test_sphere_stays_round_and_outward() {
    let reduced = simplify(&sphere(3), &SimplifyOptions::default().with_target(300));
    for p in &reduced.positions {
        let r = p.length();
        assert!((0.9..1.2).contains(&r), "vertex drifted to radius {r}");
    }
    for t in reduced.triangles() {
        let [a, b, c] = t.map(|i| reduced.positions[i as usize]);
        let centroid = (a + b + c) / 3.0;
        assert!(triangle_normal(a, b, c).dot(centroid) > 0.0);
    }
}

#[test]
fn test_unreferenced_vertices_are_dropped() {
    let reduced = simplify(&sphere(2), &SimplifyOptions::default().with_target(100));
    let mut used = vec![false; reduced.positions.len()];
    for &i in &reduced.indices {
        used[i as usize] = true;
    }
    assert!(used.into_iter().all(|u| u));
}

#[test]
fn test_normals_recomputed_when_present() {
    let with = simplify(&sphere(2), &SimplifyOptions::default().with_target(100));
    assert_eq!(with.normals.len(), with.positions.len());

    let bare = MeshGeometry3D::from_positions(sphere(2).positions, sphere(2).indices);
    let without = simplify(&bare, &SimplifyOptions::default().with_target(100));
    assert!(without.normals.is_empty());
    assert!(without.texcoords.is_empty());
}

#[test]
fn test_target_above_count_keeps_mesh() {
    let mesh = sphere(1);
    let mut simplifier = MeshSimplifier::new(&mesh);
    simplifier.simplify(mesh.triangle_count(), SIMPLIFY_DEFAULT_AGGRESSIVENESS);
    assert_eq!(simplifier.stats(), SimplifyStats::default());
    let out = simplifier.to_mesh();
    assert_eq!(out.indices, mesh.indices);
    assert_eq!(out.positions, mesh.positions);
}

#[test]
fn test_input_is_not_modified() {
    let mesh = sphere(2);
    let copy = mesh.clone();
    let _ = simplify(&mesh, &SimplifyOptions::default().with_target(50));
    assert_eq!(mesh, copy);
}

#[test]
fn test_stats_account_for_removed_triangles() {
    let mesh = sphere(2);
    let mut simplifier = MeshSimplifier::new(&mesh);
    simplifier.simplify(100, 7.0);
    let stats = simplifier.stats();
    assert!(stats.iterations > 0);
    assert!(stats.deleted_triangles > 0);
    assert!(simplifier.triangle_count() <= mesh.triangle_count() - stats.deleted_triangles);
    assert_eq!(simplifier.vertex_count(), simplifier.to_mesh().positions.len());
}

#[test]
fn test_empty_mesh() {
    let reduced = simplify(&MeshGeometry3D::new(), &SimplifyOptions::default());
    assert!(reduced.is_empty());
    let lossless = simplify(&MeshGeometry3D::new(), &SimplifyOptions::default().with_lossless(true));
    assert!(lossless.is_empty());
}

// =============================================================================
// FLAT REGIONS AND LOSSLESS MODE
// =============================================================================

#[test]
fn test_flat_grid_keeps_plane_and_orientation() {
    let mesh = flat_grid(11);
    assert_eq!(mesh.triangle_count(), 200);
    let facing = face_normals(&mesh)[0].z.signum();

    let reduced = simplify(&mesh, &SimplifyOptions::default().with_target(40));
    assert!(reduced.triangle_count() < mesh.triangle_count());
    assert_indices_valid(&reduced);
    for p in &reduced.positions {
        assert!(p.z.abs() < 1e-9);
        assert!((-1e-9..=10.0 + 1e-9).contains(&p.x));
        assert!((-1e-9..=10.0 + 1e-9).contains(&p.y));
    }
    for n in face_normals(&reduced) {
        assert!(n.z * facing > 0.0, "triangle flipped or collapsed");
    }
}

#[test]
fn test_lossless_collapses_flat_grid() {
    let mesh = flat_grid(9);
    let reduced = simplify(&mesh, &SimplifyOptions::default().with_lossless(true));
    assert!(reduced.triangle_count() < mesh.triangle_count());
    assert_indices_valid(&reduced);
    assert!(reduced.positions.iter().all(|p| p.z.abs() < 1e-12));
}

#[test]
fn test_lossless_stops_when_nothing_changes() {
    let mut simplifier = MeshSimplifier::new(&flat_grid(6));
    simplifier.simplify_lossless();
    let first = simplifier.to_mesh();
    let stats = simplifier.stats();
    assert!(stats.iterations < SIMPLIFY_LOSSLESS_MAX_ITERATIONS);

    // A second lossless run over the result finds nothing more to do.
    let mut again = MeshSimplifier::new(&first);
    again.simplify_lossless();
    assert_eq!(again.stats().deleted_triangles, 0);
    assert_eq!(again.to_mesh().triangle_count(), first.triangle_count());
}

#[test]
fn test_lossless_keeps_curved_surface() {
    let mesh = sphere(1);
    let reduced = simplify(&mesh, &SimplifyOptions::default().with_lossless(true));
    assert_eq!(reduced.triangle_count(), mesh.triangle_count());
}

#[test]
fn test_options_builders() {
    let options = SimplifyOptions::default()
        .with_target(10)
        .with_aggressiveness(5.0)
        .with_lossless(true);
    assert_eq!(options.target_triangle_count, 10);
    assert_eq!(options.aggressiveness, 5.0);
    assert!(options.lossless);
    assert_eq!(SimplifyOptions::default().aggressiveness, SIMPLIFY_DEFAULT_AGGRESSIVENESS);
}
