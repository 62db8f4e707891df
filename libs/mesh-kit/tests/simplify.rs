use mesh_kit::simplify::{simplify, MeshSimplifier, SimplifyOptions};
use mesh_kit::{MeshBuilder, MeshGeometry3D, Point3};
use proptest::prelude::*;

/// Height field over an `n × n` vertex grid.
fn terrain(n: usize, heights: &[f64]) -> MeshGeometry3D {
    let points: Vec<Point3> = (0..n * n)
        .map(|k| Point3::new((k % n) as f64, (k / n) as f64, heights[k]))
        .collect();
    let mut builder = MeshBuilder::new(true, false, false);
    builder.add_rectangular_mesh(&points, n).unwrap();
    builder.to_mesh()
}

fn grid_strategy() -> impl Strategy<Value = (usize, Vec<f64>)> {
    (3..9_usize).prop_flat_map(|n| (Just(n), prop::collection::vec(-0.5..0.5_f64, n * n)))
}

proptest! {
    #[test]
    fn simplified_grids_stay_well_formed((n, heights) in grid_strategy(), fraction in 0.0..1.0_f64) {
        let mesh = terrain(n, &heights);
        let target = (mesh.triangle_count() as f64 * fraction) as usize;
        let reduced = simplify(&mesh, &SimplifyOptions::default().with_target(target));

        prop_assert!(reduced.triangle_count() <= mesh.triangle_count());
        prop_assert!(reduced.positions.len() <= mesh.positions.len());
        prop_assert_eq!(reduced.normals.len(), reduced.positions.len());
        for t in reduced.indices.chunks_exact(3) {
            prop_assert!(t.iter().all(|&i| (i as usize) < reduced.positions.len()));
            prop_assert!(t[0] != t[1] && t[1] != t[2] && t[2] != t[0]);
        }
    }

    #[test]
    fn lossless_never_grows((n, heights) in grid_strategy()) {
        let mesh = terrain(n, &heights);
        let mut simplifier = MeshSimplifier::new(&mesh);
        simplifier.simplify_lossless();
        let reduced = simplifier.to_mesh();
        prop_assert!(reduced.triangle_count() <= mesh.triangle_count());
        prop_assert!(reduced.positions.len() <= mesh.positions.len());
    }
}

#[test]
fn lossless_reruns_converge() {
    let mut builder = MeshBuilder::new(false, false, false);
    builder.add_box(Point3::ZERO, 2.0, 2.0, 2.0, mesh_kit::BoxFaces::ALL);
    builder.subdivide_linear(false);
    builder.subdivide_linear(false);
    let mesh = builder.to_mesh();

    let once = simplify(&mesh, &SimplifyOptions::default().with_lossless(true));
    assert!(once.triangle_count() < mesh.triangle_count());
    let twice = simplify(&once, &SimplifyOptions::default().with_lossless(true));
    assert!(twice.triangle_count() <= once.triangle_count());
    assert!(twice.positions.len() <= once.positions.len());
}
