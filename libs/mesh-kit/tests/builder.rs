use approx::assert_relative_eq;
use mesh_kit::helpers::{find_border_edges, validate};
use mesh_kit::vector::triangle_normal;
use mesh_kit::{
    BoxFaces, MeshBuilder, MeshError, MeshGeometry3D, Point2, Point3, TubeOptions, Vector3,
};

fn assert_parallel_buffers(mesh: &MeshGeometry3D) {
    let n = mesh.positions.len();
    assert!(mesh.normals.is_empty() || mesh.normals.len() == n);
    assert!(mesh.texcoords.is_empty() || mesh.texcoords.len() == n);
    assert!(mesh.tangents.is_empty() || mesh.tangents.len() == n);
    assert_eq!(mesh.indices.len() % 3, 0);
    assert!(mesh.indices.iter().all(|&i| (i as usize) < n));
}

#[test]
fn mixed_generators_keep_buffers_parallel() {
    for (normals, texcoords) in [(false, false), (true, false), (false, true), (true, true)] {
        let mut builder = MeshBuilder::new(normals, texcoords, false);
        builder.add_box(Point3::ZERO, 1.0, 1.0, 1.0, BoxFaces::ALL_EXCEPT_TOP);
        builder.add_sphere(Point3::new(2.0, 0.0, 0.0), 0.5, 12, 6);
        builder.add_cylinder(Point3::ZERO, Point3::new(0.0, 0.0, 3.0), 0.4, 10, true, false);
        builder.add_torus(2.0, 0.5, 12, 8);
        builder.add_pipe(Point3::ZERO, Point3::X, 0.5, 1.0, 12);
        builder.add_arrow(Point3::ZERO, Point3::Y * 2.0, 0.2, 0.5, 8);
        builder
            .add_tube_with_diameter(
                &[Point3::ZERO, Point3::new(1.0, 1.0, 0.0), Point3::new(2.0, 1.0, 1.0)],
                0.3,
                8,
                &TubeOptions::capped(),
            )
            .unwrap();
        builder
            .add_polygon_by_triangulation(&[
                Point3::new(0.0, 0.0, 5.0),
                Point3::new(2.0, 0.0, 5.0),
                Point3::new(2.0, 1.0, 5.0),
                Point3::new(1.0, 1.0, 5.0),
                Point3::new(1.0, 2.0, 5.0),
                Point3::new(0.0, 2.0, 5.0),
            ])
            .unwrap();
        builder
            .add_extruded_geometry(
                &[Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)],
                Vector3::X,
                Point3::ZERO,
                Point3::Z,
            )
            .unwrap();
        builder.add_dodecahedron(Point3::ZERO, Vector3::X, Vector3::Z, 1.0).unwrap();
        builder.subdivide_linear(false);

        let mesh = builder.to_mesh();
        assert_parallel_buffers(&mesh);
        assert_eq!(mesh.normals.is_empty(), !normals);
        assert_eq!(mesh.texcoords.is_empty(), !texcoords);
        assert!(validate(&mesh).is_ok());
    }
}

#[test]
fn box_bounds_round_trip() {
    let center = Point3::new(1.0, -2.0, 3.0);
    let mut builder = MeshBuilder::new(true, true, false);
    builder.add_box(center, 2.0, 4.0, 6.0, BoxFaces::ALL);
    let bounds = builder.to_mesh().bounding_box().unwrap();
    assert_relative_eq!(bounds.min, center - Vector3::new(1.0, 2.0, 3.0), epsilon = 1e-12);
    assert_relative_eq!(bounds.max, center + Vector3::new(1.0, 2.0, 3.0), epsilon = 1e-12);
}

#[test]
fn sphere_normals_point_away_from_center() {
    let center = Point3::new(0.5, 1.0, -2.0);
    let radius = 3.0;
    let mut builder = MeshBuilder::new(true, true, false);
    builder.add_sphere(center, radius, 24, 12);
    let mesh = builder.to_mesh();
    for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
        assert_relative_eq!(*n, (*p - center) / radius, epsilon = 1e-9);
    }
}

#[test]
fn capped_cylinder_scenario() {
    let mut builder = MeshBuilder::new(true, false, false);
    builder.add_cylinder(Point3::ZERO, Point3::new(0.0, 0.0, 2.0), 1.0, 8, true, true);
    let mesh = builder.to_mesh();
    assert_eq!(mesh.positions.len(), 8 * 2 + 2);
    assert!(find_border_edges(&mesh.indices).is_empty());

    let side: Vec<Vector3> = mesh
        .triangles()
        .map(|t| t.map(|i| mesh.positions[i as usize]))
        .filter(|[a, b, c]| a.z != b.z || b.z != c.z)
        .map(|[a, b, c]| triangle_normal(a, b, c))
        .collect();
    assert_eq!(side.len(), 16);
    for n in side {
        assert!(n.z.abs() < 1e-12);
    }
}

#[test]
fn shape_errors_surface_to_callers() {
    let mut builder = MeshBuilder::default();
    let odd = [Point2::ZERO, Point2::X, Point2::Y];
    let err = builder
        .add_extruded_segments(&odd, Vector3::X, Point3::ZERO, Point3::Z)
        .unwrap_err();
    assert!(matches!(err, MeshError::Shape { .. }));

    let err = builder
        .add_tube(&[Point3::ZERO], None, None, &odd, &TubeOptions::default())
        .unwrap_err();
    assert!(matches!(err, MeshError::Shape { .. }));
    assert!(builder.is_empty());
}

#[test]
fn mesh_record_serializes() {
    let mut builder = MeshBuilder::new(true, true, false);
    builder.add_box(Point3::ZERO, 1.0, 1.0, 1.0, BoxFaces::TOP | BoxFaces::BOTTOM);
    let mesh = builder.to_mesh();
    let json = serde_json::to_string(&mesh).unwrap();
    let back: MeshGeometry3D = serde_json::from_str(&json).unwrap();
    assert_eq!(back, mesh);
}
