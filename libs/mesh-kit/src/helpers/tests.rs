//! Geometry helper tests.

use approx::assert_relative_eq;

use super::*;
use crate::vector::triangle_area;

fn unit_square() -> MeshGeometry3D {
    MeshGeometry3D::from_positions(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ],
        vec![0, 1, 2, 0, 2, 3],
    )
}

/// Two right triangles meeting at a 90° fold along the X axis.
fn fold() -> (Vec<Point3>, Vec<u32>) {
    (
        vec![Point3::ZERO, Point3::X, Point3::Y, Point3::Z],
        vec![0, 1, 2, 0, 3, 1],
    )
}

fn total_area(mesh: &MeshGeometry3D) -> f64 {
    mesh.triangles()
        .map(|[a, b, c]| {
            triangle_area(
                mesh.positions[a as usize],
                mesh.positions[b as usize],
                mesh.positions[c as usize],
            )
        })
        .sum()
}

// =============================================================================
// NORMALS AND TANGENTS
// =============================================================================

#[test]
fn test_flat_normals() {
    let mesh = unit_square();
    let normals = calculate_normals(&mesh.positions, &mesh.indices);
    for n in normals {
        assert_relative_eq!(n, Vector3::Z);
    }
}

#[test]
fn test_angle_weighted_normals() {
    let (positions, indices) = fold();
    let normals = calculate_normals(&positions, &indices);
    let expected = (Vector3::Z + Vector3::Y).normalize();
    assert_relative_eq!(normals[0], expected, epsilon = 1e-12);
    assert_relative_eq!(normals[1], expected, epsilon = 1e-12);
    assert_relative_eq!(normals[2], Vector3::Z);
    assert_relative_eq!(normals[3], Vector3::Y);
}

#[test]
fn test_isolated_vertex_normal_is_zero() {
    let normals = calculate_normals(&[Point3::ZERO, Point3::X, Point3::Y, Point3::Z], &[0, 1, 2]);
    assert_eq!(normals[3], Vector3::ZERO);
}

#[test]
fn test_tangents_follow_texcoords() {
    let mesh = unit_square();
    let normals = vec![Vector3::Z; 4];
    let texcoords: Vec<Point2> = mesh.positions.iter().map(|p| p.truncate()).collect();
    let (tangents, bitangents) = calculate_tangents(&mesh.positions, &normals, &texcoords, &mesh.indices);
    for (t, b) in tangents.iter().zip(&bitangents) {
        assert_relative_eq!(*t, Vector3::X, epsilon = 1e-12);
        assert_relative_eq!(*b, Vector3::Y, epsilon = 1e-12);
    }
}

// =============================================================================
// EDGES AND BORDERS
// =============================================================================

#[test]
fn test_find_edges() {
    let mesh = unit_square();
    let edges = find_edges(&mesh.indices);
    assert_eq!(edges.len(), 5);
    assert!(edges.contains(&[0, 2]));
}

#[test]
fn test_border_edges_and_loops() {
    let mesh = unit_square();
    let border = find_border_edges(&mesh.indices);
    assert_eq!(border.len(), 4);
    assert!(!border.contains(&[0, 2]) && !border.contains(&[2, 0]));

    let loops = find_borders(&mesh.indices);
    assert_eq!(loops.len(), 1);
    assert_eq!(loops[0].len(), 4);
}

#[test]
fn test_closed_mesh_has_no_border() {
    // Tetrahedron
    let indices = [0, 2, 1, 0, 1, 3, 1, 2, 3, 2, 0, 3];
    assert!(find_border_edges(&indices).is_empty());
    assert!(find_borders(&indices).is_empty());
}

#[test]
fn test_sharp_edges() {
    let (positions, indices) = fold();
    assert_eq!(find_sharp_edges(&positions, &indices, 30.0), vec![[0, 1]]);
    assert!(find_sharp_edges(&positions, &indices, 100.0).is_empty());
}

// =============================================================================
// REPAIR
// =============================================================================

#[test]
fn test_remove_isolated_vertices() {
    let mesh = MeshGeometry3D {
        positions: vec![Point3::ZERO, Point3::splat(9.0), Point3::X, Point3::Y],
        normals: vec![Vector3::Z; 4],
        indices: vec![0, 2, 3],
        ..Default::default()
    };
    let cleaned = remove_isolated_vertices(&mesh);
    assert_eq!(cleaned.positions, vec![Point3::ZERO, Point3::X, Point3::Y]);
    assert_eq!(cleaned.normals.len(), 3);
    assert_eq!(cleaned.indices, vec![0, 1, 2]);
}

#[test]
fn test_no_shared_vertices() {
    let split = no_shared_vertices(&unit_square());
    assert_eq!(split.positions.len(), 6);
    assert_eq!(split.indices, vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(split.positions[3], Point3::ZERO);
}

#[test]
fn test_validate() {
    assert!(validate(&unit_square()).is_ok());

    let mut broken = unit_square();
    broken.indices.push(7);
    broken.indices.push(0);
    broken.indices.push(1);
    broken.normals = vec![Vector3::Z; 3];
    let Err(MeshError::Validation { message }) = validate(&broken) else {
        panic!("expected a validation error");
    };
    assert!(message.contains("normals"));
    assert!(message.contains("out of range"));
    assert_eq!(message.lines().count(), 2);
}

#[test]
fn test_validate_degenerate_triangle() {
    let mut mesh = unit_square();
    mesh.indices.extend([1, 1, 2]);
    assert!(validate(&mesh).is_err());
}

// =============================================================================
// PLANE OPERATIONS
// =============================================================================

#[test]
fn test_contour_segments() {
    let segments = get_contour_segments(&unit_square(), Point3::new(0.5, 0.0, 0.0), Vector3::X);
    assert_eq!(segments.len(), 4);
    assert!(segments.iter().all(|p| (p.x - 0.5).abs() < 1e-12));

    let contours = combine_segments(&segments, 1e-9);
    assert_eq!(contours.len(), 1);
    assert_eq!(contours[0].len(), 3);
}

#[test]
fn test_combine_closed_loop() {
    let a = Point3::ZERO;
    let b = Point3::X;
    let c = Point3::Y;
    let contours = combine_segments(&[a, b, b, c, c, a], 1e-9);
    assert_eq!(contours.len(), 1);
    assert_eq!(contours[0].len(), 4);
    assert_eq!(contours[0].first(), contours[0].last());
}

#[test]
fn test_cut_keeps_positive_side() {
    let mesh = unit_square();
    let half = cut(&mesh, Point3::new(0.5, 0.0, 0.0), Vector3::X);
    assert_relative_eq!(total_area(&half), 0.5, epsilon = 1e-12);
    assert!(half.positions.iter().all(|p| p.x >= 0.5 - 1e-12));
    assert!(validate(&half).is_ok());
}

#[test]
fn test_cut_interpolates_texcoords() {
    let mut mesh = unit_square();
    mesh.texcoords = mesh.positions.iter().map(|p| p.truncate()).collect();
    let half = cut(&mesh, Point3::new(0.25, 0.0, 0.0), -Vector3::X);
    assert_eq!(half.texcoords.len(), half.positions.len());
    for (p, uv) in half.positions.iter().zip(&half.texcoords) {
        assert_relative_eq!(p.truncate(), *uv, epsilon = 1e-12);
    }
    assert_relative_eq!(total_area(&half), 0.25, epsilon = 1e-12);
}
