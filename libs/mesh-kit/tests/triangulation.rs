use std::f64::consts::TAU;

use approx::assert_relative_eq;
use mesh_kit::triangulate::{ear_clip, sweep_line, triangulate};
use mesh_kit::vector::{orient2d, signed_area};
use mesh_kit::{Point2, Polygon, PolygonWithHoles};
use proptest::prelude::*;

fn covered_area(points: &[Point2], indices: &[u32]) -> f64 {
    indices
        .chunks_exact(3)
        .map(|t| {
            orient2d(
                points[t[0] as usize],
                points[t[1] as usize],
                points[t[2] as usize],
            ) / 2.0
        })
        .sum()
}

/// Star-shaped polygon around the origin: one vertex per evenly spaced
/// angle, at the given radius.
fn star(radii: &[f64]) -> Vec<Point2> {
    let n = radii.len() as f64;
    radii
        .iter()
        .enumerate()
        .map(|(i, &r)| {
            let angle = TAU * i as f64 / n;
            Point2::new(r * angle.cos(), r * angle.sin())
        })
        .collect()
}

#[test]
fn unit_square_gives_two_triangles() {
    let square = [
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 0.0),
        Point2::new(1.0, 1.0),
        Point2::new(0.0, 1.0),
    ];
    let indices = sweep_line::triangulate(&square, &[]).unwrap();
    assert_eq!(indices.len(), 6);
    assert_relative_eq!(covered_area(&square, &indices), 1.0);
    for t in indices.chunks_exact(3) {
        assert!(orient2d(square[t[0] as usize], square[t[1] as usize], square[t[2] as usize]) > 0.0);
    }
}

#[test]
fn polygon_with_hole_covers_ring_area() {
    let outer = Polygon::new(vec![
        Point2::new(0.0, 0.0),
        Point2::new(4.0, 0.0),
        Point2::new(4.0, 4.0),
        Point2::new(0.0, 4.0),
    ]);
    let hole = Polygon::new(vec![
        Point2::new(1.0, 1.0),
        Point2::new(1.0, 3.0),
        Point2::new(3.0, 3.0),
        Point2::new(3.0, 1.0),
    ]);
    let shape = PolygonWithHoles::new(outer, vec![hole]);
    let indices = shape.triangulate().unwrap();
    // 8 vertices, one hole: n + 2h - 2 triangles.
    assert_eq!(indices.len(), 3 * 8);
    assert_relative_eq!(covered_area(&shape.all_points(), &indices), 12.0, epsilon = 1e-9);
}

#[test]
fn ear_clip_and_sweep_agree_on_area() {
    let arrow = [
        Point2::new(0.0, 0.0),
        Point2::new(3.0, 1.0),
        Point2::new(0.0, 2.0),
        Point2::new(1.0, 1.0),
    ];
    let sweep = sweep_line::triangulate(&arrow, &[]).unwrap();
    let ears = ear_clip::triangulate(&arrow).unwrap();
    assert_relative_eq!(covered_area(&arrow, &sweep), signed_area(&arrow), epsilon = 1e-12);
    assert_relative_eq!(covered_area(&arrow, &ears), signed_area(&arrow), epsilon = 1e-12);
}

proptest! {
    #[test]
    fn star_polygons_are_fully_covered(radii in prop::collection::vec(0.3..1.0_f64, 3..40)) {
        let points = star(&radii);
        let n = points.len();
        let indices = triangulate(&points, &[]).unwrap();

        prop_assert_eq!(indices.len(), 3 * (n - 2));
        prop_assert!(indices.iter().all(|&i| (i as usize) < n));
        let mut seen = vec![false; n];
        for &i in &indices {
            seen[i as usize] = true;
        }
        prop_assert!(seen.into_iter().all(|s| s));

        let area = signed_area(&points);
        prop_assert!((covered_area(&points, &indices) - area).abs() < 1e-9);
        for t in indices.chunks_exact(3) {
            let a = orient2d(points[t[0] as usize], points[t[1] as usize], points[t[2] as usize]);
            prop_assert!(a > 0.0);
        }
    }

    #[test]
    fn winding_does_not_change_coverage(radii in prop::collection::vec(0.3..1.0_f64, 3..30)) {
        let ccw = star(&radii);
        let cw = Polygon::new(ccw.clone()).reversed();

        let a = triangulate(&ccw, &[]).unwrap();
        let b = triangulate(&cw.points, &[]).unwrap();
        prop_assert_eq!(a.len(), b.len());
        let area_a = covered_area(&ccw, &a);
        let area_b = covered_area(&cw.points, &b);
        prop_assert!((area_a - area_b).abs() < 1e-9);
    }
}
