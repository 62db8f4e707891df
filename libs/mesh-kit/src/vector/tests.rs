//! Vector helper tests.

use super::*;
use approx::assert_abs_diff_eq;

#[test]
fn signed_area_sign_follows_winding() {
    let ccw = [Point2::new(0.0, 0.0), Point2::new(2.0, 0.0), Point2::new(0.0, 2.0)];
    let cw = [ccw[0], ccw[2], ccw[1]];
    assert_abs_diff_eq!(signed_area(&ccw), 2.0);
    assert_abs_diff_eq!(signed_area(&cw), -2.0);
    assert_eq!(signed_area(&ccw[..2]), 0.0);
}

#[test]
fn perpendicular_is_unit_and_orthogonal() {
    for n in [Vector3::X, Vector3::Y, Vector3::Z, Vector3::new(1.0, 2.0, -3.0)] {
        let u = find_any_perpendicular(n);
        assert_abs_diff_eq!(u.length(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(u.dot(n), 0.0, epsilon = 1e-12);
    }
}

#[test]
fn triangle_normal_right_hand_rule() {
    let n = triangle_normal(Point3::ZERO, Point3::X, Point3::Y);
    assert_eq!(n, Vector3::Z);
    assert_eq!(triangle_normal(Point3::ZERO, Point3::X, Point3::X * 2.0), Vector3::ZERO);
}

#[test]
fn newell_normal_of_square() {
    let square = [Point3::ZERO, Point3::X, Point3::new(1.0, 1.0, 0.0), Point3::Y];
    let n = newell_normal(&square);
    assert_abs_diff_eq!(n.normalize().z, 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(n.length(), 2.0, epsilon = 1e-12);
}

#[test]
fn angle_between_handles_degenerate() {
    assert_abs_diff_eq!(angle_between(Vector3::X, Vector3::Y), std::f64::consts::FRAC_PI_2);
    assert_eq!(angle_between(Vector3::ZERO, Vector3::Y), 0.0);
    assert!(is_undefined(Vector3::new(f64::NAN, 0.0, 0.0)));
    assert!(!is_undefined(Vector3::ONE));
}
