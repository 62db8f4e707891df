//! Regular polyhedra and pyramids.
//!
//! Shapes placed by `forward` and `up` are built in a local frame where
//! forward is +X and up is +Z. Faces are flat shaded and wound
//! counter-clockwise seen from outside.

use std::f64::consts::TAU;

use super::cache::icosahedron;
use super::MeshBuilder;
use crate::error::MeshResult;
use crate::vector::{find_any_perpendicular, newell_normal, Point2, Point3, Vector3};

/// Orthonormal placement frame.
#[derive(Debug, Clone, Copy)]
struct Placement {
    center: Point3,
    forward: Vector3,
    right: Vector3,
    up: Vector3,
}

impl Placement {
    fn new(center: Point3, forward: Vector3, up: Vector3) -> Self {
        let mut forward = forward.normalize_or_zero();
        if forward == Vector3::ZERO {
            forward = Vector3::X;
        }
        let mut up = (up - forward * up.dot(forward)).normalize_or_zero();
        if up == Vector3::ZERO {
            up = find_any_perpendicular(forward);
        }
        Self {
            center,
            forward,
            right: up.cross(forward),
            up,
        }
    }

    /// Maps local `(x, y, z)` to world space.
    fn place(&self, local: Vector3) -> Point3 {
        self.center + self.forward * local.x + self.right * local.y + self.up * local.z
    }
}

impl MeshBuilder {
    /// Adds a regular tetrahedron with edge length `side`.
    pub fn add_tetrahedron(&mut self, center: Point3, forward: Vector3, up: Vector3, side: f64) {
        let frame = Placement::new(center, forward, up);
        let scale = side / (2.0 * 2f64.sqrt());
        let corners: Vec<Point3> = [
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(1.0, -1.0, -1.0),
            Vector3::new(-1.0, 1.0, -1.0),
            Vector3::new(-1.0, -1.0, 1.0),
        ]
        .iter()
        .map(|&v| frame.place(v * scale))
        .collect();

        for [a, b, c] in [[0, 1, 2], [0, 3, 1], [0, 2, 3], [1, 3, 2]] {
            self.add_outward_triangle(center, corners[a], corners[b], corners[c]);
        }
    }

    /// Adds a square pyramid whose base, of edge `side`, is centered at
    /// `center` with the apex `height` along `up`.
    pub fn add_pyramid(
        &mut self,
        center: Point3,
        forward: Vector3,
        up: Vector3,
        side: f64,
        height: f64,
        close_base: bool,
    ) {
        let frame = Placement::new(center, forward, up);
        let base = square(&frame, side);
        let apex = frame.place(Vector3::Z * height);
        for k in 0..4 {
            self.add_outward_triangle(center + frame.up * (height / 4.0), base[k], base[(k + 1) % 4], apex);
        }
        if close_base {
            self.add_quad(base[3], base[2], base[1], base[0]);
        }
    }

    /// Adds an octahedron: a square of edge `side` at `center` with apexes
    /// `height / 2` above and below.
    pub fn add_octahedron(&mut self, center: Point3, forward: Vector3, up: Vector3, side: f64, height: f64) {
        let frame = Placement::new(center, forward, up);
        let base = square(&frame, side);
        let top = frame.place(Vector3::Z * (height / 2.0));
        let bottom = frame.place(-Vector3::Z * (height / 2.0));
        for k in 0..4 {
            let (a, b) = (base[k], base[(k + 1) % 4]);
            self.add_outward_triangle(center, a, b, top);
            self.add_outward_triangle(center, b, a, bottom);
        }
    }

    /// Adds a regular icosahedron inscribed in a sphere of `radius`.
    ///
    /// With `shared_vertices` the 12 corners are shared and carry radial
    /// normals; otherwise every face gets its own flat-shaded vertices.
    pub fn add_regular_icosahedron(&mut self, center: Point3, radius: f64, shared_vertices: bool) {
        let (unit, indices) = icosahedron();
        if shared_vertices {
            let i0 = self.next_index();
            for &p in &unit {
                let uv = Point2::new(0.5 + p.y.atan2(p.x) / TAU, 0.5 - p.z / 2.0);
                self.add_node(center + p * radius, p, uv);
            }
            self.indices.extend(indices.iter().map(|&i| i0 + i));
        } else {
            for t in indices.chunks_exact(3) {
                let [a, b, c] = [t[0], t[1], t[2]].map(|i| center + unit[i as usize] * radius);
                self.add_triangle(a, b, c);
            }
        }
    }

    /// Adds a regular dodecahedron with edge length `side`. The pentagonal
    /// faces go through polygon triangulation.
    ///
    /// # Errors
    ///
    /// Propagates polygon face errors; a regular face never produces one.
    pub fn add_dodecahedron(&mut self, center: Point3, forward: Vector3, up: Vector3, side: f64) -> MeshResult<()> {
        let frame = Placement::new(center, forward, up);
        let phi = (1.0 + 5f64.sqrt()) / 2.0;
        let scale = side * phi / 2.0;
        let corners = dodecahedron_corners(phi);

        for direction in dodecahedron_face_directions(phi) {
            let mut face: Vec<(f64, Vector3)> = corners
                .iter()
                .map(|&c| (c.dot(direction), c))
                .collect();
            face.sort_by(|a, b| b.0.total_cmp(&a.0));
            face.truncate(5);

            let a = find_any_perpendicular(direction);
            let b = direction.normalize().cross(a);
            let mut ring: Vec<(f64, Vector3)> = face
                .into_iter()
                .map(|(_, c)| (c.dot(b).atan2(c.dot(a)), c))
                .collect();
            ring.sort_by(|x, y| x.0.total_cmp(&y.0));

            let points: Vec<Point3> = ring.iter().map(|&(_, c)| frame.place(c * scale)).collect();
            self.add_polygon_by_triangulation(&points)?;
        }
        Ok(())
    }

    /// Adds triangle `(a, b, c)`, reversed if it faces `inside`.
    fn add_outward_triangle(&mut self, inside: Point3, a: Point3, b: Point3, c: Point3) {
        let normal = newell_normal(&[a, b, c]);
        let centroid = (a + b + c) / 3.0;
        if normal.dot(centroid - inside) < 0.0 {
            self.add_triangle(a, c, b);
        } else {
            self.add_triangle(a, b, c);
        }
    }
}

/// Corners of a square of edge `side` in the frame's forward/right plane,
/// counter-clockwise seen from +up.
fn square(frame: &Placement, side: f64) -> [Point3; 4] {
    let h = side / 2.0;
    [
        frame.place(Vector3::new(-h, -h, 0.0)),
        frame.place(Vector3::new(h, -h, 0.0)),
        frame.place(Vector3::new(h, h, 0.0)),
        frame.place(Vector3::new(-h, h, 0.0)),
    ]
}

/// The 20 corners of a dodecahedron with edge `2 / phi`.
fn dodecahedron_corners(phi: f64) -> Vec<Vector3> {
    let inv = 1.0 / phi;
    let mut corners = Vec::with_capacity(20);
    for sx in [-1.0, 1.0] {
        for sy in [-1.0, 1.0] {
            for sz in [-1.0, 1.0] {
                corners.push(Vector3::new(sx, sy, sz));
            }
        }
    }
    for s1 in [-1.0, 1.0] {
        for s2 in [-1.0, 1.0] {
            corners.push(Vector3::new(0.0, s1 * inv, s2 * phi));
            corners.push(Vector3::new(s1 * inv, s2 * phi, 0.0));
            corners.push(Vector3::new(s1 * phi, 0.0, s2 * inv));
        }
    }
    corners
}

/// Face normal directions of [`dodecahedron_corners`].
fn dodecahedron_face_directions(phi: f64) -> Vec<Vector3> {
    let mut directions = Vec::with_capacity(12);
    for s1 in [-1.0, 1.0] {
        for s2 in [-1.0, 1.0] {
            directions.push(Vector3::new(0.0, s1 * phi, s2));
            directions.push(Vector3::new(s1, 0.0, s2 * phi));
            directions.push(Vector3::new(s1 * phi, s2, 0.0));
        }
    }
    directions
}
