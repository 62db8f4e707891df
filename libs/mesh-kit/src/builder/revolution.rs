//! # Surfaces of Revolution
//!
//! A profile is a list of `(distance along axis, radius)` points. Every
//! profile point with a non-zero radius becomes a ring of `theta_div`
//! vertices around the axis; a profile endpoint with zero radius becomes a
//! single axis vertex, so caps close as triangle fans instead of collapsed
//! rings.
//!
//! Spheres and tori are generated on their own parameter grids, except the
//! self-intersecting torus, which is a revolved partial circle.

use std::f64::consts::{PI, TAU};

use config::constants::clamp_divisions;

use super::cache::{unit_circle, unit_sphere};
use super::grid::GridPattern;
use super::MeshBuilder;
use crate::error::{ensure_len, MeshError, MeshResult};
use crate::vector::{find_any_perpendicular, Point2, Point3, Vector3};

impl MeshBuilder {
    // =========================================================================
    // GENERAL REVOLUTION
    // =========================================================================

    /// Revolves `profile` around the axis through `origin` along `direction`.
    ///
    /// `texture_values` gives the v coordinate of each profile point;
    /// without it v runs from 0 to 1 along the profile. Rings are
    /// counter-clockwise seen from the tip of `direction`.
    ///
    /// # Errors
    ///
    /// [`MeshError::Shape`] for fewer than 2 profile points, texture values
    /// of the wrong length or a zero direction.
    pub fn add_revolved_geometry(
        &mut self,
        profile: &[Point2],
        texture_values: Option<&[f64]>,
        origin: Point3,
        direction: Vector3,
        theta_div: u32,
    ) -> MeshResult<()> {
        super::ensure_at_least("profile points", profile.len(), 2)?;
        if let Some(values) = texture_values {
            ensure_len("texture values", values.len(), profile.len())?;
        }
        if direction.length_squared() <= self.config.tolerance * self.config.tolerance {
            return Err(MeshError::shape("revolution axis has zero length"));
        }
        self.revolve_profile(profile, texture_values, origin, direction, clamp_divisions(theta_div));
        Ok(())
    }

    /// Revolves a validated profile.
    fn revolve_profile(
        &mut self,
        profile: &[Point2],
        texture_values: Option<&[f64]>,
        origin: Point3,
        direction: Vector3,
        theta_div: u32,
    ) {
        let axis = direction.normalize();
        let u = find_any_perpendicular(axis);
        let v = axis.cross(u);
        let circle = unit_circle(theta_div, false);
        let spokes: Vec<Vector3> = circle.iter().map(|c| u * c.x + v * c.y).collect();

        let n = profile.len();
        let eps = self.config.tolerance;
        let segment_normal = |k: usize| {
            let t = profile[k + 1] - profile[k];
            Point2::new(-t.y, t.x).normalize_or_zero()
        };

        // First vertex of each profile point and whether it is a single
        // axis vertex.
        let mut slots: Vec<(u32, bool)> = Vec::with_capacity(n);
        for (k, &p) in profile.iter().enumerate() {
            let tv = match texture_values {
                Some(values) => values[k],
                None => k as f64 / (n - 1) as f64,
            };
            let n2 = match k {
                0 => segment_normal(0),
                k if k == n - 1 => segment_normal(n - 2),
                k => (segment_normal(k - 1) + segment_normal(k)).normalize_or_zero(),
            };
            let center = origin + axis * p.x;
            let on_axis = (k == 0 || k == n - 1) && p.y.abs() <= eps;

            if on_axis {
                let normal = if n2.x.abs() <= eps { Vector3::ZERO } else { axis * n2.x.signum() };
                let index = self.add_node(center, normal, Point2::new(0.5, tv));
                slots.push((index, true));
                continue;
            }
            let first = self.next_index();
            for (i, &w) in spokes.iter().enumerate() {
                let normal = (axis * n2.x + w * n2.y).normalize_or_zero();
                let uv = Point2::new(i as f64 / theta_div as f64, tv);
                self.add_node(center + w * p.y, normal, uv);
            }
            slots.push((first, false));
        }

        for pair in slots.windows(2) {
            let ((a, a_axis), (b, b_axis)) = (pair[0], pair[1]);
            for i in 0..theta_div {
                let i1 = (i + 1) % theta_div;
                match (a_axis, b_axis) {
                    (false, false) => {
                        self.push_triangle(a + i, a + i1, b + i1);
                        self.push_triangle(a + i, b + i1, b + i);
                    }
                    (true, false) => self.push_triangle(a, b + i1, b + i),
                    (false, true) => self.push_triangle(a + i, a + i1, b),
                    (true, true) => {}
                }
            }
        }
    }

    // =========================================================================
    // CONES, CYLINDERS, PIPES, ARROWS
    // =========================================================================

    /// Adds a truncated cone from `origin` along `direction`. A zero top
    /// radius closes to an apex.
    #[allow(clippy::too_many_arguments)]
    pub fn add_cone(
        &mut self,
        origin: Point3,
        direction: Vector3,
        base_radius: f64,
        top_radius: f64,
        height: f64,
        base_cap: bool,
        top_cap: bool,
        theta_div: u32,
    ) {
        let mut profile = Vec::with_capacity(4);
        let mut values = Vec::with_capacity(4);
        if base_cap {
            profile.push(Point2::new(0.0, 0.0));
            values.push(0.0);
        }
        profile.push(Point2::new(0.0, base_radius));
        values.push(1.0);
        profile.push(Point2::new(height, top_radius));
        values.push(0.0);
        if top_cap {
            profile.push(Point2::new(height, 0.0));
            values.push(1.0);
        }
        self.revolve_or_skip(&profile, &values, origin, direction, theta_div);
    }

    /// Adds a cone with its base centered at `origin` and its tip at `apex`.
    pub fn add_cone_to_apex(
        &mut self,
        origin: Point3,
        apex: Point3,
        base_radius: f64,
        base_cap: bool,
        theta_div: u32,
    ) {
        let axis = apex - origin;
        self.add_cone(origin, axis, base_radius, 0.0, axis.length(), base_cap, false, theta_div);
    }

    /// Adds a cylinder from `p1` to `p2`.
    pub fn add_cylinder(
        &mut self,
        p1: Point3,
        p2: Point3,
        diameter: f64,
        theta_div: u32,
        cap1: bool,
        cap2: bool,
    ) {
        let axis = p2 - p1;
        let r = diameter / 2.0;
        self.add_cone(p1, axis, r, r, axis.length(), cap1, cap2, theta_div);
    }

    /// Adds a hollow pipe from `p1` to `p2`. With a zero inner diameter the
    /// result is a capped cylinder.
    pub fn add_pipe(&mut self, p1: Point3, p2: Point3, inner_diameter: f64, diameter: f64, theta_div: u32) {
        let axis = p2 - p1;
        let length = axis.length();
        let (ri, ro) = (inner_diameter / 2.0, diameter / 2.0);

        let mut profile = vec![
            Point2::new(0.0, ri),
            Point2::new(0.0, ro),
            Point2::new(length, ro),
            Point2::new(length, ri),
        ];
        let mut values = vec![1.0, 0.0, 1.0, 0.0];
        if inner_diameter > 0.0 {
            profile.push(Point2::new(0.0, ri));
            values.push(1.0);
        }
        self.revolve_or_skip(&profile, &values, p1, axis, theta_div);
    }

    /// Adds an arrow from `p1` to `p2`: a shaft of `diameter` and a head of
    /// twice that width, `head_length` diameters long.
    pub fn add_arrow(&mut self, p1: Point3, p2: Point3, diameter: f64, head_length: f64, theta_div: u32) {
        let axis = p2 - p1;
        let length = axis.length();
        let r = diameter / 2.0;
        let neck = (length - diameter * head_length).max(0.0);
        let profile = [
            Point2::new(0.0, 0.0),
            Point2::new(0.0, r),
            Point2::new(neck, r),
            Point2::new(neck, 2.0 * r),
            Point2::new(length, 0.0),
        ];
        self.revolve_or_skip(&profile, &[0.0, 0.25, 0.5, 0.75, 1.0], p1, axis, theta_div);
    }

    fn revolve_or_skip(
        &mut self,
        profile: &[Point2],
        values: &[f64],
        origin: Point3,
        direction: Vector3,
        theta_div: u32,
    ) {
        if direction.length_squared() <= self.config.tolerance * self.config.tolerance {
            log::warn!("skipping revolved shape with a zero-length axis");
            return;
        }
        self.revolve_profile(profile, Some(values), origin, direction, clamp_divisions(theta_div));
    }

    // =========================================================================
    // TORUS
    // =========================================================================

    /// Adds a torus around the Z axis through the origin. `torus_diameter`
    /// is measured through the tube centers.
    ///
    /// When the tube is wider than the torus, the surface is cut where it
    /// would pass through the axis and closed there by single axis vertices.
    pub fn add_torus(&mut self, torus_diameter: f64, tube_diameter: f64, theta_div: u32, phi_div: u32) {
        let theta_div = clamp_divisions(theta_div);
        let phi_div = clamp_divisions(phi_div);
        let big = torus_diameter / 2.0;
        let small = tube_diameter / 2.0;

        if tube_diameter > torus_diameter {
            self.add_self_intersecting_torus(big, small, theta_div, phi_div);
            return;
        }

        let i0 = self.next_index();
        for i in 0..theta_div {
            let theta = TAU * f64::from(i) / f64::from(theta_div);
            let spoke = Vector3::new(theta.cos(), theta.sin(), 0.0);
            for j in 0..phi_div {
                let phi = TAU * f64::from(j) / f64::from(phi_div);
                let normal = spoke * phi.cos() + Vector3::Z * phi.sin();
                let position = spoke * big + normal * small;
                let uv = Point2::new(
                    f64::from(i) / f64::from(theta_div),
                    f64::from(j) / f64::from(phi_div),
                );
                self.add_node(position, normal, uv);
            }
        }
        self.push_grid(i0, theta_div as usize, phi_div as usize, true, true, GridPattern::Plain);
    }

    fn add_self_intersecting_torus(&mut self, big: f64, small: f64, theta_div: u32, phi_div: u32) {
        let phi_max = (-big / small).clamp(-1.0, 1.0).acos();
        let profile: Vec<Point2> = (0..=phi_div)
            .map(|j| {
                let phi = -phi_max + 2.0 * phi_max * f64::from(j) / f64::from(phi_div);
                let radius = if j == 0 || j == phi_div { 0.0 } else { big + small * phi.cos() };
                Point2::new(small * phi.sin(), radius)
            })
            .collect();
        self.revolve_profile(&profile, None, Point3::ZERO, Vector3::Z, theta_div);
    }

    // =========================================================================
    // SPHERES
    // =========================================================================

    /// Adds an axis-aligned ellipsoid. Texture u follows the azimuth, v runs
    /// from the +Z pole to the -Z pole.
    pub fn add_ellipsoid(
        &mut self,
        center: Point3,
        radius_x: f64,
        radius_y: f64,
        radius_z: f64,
        theta_div: u32,
        phi_div: u32,
    ) {
        let theta_div = clamp_divisions(theta_div);
        let phi_div = clamp_divisions(phi_div);
        let radii = Vector3::new(radius_x, radius_y, radius_z);
        let inverse = Vector3::new(
            safe_recip(radius_x),
            safe_recip(radius_y),
            safe_recip(radius_z),
        );

        let i0 = self.next_index();
        for i in 0..=phi_div {
            let phi = PI * f64::from(i) / f64::from(phi_div);
            for j in 0..=theta_div {
                let theta = TAU * f64::from(j) / f64::from(theta_div);
                let unit = Vector3::new(theta.cos() * phi.sin(), theta.sin() * phi.sin(), phi.cos());
                let normal = (unit * inverse).normalize_or_zero();
                let uv = Point2::new(
                    f64::from(j) / f64::from(theta_div),
                    f64::from(i) / f64::from(phi_div),
                );
                self.add_node(center + unit * radii, normal, uv);
            }
        }
        self.push_grid(
            i0,
            phi_div as usize + 1,
            theta_div as usize + 1,
            false,
            false,
            GridPattern::Spherical,
        );
    }

    /// Adds a UV sphere.
    pub fn add_sphere(&mut self, center: Point3, radius: f64, theta_div: u32, phi_div: u32) {
        self.add_ellipsoid(center, radius, radius, radius, theta_div, phi_div);
    }

    /// Adds a UV sphere at the configured default resolution.
    pub fn add_default_sphere(&mut self, center: Point3, radius: f64) {
        let (theta_div, phi_div) = (self.config.theta_div, self.config.phi_div);
        self.add_sphere(center, radius, theta_div, phi_div);
    }

    /// Adds a capped cylinder at the configured default resolution.
    pub fn add_default_cylinder(&mut self, p1: Point3, p2: Point3, diameter: f64) {
        let theta_div = self.config.theta_div;
        self.add_cylinder(p1, p2, diameter, theta_div, true, true);
    }

    /// Adds a sphere made from a subdivided icosahedron. Every vertex is
    /// shared, so the texture seam is stretched.
    pub fn add_subdivision_sphere(&mut self, center: Point3, radius: f64, subdivisions: u32) {
        let unit = unit_sphere(subdivisions);
        let i0 = self.next_index();
        for &p in &unit.positions {
            let uv = Point2::new(0.5 + p.y.atan2(p.x) / TAU, p.z.clamp(-1.0, 1.0).acos() / PI);
            self.add_node(center + p * radius, p, uv);
        }
        self.indices.extend(unit.indices.iter().map(|&i| i0 + i));
    }
}

fn safe_recip(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value.recip()
    }
}
