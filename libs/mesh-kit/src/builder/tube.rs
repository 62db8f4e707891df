//! # Tubes
//!
//! Sweeps a 2D cross-section along a 3D path. Each path point carries a
//! frame `(right, up, forward)`: forward follows the path, right and up are
//! carried over from the previous point so the section does not twist.
//! Section point `(x, y)` lands at `path[i] + right * x * r + up * y * r`
//! with `r` half the diameter at that point.

use config::constants::clamp_divisions;
use log::warn;

use super::cache::unit_circle;
use super::grid::GridPattern;
use super::{ensure_at_least, MeshBuilder};
use crate::error::{ensure_len, MeshResult};
use crate::triangulate;
use crate::vector::{find_any_perpendicular, Point2, Point3, Vector3};

/// Closure and capping switches for [`MeshBuilder::add_tube`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TubeOptions {
    /// Connect the last path point back to the first.
    pub tube_closed: bool,
    /// Connect the last section point back to the first.
    pub section_closed: bool,
    /// Fill the section at the first path point.
    pub front_cap: bool,
    /// Fill the section at the last path point.
    pub back_cap: bool,
}

impl Default for TubeOptions {
    fn default() -> Self {
        Self {
            tube_closed: false,
            section_closed: true,
            front_cap: false,
            back_cap: false,
        }
    }
}

impl TubeOptions {
    /// Closed section with both ends capped.
    pub fn capped() -> Self {
        Self {
            front_cap: true,
            back_cap: true,
            ..Self::default()
        }
    }

    /// Sets whether the path wraps around.
    pub fn with_tube_closed(mut self, closed: bool) -> Self {
        self.tube_closed = closed;
        self
    }

    /// Sets whether the section wraps around.
    pub fn with_section_closed(mut self, closed: bool) -> Self {
        self.section_closed = closed;
        self
    }

    /// Sets both end caps.
    pub fn with_caps(mut self, front: bool, back: bool) -> Self {
        self.front_cap = front;
        self.back_cap = back;
        self
    }
}

/// Section frame at one path point.
#[derive(Debug, Clone, Copy)]
struct Frame {
    right: Vector3,
    up: Vector3,
    forward: Vector3,
}

impl MeshBuilder {
    /// Sweeps `section` along `path`.
    ///
    /// `values` sets the texture u coordinate per path point (default
    /// `i / (n - 1)`), `diameters` the section scale per path point (default
    /// 2, so the section is used as given). Texture v runs along the section.
    /// A counter-clockwise section yields outward faces.
    ///
    /// # Errors
    ///
    /// [`MeshError::Shape`](crate::MeshError::Shape) for fewer than 2 path or
    /// section points, or if `values` or `diameters` differ in length from
    /// `path`.
    pub fn add_tube(
        &mut self,
        path: &[Point3],
        values: Option<&[f64]>,
        diameters: Option<&[f64]>,
        section: &[Point2],
        options: &TubeOptions,
    ) -> MeshResult<()> {
        ensure_at_least("tube path", path.len(), 2)?;
        ensure_at_least("tube section", section.len(), 2)?;
        if let Some(values) = values {
            ensure_len("tube values", values.len(), path.len())?;
        }
        if let Some(diameters) = diameters {
            ensure_len("tube diameters", diameters.len(), path.len())?;
        }

        let frames = self.path_frames(path, options.tube_closed);
        let n = path.len();
        let m = section.len();
        let i0 = self.next_index();

        for (i, (&p, frame)) in path.iter().zip(&frames).enumerate() {
            let r = diameters.map_or(1.0, |d| d[i] / 2.0);
            let u = values.map_or(i as f64 / (n - 1) as f64, |v| v[i]);
            for (j, s) in section.iter().enumerate() {
                let w = frame.right * s.x + frame.up * s.y;
                let v = j as f64 / (m - 1) as f64;
                self.add_node(p + w * r, w.normalize_or_zero(), Point2::new(u, v));
            }
        }
        self.push_grid(
            i0,
            n,
            m,
            options.tube_closed,
            options.section_closed,
            GridPattern::Flipped,
        );

        if options.front_cap {
            let r = diameters.map_or(1.0, |d| d[0] / 2.0);
            self.add_tube_cap(path[0], &frames[0], r, section, true);
        }
        if options.back_cap {
            let r = diameters.map_or(1.0, |d| d[n - 1] / 2.0);
            self.add_tube_cap(path[n - 1], &frames[n - 1], r, section, false);
        }
        Ok(())
    }

    /// Sweeps a circle of `diameter` along `path`.
    ///
    /// # Errors
    ///
    /// [`MeshError::Shape`](crate::MeshError::Shape) for fewer than 2 path
    /// points.
    pub fn add_tube_with_diameter(
        &mut self,
        path: &[Point3],
        diameter: f64,
        theta_div: u32,
        options: &TubeOptions,
    ) -> MeshResult<()> {
        let circle = unit_circle(clamp_divisions(theta_div), false);
        let section: Vec<Point2> = circle.iter().map(|c| *c * (diameter / 2.0)).collect();
        let options = options.with_section_closed(true);
        self.add_tube(path, None, None, &section, &options)
    }

    fn path_frames(&self, path: &[Point3], closed: bool) -> Vec<Frame> {
        let n = path.len();
        let eps = self.config.tolerance;
        let mut frames: Vec<Frame> = Vec::with_capacity(n);

        for i in 0..n {
            let (before, after) = match (i, closed) {
                (0, true) => (path[n - 1], path[1]),
                (0, false) => (path[0], path[1]),
                (i, true) if i == n - 1 => (path[i - 1], path[0]),
                (i, false) if i == n - 1 => (path[i - 1], path[i]),
                (i, _) => (path[i - 1], path[i + 1]),
            };
            let mut forward = (after - before).normalize_or_zero();
            let previous = frames.last().copied();
            if forward == Vector3::ZERO {
                forward = previous.map_or(Vector3::Z, |f| f.forward);
            }

            let frame = match previous {
                None => {
                    let right = find_any_perpendicular(forward);
                    Frame {
                        right,
                        up: forward.cross(right),
                        forward,
                    }
                }
                Some(prev) => {
                    let right = prev.up.cross(forward);
                    if right.length() <= eps {
                        warn!("tube path point {i} has a degenerate frame, reusing the previous one");
                        Frame {
                            right: prev.right,
                            up: forward.cross(prev.right).normalize_or_zero(),
                            forward,
                        }
                    } else {
                        let right = right.normalize();
                        Frame {
                            right,
                            up: forward.cross(right),
                            forward,
                        }
                    }
                }
            };
            frames.push(frame);
        }
        frames
    }

    fn add_tube_cap(&mut self, center: Point3, frame: &Frame, r: f64, section: &[Point2], front: bool) {
        let Some(local) = triangulate::triangulate(section, &[]) else {
            warn!("skipping tube cap: section has no triangulation");
            return;
        };
        let normal = if front { -frame.forward } else { frame.forward };

        let i0 = self.next_index();
        for s in section {
            let p = center + (frame.right * s.x + frame.up * s.y) * r;
            self.add_node(p, normal, *s);
        }
        // Triangulated sections are counter-clockwise, facing +forward.
        for t in local.chunks_exact(3) {
            if front {
                self.push_triangle(i0 + t[0], i0 + t[2], i0 + t[1]);
            } else {
                self.push_triangle(i0 + t[0], i0 + t[1], i0 + t[2]);
            }
        }
    }
}
