//! # Unit Shape Cache
//!
//! Memoizes the unit circles and unit icospheres that revolution, tube and
//! sphere generators sample over and over. A process-wide instance behind a
//! `Mutex` serves the builder; callers that want isolation can own a
//! [`UnitShapeCache`] directly.

use std::collections::HashMap;
use std::f64::consts::TAU;
use std::sync::{Arc, Mutex, OnceLock};

use crate::mesh::MeshGeometry3D;
use crate::vector::{Point2, Point3};

/// Memoized unit circles and unit spheres.
#[derive(Debug, Default)]
pub struct UnitShapeCache {
    circles: HashMap<(u32, bool), Arc<Vec<Point2>>>,
    spheres: HashMap<u32, Arc<MeshGeometry3D>>,
}

impl UnitShapeCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter-clockwise unit circle starting on +X.
    ///
    /// With `closed` the last point repeats the first, which gives texture
    /// seams their own column.
    pub fn circle(&mut self, divisions: u32, closed: bool) -> Arc<Vec<Point2>> {
        Arc::clone(
            self.circles
                .entry((divisions, closed))
                .or_insert_with(|| Arc::new(generate_circle(divisions, closed))),
        )
    }

    /// Unit icosphere: a regular icosahedron subdivided `subdivisions` times
    /// with every vertex projected onto the sphere. Only positions and
    /// indices are filled.
    pub fn unit_sphere(&mut self, subdivisions: u32) -> Arc<MeshGeometry3D> {
        Arc::clone(
            self.spheres
                .entry(subdivisions)
                .or_insert_with(|| Arc::new(generate_icosphere(subdivisions))),
        )
    }

    /// Number of memoized shapes.
    pub fn len(&self) -> usize {
        self.circles.len() + self.spheres.len()
    }

    /// True if nothing has been memoized yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every memoized shape.
    pub fn clear(&mut self) {
        self.circles.clear();
        self.spheres.clear();
    }
}

fn global() -> &'static Mutex<UnitShapeCache> {
    static CACHE: OnceLock<Mutex<UnitShapeCache>> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(UnitShapeCache::new()))
}

/// Unit circle from the process-wide cache.
pub fn unit_circle(divisions: u32, closed: bool) -> Arc<Vec<Point2>> {
    // The cache holds plain data, so a poisoned lock is still usable.
    let mut cache = global().lock().unwrap_or_else(|e| e.into_inner());
    cache.circle(divisions, closed)
}

/// Unit icosphere from the process-wide cache.
pub fn unit_sphere(subdivisions: u32) -> Arc<MeshGeometry3D> {
    let mut cache = global().lock().unwrap_or_else(|e| e.into_inner());
    cache.unit_sphere(subdivisions)
}

fn generate_circle(divisions: u32, closed: bool) -> Vec<Point2> {
    let steps = if closed {
        divisions.saturating_sub(1).max(1)
    } else {
        divisions.max(1)
    };
    (0..divisions)
        .map(|i| {
            let theta = TAU * f64::from(i) / f64::from(steps);
            Point2::new(theta.cos(), theta.sin())
        })
        .collect()
}

/// Regular icosahedron on the unit sphere, faces counter-clockwise seen from
/// outside.
pub(crate) fn icosahedron() -> (Vec<Point3>, Vec<u32>) {
    let t = (1.0 + 5f64.sqrt()) / 2.0;
    let positions = [
        (-1.0, t, 0.0),
        (1.0, t, 0.0),
        (-1.0, -t, 0.0),
        (1.0, -t, 0.0),
        (0.0, -1.0, t),
        (0.0, 1.0, t),
        (0.0, -1.0, -t),
        (0.0, 1.0, -t),
        (t, 0.0, -1.0),
        (t, 0.0, 1.0),
        (-t, 0.0, -1.0),
        (-t, 0.0, 1.0),
    ]
    .iter()
    .map(|&(x, y, z)| Point3::new(x, y, z).normalize())
    .collect();
    let indices = vec![
        0, 11, 5, 0, 5, 1, 0, 1, 7, 0, 7, 10, 0, 10, 11, //
        1, 5, 9, 5, 11, 4, 11, 10, 2, 10, 7, 6, 7, 1, 8, //
        3, 9, 4, 3, 4, 2, 3, 2, 6, 3, 6, 8, 3, 8, 9, //
        4, 9, 5, 2, 4, 11, 6, 2, 10, 8, 6, 7, 9, 8, 1,
    ];
    (positions, indices)
}

fn generate_icosphere(subdivisions: u32) -> MeshGeometry3D {
    let (mut positions, mut indices) = icosahedron();
    for _ in 0..subdivisions {
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
        let mut next = Vec::with_capacity(indices.len() * 4);
        for t in indices.chunks_exact(3) {
            let mut mid = |a: u32, b: u32| {
                *midpoints.entry((a.min(b), a.max(b))).or_insert_with(|| {
                    let p = (positions[a as usize] + positions[b as usize]).normalize();
                    positions.push(p);
                    (positions.len() - 1) as u32
                })
            };
            let ab = mid(t[0], t[1]);
            let bc = mid(t[1], t[2]);
            let ca = mid(t[2], t[0]);
            next.extend([t[0], ab, ca, t[1], bc, ab, t[2], ca, bc, ab, bc, ca]);
        }
        indices = next;
    }
    MeshGeometry3D::from_positions(positions, indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::triangle_normal;

    #[test]
    fn test_circle_is_memoized() {
        let mut cache = UnitShapeCache::new();
        let a = cache.circle(8, false);
        let b = cache.circle(8, false);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_circle_closed_repeats_first_point() {
        let mut cache = UnitShapeCache::new();
        let open = cache.circle(4, false);
        assert_eq!(open.len(), 4);
        assert!((open[1] - Point2::Y).length() < 1e-12);

        let closed = cache.circle(5, true);
        assert_eq!(closed.len(), 5);
        assert!((closed[4] - closed[0]).length() < 1e-12);
    }

    #[test]
    fn test_icosphere_counts() {
        let mut cache = UnitShapeCache::new();
        let level0 = cache.unit_sphere(0);
        assert_eq!(level0.vertex_count(), 12);
        assert_eq!(level0.triangle_count(), 20);

        let level2 = cache.unit_sphere(2);
        assert_eq!(level2.triangle_count(), 20 * 16);
        // V = 10 * 4^n + 2
        assert_eq!(level2.vertex_count(), 162);
        assert!(level2
            .positions
            .iter()
            .all(|p| (p.length() - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_icosahedron_faces_point_outward() {
        let (positions, indices) = icosahedron();
        for t in indices.chunks_exact(3) {
            let (a, b, c) = (
                positions[t[0] as usize],
                positions[t[1] as usize],
                positions[t[2] as usize],
            );
            let centroid = (a + b + c) / 3.0;
            assert!(triangle_normal(a, b, c).dot(centroid) > 0.0);
        }
    }

    #[test]
    fn test_global_cache_shares_instances() {
        assert!(Arc::ptr_eq(&unit_circle(7, false), &unit_circle(7, false)));
    }
}
