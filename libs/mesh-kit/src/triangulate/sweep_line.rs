//! # Sweep-Line Triangulation
//!
//! Triangulates simple polygons (optionally with holes) in three phases:
//!
//! 1. **Classification**: every vertex is a start, end, split, merge or
//!    regular vertex relative to the sweep order (descending y, ascending x)
//! 2. **Sweep**: a status list of active left-boundary edges with helper
//!    vertices yields the diagonals that remove split and merge vertices
//! 3. **Monotone split + triangulation**: the polygon edges plus diagonals are
//!    walked into y-monotone faces, each triangulated with the two-chain
//!    stack algorithm
//!
//! The outer loop is processed counter-clockwise and holes clockwise, so the
//! interior always lies to the left of a directed boundary edge. Loops with
//! the other winding are reversed internally and the output indices are
//! mapped back to the caller's numbering.
//!
//! ## Fragility
//!
//! Input is not validated. Self-intersecting loops or holes touching the
//! outer boundary may produce overlapping triangles instead of `None`.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};
use std::f64::consts::TAU;

use config::constants::TRIANGULATION_EPSILON;
use log::trace;

use crate::vector::{orient2d, signed_area, Point2};

// =============================================================================
// PUBLIC API
// =============================================================================

/// Triangulates `outer` with optional `holes`.
///
/// Returned indices address the concatenation of `outer` followed by each
/// hole in order, exactly as passed in. Triangles are counter-clockwise in
/// the 2D plane regardless of the input winding.
///
/// Returns `None` for fewer than three distinct outer points or when the
/// sweep reaches an inconsistent state.
///
/// # Example
///
/// ```rust
/// use mesh_kit::triangulate::sweep_line;
/// use mesh_kit::Point2;
///
/// let square = [
///     Point2::new(0.0, 0.0),
///     Point2::new(1.0, 0.0),
///     Point2::new(1.0, 1.0),
///     Point2::new(0.0, 1.0),
/// ];
/// let indices = sweep_line::triangulate(&square, &[]).unwrap();
/// assert_eq!(indices.len(), 6);
/// ```
pub fn triangulate(outer: &[Point2], holes: &[Vec<Point2>]) -> Option<Vec<u32>> {
    let mut polygon = SweepPolygon::default();
    if !polygon.push_loop(outer, 0, true) {
        return None;
    }

    if polygon.len() == 3 && holes.is_empty() {
        return Some(polygon.original.clone());
    }

    let mut offset = outer.len() as u32;
    for hole in holes {
        // Holes that collapse to fewer than three points contribute nothing.
        polygon.push_loop(hole, offset, false);
        offset += hole.len() as u32;
    }

    polygon.classify();
    let diagonals = polygon.sweep()?;
    trace!(
        "sweep line: {} vertices, {} diagonals",
        polygon.len(),
        diagonals.len()
    );

    let faces = polygon.monotone_faces(&diagonals)?;
    trace!("sweep line: {} monotone pieces", faces.len());

    let mut indices = Vec::with_capacity(3 * polygon.len());
    for face in &faces {
        polygon.triangulate_monotone(face, &mut indices);
    }
    Some(indices)
}

// =============================================================================
// VERTEX CLASSIFICATION
// =============================================================================

/// Role of a vertex relative to the sweep direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VertexKind {
    /// Both neighbours below, interior angle convex.
    Start,
    /// Both neighbours above, interior angle convex.
    End,
    /// Both neighbours below, interior angle reflex.
    Split,
    /// Both neighbours above, interior angle reflex.
    Merge,
    /// One neighbour above, one below.
    Regular,
}

/// Sweep order: `a` comes before `b` if it is higher, or level and further left.
#[inline]
pub(crate) fn is_above(a: Point2, b: Point2) -> bool {
    a.y > b.y || (a.y == b.y && a.x < b.x)
}

fn sweep_order(a: Point2, b: Point2) -> Ordering {
    b.y.total_cmp(&a.y).then_with(|| a.x.total_cmp(&b.x))
}

pub(crate) fn classify_vertex(prev: Point2, vertex: Point2, next: Point2) -> VertexKind {
    let prev_above = is_above(prev, vertex);
    let next_above = is_above(next, vertex);
    let convex = orient2d(prev, vertex, next) > 0.0;
    match (prev_above, next_above) {
        (false, false) if convex => VertexKind::Start,
        (false, false) => VertexKind::Split,
        (true, true) if convex => VertexKind::End,
        (true, true) => VertexKind::Merge,
        _ => VertexKind::Regular,
    }
}

// =============================================================================
// SWEEP POLYGON
// =============================================================================

/// Status entry: the edge starting at `edge` (towards `next[edge]`) and its helper.
#[derive(Debug, Clone, Copy)]
struct StatusEdge {
    edge: usize,
    helper: usize,
}

/// All loops flattened into one vertex arena with ring links.
#[derive(Debug, Default)]
struct SweepPolygon {
    points: Vec<Point2>,
    original: Vec<u32>,
    next: Vec<usize>,
    prev: Vec<usize>,
    kinds: Vec<VertexKind>,
}

impl SweepPolygon {
    fn len(&self) -> usize {
        self.points.len()
    }

    /// Appends one loop, dropping repeated consecutive points and a closing
    /// duplicate. The outer loop is oriented counter-clockwise, holes
    /// clockwise. Returns false when fewer than three points remain.
    fn push_loop(&mut self, points: &[Point2], offset: u32, outer: bool) -> bool {
        let mut kept: Vec<(Point2, u32)> = Vec::with_capacity(points.len());
        for (i, p) in points.iter().enumerate() {
            if kept.last().map_or(true, |(q, _)| q != p) {
                kept.push((*p, offset + i as u32));
            }
        }
        while kept.len() > 1 && kept.first().map(|k| k.0) == kept.last().map(|k| k.0) {
            kept.pop();
        }
        if kept.len() < 3 {
            return false;
        }

        let loop_points: Vec<Point2> = kept.iter().map(|k| k.0).collect();
        let area = signed_area(&loop_points);
        let reverse = if outer { area <= 0.0 } else { area > 0.0 };
        if reverse {
            kept.reverse();
        }

        let base = self.points.len();
        let n = kept.len();
        for (i, (p, original)) in kept.into_iter().enumerate() {
            self.points.push(p);
            self.original.push(original);
            self.next.push(base + (i + 1) % n);
            self.prev.push(base + (i + n - 1) % n);
        }
        true
    }

    fn classify(&mut self) {
        self.kinds = (0..self.len())
            .map(|v| {
                classify_vertex(
                    self.points[self.prev[v]],
                    self.points[v],
                    self.points[self.next[v]],
                )
            })
            .collect();
    }

    // =========================================================================
    // SWEEP
    // =========================================================================

    /// Runs the downward sweep and returns the de-duplicated diagonals.
    ///
    /// Merge vertices are handled in the same pass: a merge vertex becomes the
    /// helper of the edge to its left and receives its diagonal when a later
    /// event replaces that helper or ends the edge.
    fn sweep(&self) -> Option<BTreeSet<(usize, usize)>> {
        let mut events: Vec<usize> = (0..self.len()).collect();
        events.sort_by(|&a, &b| sweep_order(self.points[a], self.points[b]));

        let mut status: Vec<StatusEdge> = Vec::new();
        let mut diagonals = BTreeSet::new();
        let mut add_diagonal = |a: usize, b: usize| {
            if a != b {
                diagonals.insert((a.min(b), a.max(b)));
            }
        };

        for v in events {
            match self.kinds[v] {
                VertexKind::Start => {
                    status.push(StatusEdge { edge: v, helper: v });
                }
                VertexKind::End => {
                    let slot = self.status_slot(&status, self.prev[v])?;
                    let helper = status[slot].helper;
                    if self.kinds[helper] == VertexKind::Merge {
                        add_diagonal(v, helper);
                    }
                    status.remove(slot);
                }
                VertexKind::Split => {
                    let left = self.left_edge(&status, v)?;
                    add_diagonal(v, status[left].helper);
                    status[left].helper = v;
                    status.push(StatusEdge { edge: v, helper: v });
                }
                VertexKind::Merge => {
                    let slot = self.status_slot(&status, self.prev[v])?;
                    let helper = status[slot].helper;
                    if self.kinds[helper] == VertexKind::Merge {
                        add_diagonal(v, helper);
                    }
                    status.remove(slot);

                    let left = self.left_edge(&status, v)?;
                    let helper = status[left].helper;
                    if self.kinds[helper] == VertexKind::Merge {
                        add_diagonal(v, helper);
                    }
                    status[left].helper = v;
                }
                VertexKind::Regular => {
                    if is_above(self.points[self.prev[v]], self.points[v]) {
                        // Left boundary: the interior lies to the right of v.
                        let slot = self.status_slot(&status, self.prev[v])?;
                        let helper = status[slot].helper;
                        if self.kinds[helper] == VertexKind::Merge {
                            add_diagonal(v, helper);
                        }
                        status.remove(slot);
                        status.push(StatusEdge { edge: v, helper: v });
                    } else {
                        let left = self.left_edge(&status, v)?;
                        let helper = status[left].helper;
                        if self.kinds[helper] == VertexKind::Merge {
                            add_diagonal(v, helper);
                        }
                        status[left].helper = v;
                    }
                }
            }
        }

        Some(diagonals)
    }

    fn status_slot(&self, status: &[StatusEdge], edge: usize) -> Option<usize> {
        status.iter().position(|s| s.edge == edge)
    }

    /// Status entry of the edge directly left of `v` on the sweep line.
    fn left_edge(&self, status: &[StatusEdge], v: usize) -> Option<usize> {
        let p = self.points[v];
        let mut best: Option<(usize, f64)> = None;
        for (slot, s) in status.iter().enumerate() {
            let x = self.edge_x_at(s.edge, p.y);
            if x <= p.x + TRIANGULATION_EPSILON && best.map_or(true, |(_, bx)| x > bx) {
                best = Some((slot, x));
            }
        }
        best.map(|(slot, _)| slot)
    }

    /// X coordinate where the edge `edge -> next[edge]` crosses height `y`.
    fn edge_x_at(&self, edge: usize, y: f64) -> f64 {
        let a = self.points[edge];
        let b = self.points[self.next[edge]];
        let dy = b.y - a.y;
        if dy.abs() < TRIANGULATION_EPSILON {
            return a.x.max(b.x);
        }
        let t = ((y - a.y) / dy).clamp(0.0, 1.0);
        a.x + t * (b.x - a.x)
    }

    // =========================================================================
    // MONOTONE DECOMPOSITION
    // =========================================================================

    /// Splits the polygon along `diagonals` into faces, each listed
    /// counter-clockwise.
    ///
    /// Boundary edges are walked in loop direction and diagonals in both
    /// directions. At each vertex the walk takes the outgoing edge with the
    /// smallest counter-clockwise angle to the edge it arrived on, which keeps
    /// the current face on the left.
    fn monotone_faces(&self, diagonals: &BTreeSet<(usize, usize)>) -> Option<Vec<Vec<usize>>> {
        let n = self.len();
        let mut outgoing: Vec<Vec<usize>> = (0..n).map(|v| vec![self.next[v]]).collect();
        for &(a, b) in diagonals {
            outgoing[a].push(b);
            outgoing[b].push(a);
        }
        let half_edges = n + 2 * diagonals.len();

        let mut used: HashSet<(usize, usize)> = HashSet::with_capacity(half_edges);
        let mut faces = Vec::new();
        for start in 0..n {
            for &end in &outgoing[start] {
                if used.contains(&(start, end)) {
                    continue;
                }
                let face = self.trace_face(start, end, &outgoing, &mut used, half_edges)?;
                faces.push(face);
            }
        }
        Some(faces)
    }

    fn trace_face(
        &self,
        start: usize,
        end: usize,
        outgoing: &[Vec<usize>],
        used: &mut HashSet<(usize, usize)>,
        limit: usize,
    ) -> Option<Vec<usize>> {
        let mut face = Vec::new();
        let (mut a, mut b) = (start, end);
        for _ in 0..=limit {
            used.insert((a, b));
            face.push(a);
            let c = self.next_on_face(a, b, outgoing)?;
            a = b;
            b = c;
            if (a, b) == (start, end) {
                return Some(face);
            }
        }
        None
    }

    fn next_on_face(&self, from: usize, at: usize, outgoing: &[Vec<usize>]) -> Option<usize> {
        let origin = self.points[at];
        let back = self.points[from] - origin;
        let back_angle = back.y.atan2(back.x);

        let mut best: Option<(usize, f64)> = None;
        for &candidate in &outgoing[at] {
            if candidate == from && outgoing[at].len() > 1 {
                continue;
            }
            let dir = self.points[candidate] - origin;
            let mut turn = back_angle - dir.y.atan2(dir.x);
            while turn <= 0.0 {
                turn += TAU;
            }
            while turn > TAU {
                turn -= TAU;
            }
            if best.map_or(true, |(_, t)| turn < t) {
                best = Some((candidate, turn));
            }
        }
        best.map(|(v, _)| v)
    }

    // =========================================================================
    // MONOTONE TRIANGULATION
    // =========================================================================

    /// Triangulates one y-monotone face with the two-chain stack algorithm,
    /// appending original indices to `out`.
    fn triangulate_monotone(&self, face: &[usize], out: &mut Vec<u32>) {
        let m = face.len();
        if m < 3 {
            return;
        }
        if m == 3 {
            self.emit(face[0], face[1], face[2], out);
            return;
        }

        let mut order: Vec<usize> = (0..m).collect();
        order.sort_by(|&a, &b| sweep_order(self.points[face[a]], self.points[face[b]]));
        let top = order[0];
        let bottom = order[m - 1];

        // Walking counter-clockwise from the top descends the left chain.
        let mut on_left = vec![false; m];
        let mut k = top;
        while k != bottom {
            on_left[k] = true;
            k = (k + 1) % m;
        }

        let mut stack: Vec<usize> = vec![order[0], order[1]];
        for &current in &order[2..m - 1] {
            let top_of_stack = stack[stack.len() - 1];
            if on_left[current] != on_left[top_of_stack] {
                for pair in stack.windows(2) {
                    self.emit(face[current], face[pair[0]], face[pair[1]], out);
                }
                stack.clear();
                stack.push(top_of_stack);
                stack.push(current);
            } else {
                let Some(mut last) = stack.pop() else {
                    continue;
                };
                while let Some(&candidate) = stack.last() {
                    let turn = orient2d(
                        self.points[face[candidate]],
                        self.points[face[last]],
                        self.points[face[current]],
                    );
                    let inside = if on_left[current] {
                        turn > TRIANGULATION_EPSILON
                    } else {
                        turn < -TRIANGULATION_EPSILON
                    };
                    if !inside {
                        break;
                    }
                    self.emit(face[current], face[last], face[candidate], out);
                    last = candidate;
                    stack.pop();
                }
                stack.push(last);
                stack.push(current);
            }
        }

        let lowest = order[m - 1];
        for pair in stack.windows(2) {
            self.emit(face[lowest], face[pair[0]], face[pair[1]], out);
        }
    }

    /// Pushes a counter-clockwise triangle in original numbering.
    fn emit(&self, a: usize, b: usize, c: usize, out: &mut Vec<u32>) {
        let (b, c) = if orient2d(self.points[a], self.points[b], self.points[c]) < 0.0 {
            (c, b)
        } else {
            (b, c)
        };
        out.extend([self.original[a], self.original[b], self.original[c]]);
    }
}
