//! Rectangular point grids.
//!
//! Grid points are stored row-major: point `(i, j)` lives at
//! `i * columns + j`. The plain index pattern faces along
//! `row direction × column direction`; the flipped pattern faces the other
//! way. Closing a dimension connects its last row or column back to the
//! first.

use super::{ensure_at_least, MeshBuilder};
use crate::error::{ensure_len, MeshError, MeshResult};
use crate::vector::{Point2, Point3, Vector3};

impl MeshBuilder {
    /// Adds a grid of `points` with `columns` points per row. Texture
    /// coordinates span the unit square and normals are computed from the
    /// faces.
    ///
    /// # Errors
    ///
    /// [`MeshError::Shape`] unless the points form at least a 2 × 2 grid.
    pub fn add_rectangular_mesh(&mut self, points: &[Point3], columns: usize) -> MeshResult<()> {
        self.add_rectangular_mesh_with_texcoords(points, None, columns, false, false)
    }

    /// Adds a grid of `points` with optional explicit texture coordinates
    /// and optional closure in either direction.
    ///
    /// # Errors
    ///
    /// [`MeshError::Shape`] unless the points form at least a 2 × 2 grid, or
    /// if `texcoords` has a different length than `points`.
    pub fn add_rectangular_mesh_with_texcoords(
        &mut self,
        points: &[Point3],
        texcoords: Option<&[Point2]>,
        columns: usize,
        close_rows: bool,
        close_columns: bool,
    ) -> MeshResult<()> {
        let rows = grid_rows(points.len(), columns)?;
        if let Some(uv) = texcoords {
            ensure_len("texcoords", uv.len(), points.len())?;
        }

        let first_vertex = self.positions.len();
        let first_index = self.indices.len();
        let i0 = self.next_index();
        for (k, &p) in points.iter().enumerate() {
            let uv = match texcoords {
                Some(uv) => uv[k],
                None => Point2::new(
                    (k % columns) as f64 / (columns - 1) as f64,
                    (k / columns) as f64 / (rows - 1) as f64,
                ),
            };
            self.add_node(p, Vector3::ZERO, uv);
        }
        self.push_grid(i0, rows, columns, close_rows, close_columns, GridPattern::Plain);
        self.fill_normals(first_vertex, first_index);
        Ok(())
    }

    /// Adds the triangle indices of a `rows` × `columns` grid whose first
    /// vertex is `index0`. Vertices must already exist.
    ///
    /// # Errors
    ///
    /// [`MeshError::Shape`] for fewer than 2 rows or columns, or if the grid
    /// extends past the existing vertices.
    pub fn add_rectangular_mesh_triangle_indices(
        &mut self,
        index0: u32,
        rows: usize,
        columns: usize,
        close_rows: bool,
        close_columns: bool,
    ) -> MeshResult<()> {
        self.check_grid(index0, rows, columns)?;
        self.push_grid(index0, rows, columns, close_rows, close_columns, GridPattern::Plain);
        Ok(())
    }

    /// As [`Self::add_rectangular_mesh_triangle_indices`] with the opposite
    /// winding.
    ///
    /// # Errors
    ///
    /// As [`Self::add_rectangular_mesh_triangle_indices`].
    pub fn add_rectangular_mesh_triangle_indices_flipped(
        &mut self,
        index0: u32,
        rows: usize,
        columns: usize,
        close_rows: bool,
        close_columns: bool,
    ) -> MeshResult<()> {
        self.check_grid(index0, rows, columns)?;
        self.push_grid(index0, rows, columns, close_rows, close_columns, GridPattern::Flipped);
        Ok(())
    }

    fn check_grid(&self, index0: u32, rows: usize, columns: usize) -> MeshResult<()> {
        ensure_at_least("grid rows", rows, 2)?;
        ensure_at_least("grid columns", columns, 2)?;
        let end = index0 as usize + rows * columns;
        if end > self.positions.len() {
            return Err(MeshError::shape(format!(
                "grid ends at vertex {end}, builder has {}",
                self.positions.len()
            )));
        }
        Ok(())
    }

    /// Pushes grid triangles without validation.
    pub(super) fn push_grid(
        &mut self,
        index0: u32,
        rows: usize,
        columns: usize,
        close_rows: bool,
        close_columns: bool,
        pattern: GridPattern,
    ) {
        let row_quads = if close_rows { rows } else { rows - 1 };
        let column_quads = if close_columns { columns } else { columns - 1 };
        let at = |i: usize, j: usize| index0 + ((i % rows) * columns + j % columns) as u32;

        for i in 0..row_quads {
            for j in 0..column_quads {
                let (i00, i01) = (at(i, j), at(i, j + 1));
                let (i10, i11) = (at(i + 1, j), at(i + 1, j + 1));
                match pattern {
                    GridPattern::Plain => {
                        self.push_triangle(i00, i11, i01);
                        self.push_triangle(i11, i00, i10);
                    }
                    GridPattern::Flipped => {
                        self.push_triangle(i00, i01, i11);
                        self.push_triangle(i11, i10, i00);
                    }
                    GridPattern::Spherical => {
                        if i > 0 {
                            self.push_triangle(i00, i11, i01);
                        }
                        if i + 2 < rows {
                            self.push_triangle(i11, i00, i10);
                        }
                    }
                }
            }
        }
    }
}

/// Triangle pattern for [`MeshBuilder::push_grid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum GridPattern {
    Plain,
    Flipped,
    /// Plain, minus the triangles that collapse at the first and last row.
    Spherical,
}

fn grid_rows(len: usize, columns: usize) -> MeshResult<usize> {
    ensure_at_least("grid columns", columns, 2)?;
    if len % columns != 0 {
        return Err(MeshError::shape(format!(
            "grid has {len} points, expected a multiple of {columns} columns"
        )));
    }
    let rows = len / columns;
    ensure_at_least("grid rows", rows, 2)?;
    Ok(rows)
}
