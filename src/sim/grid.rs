//! Uniform grid broad phase
//!
//! The arena is split into a fixed `rows x columns` grid. Each step every
//! body is dropped into every cell its bounding-circle box overlaps, and
//! only bodies sharing a cell are tested against each other.

use crate::error::{SimError, SimResult};

use super::body::Body;

/// Fixed grid of body-index buckets covering the arena
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    columns: usize,
    rows: usize,
    column_width: f64,
    row_height: f64,
    /// Row-major: cell (row, col) lives at `row * columns + col`
    cells: Vec<Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(width: f64, height: f64, columns: usize, rows: usize) -> SimResult<Self> {
        if columns == 0 || rows == 0 {
            return Err(SimError::InvalidConfig {
                reason: "grid needs at least one row and one column",
            });
        }
        if !(width > 0.0 && height > 0.0) {
            return Err(SimError::InvalidConfig {
                reason: "grid bounds must be positive",
            });
        }
        Ok(Self {
            columns,
            rows,
            column_width: width / columns as f64,
            row_height: height / rows as f64,
            cells: vec![Vec::new(); columns * rows],
        })
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// All buckets, row-major
    #[inline]
    pub fn cells(&self) -> &[Vec<usize>] {
        &self.cells
    }

    /// Bucket at (row, col)
    pub fn cell(&self, row: usize, col: usize) -> Option<&[usize]> {
        if row >= self.rows || col >= self.columns {
            return None;
        }
        Some(&self.cells[row * self.columns + col])
    }

    /// Number of buckets holding at least one body
    pub fn occupied_cells(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// Empty every bucket (keeps allocations for the next step)
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    /// Rebuild the buckets from scratch for the current body poses
    ///
    /// A body straddling a cell border is placed in every cell it touches.
    /// Bodies lying completely outside the arena land in no cell.
    pub fn partition(&mut self, bodies: &[Body]) {
        self.clear();

        for (index, body) in bodies.iter().enumerate() {
            let pos = body.position();
            let r = body.vertex_radius();

            for row in 0..self.rows {
                let top = row as f64 * self.row_height;
                let bottom = (row + 1) as f64 * self.row_height;
                if !(pos.y + r > top && pos.y - r < bottom) {
                    continue;
                }

                for col in 0..self.columns {
                    let left = col as f64 * self.column_width;
                    let right = (col + 1) as f64 * self.column_width;
                    if !(pos.x + r > left && pos.x - r < right) {
                        continue;
                    }

                    self.cells[row * self.columns + col].push(index);
                }
            }
        }
    }
}
