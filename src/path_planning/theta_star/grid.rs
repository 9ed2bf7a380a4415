//! Occupancy grid laid over the navigable area
//!
//! Rows index the x axis and columns the y axis. Cell `(r, c)` covers
//! `[min_x + r * s, min_x + (r + 1) * s) x [min_y + c * s, min_y + (c + 1) * s)`
//! where `s` is the cell size.

use std::cmp::Ordering;
use std::collections::VecDeque;

use crate::common::{Point2D, Rectangle};

/// Slack for the rows/columns division so that an exact multiple of the
/// cell size is not lost to rounding
const GRID_SIZE_EPSILON: f64 = 1e-9;

/// 8-connected neighbourhood as (d_row, d_col), in expansion order: the four
/// axis steps (+row, +col, -row, -col), then the diagonals. Relaxation only
/// replaces a parent on a strictly lower cost, so among equal-cost parents
/// the first one expanded in this order keeps the cell.
const NEIGHBOUR_OFFSETS: [(i64, i64); 8] = [
    (1, 0),
    (0, 1),
    (-1, 0),
    (0, -1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Discrete grid address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Column first, then row. Only used to break ties deterministically.
impl Ord for Cell {
    fn cmp(&self, other: &Self) -> Ordering {
        self.col.cmp(&other.col).then(self.row.cmp(&other.row))
    }
}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    origin: Point2D,
    cell_size: f64,
    rows: usize,
    cols: usize,
}

impl Grid {
    pub fn new(area: &Rectangle, cell_size: f64) -> Self {
        let count = |length: f64| {
            let n = (length / cell_size + GRID_SIZE_EPSILON).floor();
            if n.is_finite() && n > 0.0 {
                n as usize
            } else {
                0
            }
        };

        Self {
            origin: area.min_corner(),
            cell_size,
            rows: count(area.x_length()),
            cols: count(area.y_length()),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of cells. Only meaningful once `checked_cell_count` has
    /// confirmed the product fits.
    pub fn cell_count(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    /// `rows * cols`, or `None` when the grid is too large to address
    pub fn checked_cell_count(&self) -> Option<usize> {
        self.rows.checked_mul(self.cols)
    }

    /// Whether per-cell tables for this grid stay within `max_cells`
    pub fn fits(&self, max_cells: usize) -> bool {
        self.checked_cell_count()
            .map_or(false, |count| count <= max_cells)
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// Dense index of a cell, `row * cols + col`
    pub fn index(&self, cell: Cell) -> usize {
        cell.row * self.cols + cell.col
    }

    /// Cell containing `p`, clamped to the grid. `None` on an empty grid.
    pub fn cell_at(&self, p: &Point2D) -> Option<Cell> {
        if self.is_empty() {
            return None;
        }
        let clamp = |offset: f64, n: usize| {
            let i = (offset / self.cell_size).floor();
            if i.is_nan() || i < 0.0 {
                0
            } else {
                (i as usize).min(n - 1)
            }
        };
        Some(Cell::new(
            clamp(p.x - self.origin.x, self.rows),
            clamp(p.y - self.origin.y, self.cols),
        ))
    }

    pub fn cell_center(&self, cell: Cell) -> Point2D {
        Point2D::new(
            self.origin.x + (cell.row as f64 + 0.5) * self.cell_size,
            self.origin.y + (cell.col as f64 + 0.5) * self.cell_size,
        )
    }

    /// Euclidean distance between cell centres in meters
    pub fn distance(&self, a: Cell, b: Cell) -> f64 {
        let d_row = a.row as f64 - b.row as f64;
        let d_col = a.col as f64 - b.col as f64;
        d_row.hypot(d_col) * self.cell_size
    }

    pub fn offset(&self, cell: Cell, d_row: i64, d_col: i64) -> Option<Cell> {
        let row = cell.row as i64 + d_row;
        let col = cell.col as i64 + d_col;
        if row < 0 || col < 0 {
            return None;
        }
        let moved = Cell::new(row as usize, col as usize);
        self.contains(moved).then_some(moved)
    }

    /// In-grid 8-connected neighbours in a fixed order
    pub fn neighbours(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        NEIGHBOUR_OFFSETS
            .iter()
            .filter_map(move |&(d_row, d_col)| self.offset(cell, d_row, d_col))
    }

    /// Cells on the square ring at Chebyshev distance `radius` around `center`
    pub fn ring(&self, center: Cell, radius: usize) -> Vec<Cell> {
        if radius == 0 {
            return vec![center];
        }
        let r = radius as i64;
        let mut cells = Vec::with_capacity(8 * radius);
        for d in -r..=r {
            cells.extend(self.offset(center, d, -r));
            cells.extend(self.offset(center, d, r));
        }
        for d in (-r + 1)..r {
            cells.extend(self.offset(center, -r, d));
            cells.extend(self.offset(center, r, d));
        }
        cells
    }

    /// Every cell crossed by the segment between the centres of `a` and `b`
    pub fn supercover(&self, a: Cell, b: Cell) -> SupercoverCells {
        SupercoverCells::new(a, b)
    }
}

/// Digital line traversal between two cell centres.
///
/// Yields `a` first and `b` last. When the line passes exactly through a
/// cell corner, both cells beside the corner are yielded as well.
#[derive(Debug, Clone)]
pub struct SupercoverCells {
    row: i64,
    col: i64,
    step_row: i64,
    step_col: i64,
    n_row: i64,
    n_col: i64,
    i_row: i64,
    i_col: i64,
    queue: VecDeque<Cell>,
}

impl SupercoverCells {
    fn new(a: Cell, b: Cell) -> Self {
        let d_row = b.row as i64 - a.row as i64;
        let d_col = b.col as i64 - a.col as i64;
        Self {
            row: a.row as i64,
            col: a.col as i64,
            step_row: d_row.signum(),
            step_col: d_col.signum(),
            n_row: d_row.abs(),
            n_col: d_col.abs(),
            i_row: 0,
            i_col: 0,
            queue: VecDeque::from([a]),
        }
    }

    fn cell(row: i64, col: i64) -> Cell {
        Cell::new(row as usize, col as usize)
    }
}

impl Iterator for SupercoverCells {
    type Item = Cell;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(cell) = self.queue.pop_front() {
            return Some(cell);
        }
        if self.i_row >= self.n_row && self.i_col >= self.n_col {
            return None;
        }

        // Compare where the line crosses the next row boundary and the next
        // column boundary, scaled to integers
        let decision = (1 + 2 * self.i_row) * self.n_col - (1 + 2 * self.i_col) * self.n_row;
        match decision.cmp(&0) {
            Ordering::Equal => {
                self.queue.push_back(Self::cell(self.row + self.step_row, self.col));
                self.queue.push_back(Self::cell(self.row, self.col + self.step_col));
                self.row += self.step_row;
                self.col += self.step_col;
                self.i_row += 1;
                self.i_col += 1;
            }
            Ordering::Less => {
                self.row += self.step_row;
                self.i_row += 1;
            }
            Ordering::Greater => {
                self.col += self.step_col;
                self.i_col += 1;
            }
        }
        self.queue.push_back(Self::cell(self.row, self.col));
        self.queue.pop_front()
    }
}
