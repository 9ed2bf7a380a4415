//! Search working memory: per-cell costs and the open/closed sets

use std::collections::BTreeSet;

use ordered_float::OrderedFloat;

use super::grid::{Cell, Grid};

/// Best known way of reaching a cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostEntry {
    /// Cell this one is reached from; the start cell is its own parent
    pub parent: Cell,
    /// `best_path_cost` plus straight-line distance to the goal
    pub cost_estimate: f64,
    /// Length of the best known path from the start
    pub best_path_cost: f64,
}

/// Dense table of cost entries, `None` until a cell is first reached
#[derive(Debug, Clone)]
pub struct CostTable {
    grid: Grid,
    entries: Vec<Option<CostEntry>>,
}

impl CostTable {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            entries: vec![None; grid.cell_count()],
        }
    }

    pub fn get(&self, cell: Cell) -> Option<&CostEntry> {
        self.entries[self.grid.index(cell)].as_ref()
    }

    pub fn set(&mut self, cell: Cell, entry: CostEntry) {
        let index = self.grid.index(cell);
        self.entries[index] = Some(entry);
    }
}

/// Open list ordered by cost estimate, then by cell, plus the closed list
#[derive(Debug, Clone)]
pub struct Frontier {
    grid: Grid,
    open: BTreeSet<(OrderedFloat<f64>, Cell)>,
    visited: Vec<bool>,
}

impl Frontier {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            open: BTreeSet::new(),
            visited: vec![false; grid.cell_count()],
        }
    }

    pub fn push(&mut self, cell: Cell, cost_estimate: f64) {
        debug_assert!(!self.is_visited(cell), "{:?} is already closed", cell);
        self.open.insert((OrderedFloat(cost_estimate), cell));
    }

    /// Drop the entry queued for `cell` at `cost_estimate`, if any
    pub fn remove(&mut self, cell: Cell, cost_estimate: f64) -> bool {
        self.open.remove(&(OrderedFloat(cost_estimate), cell))
    }

    /// Lowest estimate first; equal estimates come out in cell order
    pub fn pop_min(&mut self) -> Option<(f64, Cell)> {
        self.open
            .pop_first()
            .map(|(cost_estimate, cell)| (cost_estimate.into_inner(), cell))
    }

    pub fn mark_visited(&mut self, cell: Cell) {
        let index = self.grid.index(cell);
        self.visited[index] = true;
    }

    pub fn is_visited(&self, cell: Cell) -> bool {
        self.visited[self.grid.index(cell)]
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.open.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{Point2D, Rectangle};

    fn grid() -> Grid {
        Grid::new(&Rectangle::new(Point2D::new(0.0, 0.0), Point2D::new(1.0, 1.0)), 0.1)
    }

    #[test]
    fn test_cost_table_starts_uninitialized() {
        let mut table = CostTable::new(grid());
        let cell = Cell::new(3, 4);
        assert!(table.get(cell).is_none());

        let entry = CostEntry {
            parent: Cell::new(2, 4),
            cost_estimate: 1.5,
            best_path_cost: 0.1,
        };
        table.set(cell, entry);
        assert_eq!(table.get(cell), Some(&entry));
        assert!(table.get(Cell::new(4, 3)).is_none());
    }

    #[test]
    fn test_pop_lowest_estimate_first() {
        let mut frontier = Frontier::new(grid());
        frontier.push(Cell::new(1, 1), 3.0);
        frontier.push(Cell::new(2, 2), 1.0);
        frontier.push(Cell::new(3, 3), 2.0);

        assert_eq!(frontier.pop_min(), Some((1.0, Cell::new(2, 2))));
        assert_eq!(frontier.pop_min(), Some((2.0, Cell::new(3, 3))));
        assert_eq!(frontier.pop_min(), Some((3.0, Cell::new(1, 1))));
        assert_eq!(frontier.pop_min(), None);
    }

    #[test]
    fn test_ties_break_by_column_then_row() {
        let mut frontier = Frontier::new(grid());
        frontier.push(Cell::new(5, 2), 1.0);
        frontier.push(Cell::new(1, 3), 1.0);
        frontier.push(Cell::new(0, 2), 1.0);

        assert_eq!(frontier.pop_min().map(|(_, c)| c), Some(Cell::new(0, 2)));
        assert_eq!(frontier.pop_min().map(|(_, c)| c), Some(Cell::new(5, 2)));
        assert_eq!(frontier.pop_min().map(|(_, c)| c), Some(Cell::new(1, 3)));
    }

    #[test]
    fn test_remove_stale_entry() {
        let mut frontier = Frontier::new(grid());
        let cell = Cell::new(4, 4);
        frontier.push(cell, 5.0);
        assert!(frontier.remove(cell, 5.0));
        assert!(!frontier.remove(cell, 5.0));
        frontier.push(cell, 4.0);

        assert_eq!(frontier.len(), 1);
        assert_eq!(frontier.pop_min(), Some((4.0, cell)));
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_visited() {
        let mut frontier = Frontier::new(grid());
        let cell = Cell::new(7, 1);
        assert!(!frontier.is_visited(cell));
        frontier.mark_visited(cell);
        assert!(frontier.is_visited(cell));
        assert!(!frontier.is_visited(Cell::new(1, 7)));
    }
}
