//! Theta* search over one planning call
//!
//! `SearchContext` owns every piece of per-call state: the grid, both
//! oracles with their caches, the cost table and the frontier. It is built
//! fresh for each request and dropped afterwards.

use crate::common::{ObstaclePtr, Point2D, Rectangle};

use super::frontier::{CostEntry, CostTable, Frontier};
use super::grid::{Cell, Grid};
use super::oracle::{FreeSpaceOracle, VisibilityOracle};

/// Counters describing the work done by one planning call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Cells moved from the frontier to the visited set
    pub expanded: usize,
    pub free_space_queries: usize,
    pub free_space_cache_hits: usize,
    pub visibility_queries: usize,
    pub visibility_cache_hits: usize,
}

pub struct SearchContext<'a> {
    grid: Grid,
    free_space: FreeSpaceOracle<'a>,
    visibility: VisibilityOracle,
    costs: CostTable,
    frontier: Frontier,
    any_angle: bool,
    expanded: usize,
}

impl<'a> SearchContext<'a> {
    pub fn new(
        navigable_area: &'a Rectangle,
        obstacles: &'a [ObstaclePtr],
        cell_size: f64,
        any_angle: bool,
    ) -> Self {
        let grid = Grid::new(navigable_area, cell_size);
        Self::with_free_space(FreeSpaceOracle::new(navigable_area, obstacles, grid), any_angle)
    }

    /// Context over the grid of `free_space`. Allocates per-cell tables, so
    /// callers check `Grid::fits` first.
    pub fn with_free_space(free_space: FreeSpaceOracle<'a>, any_angle: bool) -> Self {
        let grid = *free_space.grid();
        Self {
            grid,
            free_space,
            visibility: VisibilityOracle::new(),
            costs: CostTable::new(grid),
            frontier: Frontier::new(grid),
            any_angle,
            expanded: 0,
        }
    }

    #[cfg(test)]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn free_space_mut(&mut self) -> &mut FreeSpaceOracle<'a> {
        &mut self.free_space
    }

    pub fn line_of_sight(&mut self, a: Cell, b: Cell) -> bool {
        self.visibility.line_of_sight(&mut self.free_space, a, b)
    }

    pub fn stats(&self) -> SearchStats {
        SearchStats {
            expanded: self.expanded,
            free_space_queries: self.free_space.queries(),
            free_space_cache_hits: self.free_space.cache_hits(),
            visibility_queries: self.visibility.queries(),
            visibility_cache_hits: self.visibility.cache_hits(),
        }
    }

    /// Run the search from `start` until `goal` is reached (true) or the
    /// frontier runs dry (false). Both cells must lie in the grid.
    pub fn search(&mut self, start: Cell, goal: Cell) -> bool {
        let estimate = self.grid.distance(start, goal);
        self.costs.set(
            start,
            CostEntry {
                parent: start,
                cost_estimate: estimate,
                best_path_cost: 0.0,
            },
        );
        self.frontier.push(start, estimate);

        while let Some((_, current)) = self.frontier.pop_min() {
            self.frontier.mark_visited(current);
            self.expanded += 1;

            if current == goal || self.visit_neighbours(current, goal) {
                return true;
            }
        }
        false
    }

    /// Relax every usable neighbour of `current`; true once `goal` is reached
    fn visit_neighbours(&mut self, current: Cell, goal: Cell) -> bool {
        let grid = self.grid;
        for next in grid.neighbours(current) {
            if self.frontier.is_visited(next) || !self.is_step_clear(current, next) {
                continue;
            }
            if self.update_vertex(current, next, goal) {
                return true;
            }
        }
        false
    }

    /// A step to an adjacent cell needs that cell free, and for diagonal
    /// steps both cells beside the shared corner free as well
    fn is_step_clear(&mut self, current: Cell, next: Cell) -> bool {
        if !self.free_space.is_unblocked(next) {
            return false;
        }
        if current.row == next.row || current.col == next.col {
            return true;
        }
        self.free_space.is_unblocked(Cell::new(next.row, current.col))
            && self.free_space.is_unblocked(Cell::new(current.row, next.col))
    }

    fn update_vertex(&mut self, current: Cell, next: Cell, goal: Cell) -> bool {
        let current_entry = self.entry(current);

        // Theta*: hook `next` straight onto the grandparent when visible
        let parent = if self.any_angle
            && current_entry.parent != current
            && self.line_of_sight(current_entry.parent, next)
        {
            current_entry.parent
        } else {
            current
        };

        let candidate = self.entry(parent).best_path_cost + self.grid.distance(parent, next);
        let previous = self.costs.get(next).copied();
        if previous.map_or(true, |entry| candidate < entry.best_path_cost) {
            if let Some(stale) = previous {
                self.frontier.remove(next, stale.cost_estimate);
            }
            let cost_estimate = candidate + self.grid.distance(next, goal);
            self.costs.set(
                next,
                CostEntry {
                    parent,
                    cost_estimate,
                    best_path_cost: candidate,
                },
            );
            self.frontier.push(next, cost_estimate);
        }

        next == goal
    }

    fn entry(&self, cell: Cell) -> CostEntry {
        match self.costs.get(cell) {
            Some(entry) => *entry,
            None => unreachable!("cell {:?} used before its cost entry was set", cell),
        }
    }

    /// Cell centres from the start cell to `goal`, following parent links
    pub fn trace_path(&self, goal: Cell) -> Vec<Point2D> {
        let mut points = Vec::new();
        let mut cell = goal;
        loop {
            points.push(self.grid.cell_center(cell));
            let parent = self.entry(cell).parent;
            if parent == cell {
                break;
            }
            assert!(
                points.len() <= self.grid.cell_count(),
                "parent links from {:?} form a cycle",
                goal
            );
            cell = parent;
        }
        points.reverse();
        points
    }
}
