//! Free-space and visibility queries against one obstacle snapshot
//!
//! Both oracles cache their answers for the lifetime of a single planning
//! call. Obstacles move between calls, so the caches are never reused.

use std::collections::HashMap;

use crate::common::{ObstaclePtr, Point2D, Rectangle, Segment};

use super::grid::{Cell, Grid};

/// Answers "is this point/cell usable" for the current obstacle snapshot
pub struct FreeSpaceOracle<'a> {
    area: &'a Rectangle,
    obstacles: &'a [ObstaclePtr],
    grid: Grid,
    unblocked: Vec<Option<bool>>,
    queries: usize,
    cache_hits: usize,
}

impl<'a> FreeSpaceOracle<'a> {
    pub fn new(area: &'a Rectangle, obstacles: &'a [ObstaclePtr], grid: Grid) -> Self {
        Self {
            area,
            obstacles,
            grid,
            unblocked: Vec::new(),
            queries: 0,
            cache_hits: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn is_point_navigable(&self, p: &Point2D) -> bool {
        self.area.contains(p)
    }

    pub fn is_point_navigable_and_free(&self, p: &Point2D) -> bool {
        self.is_point_navigable(p) && !self.obstacles.iter().any(|obstacle| obstacle.contains(p))
    }

    /// True if no obstacle touches the straight segment `a`-`b`
    pub fn is_segment_clear(&self, a: &Point2D, b: &Point2D) -> bool {
        let segment = Segment::new(*a, *b);
        !self.obstacles.iter().any(|obstacle| obstacle.intersects(&segment))
    }

    /// A cell is unblocked when it lies in the grid and its centre is
    /// navigable and outside every obstacle
    pub fn is_unblocked(&mut self, cell: Cell) -> bool {
        if !self.grid.contains(cell) {
            return false;
        }
        self.queries += 1;

        // Allocated on first use so point queries on a huge area stay cheap
        if self.unblocked.is_empty() {
            self.unblocked = vec![None; self.grid.cell_count()];
        }

        let index = self.grid.index(cell);
        if let Some(unblocked) = self.unblocked[index] {
            self.cache_hits += 1;
            return unblocked;
        }

        let unblocked = self.is_point_navigable_and_free(&self.grid.cell_center(cell));
        self.unblocked[index] = Some(unblocked);
        unblocked
    }

    pub fn queries(&self) -> usize {
        self.queries
    }

    pub fn cache_hits(&self) -> usize {
        self.cache_hits
    }
}

/// Line-of-sight between cell centres, cached per unordered cell pair
#[derive(Debug, Default)]
pub struct VisibilityOracle {
    cache: HashMap<u64, bool>,
    queries: usize,
    cache_hits: usize,
}

impl VisibilityOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key shared by `(a, b)` and `(b, a)`
    fn pair_key(grid: &Grid, a: Cell, b: Cell) -> u64 {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        grid.index(low) as u64 * grid.cell_count() as u64 + grid.index(high) as u64
    }

    /// True if every cell crossed by the segment between the centres of `a`
    /// and `b` is unblocked
    pub fn line_of_sight(&mut self, free_space: &mut FreeSpaceOracle<'_>, a: Cell, b: Cell) -> bool {
        self.queries += 1;

        let grid = *free_space.grid();
        let key = Self::pair_key(&grid, a, b);
        if let Some(&visible) = self.cache.get(&key) {
            self.cache_hits += 1;
            return visible;
        }

        let visible = grid.supercover(a, b).all(|cell| free_space.is_unblocked(cell));
        self.cache.insert(key, visible);
        visible
    }

    pub fn queries(&self) -> usize {
        self.queries
    }

    pub fn cache_hits(&self) -> usize {
        self.cache_hits
    }
}
