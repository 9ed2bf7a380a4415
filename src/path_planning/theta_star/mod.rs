//! Theta* path planning algorithm
//!
//! Theta* is an any-angle path planning algorithm that extends A* by
//! allowing paths to connect any two visible nodes, not just grid neighbors.
//! This produces shorter, more natural paths compared to standard A*.
//!
//! The planner is meant to be queried once per control cycle with a fresh
//! obstacle snapshot. Every call builds its own [`SearchContext`]; nothing
//! but the configuration and the statistics of the last call survive it.
//!
//! # Components
//!
//! - `grid`: cells at robot-radius resolution over the navigable area
//! - `oracle`: cached free-space and line-of-sight queries
//! - `frontier`: cost table and open/closed sets
//! - `search`: the relaxation loop and path tracing
//! - `endpoints`: moving blocked start/end points to free space
//!
//! # Example
//!
//! ```no_run
//! use rust_navigation::common::{CircleObstacle, PathPlanner, Point2D, Rectangle};
//! use rust_navigation::path_planning::theta_star::ThetaStarPlanner;
//!
//! let mut planner = ThetaStarPlanner::default();
//! let field = Rectangle::from_center(Point2D::origin(), 9.0, 6.0);
//! let obstacles = vec![CircleObstacle::new(Point2D::origin(), 0.3).into_ptr()];
//!
//! let path = planner.find_path(Point2D::new(-2.0, 0.0), Point2D::new(2.0, 0.0), &field, &obstacles);
//! ```
//!
//! Reference: Nash, A., Daniel, K., Koenig, S., & Felner, A. (2007).
//! "Theta*: Any-Angle Path Planning on Grids"

pub mod config;
pub mod endpoints;
pub mod frontier;
pub mod grid;
pub mod oracle;
pub mod search;

use log::debug;

use crate::common::{NavigationResult, ObstaclePtr, Path2D, PathPlanner, Point2D, Rectangle};

pub use config::ThetaStarConfig;
pub use grid::{Cell, Grid};
pub use search::{SearchContext, SearchStats};

use endpoints::{adjust_endpoints, search_cells};
use oracle::FreeSpaceOracle;

/// Why a request produced no path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoPathReason {
    /// Non-finite coordinates or a degenerate navigable area
    InvalidRequest,
    /// Start lies outside the navigable area
    StartNotNavigable,
    /// End lies outside the navigable area
    EndNotNavigable,
    /// No free point or cell near the start
    StartBlocked,
    /// No free point or cell near the end
    EndBlocked,
    /// The navigable area is smaller than one cell
    EmptyGrid,
    /// The grid over the navigable area exceeds `max_cells`
    GridTooLarge,
    /// The search exhausted every reachable cell
    Unreachable,
}

/// How a request was answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanOutcome {
    /// Start and end are practically the same point
    CloseToEnd,
    /// Nothing blocks the straight segment from start to end
    Direct,
    /// The grid search found a path
    Searched,
    /// No path, with the reason
    NoPath(NoPathReason),
}

/// Result of a planning call with diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct PlanReport {
    pub path: Option<Path2D>,
    pub outcome: PlanOutcome,
    pub stats: SearchStats,
}

impl PlanReport {
    fn found(points: Vec<Point2D>, outcome: PlanOutcome, stats: SearchStats) -> Self {
        Self {
            path: Some(Path2D::from_points(points)),
            outcome,
            stats,
        }
    }

    fn no_path(reason: NoPathReason, stats: SearchStats) -> Self {
        Self {
            path: None,
            outcome: PlanOutcome::NoPath(reason),
            stats,
        }
    }
}

/// Theta* path planner
///
/// Theta* extends A* by checking line-of-sight between a node and its
/// grandparent. If there's a clear line-of-sight, the path skips the
/// parent node, resulting in shorter, more direct paths.
#[derive(Debug, Clone)]
pub struct ThetaStarPlanner {
    config: ThetaStarConfig,
    last_stats: SearchStats,
}

impl ThetaStarPlanner {
    /// Create a new Theta* planner, rejecting an invalid configuration
    pub fn new(config: ThetaStarConfig) -> NavigationResult<Self> {
        config.validate()?;
        Ok(ThetaStarPlanner {
            config,
            last_stats: SearchStats::default(),
        })
    }

    pub fn config(&self) -> &ThetaStarConfig {
        &self.config
    }

    /// Work counters of the most recent call
    pub fn last_stats(&self) -> SearchStats {
        self.last_stats
    }

    /// Plan a path and report how it was obtained
    pub fn plan_detailed(
        &mut self,
        start: Point2D,
        end: Point2D,
        navigable_area: &Rectangle,
        obstacles: &[ObstaclePtr],
    ) -> PlanReport {
        let report = self.plan_inner(start, end, navigable_area, obstacles);
        match report.outcome {
            PlanOutcome::NoPath(reason) => {
                debug!("no path from {:?} to {:?}: {:?}", start, end, reason)
            }
            outcome => debug!(
                "{:?} path from {:?} to {:?} with {} points, {:?}",
                outcome,
                start,
                end,
                report.path.as_ref().map_or(0, Path2D::len),
                report.stats
            ),
        }
        self.last_stats = report.stats;
        report
    }

    fn plan_inner(
        &self,
        start: Point2D,
        end: Point2D,
        navigable_area: &Rectangle,
        obstacles: &[ObstaclePtr],
    ) -> PlanReport {
        if !start.is_finite() || !end.is_finite() || !navigable_area.is_valid() {
            return PlanReport::no_path(NoPathReason::InvalidRequest, SearchStats::default());
        }

        // Point and segment queries only; no per-cell table exists yet
        let grid = Grid::new(navigable_area, self.config.cell_size);
        let free_space = FreeSpaceOracle::new(navigable_area, obstacles, grid);

        let endpoints = match adjust_endpoints(&free_space, start, end, &self.config) {
            Ok(endpoints) => endpoints,
            Err(reason) => return PlanReport::no_path(reason, SearchStats::default()),
        };
        let direct = vec![endpoints.start, endpoints.end];

        if endpoints.is_close_to_end(&self.config) {
            return PlanReport::found(direct, PlanOutcome::CloseToEnd, SearchStats::default());
        }
        if free_space.is_segment_clear(&endpoints.start, &endpoints.end) {
            return PlanReport::found(direct, PlanOutcome::Direct, SearchStats::default());
        }
        if !grid.fits(self.config.max_cells) {
            debug!(
                "{} x {} grid exceeds max_cells {}",
                grid.rows(),
                grid.cols(),
                self.config.max_cells
            );
            return PlanReport::no_path(NoPathReason::GridTooLarge, SearchStats::default());
        }

        let mut context = SearchContext::with_free_space(free_space, self.config.any_angle);
        let (start_cell, end_cell) = match search_cells(context.free_space_mut(), &endpoints) {
            Ok(cells) => cells,
            Err(reason) => return PlanReport::no_path(reason, context.stats()),
        };
        if start_cell == end_cell {
            // Both endpoints share a cell, so the grid cannot resolve whatever
            // blocks the segment between them
            debug!(
                "{:?} and {:?} share cell {:?}, returning them directly",
                endpoints.start, endpoints.end, start_cell
            );
            return PlanReport::found(direct, PlanOutcome::CloseToEnd, context.stats());
        }
        if !context.search(start_cell, end_cell) {
            return PlanReport::no_path(NoPathReason::Unreachable, context.stats());
        }

        // Cell centres stand in for the real endpoints during the search
        let mut points = context.trace_path(end_cell);
        let last = points.len() - 1;
        points[0] = endpoints.start;
        points[last] = endpoints.end;
        PlanReport::found(points, PlanOutcome::Searched, context.stats())
    }
}

impl Default for ThetaStarPlanner {
    fn default() -> Self {
        Self {
            config: ThetaStarConfig::default(),
            last_stats: SearchStats::default(),
        }
    }
}

impl PathPlanner for ThetaStarPlanner {
    fn find_path(
        &mut self,
        start: Point2D,
        end: Point2D,
        navigable_area: &Rectangle,
        obstacles: &[ObstaclePtr],
    ) -> Option<Path2D> {
        self.plan_detailed(start, end, navigable_area, obstacles).path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{CircleObstacle, NavigationError, PolygonObstacle};
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn field() -> Rectangle {
        Rectangle::from_center(Point2D::origin(), 9.0, 6.0)
    }

    fn square(center: Point2D, side: f64) -> ObstaclePtr {
        PolygonObstacle::from_rectangle(&Rectangle::from_center(center, side, side)).into_ptr()
    }

    /// Centre of a cell of the default field grid
    fn cell_center(row: usize, col: usize) -> Point2D {
        Grid::new(&field(), ThetaStarConfig::default().cell_size).cell_center(Cell::new(row, col))
    }

    fn random_obstacles(seed: u64, count: usize) -> Vec<ObstaclePtr> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..count)
            .map(|_| {
                let center = Point2D::new(rng.gen_range(-3.0..3.0), rng.gen_range(-2.5..2.5));
                CircleObstacle::new(center, rng.gen_range(0.1..0.4)).into_ptr()
            })
            .collect()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = ThetaStarConfig {
            cell_size: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            ThetaStarPlanner::new(config),
            Err(NavigationError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_open_field_straight_path() {
        let mut planner = ThetaStarPlanner::default();
        let start = Point2D::new(-4.0, 0.0);
        let end = Point2D::new(4.0, 0.0);

        let path = planner.find_path(start, end, &field(), &[]).unwrap();
        assert_eq!(path.points, vec![start, end]);
    }

    #[test]
    fn test_clear_segment_is_direct_despite_nearby_obstacles() {
        let mut planner = ThetaStarPlanner::default();
        let start = Point2D::new(-3.0, 0.0);
        let end = Point2D::new(3.0, 0.5);
        // Close to the segment but not touching it
        let obstacles = vec![
            CircleObstacle::new(Point2D::new(0.0, 0.4), 0.1).into_ptr(),
            square(Point2D::new(-1.0, -0.2), 0.2),
        ];

        let report = planner.plan_detailed(start, end, &field(), &obstacles);
        assert_eq!(report.outcome, PlanOutcome::Direct);
        assert_eq!(report.path.unwrap().points, vec![start, end]);
    }

    #[test]
    fn test_close_to_end_ignores_tiny_obstacle() {
        let mut planner = ThetaStarPlanner::default();
        let start = Point2D::new(1.0, 1.0);
        let end = Point2D::new(1.008, 1.0);
        let obstacles = vec![CircleObstacle::new(Point2D::new(1.004, 1.0), 0.001).into_ptr()];

        let report = planner.plan_detailed(start, end, &field(), &obstacles);
        assert_eq!(report.outcome, PlanOutcome::CloseToEnd);
        assert_eq!(report.path.unwrap().points, vec![start, end]);
    }

    #[test]
    fn test_bends_around_square_obstacle() {
        let mut planner = ThetaStarPlanner::default();
        let start = Point2D::new(-2.0, 0.0);
        let end = Point2D::new(2.0, 0.0);
        let obstacles = vec![square(Point2D::origin(), 1.0)];

        let report = planner.plan_detailed(start, end, &field(), &obstacles);
        assert_eq!(report.outcome, PlanOutcome::Searched);
        let path = report.path.unwrap();

        assert!(path.len() >= 3);
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&end));
        let length = path.total_length();
        assert!(length > 4.0 && length.is_finite());
        assert!(path.points.iter().any(|p| p.y.abs() > 0.5));

        // Waypoints come from cells whose centres are free, so the path
        // stays clear of the obstacle shrunk by one cell
        let core = vec![square(Point2D::origin(), 1.0 - 2.0 * planner.config().cell_size)];
        assert!(path.is_collision_free(&core));
        assert!(report.stats.expanded > 0);
        assert_eq!(planner.last_stats(), report.stats);
    }

    #[test]
    fn test_theta_star_not_longer_than_grid_only() {
        // Endpoints on cell centres so both planners trace the same endpoints
        let start = cell_center(20, 33);
        let end = cell_center(80, 40);
        let obstacles = vec![
            square(Point2D::new(-1.0, 0.0), 1.0),
            square(Point2D::new(1.0, 0.8), 1.2),
            CircleObstacle::new(Point2D::new(0.5, -0.8), 0.4).into_ptr(),
        ];

        let mut theta = ThetaStarPlanner::default();
        let mut grid_only = ThetaStarPlanner::new(ThetaStarConfig::default().grid_only()).unwrap();

        let theta_path = theta.find_path(start, end, &field(), &obstacles).unwrap();
        let grid_path = grid_only.find_path(start, end, &field(), &obstacles).unwrap();

        assert!(theta_path.total_length() <= grid_path.total_length() + 1e-9);
        assert!(theta_path.len() < grid_path.len());
    }

    #[test]
    fn test_theta_star_not_longer_than_grid_only_on_random_fields() {
        let mut theta = ThetaStarPlanner::default();
        let mut grid_only = ThetaStarPlanner::new(ThetaStarConfig::default().grid_only()).unwrap();
        let mut compared = 0;

        for seed in 0..40 {
            let obstacles = random_obstacles(seed, 20);
            // Cell centres near opposite short edges, clear of every obstacle
            let mut rng = StdRng::seed_from_u64(1000 + seed);
            let start = cell_center(rng.gen_range(0..8), rng.gen_range(0..66));
            let end = cell_center(rng.gen_range(92..100), rng.gen_range(0..66));

            let theta_report = theta.plan_detailed(start, end, &field(), &obstacles);
            let grid_report = grid_only.plan_detailed(start, end, &field(), &obstacles);
            assert_eq!(
                theta_report.path.is_some(),
                grid_report.path.is_some(),
                "seed {}",
                seed
            );

            if let (PlanOutcome::Searched, PlanOutcome::Searched) =
                (theta_report.outcome, grid_report.outcome)
            {
                let theta_length = theta_report.path.map_or(f64::INFINITY, |p| p.total_length());
                let grid_length = grid_report.path.map_or(0.0, |p| p.total_length());
                assert!(
                    theta_length <= grid_length + 1e-9,
                    "seed {}: {} > {}",
                    seed,
                    theta_length,
                    grid_length
                );
                compared += 1;
            }
        }
        assert!(compared > 0);
    }

    #[test]
    fn test_huge_area_without_direct_route_has_no_path() {
        let mut planner = ThetaStarPlanner::default();
        let area = Rectangle::from_center(Point2D::origin(), 1e10, 1e10);
        let obstacles = vec![CircleObstacle::new(Point2D::origin(), 0.3).into_ptr()];
        let start = Point2D::new(-2.0, 0.0);
        let end = Point2D::new(2.0, 0.0);

        let report = planner.plan_detailed(start, end, &area, &obstacles);
        assert_eq!(report.path, None);
        assert_eq!(report.outcome, PlanOutcome::NoPath(NoPathReason::GridTooLarge));
        assert_eq!(planner.find_path(start, end, &area, &obstacles), None);

        // Short-circuits still answer without a grid
        let report = planner.plan_detailed(start, Point2D::new(-2.0, 3.0), &area, &obstacles);
        assert_eq!(report.outcome, PlanOutcome::Direct);
    }

    #[test]
    fn test_grid_limit_is_configurable() {
        let config = ThetaStarConfig {
            max_cells: 1000,
            ..Default::default()
        };
        let mut planner = ThetaStarPlanner::new(config).unwrap();
        let obstacles = vec![square(Point2D::origin(), 1.0)];

        // The default field holds 6600 cells
        let report = planner.plan_detailed(Point2D::new(-2.0, 0.0), Point2D::new(2.0, 0.0), &field(), &obstacles);
        assert_eq!(report.outcome, PlanOutcome::NoPath(NoPathReason::GridTooLarge));
    }

    #[test]
    fn test_endpoints_sharing_a_cell_are_returned_directly() {
        let mut planner = ThetaStarPlanner::default();
        // Both points fall in cell (50, 33), x in [0, 0.09); the wall between
        // them is thinner than a cell and misses the cell centre
        let start = Point2D::new(0.01, 0.0);
        let end = Point2D::new(0.08, 0.0);
        let wall = PolygonObstacle::from_rectangle(&Rectangle::new(
            Point2D::new(0.02, -0.5),
            Point2D::new(0.03, 0.5),
        ))
        .into_ptr();

        let report = planner.plan_detailed(start, end, &field(), &[wall]);
        assert_eq!(report.outcome, PlanOutcome::CloseToEnd);
        assert_eq!(report.path.unwrap().points, vec![start, end]);
        assert_eq!(report.stats.expanded, 0);
    }

    #[test]
    fn test_unreachable_when_start_buried() {
        let mut planner = ThetaStarPlanner::default();
        // Covers far more than the blocked-end search radius around the start
        let obstacles = vec![square(Point2D::new(-2.0, 0.0), 5.0)];

        let report = planner.plan_detailed(
            Point2D::new(-2.0, 0.0),
            Point2D::new(4.0, 0.0),
            &field(),
            &obstacles,
        );
        assert_eq!(report.path, None);
        assert_eq!(report.outcome, PlanOutcome::NoPath(NoPathReason::StartBlocked));
    }

    #[test]
    fn test_unreachable_when_end_buried() {
        let mut planner = ThetaStarPlanner::default();
        let obstacles = vec![CircleObstacle::new(Point2D::new(2.0, 0.0), 2.5).into_ptr()];

        let path = planner.find_path(Point2D::new(-4.0, 0.0), Point2D::new(2.0, 0.0), &field(), &obstacles);
        assert!(path.is_none());
    }

    #[test]
    fn test_blocked_end_is_moved_out_of_obstacle() {
        let mut planner = ThetaStarPlanner::default();
        let start = Point2D::new(-3.0, 0.0);
        let end = Point2D::new(2.0, 0.0);
        let obstacles = vec![
            CircleObstacle::new(end, 0.3).into_ptr(),
            square(Point2D::new(0.0, 0.0), 1.0),
        ];

        let report = planner.plan_detailed(start, end, &field(), &obstacles);
        let path = report.path.unwrap();
        let last = *path.last().unwrap();
        assert_eq!(path.first(), Some(&start));
        assert!(last.distance(&end) > 0.3);
        assert!(last.distance(&end) <= 0.3 + 1.0 / planner.config().blocked_end_search_resolution + 1e-9);
    }

    #[test]
    fn test_blocked_end_close_to_start_is_direct() {
        let mut planner = ThetaStarPlanner::default();
        let end = Point2D::new(0.0, 0.0);
        let obstacles = vec![CircleObstacle::new(end, 0.11).into_ptr()];
        // The relocated end lands 0.12 m along +x, 0.015 m from the start
        let start = Point2D::new(0.135, 0.0);

        let report = planner.plan_detailed(start, end, &field(), &obstacles);
        assert_eq!(report.outcome, PlanOutcome::CloseToEnd);
        let path = report.path.unwrap();
        assert_eq!(path.len(), 2);
        assert_abs_diff_eq!(path.points[1].x, 0.12, epsilon = 1e-9);
    }

    #[test]
    fn test_points_outside_area_have_no_path() {
        let mut planner = ThetaStarPlanner::default();
        let report = planner.plan_detailed(Point2D::new(-5.0, 0.0), Point2D::new(0.0, 0.0), &field(), &[]);
        assert_eq!(report.outcome, PlanOutcome::NoPath(NoPathReason::StartNotNavigable));

        let report = planner.plan_detailed(Point2D::new(0.0, 0.0), Point2D::new(0.0, 3.5), &field(), &[]);
        assert_eq!(report.outcome, PlanOutcome::NoPath(NoPathReason::EndNotNavigable));
    }

    #[test]
    fn test_malformed_requests_have_no_path() {
        let mut planner = ThetaStarPlanner::default();
        let p = Point2D::new(0.0, 0.0);

        let nan = Point2D::new(f64::NAN, 0.0);
        assert_eq!(planner.find_path(nan, p, &field(), &[]), None);

        let flat = Rectangle::new(Point2D::new(-1.0, 0.0), Point2D::new(1.0, 0.0));
        let report = planner.plan_detailed(p, Point2D::new(0.5, 0.0), &flat, &[]);
        assert_eq!(report.outcome, PlanOutcome::NoPath(NoPathReason::InvalidRequest));
    }

    #[test]
    fn test_enclosed_goal_is_unreachable() {
        let mut planner = ThetaStarPlanner::default();
        let goal = Point2D::new(2.0, 1.0);
        let wall = |center: (f64, f64), x: f64, y: f64| {
            PolygonObstacle::from_rectangle(&Rectangle::from_center(center.into(), x, y)).into_ptr()
        };
        let obstacles = vec![
            wall((2.0, 1.6), 1.4, 0.2),
            wall((2.0, 0.4), 1.4, 0.2),
            wall((1.4, 1.0), 0.2, 1.4),
            wall((2.6, 1.0), 0.2, 1.4),
        ];

        let report = planner.plan_detailed(Point2D::new(-3.0, -2.0), goal, &field(), &obstacles);
        assert_eq!(report.outcome, PlanOutcome::NoPath(NoPathReason::Unreachable));
    }

    #[test]
    fn test_repeated_calls_are_deterministic() {
        let obstacles = random_obstacles(7, 25);
        let start = Point2D::new(-4.2, -2.7);
        let end = Point2D::new(4.2, 2.7);

        let mut planner = ThetaStarPlanner::default();
        let first = planner.plan_detailed(start, end, &field(), &obstacles);
        let second = planner.plan_detailed(start, end, &field(), &obstacles);
        let fresh = ThetaStarPlanner::default().plan_detailed(start, end, &field(), &obstacles);

        assert_eq!(first, second);
        assert_eq!(first, fresh);
    }

    #[test]
    fn test_calls_do_not_share_state() {
        let mut planner = ThetaStarPlanner::default();
        let start = Point2D::new(-2.0, 0.0);
        let end = Point2D::new(2.0, 0.0);

        let blocked = planner.find_path(start, end, &field(), &[square(Point2D::origin(), 1.0)]);
        assert!(blocked.unwrap().len() >= 3);

        // Same planner, obstacle gone: the old caches must not leak in
        let clear = planner.find_path(start, end, &field(), &[]).unwrap();
        assert_eq!(clear.points, vec![start, end]);
    }

    #[test]
    fn test_random_fields_give_valid_paths() {
        let mut planner = ThetaStarPlanner::default();
        let start = Point2D::new(-4.2, 0.0);
        let end = Point2D::new(4.2, 0.0);

        for seed in 0..5 {
            let obstacles = random_obstacles(seed, 15);
            if let Some(path) = planner.find_path(start, end, &field(), &obstacles) {
                assert!(path.len() >= 2);
                assert_eq!(path.first(), Some(&start));
                assert_eq!(path.last(), Some(&end));
                assert!(path.total_length() >= start.distance(&end) - 1e-9);
                assert!(path.points.iter().all(|p| field().contains(p)));
            }
        }
    }
}
