//! Start/end validation and relocation out of obstacles

use std::f64::consts::PI;

use log::trace;
use ordered_float::OrderedFloat;

use crate::common::Point2D;

use super::config::ThetaStarConfig;
use super::grid::Cell;
use super::oracle::FreeSpaceOracle;
use super::NoPathReason;

/// Minimum number of samples on one search ring
const MIN_RING_SAMPLES: usize = 8;

/// Endpoints after moving them out of obstacles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustedEndpoints {
    pub start: Point2D,
    pub end: Point2D,
    pub start_moved: bool,
    pub end_moved: bool,
}

impl AdjustedEndpoints {
    pub fn distance(&self) -> f64 {
        self.start.distance(&self.end)
    }

    /// Start and end are near enough to skip the search. A moved end point
    /// gets a wider margin so it does not flap between ticks.
    pub fn is_close_to_end(&self, config: &ThetaStarConfig) -> bool {
        let distance = self.distance();
        distance < config.close_to_end_threshold
            || (self.end_moved
                && distance
                    < config.close_to_end_threshold * config.blocked_end_oscillation_mitigation)
    }
}

/// Reject endpoints outside the navigable area and move endpoints that sit
/// inside an obstacle to the closest free point
pub fn adjust_endpoints(
    free_space: &FreeSpaceOracle<'_>,
    start: Point2D,
    end: Point2D,
    config: &ThetaStarConfig,
) -> Result<AdjustedEndpoints, NoPathReason> {
    if !free_space.is_point_navigable(&start) {
        return Err(NoPathReason::StartNotNavigable);
    }
    if !free_space.is_point_navigable(&end) {
        return Err(NoPathReason::EndNotNavigable);
    }

    let adjusted_start =
        find_closest_free_point(free_space, start, config).ok_or(NoPathReason::StartBlocked)?;
    let adjusted_end =
        find_closest_free_point(free_space, end, config).ok_or(NoPathReason::EndBlocked)?;

    if adjusted_start != start {
        trace!("start {:?} is blocked, moved to {:?}", start, adjusted_start);
    }
    if adjusted_end != end {
        trace!("end {:?} is blocked, moved to {:?}", end, adjusted_end);
    }

    Ok(AdjustedEndpoints {
        start: adjusted_start,
        end: adjusted_end,
        start_moved: adjusted_start != start,
        end_moved: adjusted_end != end,
    })
}

/// `p` itself when free, otherwise the first free point found on rings of
/// growing radius around it (within a ring, counter-clockwise from +x).
/// `None` if nothing is free within the search radius.
pub fn find_closest_free_point(
    free_space: &FreeSpaceOracle<'_>,
    p: Point2D,
    config: &ThetaStarConfig,
) -> Option<Point2D> {
    if free_space.is_point_navigable_and_free(&p) {
        return Some(p);
    }

    let step = 1.0 / config.blocked_end_search_resolution;
    let rings = (config.blocked_end_search_radius / step).round().max(1.0) as usize;
    for ring in 1..=rings {
        let radius = ring as f64 * step;
        let samples = ((2.0 * PI * radius / step).ceil() as usize).max(MIN_RING_SAMPLES);
        let found = (0..samples)
            .map(|i| p.polar_offset(radius, 2.0 * PI * i as f64 / samples as f64))
            .find(|q| free_space.is_point_navigable_and_free(q));
        if found.is_some() {
            return found;
        }
    }
    None
}

/// `cell` itself when unblocked, otherwise the nearest unblocked cell on the
/// closest square ring that has one. Ties go to the lower cell.
pub fn find_closest_unblocked_cell(free_space: &mut FreeSpaceOracle<'_>, cell: Cell) -> Option<Cell> {
    if free_space.is_unblocked(cell) {
        return Some(cell);
    }

    let grid = *free_space.grid();
    let max_radius = grid.rows().max(grid.cols());
    for radius in 1..=max_radius {
        let nearest = grid
            .ring(cell, radius)
            .into_iter()
            .filter(|candidate| free_space.is_unblocked(*candidate))
            .min_by_key(|candidate| (OrderedFloat(grid.distance(cell, *candidate)), *candidate));
        if nearest.is_some() {
            return nearest;
        }
    }
    None
}

/// Grid cells to search between. Cells whose centre is blocked although the
/// endpoint itself is free are swapped for the closest unblocked cell.
pub fn search_cells(
    free_space: &mut FreeSpaceOracle<'_>,
    endpoints: &AdjustedEndpoints,
) -> Result<(Cell, Cell), NoPathReason> {
    let grid = *free_space.grid();
    let (start_cell, end_cell) = match (grid.cell_at(&endpoints.start), grid.cell_at(&endpoints.end)) {
        (Some(start), Some(end)) => (start, end),
        _ => return Err(NoPathReason::EmptyGrid),
    };

    let start = find_closest_unblocked_cell(free_space, start_cell).ok_or(NoPathReason::StartBlocked)?;
    let end = find_closest_unblocked_cell(free_space, end_cell).ok_or(NoPathReason::EndBlocked)?;
    if start != start_cell {
        trace!("start cell {:?} is blocked, searching from {:?}", start_cell, start);
    }
    if end != end_cell {
        trace!("end cell {:?} is blocked, searching to {:?}", end_cell, end);
    }
    Ok((start, end))
}
