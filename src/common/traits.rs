//! Common traits defining interfaces for navigation algorithms

use crate::common::obstacle::ObstaclePtr;
use crate::common::types::*;

/// Trait for path planning algorithms queried once per control cycle
///
/// Implementations are not reentrant: `&mut self` forces callers to
/// serialize requests on one planner instance.
pub trait PathPlanner {
    /// Plan a path from `start` to `end` inside `navigable_area`, avoiding
    /// `obstacles`. Returns `None` when no path exists.
    fn find_path(
        &mut self,
        start: Point2D,
        end: Point2D,
        navigable_area: &Rectangle,
        obstacles: &[ObstaclePtr],
    ) -> Option<Path2D>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test that the trait is object safe and callable
    struct StraightLinePlanner;

    impl PathPlanner for StraightLinePlanner {
        fn find_path(
            &mut self,
            start: Point2D,
            end: Point2D,
            _navigable_area: &Rectangle,
            _obstacles: &[ObstaclePtr],
        ) -> Option<Path2D> {
            Some(Path2D::from_points(vec![start, end]))
        }
    }

    #[test]
    fn test_path_planner_trait() {
        let mut planner: Box<dyn PathPlanner> = Box::new(StraightLinePlanner);
        let area = Rectangle::from_center(Point2D::origin(), 2.0, 2.0);
        let result = planner.find_path(Point2D::origin(), Point2D::new(1.0, 1.0), &area, &[]);
        assert_eq!(result.map(|p| p.len()), Some(2));
    }
}
