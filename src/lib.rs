//! rust_navigation - any-angle path planning for a single mobile robot
//!
//! The planner rasterizes a rectangular navigable area into square cells and
//! runs Theta* over them, producing a short polyline from the robot to its
//! goal around a fresh snapshot of obstacles on every call.

// Core modules
pub mod common;
pub mod utils;

// Algorithm modules
pub mod path_planning;

// Re-export common types for convenience
pub use common::{CircleObstacle, Obstacle, ObstaclePtr, PolygonObstacle};
pub use common::{NavigationError, NavigationResult};
pub use common::{Path2D, PathPlanner, Point2D, Rectangle, Segment};
pub use path_planning::{ThetaStarConfig, ThetaStarPlanner};
