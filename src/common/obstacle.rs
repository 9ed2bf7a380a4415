//! Obstacle geometry consumed by the planners
//!
//! Obstacles are produced elsewhere (perception, world model) and handed to a
//! planner as a read-only snapshot. A planner only needs two queries from
//! them: point containment and segment intersection.

use std::f64::consts::PI;
use std::fmt::Debug;
use std::sync::Arc;

use itertools::Itertools;

use crate::common::error::{NavigationError, NavigationResult};
use crate::common::types::{Point2D, Rectangle, Segment};

/// Number of vertices used to draw a circle outline
const CIRCLE_OUTLINE_VERTICES: usize = 32;

/// Geometry an obstacle must expose to be avoided by a planner
pub trait Obstacle: Debug + Send + Sync {
    /// Whether `p` lies inside the obstacle (boundary included)
    fn contains(&self, p: &Point2D) -> bool;

    /// Whether `segment` touches the obstacle anywhere
    fn intersects(&self, segment: &Segment) -> bool;

    /// Closed outline of the obstacle, for plotting
    fn outline(&self) -> Vec<Point2D>;
}

/// Shared handle to an obstacle owned by the world model
pub type ObstaclePtr = Arc<dyn Obstacle>;

/// Circular obstacle, e.g. another robot or the ball
#[derive(Debug, Clone, PartialEq)]
pub struct CircleObstacle {
    pub center: Point2D,
    pub radius: f64,
}

impl CircleObstacle {
    pub fn new(center: Point2D, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn into_ptr(self) -> ObstaclePtr {
        Arc::new(self)
    }
}

impl Obstacle for CircleObstacle {
    fn contains(&self, p: &Point2D) -> bool {
        self.center.distance(p) <= self.radius
    }

    fn intersects(&self, segment: &Segment) -> bool {
        segment.distance_to_point(&self.center) <= self.radius
    }

    fn outline(&self) -> Vec<Point2D> {
        (0..=CIRCLE_OUTLINE_VERTICES)
            .map(|i| {
                let angle = 2.0 * PI * i as f64 / CIRCLE_OUTLINE_VERTICES as f64;
                self.center.polar_offset(self.radius, angle)
            })
            .collect()
    }
}

/// Simple (non self-intersecting) polygon obstacle
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonObstacle {
    vertices: Vec<Point2D>,
}

impl PolygonObstacle {
    pub fn new(vertices: Vec<Point2D>) -> NavigationResult<Self> {
        if vertices.len() < 3 {
            return Err(NavigationError::InvalidParameter(format!(
                "polygon needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        if !vertices.iter().all(Point2D::is_finite) {
            return Err(NavigationError::InvalidParameter(
                "polygon vertices must be finite".to_string(),
            ));
        }
        Ok(Self { vertices })
    }

    pub fn from_rectangle(rect: &Rectangle) -> Self {
        Self {
            vertices: rect.corners().to_vec(),
        }
    }

    pub fn vertices(&self) -> &[Point2D] {
        &self.vertices
    }

    pub fn into_ptr(self) -> ObstaclePtr {
        Arc::new(self)
    }

    fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        self.vertices
            .iter()
            .circular_tuple_windows()
            .map(|(a, b)| Segment::new(*a, *b))
    }
}

impl Obstacle for PolygonObstacle {
    fn contains(&self, p: &Point2D) -> bool {
        if self.edges().any(|edge| edge.distance_to_point(p) == 0.0) {
            return true;
        }

        // Even-odd ray casting towards +x
        let mut inside = false;
        for (a, b) in self.vertices.iter().circular_tuple_windows() {
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }

    fn intersects(&self, segment: &Segment) -> bool {
        self.contains(&segment.start)
            || self.contains(&segment.end)
            || self.edges().any(|edge| edge.intersects(segment))
    }

    fn outline(&self) -> Vec<Point2D> {
        let mut outline = self.vertices.clone();
        outline.push(self.vertices[0]);
        outline
    }
}
