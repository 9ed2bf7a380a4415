//! Common geometry types used throughout rust_navigation

use itertools::Itertools;
use nalgebra::Vector2;

use crate::common::obstacle::ObstaclePtr;

/// 2D point representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn distance(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn to_vector(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Point displaced by `radius` in direction `angle` (radians)
    pub fn polar_offset(&self, radius: f64, angle: f64) -> Self {
        Self {
            x: self.x + radius * angle.cos(),
            y: self.y + radius * angle.sin(),
        }
    }
}

impl From<(f64, f64)> for Point2D {
    fn from(tuple: (f64, f64)) -> Self {
        Self { x: tuple.0, y: tuple.1 }
    }
}

impl From<Vector2<f64>> for Point2D {
    fn from(v: Vector2<f64>) -> Self {
        Self { x: v[0], y: v[1] }
    }
}

/// Straight line segment between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point2D,
    pub end: Point2D,
}

impl Segment {
    pub fn new(start: Point2D, end: Point2D) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }

    /// Closest point on the segment to `p`
    pub fn closest_point(&self, p: &Point2D) -> Point2D {
        let a = self.start.to_vector();
        let ab = self.end.to_vector() - a;
        let len_sq = ab.norm_squared();
        if len_sq == 0.0 {
            return self.start;
        }
        let t = ((p.to_vector() - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
        Point2D::from(a + ab * t)
    }

    pub fn distance_to_point(&self, p: &Point2D) -> f64 {
        self.closest_point(p).distance(p)
    }

    /// Whether the two segments share at least one point
    pub fn intersects(&self, other: &Segment) -> bool {
        let (p1, p2, p3, p4) = (self.start, self.end, other.start, other.end);
        let d1 = orientation(&p3, &p4, &p1);
        let d2 = orientation(&p3, &p4, &p2);
        let d3 = orientation(&p1, &p2, &p3);
        let d4 = orientation(&p1, &p2, &p4);

        if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
            && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
        {
            return true;
        }

        (d1 == 0.0 && on_segment(&p3, &p4, &p1))
            || (d2 == 0.0 && on_segment(&p3, &p4, &p2))
            || (d3 == 0.0 && on_segment(&p1, &p2, &p3))
            || (d4 == 0.0 && on_segment(&p1, &p2, &p4))
    }
}

/// Cross product of (b - a) and (c - a)
fn orientation(a: &Point2D, b: &Point2D, c: &Point2D) -> f64 {
    (b.to_vector() - a.to_vector()).perp(&(c.to_vector() - a.to_vector()))
}

/// Whether collinear point `p` lies within the bounding box of `a`-`b`
fn on_segment(a: &Point2D, b: &Point2D, p: &Point2D) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Axis-aligned rectangle, used as the navigable area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    min: Point2D,
    max: Point2D,
}

impl Rectangle {
    /// Rectangle spanning two opposite corners, in any order
    pub fn new(corner_a: Point2D, corner_b: Point2D) -> Self {
        Self {
            min: Point2D::new(corner_a.x.min(corner_b.x), corner_a.y.min(corner_b.y)),
            max: Point2D::new(corner_a.x.max(corner_b.x), corner_a.y.max(corner_b.y)),
        }
    }

    pub fn from_center(center: Point2D, x_length: f64, y_length: f64) -> Self {
        let half_x = x_length / 2.0;
        let half_y = y_length / 2.0;
        Self::new(
            Point2D::new(center.x - half_x, center.y - half_y),
            Point2D::new(center.x + half_x, center.y + half_y),
        )
    }

    pub fn min_corner(&self) -> Point2D {
        self.min
    }

    pub fn max_corner(&self) -> Point2D {
        self.max
    }

    pub fn center(&self) -> Point2D {
        Point2D::new((self.min.x + self.max.x) / 2.0, (self.min.y + self.max.y) / 2.0)
    }

    pub fn x_length(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn y_length(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Finite corners and a strictly positive extent on both axes
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.x_length() > 0.0 && self.y_length() > 0.0
    }

    /// Boundary-inclusive containment
    pub fn contains(&self, p: &Point2D) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Corners in counter-clockwise order starting at the minimum corner
    pub fn corners(&self) -> [Point2D; 4] {
        [
            self.min,
            Point2D::new(self.max.x, self.min.y),
            self.max,
            Point2D::new(self.min.x, self.max.y),
        ]
    }
}

/// Path represented as a sequence of 2D points
#[derive(Debug, Clone, PartialEq)]
pub struct Path2D {
    pub points: Vec<Point2D>,
}

impl Path2D {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn from_points(points: Vec<Point2D>) -> Self {
        Self { points }
    }

    pub fn push(&mut self, point: Point2D) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&Point2D> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Point2D> {
        self.points.last()
    }

    pub fn x_coords(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    pub fn y_coords(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }

    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.points
            .iter()
            .tuple_windows()
            .map(|(a, b)| Segment::new(*a, *b))
    }

    pub fn total_length(&self) -> f64 {
        self.segments().map(|s| s.length()).sum()
    }

    /// True if no segment of the path crosses any of the obstacles
    pub fn is_collision_free(&self, obstacles: &[ObstaclePtr]) -> bool {
        self.segments()
            .all(|s| obstacles.iter().all(|obstacle| !obstacle.intersects(&s)))
    }
}

impl Default for Path2D {
    fn default() -> Self {
        Self::new()
    }
}
