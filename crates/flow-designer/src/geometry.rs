//! 2D primitives shared by the graph model, hit-testing and the renderer

use serde::{Deserialize, Serialize};

/// A point in either graph space or screen space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Offset by another point treated as a vector
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Component-wise difference `self - other`
    pub fn sub(self, other: Point) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    /// Euclidean distance
    pub fn distance_to(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Width and height
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Inclusive containment test
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.origin.x
            && p.x <= self.origin.x + self.size.width
            && p.y >= self.origin.y
            && p.y <= self.origin.y + self.size.height
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }
}

/// A cubic bezier curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
}

impl CubicBezier {
    /// The connection curve between an output port and an input port.
    ///
    /// Control points are pushed horizontally away from each endpoint, so
    /// ports at different heights produce an S-curve.
    pub fn connection(from: Point, to: Point, control_offset: f64) -> Self {
        Self {
            start: from,
            control1: from.offset(control_offset, 0.0),
            control2: to.offset(-control_offset, 0.0),
            end: to,
        }
    }

    /// Evaluate the curve at `t` in [0, 1]
    pub fn point_at(&self, t: f64) -> Point {
        let u = 1.0 - t;
        let a = u * u * u;
        let b = 3.0 * u * u * t;
        let c = 3.0 * u * t * t;
        let d = t * t * t;
        Point::new(
            a * self.start.x + b * self.control1.x + c * self.control2.x + d * self.end.x,
            a * self.start.y + b * self.control1.y + c * self.control2.y + d * self.end.y,
        )
    }

    /// Shortest distance from `p` to the curve, flattened into `segments` lines
    pub fn distance_to(&self, p: Point, segments: usize) -> f64 {
        let segments = segments.max(1);
        let mut prev = self.start;
        let mut best = f64::INFINITY;
        for i in 1..=segments {
            let next = self.point_at(i as f64 / segments as f64);
            best = best.min(point_to_segment_distance(p, prev, next));
            prev = next;
        }
        best
    }
}

/// Distance from `p` to the segment `a..b` (clamped projection)
pub fn point_to_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let cx = b.x - a.x;
    let cy = b.y - a.y;
    let len_sq = cx * cx + cy * cy;
    if len_sq == 0.0 {
        return p.distance_to(a);
    }
    let t = (((p.x - a.x) * cx + (p.y - a.y) * cy) / len_sq).clamp(0.0, 1.0);
    p.distance_to(Point::new(a.x + t * cx, a.y + t * cy))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_edges() {
        let rect = Rect::new(Point::new(10.0, 10.0), Size::new(100.0, 50.0));
        assert!(rect.contains(Point::new(10.0, 10.0)));
        assert!(rect.contains(Point::new(110.0, 60.0)));
        assert!(!rect.contains(Point::new(110.1, 30.0)));
        assert!(!rect.contains(Point::new(50.0, 9.9)));
    }

    #[test]
    fn test_segment_distance_clamps_to_endpoints() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert_eq!(point_to_segment_distance(Point::new(5.0, 3.0), a, b), 3.0);
        assert_eq!(point_to_segment_distance(Point::new(-3.0, 4.0), a, b), 5.0);
        assert_eq!(point_to_segment_distance(Point::new(2.0, 2.0), a, a), 8f64.sqrt());
    }

    #[test]
    fn test_bezier_endpoints_and_midpoint() {
        let curve = CubicBezier::connection(Point::new(0.0, 0.0), Point::new(200.0, 100.0), 50.0);
        assert_eq!(curve.point_at(0.0), Point::new(0.0, 0.0));
        assert_eq!(curve.point_at(1.0), Point::new(200.0, 100.0));
        // symmetric S-curve passes through the midpoint of the endpoints
        let mid = curve.point_at(0.5);
        assert!((mid.x - 100.0).abs() < 1e-9);
        assert!((mid.y - 50.0).abs() < 1e-9);
        assert!(curve.distance_to(mid, 24) < 1.0);
    }
}
