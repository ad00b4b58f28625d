//! Geometry primitives shared by the routing passes.

use serde::{Deserialize, Serialize};

/// Tolerance used when comparing coordinates for equality.
pub const EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Horizontal,
    Vertical,
}

/// Classifies the run from `a` to `b`. Diagonal input is snapped to the dominant axis,
/// with exact diagonals counted as horizontal.
pub fn direction(a: Point, b: Point) -> Direction {
    if (b.x - a.x).abs() >= (b.y - a.y).abs() {
        Direction::Horizontal
    } else {
        Direction::Vertical
    }
}

pub fn points_equal(p: Point, q: Point, tolerance: f32) -> bool {
    (p.x - q.x).abs() <= tolerance && (p.y - q.y).abs() <= tolerance
}

/// A directed, axis-aligned piece of one connector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub id: String,
    pub connector_id: String,
    pub index: usize,
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(connector_id: &str, index: usize, start: Point, end: Point) -> Self {
        Self {
            id: format!("{connector_id}-{index}"),
            connector_id: connector_id.to_string(),
            index,
            start,
            end,
        }
    }

    pub fn direction(&self) -> Direction {
        direction(self.start, self.end)
    }

    pub fn length(&self) -> f32 {
        length(self)
    }

    /// Coordinate along the principal axis (x for horizontal, y for vertical).
    pub fn axis_coord(&self, point: Point) -> f32 {
        match self.direction() {
            Direction::Horizontal => point.x,
            Direction::Vertical => point.y,
        }
    }

    /// Inclusive range covered along the principal axis.
    pub fn axis_range(&self) -> (f32, f32) {
        let a = self.axis_coord(self.start);
        let b = self.axis_coord(self.end);
        (a.min(b), a.max(b))
    }

    /// Fixed coordinate across the principal axis (y for horizontal, x for vertical).
    pub fn cross_coord(&self) -> f32 {
        match self.direction() {
            Direction::Horizontal => (self.start.y + self.end.y) / 2.0,
            Direction::Vertical => (self.start.x + self.end.x) / 2.0,
        }
    }

    /// +1 when travelling towards larger axis coordinates, -1 otherwise.
    pub fn travel_sign(&self) -> f32 {
        if self.axis_coord(self.end) >= self.axis_coord(self.start) {
            1.0
        } else {
            -1.0
        }
    }

    pub fn touches_endpoint(&self, point: Point, tolerance: f32) -> bool {
        points_equal(self.start, point, tolerance) || points_equal(self.end, point, tolerance)
    }

    pub fn distance_to_endpoints(&self, point: Point) -> f32 {
        self.start.distance_to(point).min(self.end.distance_to(point))
    }
}

pub fn length(segment: &Segment) -> f32 {
    segment.start.distance_to(segment.end)
}

/// Splits a waypoint list into consecutive segments, dropping zero-length steps.
pub fn segments_from_waypoints(connector_id: &str, waypoints: &[Point]) -> Vec<Segment> {
    let points = dedup_waypoints(waypoints);
    points
        .windows(2)
        .enumerate()
        .map(|(idx, pair)| Segment::new(connector_id, idx, pair[0], pair[1]))
        .collect()
}

pub fn dedup_waypoints(waypoints: &[Point]) -> Vec<Point> {
    let mut points: Vec<Point> = Vec::with_capacity(waypoints.len());
    for &point in waypoints {
        if let Some(last) = points.last()
            && points_equal(*last, point, EPSILON)
        {
            continue;
        }
        points.push(point);
    }
    points
}

/// Counts direction changes across consecutive waypoint triples.
pub fn turn_count(waypoints: &[Point]) -> usize {
    let points = dedup_waypoints(waypoints);
    if points.len() < 3 {
        return 0;
    }
    let mut turns = 0usize;
    for triple in points.windows(3) {
        let (p0, p1, p2) = (triple[0], triple[1], triple[2]);
        let dx1 = p1.x - p0.x;
        let dy1 = p1.y - p0.y;
        let dx2 = p2.x - p1.x;
        let dy2 = p2.y - p1.y;
        let cross = dx1 * dy2 - dy1 * dx2;
        if cross.abs() > EPSILON {
            turns += 1;
        }
    }
    turns
}

/// Bounding box of a course node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl NodeBox {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Distance from `point` to the nearest edge of the box; zero inside.
    pub fn distance_to(&self, point: Point) -> f32 {
        let dx = (self.x - point.x).max(0.0).max(point.x - self.right());
        let dy = (self.y - point.y).max(0.0).max(point.y - self.bottom());
        (dx * dx + dy * dy).sqrt()
    }
}
