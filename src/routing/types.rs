use serde::Serialize;

use crate::geometry::{Direction, Point, Segment};

/// Owned handle to a segment, kept by bridges after the intersection that produced
/// them is gone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentRef {
    pub id: String,
    pub connector_id: String,
    pub direction: Direction,
}

impl From<&Segment> for SegmentRef {
    fn from(segment: &Segment) -> Self {
        Self {
            id: segment.id.clone(),
            connector_id: segment.connector_id.clone(),
            direction: segment.direction(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntersectionKind {
    /// One horizontal and one vertical segment crossing.
    Crossing,
    /// Two collinear segments sharing a stretch; the point is the overlap midpoint.
    Overlap,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Intersection<'a> {
    pub point: Point,
    pub first: &'a Segment,
    pub second: &'a Segment,
    pub kind: IntersectionKind,
    pub is_at_endpoint: bool,
    pub preferred_lift: Direction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bridge {
    pub point: Point,
    pub radius: f32,
    pub lifted: SegmentRef,
    pub base: SegmentRef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    NearNode,
    NearSegmentEnd,
    TooCloseToBridge,
    ParallelOverlap,
}

/// A crossing that was found but left drawn as a plain overlap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnresolvedCrossing {
    pub point: Point,
    pub other_connector: String,
    pub reason: RejectReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PathMetrics {
    pub total_length: f32,
    pub turns: usize,
    pub penalty: f32,
}

/// Final drawing data for one connector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrowPath {
    pub connector_id: String,
    pub waypoints: Vec<Point>,
    pub segments: Vec<Segment>,
    /// Bridges accepted while this connector was placed, whichever side got lifted.
    pub bridges: Vec<Bridge>,
    /// Bridges drawn on this connector's own segments, including ones added later.
    pub hops: Vec<Bridge>,
    pub unresolved: Vec<UnresolvedCrossing>,
    pub path_string: String,
    pub metrics: PathMetrics,
}

impl ArrowPath {
    pub fn owns_segment(&self, segment_id: &str) -> bool {
        self.segments.iter().any(|segment| segment.id == segment_id)
    }
}
