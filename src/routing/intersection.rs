//! Pairwise crossing detection between orthogonal segments.
//!
//! Only segments owned by different connectors are compared. A crossing that lands on a
//! segment end is a join between paths and never becomes a bridge candidate, and crossings
//! hugging a node box are left alone so hops never sit on top of a course box.

use crate::config::RoutingConfig;
use crate::geometry::{Direction, EPSILON, NodeBox, Point, Segment};

use super::types::{Intersection, IntersectionKind, RejectReason};

/// Outcome of screening one raw intersection against the routing rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screening {
    /// Paths meet at a segment end; nothing to report.
    Join,
    Rejected(RejectReason),
    Candidate,
}

pub fn find_intersection<'a>(
    a: &'a Segment,
    b: &'a Segment,
    tolerance: f32,
) -> Option<Intersection<'a>> {
    if a.connector_id == b.connector_id {
        return None;
    }
    let (point, kind) = match (a.direction(), b.direction()) {
        (Direction::Horizontal, Direction::Vertical) => {
            (orthogonal_crossing(a, b, tolerance)?, IntersectionKind::Crossing)
        }
        (Direction::Vertical, Direction::Horizontal) => {
            (orthogonal_crossing(b, a, tolerance)?, IntersectionKind::Crossing)
        }
        _ => (parallel_overlap(a, b, tolerance)?, IntersectionKind::Overlap),
    };
    let is_at_endpoint =
        a.touches_endpoint(point, tolerance) || b.touches_endpoint(point, tolerance);
    Some(Intersection {
        point,
        first: a,
        second: b,
        kind,
        is_at_endpoint,
        preferred_lift: Direction::Horizontal,
    })
}

fn orthogonal_crossing(horizontal: &Segment, vertical: &Segment, tolerance: f32) -> Option<Point> {
    let point = Point::new(vertical.cross_coord(), horizontal.cross_coord());
    let (x0, x1) = horizontal.axis_range();
    let (y0, y1) = vertical.axis_range();
    if within(point.x, x0, x1, tolerance) && within(point.y, y0, y1, tolerance) {
        Some(point)
    } else {
        None
    }
}

fn parallel_overlap(a: &Segment, b: &Segment, tolerance: f32) -> Option<Point> {
    let lane = a.cross_coord();
    if (lane - b.cross_coord()).abs() > tolerance {
        return None;
    }
    let (a0, a1) = a.axis_range();
    let (b0, b1) = b.axis_range();
    let lo = a0.max(b0);
    let hi = a1.min(b1);
    // Collinear runs that merely touch end to end are joins, not overlaps.
    if hi - lo <= tolerance {
        return None;
    }
    let mid = (lo + hi) / 2.0;
    let lane = (lane + b.cross_coord()) / 2.0;
    Some(match a.direction() {
        Direction::Horizontal => Point::new(mid, lane),
        Direction::Vertical => Point::new(lane, mid),
    })
}

fn within(value: f32, lo: f32, hi: f32, slack: f32) -> bool {
    value >= lo - slack - EPSILON && value <= hi + slack + EPSILON
}

/// True when `point` lies within `min_distance` of any node box edge (or inside a box).
pub fn is_near_node(point: Point, nodes: &[NodeBox], min_distance: f32) -> bool {
    nodes
        .iter()
        .any(|node| node.distance_to(point) < min_distance)
}

pub fn screen_intersection(
    intersection: &Intersection<'_>,
    nodes: &[NodeBox],
    config: &RoutingConfig,
) -> Screening {
    if intersection.is_at_endpoint {
        return Screening::Join;
    }
    if intersection.kind == IntersectionKind::Overlap && !config.bridge_parallel_overlaps {
        return Screening::Rejected(RejectReason::ParallelOverlap);
    }
    if is_near_node(intersection.point, nodes, config.min_distance_from_node) {
        return Screening::Rejected(RejectReason::NearNode);
    }
    Screening::Candidate
}

/// All bridge candidates among `segments`, compared all-against-all.
pub fn detect_intersections<'a>(
    segments: &'a [Segment],
    nodes: &[NodeBox],
    config: &RoutingConfig,
) -> Vec<Intersection<'a>> {
    let mut found = Vec::new();
    for (idx, a) in segments.iter().enumerate() {
        for b in &segments[idx + 1..] {
            let Some(intersection) = find_intersection(a, b, config.endpoint_tolerance) else {
                continue;
            };
            if screen_intersection(&intersection, nodes, config) == Screening::Candidate {
                found.push(intersection);
            }
        }
    }
    tracing::trace!(
        segments = segments.len(),
        candidates = found.len(),
        "detected intersections"
    );
    found
}
