//! Hop-over bridges: which of two crossing segments jumps, and how the jump is drawn.

use crate::config::RoutingConfig;
use crate::geometry::{Direction, EPSILON, Point, Segment};

use super::types::{Bridge, Intersection, SegmentRef};

/// Returns `(lifted, base)` for an intersection.
///
/// A horizontal/vertical pair always lifts the segment matching the intersection's
/// preferred lift direction (horizontal by default), whatever the operand order. Parallel
/// pairs lift the shorter segment, and the first operand on a tie.
pub fn decide_lifted_segment<'a>(intersection: &Intersection<'a>) -> (&'a Segment, &'a Segment) {
    let first = intersection.first;
    let second = intersection.second;
    if first.direction() != second.direction() {
        if first.direction() == intersection.preferred_lift {
            (first, second)
        } else {
            (second, first)
        }
    } else if second.length() < first.length() {
        (second, first)
    } else {
        (first, second)
    }
}

/// Builds a bridge for the intersection, or `None` when the hop would crowd a corner
/// or segment end of either segment.
pub fn create_bridge(intersection: &Intersection<'_>, config: &RoutingConfig) -> Option<Bridge> {
    let (lifted, base) = decide_lifted_segment(intersection);
    let point = intersection.point;
    let guard = config.min_distance_from_node;
    if lifted.distance_to_endpoints(point) < guard || base.distance_to_endpoints(point) < guard {
        return None;
    }
    Some(Bridge {
        point,
        radius: config.jump_radius,
        lifted: SegmentRef::from(lifted),
        base: SegmentRef::from(base),
    })
}

/// Standalone path for one segment with its hops.
pub fn generate_bridge_path(segment: &Segment, bridges: &[Bridge]) -> String {
    let mut path = PathData::new();
    path.move_to(segment.start);
    push_segment(&mut path, segment, bridges);
    path.finish()
}

/// Path for a whole connector: one move-to, then every segment in order.
pub fn assemble_path(segments: &[Segment], bridges: &[Bridge]) -> String {
    let Some(first) = segments.first() else {
        return String::new();
    };
    let mut path = PathData::new();
    path.move_to(first.start);
    for segment in segments {
        push_segment(&mut path, segment, bridges);
    }
    path.finish()
}

/// Appends the line/curve commands for `segment`, assuming the pen sits at its start.
/// Only bridges lifting this segment are drawn, in order of travel.
fn push_segment(path: &mut PathData, segment: &Segment, bridges: &[Bridge]) {
    let sign = segment.travel_sign();
    let origin = segment.axis_coord(segment.start);
    let span = (segment.axis_coord(segment.end) - origin).abs();

    let mut hops: Vec<(f32, &Bridge)> = bridges
        .iter()
        .filter(|bridge| bridge.lifted.id == segment.id)
        .map(|bridge| ((segment.axis_coord(bridge.point) - origin) * sign, bridge))
        .collect();
    hops.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut cursor = 0.0f32;
    for (offset, bridge) in hops {
        let entry = (offset - bridge.radius).max(cursor);
        let exit = (offset + bridge.radius).min(span);
        if exit - entry <= EPSILON {
            continue;
        }
        path.line_to(point_along(segment, origin, sign, entry));
        path.quad_to(
            arc_control(segment, origin, sign, offset, bridge.radius),
            point_along(segment, origin, sign, exit),
        );
        cursor = exit;
    }
    path.line_to(segment.end);
}

fn point_along(segment: &Segment, origin: f32, sign: f32, offset: f32) -> Point {
    let axis = origin + sign * offset;
    match segment.direction() {
        Direction::Horizontal => Point::new(axis, segment.cross_coord()),
        Direction::Vertical => Point::new(segment.cross_coord(), axis),
    }
}

/// Control point of the hop: raised towards -y on horizontal runs, pushed towards -x on
/// vertical runs.
fn arc_control(segment: &Segment, origin: f32, sign: f32, offset: f32, radius: f32) -> Point {
    let center = point_along(segment, origin, sign, offset);
    match segment.direction() {
        Direction::Horizontal => Point::new(center.x, center.y - radius),
        Direction::Vertical => Point::new(center.x - radius, center.y),
    }
}

/// Minimal builder for SVG path data with absolute commands.
#[derive(Debug, Default)]
pub struct PathData {
    d: String,
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    fn command(&mut self, cmd: char, points: &[Point]) {
        if !self.d.is_empty() {
            self.d.push(' ');
        }
        self.d.push(cmd);
        for point in points {
            self.d.push(' ');
            self.d.push_str(&fmt_num(point.x));
            self.d.push(' ');
            self.d.push_str(&fmt_num(point.y));
        }
    }

    pub fn move_to(&mut self, point: Point) {
        self.command('M', &[point]);
    }

    pub fn line_to(&mut self, point: Point) {
        self.command('L', &[point]);
    }

    pub fn quad_to(&mut self, control: Point, end: Point) {
        self.command('Q', &[control, end]);
    }

    pub fn finish(self) -> String {
        self.d
    }
}

/// Formats a coordinate rounded to two decimals without trailing zeros.
pub fn fmt_num(value: f32) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{rounded}")
}
