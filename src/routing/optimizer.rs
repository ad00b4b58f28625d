//! Single-pass greedy placement of connectors.
//!
//! Connectors are placed one at a time in caller order. Each new connector is checked
//! against everything already placed; earlier connectors never reroute, although they can
//! pick up a hop when a later connector crosses one of their horizontal runs.

use tracing::{debug, debug_span, trace};

use crate::config::RoutingConfig;
use crate::geometry::{NodeBox, Point, dedup_waypoints, segments_from_waypoints, turn_count};

use super::bridge::{assemble_path, create_bridge};
use super::intersection::{Screening, find_intersection, screen_intersection};
use super::types::{ArrowPath, Bridge, PathMetrics, RejectReason, UnresolvedCrossing};

#[derive(Debug, Clone)]
pub struct PathOptimizer {
    config: RoutingConfig,
    nodes: Vec<NodeBox>,
    placed: Vec<ArrowPath>,
}

impl PathOptimizer {
    pub fn new(config: RoutingConfig) -> Self {
        Self::with_nodes(config, Vec::new())
    }

    pub fn with_nodes(config: RoutingConfig, nodes: Vec<NodeBox>) -> Self {
        Self {
            config,
            nodes,
            placed: Vec::new(),
        }
    }

    /// Replaces the node boxes used for node avoidance, e.g. after a reflow.
    pub fn set_nodes(&mut self, nodes: Vec<NodeBox>) {
        self.nodes = nodes;
    }

    /// Forgets every placed connector. Call before each full re-render.
    pub fn reset(&mut self) {
        self.placed.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    /// Snapshot of the placed connectors, in placement order.
    pub fn placed_paths(&self) -> Vec<ArrowPath> {
        self.placed.clone()
    }

    /// Places one connector against the history and returns its path.
    ///
    /// Placing an id that is already in the history redraws that connector: the old copy
    /// and every bridge it took part in are dropped first. The returned value does not pick
    /// up hops added by later connectors; read final strings from `placed_paths()` or
    /// `route_all`.
    pub fn optimize_path(&mut self, waypoints: &[Point], connector_id: &str) -> ArrowPath {
        let span = debug_span!("optimize_path", connector = connector_id);
        let _guard = span.enter();

        self.forget_connector(connector_id);

        let segments = segments_from_waypoints(connector_id, waypoints);
        let mut bridges: Vec<Bridge> = Vec::new();
        let mut unresolved: Vec<UnresolvedCrossing> = Vec::new();
        let tolerance = self.config.endpoint_tolerance;

        for segment in &segments {
            for existing in self.placed.iter().flat_map(|path| path.segments.iter()) {
                let Some(intersection) = find_intersection(segment, existing, tolerance) else {
                    continue;
                };
                let reject = |reason: RejectReason, unresolved: &mut Vec<UnresolvedCrossing>| {
                    trace!(
                        x = intersection.point.x,
                        y = intersection.point.y,
                        other = %existing.connector_id,
                        ?reason,
                        "crossing left unresolved"
                    );
                    unresolved.push(UnresolvedCrossing {
                        point: intersection.point,
                        other_connector: existing.connector_id.clone(),
                        reason,
                    });
                };
                match screen_intersection(&intersection, &self.nodes, &self.config) {
                    Screening::Join => continue,
                    Screening::Rejected(reason) => {
                        reject(reason, &mut unresolved);
                        continue;
                    }
                    Screening::Candidate => {}
                }
                let Some(bridge) = create_bridge(&intersection, &self.config) else {
                    reject(RejectReason::NearSegmentEnd, &mut unresolved);
                    continue;
                };
                if self.conflicts_with_accepted(bridge.point, &bridges) {
                    reject(RejectReason::TooCloseToBridge, &mut unresolved);
                    continue;
                }
                trace!(
                    x = bridge.point.x,
                    y = bridge.point.y,
                    lifted = %bridge.lifted.id,
                    base = %bridge.base.id,
                    "bridge accepted"
                );
                bridges.push(bridge);
            }
        }

        let hops: Vec<Bridge> = bridges
            .iter()
            .filter(|bridge| bridge.lifted.connector_id == connector_id)
            .cloned()
            .collect();
        self.apply_late_hops(connector_id, &bridges);

        let path_string = assemble_path(&segments, &hops);
        let metrics = PathMetrics {
            total_length: segments.iter().map(|segment| segment.length()).sum(),
            turns: turn_count(waypoints),
            penalty: self.config.bridge_penalty * bridges.len() as f32,
        };
        debug!(
            segments = segments.len(),
            bridges = bridges.len(),
            unresolved = unresolved.len(),
            length = metrics.total_length,
            "placed connector"
        );

        let path = ArrowPath {
            connector_id: connector_id.to_string(),
            waypoints: dedup_waypoints(waypoints),
            segments,
            bridges,
            hops,
            unresolved,
            path_string,
            metrics,
        };
        self.placed.push(path.clone());
        path
    }

    /// Resets, then places every connector in the given order. Returns the final history,
    /// including hops that later connectors added to earlier ones.
    pub fn route_all<'a, I>(&mut self, connectors: I) -> Vec<ArrowPath>
    where
        I: IntoIterator<Item = (&'a str, &'a [Point])>,
    {
        self.reset();
        for (connector_id, waypoints) in connectors {
            self.optimize_path(waypoints, connector_id);
        }
        self.placed_paths()
    }

    fn conflicts_with_accepted(&self, point: Point, pending: &[Bridge]) -> bool {
        let min = self.config.min_distance_between_jumps;
        self.placed
            .iter()
            .flat_map(|path| path.bridges.iter())
            .chain(pending.iter())
            .any(|bridge| bridge.point.distance_to(point) < min)
    }

    /// Removes a connector from the history along with every bridge it lifted or was the
    /// base of, and redraws the connectors that lose a hop.
    fn forget_connector(&mut self, connector_id: &str) {
        let before = self.placed.len();
        self.placed.retain(|path| path.connector_id != connector_id);
        if self.placed.len() == before {
            return;
        }
        let involves = |bridge: &Bridge| {
            bridge.lifted.connector_id == connector_id || bridge.base.connector_id == connector_id
        };
        let penalty = self.config.bridge_penalty;
        for path in &mut self.placed {
            path.bridges.retain(|bridge| !involves(bridge));
            path.metrics.penalty = penalty * path.bridges.len() as f32;
            let hops = path.hops.len();
            path.hops.retain(|bridge| !involves(bridge));
            if path.hops.len() != hops {
                path.path_string = assemble_path(&path.segments, &path.hops);
            }
        }
        debug!(connector = connector_id, "dropped previous placement");
    }

    /// Hands bridges that lift an earlier connector's segment over to that connector and
    /// redraws it.
    fn apply_late_hops(&mut self, connector_id: &str, bridges: &[Bridge]) {
        for bridge in bridges
            .iter()
            .filter(|bridge| bridge.lifted.connector_id != connector_id)
        {
            let Some(owner) = self
                .placed
                .iter_mut()
                .find(|path| path.owns_segment(&bridge.lifted.id))
            else {
                continue;
            };
            owner.hops.push(bridge.clone());
            owner.path_string = assemble_path(&owner.segments, &owner.hops);
            trace!(owner = %owner.connector_id, "redrew placed connector with new hop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(points: &[(f32, f32)]) -> Vec<Point> {
        points.iter().copied().map(Point::from).collect()
    }

    #[test]
    fn lone_connector_is_a_polyline() {
        let mut optimizer = PathOptimizer::new(RoutingConfig::default());
        let path = optimizer.optimize_path(&pts(&[(0.0, 0.0), (100.0, 0.0), (100.0, 50.0)]), "A");
        assert_eq!(path.path_string, "M 0 0 L 100 0 L 100 50");
        assert_eq!(path.segments.len(), 2);
        assert!(path.bridges.is_empty());
        assert_eq!(path.metrics.turns, 1);
        assert_eq!(path.metrics.total_length, 150.0);
        assert_eq!(path.metrics.penalty, 0.0);
    }

    #[test]
    fn later_crossing_lifts_the_earlier_horizontal() {
        let mut optimizer = PathOptimizer::new(RoutingConfig::default());
        optimizer.optimize_path(&pts(&[(0.0, 50.0), (100.0, 50.0)]), "A");
        let b = optimizer.optimize_path(&pts(&[(50.0, 0.0), (50.0, 100.0)]), "B");

        assert_eq!(b.path_string, "M 50 0 L 50 100");
        assert_eq!(b.bridges.len(), 1);
        assert!(b.hops.is_empty());
        assert_eq!(b.metrics.penalty, 10.0);

        let placed = optimizer.placed_paths();
        assert_eq!(placed[0].path_string, "M 0 50 L 40 50 Q 50 40 60 50 L 100 50");
        assert_eq!(placed[0].hops.len(), 1);
        assert_eq!(placed[0].metrics.penalty, 0.0);
    }

    #[test]
    fn later_horizontal_carries_its_own_hop() {
        let mut optimizer = PathOptimizer::new(RoutingConfig::default());
        optimizer.optimize_path(&pts(&[(50.0, 0.0), (50.0, 100.0)]), "A");
        let b = optimizer.optimize_path(&pts(&[(0.0, 50.0), (100.0, 50.0)]), "B");
        assert_eq!(b.path_string, "M 0 50 L 40 50 Q 50 40 60 50 L 100 50");
        assert_eq!(optimizer.placed_paths()[0].path_string, "M 50 0 L 50 100");
    }

    #[test]
    fn close_bridges_are_discarded() {
        let mut optimizer = PathOptimizer::new(RoutingConfig::default());
        optimizer.optimize_path(&pts(&[(0.0, 50.0), (200.0, 50.0)]), "A");
        let b = optimizer.optimize_path(&pts(&[(100.0, 0.0), (100.0, 100.0)]), "B");
        let c = optimizer.optimize_path(&pts(&[(110.0, 0.0), (110.0, 100.0)]), "C");

        assert_eq!(b.bridges.len(), 1);
        assert!(c.bridges.is_empty());
        assert_eq!(c.unresolved.len(), 1);
        assert_eq!(c.unresolved[0].reason, RejectReason::TooCloseToBridge);
        assert_eq!(c.unresolved[0].other_connector, "A");
        assert_eq!(optimizer.placed_paths()[0].hops.len(), 1);
    }

    #[test]
    fn crossings_near_nodes_stay_unbridged() {
        let nodes = vec![NodeBox::new(60.0, 60.0, 80.0, 40.0)];
        let mut optimizer = PathOptimizer::with_nodes(RoutingConfig::default(), nodes);
        optimizer.optimize_path(&pts(&[(0.0, 50.0), (200.0, 50.0)]), "A");
        let b = optimizer.optimize_path(&pts(&[(100.0, 0.0), (100.0, 55.0)]), "B");
        assert!(b.bridges.is_empty());
        assert_eq!(b.unresolved[0].reason, RejectReason::NearNode);
    }

    #[test]
    fn path_joins_are_not_reported() {
        let mut optimizer = PathOptimizer::new(RoutingConfig::default());
        optimizer.optimize_path(&pts(&[(0.0, 50.0), (100.0, 50.0)]), "A");
        let b = optimizer.optimize_path(&pts(&[(100.0, 50.0), (100.0, 150.0)]), "B");
        assert!(b.bridges.is_empty());
        assert!(b.unresolved.is_empty());
    }

    #[test]
    fn degenerate_waypoints_give_an_empty_path() {
        let mut optimizer = PathOptimizer::new(RoutingConfig::default());
        let single = optimizer.optimize_path(&pts(&[(5.0, 5.0)]), "A");
        assert_eq!(single.path_string, "");
        let repeated = optimizer.optimize_path(&pts(&[(5.0, 5.0), (5.0, 5.0)]), "B");
        assert_eq!(repeated.path_string, "");
        let empty = optimizer.optimize_path(&[], "C");
        assert_eq!(empty.path_string, "");
        assert_eq!(empty.metrics, PathMetrics::default());
    }

    #[test]
    fn reset_returns_to_empty() {
        let mut optimizer = PathOptimizer::new(RoutingConfig::default());
        assert!(optimizer.is_empty());
        optimizer.optimize_path(&pts(&[(0.0, 50.0), (200.0, 50.0)]), "A");
        assert!(!optimizer.is_empty());
        optimizer.reset();
        assert!(optimizer.is_empty());
        assert!(optimizer.placed_paths().is_empty());

        let b = optimizer.optimize_path(&pts(&[(100.0, 0.0), (100.0, 100.0)]), "B");
        assert!(b.bridges.is_empty());
    }

    #[test]
    fn placed_paths_is_a_copy() {
        let mut optimizer = PathOptimizer::new(RoutingConfig::default());
        optimizer.optimize_path(&pts(&[(0.0, 0.0), (10.0, 0.0)]), "A");
        let mut snapshot = optimizer.placed_paths();
        snapshot[0].path_string.clear();
        assert_eq!(optimizer.placed_paths()[0].path_string, "M 0 0 L 10 0");
    }

    #[test]
    fn route_all_applies_late_hops() {
        let a = pts(&[(0.0, 50.0), (100.0, 50.0)]);
        let b = pts(&[(50.0, 0.0), (50.0, 100.0)]);
        let mut optimizer = PathOptimizer::new(RoutingConfig::default());
        optimizer.optimize_path(&pts(&[(500.0, 500.0), (600.0, 500.0)]), "stale");
        let paths = optimizer.route_all([("A", a.as_slice()), ("B", b.as_slice())]);
        assert_eq!(paths.len(), 2);
        assert!(paths[0].path_string.contains("Q 50 40 60 50"));
    }

    #[test]
    fn redrawing_a_connector_replaces_its_old_placement() {
        let mut optimizer = PathOptimizer::new(RoutingConfig::default());
        let a = pts(&[(0.0, 50.0), (100.0, 50.0)]);
        optimizer.optimize_path(&a, "A");
        optimizer.optimize_path(&pts(&[(50.0, 0.0), (50.0, 100.0)]), "B");
        let redrawn = optimizer.optimize_path(&a, "A");

        assert_eq!(redrawn.path_string, "M 0 50 L 40 50 Q 50 40 60 50 L 100 50");
        assert!(redrawn.unresolved.is_empty());
        assert_eq!(redrawn.bridges.len(), 1);
        assert_eq!(redrawn.metrics.penalty, 10.0);

        let placed = optimizer.placed_paths();
        let ids: Vec<&str> = placed.iter().map(|p| p.connector_id.as_str()).collect();
        assert_eq!(ids, ["B", "A"]);
        assert!(placed[0].bridges.is_empty());
        assert_eq!(placed[0].metrics.penalty, 0.0);
        assert_eq!(placed[1].hops.len(), 1);
    }

    #[test]
    fn redrawing_a_base_connector_drops_the_hop_it_caused() {
        let mut optimizer = PathOptimizer::new(RoutingConfig::default());
        optimizer.optimize_path(&pts(&[(0.0, 50.0), (100.0, 50.0)]), "A");
        optimizer.optimize_path(&pts(&[(50.0, 0.0), (50.0, 100.0)]), "B");
        optimizer.optimize_path(&pts(&[(300.0, 0.0), (300.0, 100.0)]), "B");

        let placed = optimizer.placed_paths();
        assert_eq!(placed[0].path_string, "M 0 50 L 100 50");
        assert!(placed[0].hops.is_empty());
        assert!(placed[1].bridges.is_empty());
    }

    #[test]
    fn parallel_overlaps_hop_sideways_when_enabled() {
        let config = RoutingConfig {
            bridge_parallel_overlaps: true,
            ..RoutingConfig::default()
        };
        let mut optimizer = PathOptimizer::new(config);
        optimizer.optimize_path(&pts(&[(100.0, 0.0), (100.0, 200.0)]), "A");
        let b = optimizer.optimize_path(&pts(&[(100.0, 50.0), (100.0, 150.0)]), "B");

        assert_eq!(b.bridges.len(), 1);
        assert_eq!(b.bridges[0].lifted.id, "B-0");
        assert_eq!(b.path_string, "M 100 50 L 100 90 Q 90 100 100 110 L 100 150");

        optimizer.optimize_path(&pts(&[(300.0, 40.0), (300.0, 160.0)]), "C");
        let d = optimizer.optimize_path(&pts(&[(300.0, 0.0), (300.0, 300.0)]), "D");
        assert_eq!(d.path_string, "M 300 0 L 300 300");
        assert_eq!(d.bridges[0].lifted.id, "C-0");

        let placed = optimizer.placed_paths();
        assert_eq!(placed[2].path_string, "M 300 40 L 300 90 Q 290 100 300 110 L 300 160");
        assert_eq!(placed[0].path_string, "M 100 0 L 100 200");
    }

    #[test]
    fn parallel_overlaps_are_reported_by_default() {
        let mut optimizer = PathOptimizer::new(RoutingConfig::default());
        optimizer.optimize_path(&pts(&[(100.0, 0.0), (100.0, 200.0)]), "A");
        let b = optimizer.optimize_path(&pts(&[(100.0, 50.0), (100.0, 150.0)]), "B");
        assert!(b.bridges.is_empty());
        assert_eq!(b.unresolved[0].reason, RejectReason::ParallelOverlap);
        assert_eq!(b.path_string, "M 100 50 L 100 150");
    }

    #[test]
    fn set_nodes_applies_to_the_next_routing_pass() {
        let a = pts(&[(0.0, 50.0), (200.0, 50.0)]);
        let b = pts(&[(100.0, 0.0), (100.0, 100.0)]);
        let mut optimizer = PathOptimizer::new(RoutingConfig::default());
        let first = optimizer.route_all([("A", a.as_slice()), ("B", b.as_slice())]);
        assert_eq!(first[1].bridges.len(), 1);

        optimizer.set_nodes(vec![NodeBox::new(110.0, 60.0, 80.0, 40.0)]);
        let second = optimizer.route_all([("A", a.as_slice()), ("B", b.as_slice())]);
        assert!(second[1].bridges.is_empty());
        assert_eq!(second[1].unresolved[0].reason, RejectReason::NearNode);
        assert_eq!(second[0].path_string, "M 0 50 L 200 50");
    }
}
