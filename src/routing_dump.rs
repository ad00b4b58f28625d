use crate::routing::{ArrowPath, RejectReason};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct RoutingDump {
    pub connector_count: usize,
    pub bridge_count: usize,
    pub unresolved_count: usize,
    pub total_length: f32,
    pub total_penalty: f32,
    pub connectors: Vec<ConnectorDump>,
}

#[derive(Debug, Serialize)]
pub struct ConnectorDump {
    pub id: String,
    pub path: String,
    pub segments: Vec<[f32; 4]>,
    pub bridges: Vec<BridgeDump>,
    pub hops: Vec<[f32; 2]>,
    pub unresolved: Vec<UnresolvedDump>,
    pub total_length: f32,
    pub turns: usize,
    pub penalty: f32,
}

#[derive(Debug, Serialize)]
pub struct BridgeDump {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub lifted: String,
    pub base: String,
}

#[derive(Debug, Serialize)]
pub struct UnresolvedDump {
    pub x: f32,
    pub y: f32,
    pub other: String,
    pub reason: RejectReason,
}

impl RoutingDump {
    pub fn from_paths(paths: &[ArrowPath]) -> Self {
        let connectors: Vec<ConnectorDump> = paths
            .iter()
            .map(|path| ConnectorDump {
                id: path.connector_id.clone(),
                path: path.path_string.clone(),
                segments: path
                    .segments
                    .iter()
                    .map(|s| [s.start.x, s.start.y, s.end.x, s.end.y])
                    .collect(),
                bridges: path
                    .bridges
                    .iter()
                    .map(|b| BridgeDump {
                        x: b.point.x,
                        y: b.point.y,
                        radius: b.radius,
                        lifted: b.lifted.id.clone(),
                        base: b.base.id.clone(),
                    })
                    .collect(),
                hops: path.hops.iter().map(|b| [b.point.x, b.point.y]).collect(),
                unresolved: path
                    .unresolved
                    .iter()
                    .map(|u| UnresolvedDump {
                        x: u.point.x,
                        y: u.point.y,
                        other: u.other_connector.clone(),
                        reason: u.reason,
                    })
                    .collect(),
                total_length: path.metrics.total_length,
                turns: path.metrics.turns,
                penalty: path.metrics.penalty,
            })
            .collect();

        RoutingDump {
            connector_count: connectors.len(),
            bridge_count: connectors.iter().map(|c| c.bridges.len()).sum(),
            unresolved_count: connectors.iter().map(|c| c.unresolved.len()).sum(),
            total_length: connectors.iter().map(|c| c.total_length).sum(),
            total_penalty: connectors.iter().map(|c| c.penalty).sum(),
            connectors,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub fn write_routing_dump(path: &Path, paths: &[ArrowPath]) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = RoutingDump::from_paths(paths);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoutingConfig;
    use crate::geometry::Point;
    use crate::routing::PathOptimizer;

    #[test]
    fn dump_totals_match_connectors() {
        let mut optimizer = PathOptimizer::new(RoutingConfig::default());
        optimizer.optimize_path(&[Point::new(0.0, 50.0), Point::new(100.0, 50.0)], "A");
        optimizer.optimize_path(&[Point::new(50.0, 0.0), Point::new(50.0, 100.0)], "B");
        let dump = RoutingDump::from_paths(&optimizer.placed_paths());

        assert_eq!(dump.connector_count, 2);
        assert_eq!(dump.bridge_count, 1);
        assert_eq!(dump.total_length, 200.0);
        assert_eq!(dump.total_penalty, 10.0);
        assert_eq!(dump.connectors[0].hops, vec![[50.0, 50.0]]);
        assert_eq!(dump.connectors[1].bridges[0].lifted, "A-0");

        let json = dump.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["connectors"][1]["bridges"][0]["base"], "B-0");
    }

    #[test]
    fn reasons_serialize_in_snake_case() {
        let dump = UnresolvedDump {
            x: 1.0,
            y: 2.0,
            other: "A".to_string(),
            reason: RejectReason::TooCloseToBridge,
        };
        let json = serde_json::to_string(&dump).unwrap();
        assert!(json.contains("\"too_close_to_bridge\""));
    }
}
