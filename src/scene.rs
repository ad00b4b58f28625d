//! Plain-data hand-off from the layout step: positioned course boxes and routed
//! connector waypoints.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::config::RoutingConfig;
use crate::geometry::{NodeBox, Point};
use crate::routing::{ArrowPath, PathOptimizer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl SceneNode {
    pub fn bounds(&self) -> NodeBox {
        NodeBox::new(self.x, self.y, self.width, self.height)
    }

    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub id: String,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    pub waypoints: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub nodes: Vec<SceneNode>,
    #[serde(default)]
    pub connectors: Vec<Connector>,
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("invalid scene JSON: {0}")]
    Syntax(String),
    #[error("duplicate node id `{0}`")]
    DuplicateNode(String),
    #[error("duplicate connector id `{0}`")]
    DuplicateConnector(String),
    #[error("connector `{connector}` references unknown node `{node}`")]
    UnknownNode { connector: String, node: String },
    #[error("non-finite coordinate in {0}")]
    NonFinite(String),
    #[error("node `{0}` has a negative size")]
    NegativeSize(String),
}

pub fn parse_scene(input: &str) -> Result<Scene, SceneError> {
    let scene = match serde_json::from_str::<Scene>(input) {
        Ok(scene) => scene,
        Err(strict) => json5::from_str::<Scene>(input).map_err(|lenient| {
            tracing::debug!(%strict, "strict JSON parse failed, tried JSON5");
            SceneError::Syntax(lenient.to_string())
        })?,
    };
    scene.validate()?;
    tracing::debug!(
        nodes = scene.nodes.len(),
        connectors = scene.connectors.len(),
        "parsed scene"
    );
    Ok(scene)
}

impl Scene {
    pub fn validate(&self) -> Result<(), SceneError> {
        let mut node_ids = HashSet::new();
        for node in &self.nodes {
            if !node_ids.insert(node.id.as_str()) {
                return Err(SceneError::DuplicateNode(node.id.clone()));
            }
            let values = [node.x, node.y, node.width, node.height];
            if values.iter().any(|v| !v.is_finite()) {
                return Err(SceneError::NonFinite(format!("node `{}`", node.id)));
            }
            if node.width < 0.0 || node.height < 0.0 {
                return Err(SceneError::NegativeSize(node.id.clone()));
            }
        }

        let mut connector_ids = HashSet::new();
        for connector in &self.connectors {
            if !connector_ids.insert(connector.id.as_str()) {
                return Err(SceneError::DuplicateConnector(connector.id.clone()));
            }
            for endpoint in [&connector.from, &connector.to].into_iter().flatten() {
                if !node_ids.contains(endpoint.as_str()) {
                    return Err(SceneError::UnknownNode {
                        connector: connector.id.clone(),
                        node: endpoint.clone(),
                    });
                }
            }
            if connector.waypoints.iter().any(|p| !p.is_finite()) {
                return Err(SceneError::NonFinite(format!(
                    "connector `{}`",
                    connector.id
                )));
            }
        }
        Ok(())
    }

    pub fn node_boxes(&self) -> Vec<NodeBox> {
        self.nodes.iter().map(SceneNode::bounds).collect()
    }

    /// Smallest (min, max) corners covering every node and waypoint.
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let corners = self
            .nodes
            .iter()
            .flat_map(|n| [Point::new(n.x, n.y), Point::new(n.x + n.width, n.y + n.height)])
            .chain(
                self.connectors
                    .iter()
                    .flat_map(|c| c.waypoints.iter().copied()),
            );
        let mut bounds: Option<(Point, Point)> = None;
        for p in corners {
            bounds = Some(match bounds {
                None => (p, p),
                Some((min, max)) => (
                    Point::new(min.x.min(p.x), min.y.min(p.y)),
                    Point::new(max.x.max(p.x), max.y.max(p.y)),
                ),
            });
        }
        bounds
    }
}

/// Routes every connector of the scene in file order against a fresh optimizer.
pub fn route_scene(scene: &Scene, config: &RoutingConfig) -> Vec<ArrowPath> {
    let mut optimizer = PathOptimizer::with_nodes(config.clone(), scene.node_boxes());
    optimizer.route_all(
        scene
            .connectors
            .iter()
            .map(|c| (c.id.as_str(), c.waypoints.as_slice())),
    )
}
