use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Radius of the hop arc drawn over a crossing.
    pub jump_radius: f32,
    /// Crossings closer than this to a node box (or to a segment end) stay un-bridged.
    pub min_distance_from_node: f32,
    /// Minimum centre-to-centre distance between two bridges.
    pub min_distance_between_jumps: f32,
    /// Pixel slack used for endpoint and collinearity tests.
    pub endpoint_tolerance: f32,
    /// Penalty added per accepted bridge.
    pub bridge_penalty: f32,
    /// Bridge collinear overlaps instead of only reporting them.
    pub bridge_parallel_overlaps: bool,
    pub gutter_x: f32,
    pub gutter_y: f32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            jump_radius: 10.0,
            min_distance_from_node: 20.0,
            min_distance_between_jumps: 25.0,
            endpoint_tolerance: 2.0,
            bridge_penalty: 10.0,
            bridge_parallel_overlaps: false,
            gutter_x: 40.0,
            gutter_y: 40.0,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("routing.{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f32 },
    #[error("routing.{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("routing.{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },
}

impl RoutingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("jumpRadius", self.jump_radius),
            ("minDistanceFromNode", self.min_distance_from_node),
            ("minDistanceBetweenJumps", self.min_distance_between_jumps),
            ("endpointTolerance", self.endpoint_tolerance),
            ("bridgePenalty", self.bridge_penalty),
            ("gutterX", self.gutter_x),
            ("gutterY", self.gutter_y),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if self.jump_radius <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "jumpRadius",
                value: self.jump_radius,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
    pub stroke_width: f32,
    pub corner_radius: f32,
    /// Overlay bridge and unresolved-crossing markers.
    pub diagnostics: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background: "#FFFFFF".to_string(),
            stroke_width: 1.5,
            corner_radius: 8.0,
            diagnostics: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub routing: RoutingConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::classic();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            routing: RoutingConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    node_fill: Option<String>,
    node_border: Option<String>,
    text_color: Option<String>,
    line_color: Option<String>,
    bridge_marker: Option<String>,
    unresolved_marker: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RoutingConfigFile {
    jump_radius: Option<f32>,
    min_distance_from_node: Option<f32>,
    min_distance_between_jumps: Option<f32>,
    endpoint_tolerance: Option<f32>,
    bridge_penalty: Option<f32>,
    bridge_parallel_overlaps: Option<bool>,
    gutter_x: Option<f32>,
    gutter_y: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    stroke_width: Option<f32>,
    corner_radius: Option<f32>,
    diagnostics: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    routing: Option<RoutingConfigFile>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    let config = parse_config(&contents)?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "modern" => config.theme = Theme::modern(),
            "classic" | "default" => config.theme = Theme::classic(),
            other => tracing::warn!(theme = other, "unknown theme name, keeping default"),
        }
        config.render.background = config.theme.background.clone();
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.node_fill {
            config.theme.node_fill = v;
        }
        if let Some(v) = vars.node_border {
            config.theme.node_border = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.bridge_marker {
            config.theme.bridge_marker = v;
        }
        if let Some(v) = vars.unresolved_marker {
            config.theme.unresolved_marker = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v.clone();
            config.render.background = v;
        }
    }

    if let Some(routing) = parsed.routing {
        if let Some(v) = routing.jump_radius {
            config.routing.jump_radius = v;
        }
        if let Some(v) = routing.min_distance_from_node {
            config.routing.min_distance_from_node = v;
        }
        if let Some(v) = routing.min_distance_between_jumps {
            config.routing.min_distance_between_jumps = v;
        }
        if let Some(v) = routing.endpoint_tolerance {
            config.routing.endpoint_tolerance = v;
        }
        if let Some(v) = routing.bridge_penalty {
            config.routing.bridge_penalty = v;
        }
        if let Some(v) = routing.bridge_parallel_overlaps {
            config.routing.bridge_parallel_overlaps = v;
        }
        if let Some(v) = routing.gutter_x {
            config.routing.gutter_x = v;
        }
        if let Some(v) = routing.gutter_y {
            config.routing.gutter_y = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.stroke_width {
            config.render.stroke_width = v;
        }
        if let Some(v) = render.corner_radius {
            config.render.corner_radius = v;
        }
        if let Some(v) = render.diagnostics {
            config.render.diagnostics = v;
        }
    }

    config.routing.validate()?;
    Ok(config)
}
