#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod geometry;
pub mod render;
pub mod routing;
pub mod routing_dump;
pub mod scene;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, RenderConfig, RoutingConfig, load_config};
pub use geometry::{Direction, NodeBox, Point, Segment};
pub use render::render_svg;
pub use routing::{ArrowPath, Bridge, PathOptimizer};
pub use routing_dump::RoutingDump;
pub use scene::{Scene, SceneError, parse_scene, route_scene};
pub use theme::Theme;

/// Everything needed to turn a scene into output without touching the filesystem.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub theme: Theme,
    pub routing: RoutingConfig,
    pub render: RenderConfig,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::classic()
    }
}

impl RenderOptions {
    pub fn classic() -> Self {
        let config = Config::default();
        Self {
            theme: config.theme,
            routing: config.routing,
            render: config.render,
        }
    }

    pub fn modern() -> Self {
        let theme = Theme::modern();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..RenderConfig::default()
        };
        Self {
            theme,
            routing: RoutingConfig::default(),
            render,
        }
    }
}

impl From<Config> for RenderOptions {
    fn from(config: Config) -> Self {
        Self {
            theme: config.theme,
            routing: config.routing,
            render: config.render,
        }
    }
}

/// Parses a scene, routes its connectors and renders the result to SVG.
pub fn render_with_options(input: &str, options: RenderOptions) -> anyhow::Result<String> {
    options.routing.validate()?;
    let scene = parse_scene(input)?;
    let paths = route_scene(&scene, &options.routing);
    Ok(render_svg(
        &scene,
        &paths,
        &options.theme,
        &options.routing,
        &options.render,
    ))
}

/// Parses a scene, routes its connectors and returns the JSON diagnostics dump.
pub fn route_to_json(input: &str, routing: &RoutingConfig) -> anyhow::Result<String> {
    routing.validate()?;
    let scene = parse_scene(input)?;
    let paths = route_scene(&scene, routing);
    Ok(RoutingDump::from_paths(&paths).to_json()?)
}
