use prereq_router::{RenderOptions, RoutingConfig, render_with_options, route_to_json};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RouteOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    jump_radius: Option<f32>,
    min_distance_from_node: Option<f32>,
    min_distance_between_jumps: Option<f32>,
    diagnostics: Option<bool>,
}

fn build_render_options(options: RouteOptions) -> RenderOptions {
    let mut render_options = if options.theme.as_deref() == Some("modern") {
        RenderOptions::modern()
    } else {
        RenderOptions::classic()
    };

    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        render_options.theme.font_size = font_size;
    }
    if let Some(diagnostics) = options.diagnostics {
        render_options.render.diagnostics = diagnostics;
    }
    apply_routing(&mut render_options.routing, &options);
    render_options
}

fn apply_routing(routing: &mut RoutingConfig, options: &RouteOptions) {
    if let Some(radius) = options.jump_radius {
        routing.jump_radius = radius;
    }
    if let Some(distance) = options.min_distance_from_node {
        routing.min_distance_from_node = distance;
    }
    if let Some(distance) = options.min_distance_between_jumps {
        routing.min_distance_between_jumps = distance;
    }
}

fn parse_options(options_json: Option<String>) -> Result<RouteOptions, JsValue> {
    match options_json {
        Some(raw_options) => serde_json::from_str::<RouteOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string())),
        None => Ok(RouteOptions::default()),
    }
}

/// Routes the scene and returns a complete SVG document.
#[wasm_bindgen]
pub fn route_connectors_svg(scene: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let render_options = build_render_options(parse_options(options_json)?);
    render_with_options(scene, render_options).map_err(|error| JsValue::from_str(&error.to_string()))
}

/// Routes the scene and returns per-connector path strings and diagnostics as JSON.
#[wasm_bindgen]
pub fn route_connectors_json(scene: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = parse_options(options_json)?;
    let mut routing = RoutingConfig::default();
    apply_routing(&mut routing, &options);
    route_to_json(scene, &routing).map_err(|error| JsValue::from_str(&error.to_string()))
}
