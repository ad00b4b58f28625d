use crate::config::{RenderConfig, RoutingConfig};
use crate::geometry::Point;
use crate::routing::{ArrowPath, fmt_num};
use crate::scene::Scene;
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

/// Size of the diagnostic cross drawn over unresolved crossings.
const UNRESOLVED_MARK: f32 = 4.0;

pub fn render_svg(
    scene: &Scene,
    paths: &[ArrowPath],
    theme: &Theme,
    routing: &RoutingConfig,
    config: &RenderConfig,
) -> String {
    let (width, height) = canvas_size(scene, routing, config);
    let mut svg = String::new();

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
        w = fmt_num(width),
        h = fmt_num(height),
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        config.background
    ));

    svg.push_str("<defs>");
    svg.push_str(&format!(
        "<marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"6\" markerHeight=\"6\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\"/></marker>",
        theme.line_color
    ));
    svg.push_str("</defs>");

    // Connectors go first so course boxes cover their ends.
    for path in paths {
        if path.path_string.is_empty() {
            continue;
        }
        svg.push_str(&format!(
            "<path data-connector=\"{}\" d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" marker-end=\"url(#arrow)\"/>",
            escape_xml(&path.connector_id),
            path.path_string,
            theme.line_color,
            fmt_num(config.stroke_width)
        ));
    }

    for node in &scene.nodes {
        svg.push_str(&format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{r}\" ry=\"{r}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
            fmt_num(node.x),
            fmt_num(node.y),
            fmt_num(node.width),
            fmt_num(node.height),
            theme.node_fill,
            theme.node_border,
            fmt_num(config.stroke_width),
            r = fmt_num(config.corner_radius),
        ));
        let center = node.bounds().center();
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            fmt_num(center.x),
            fmt_num(center.y),
            escape_xml(&theme.font_family),
            fmt_num(theme.font_size),
            theme.text_color,
            escape_xml(node.display_label())
        ));
    }

    if config.diagnostics {
        svg.push_str(&diagnostics_overlay(paths, theme));
    }

    svg.push_str("</svg>");
    svg
}

fn canvas_size(scene: &Scene, routing: &RoutingConfig, config: &RenderConfig) -> (f32, f32) {
    let Some((_, max)) = scene.bounds() else {
        return (config.width, config.height);
    };
    (
        config.width.max(max.x + routing.gutter_x),
        config.height.max(max.y + routing.gutter_y),
    )
}

fn diagnostics_overlay(paths: &[ArrowPath], theme: &Theme) -> String {
    let mut out = String::from("<g class=\"routing-diagnostics\">");
    for bridge in paths.iter().flat_map(|path| path.bridges.iter()) {
        out.push_str(&format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"none\" stroke=\"{}\" stroke-dasharray=\"2 2\"/>",
            fmt_num(bridge.point.x),
            fmt_num(bridge.point.y),
            fmt_num(bridge.radius),
            theme.bridge_marker
        ));
    }
    for crossing in paths.iter().flat_map(|path| path.unresolved.iter()) {
        out.push_str(&cross_mark(crossing.point, &theme.unresolved_marker));
    }
    out.push_str("</g>");
    out
}

fn cross_mark(point: Point, color: &str) -> String {
    let s = UNRESOLVED_MARK;
    format!(
        "<path d=\"M {} {} L {} {} M {} {} L {} {}\" stroke=\"{color}\" stroke-width=\"1.2\"/>",
        fmt_num(point.x - s),
        fmt_num(point.y - s),
        fmt_num(point.x + s),
        fmt_num(point.y + s),
        fmt_num(point.x - s),
        fmt_num(point.y + s),
        fmt_num(point.x + s),
        fmt_num(point.y - s),
    )
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("Invalid render size"))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
