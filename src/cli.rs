use crate::config::load_config;
use crate::render::{render_svg, write_output_svg};
use crate::routing_dump::{RoutingDump, write_routing_dump};
use crate::scene::{parse_scene, route_scene};
use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "prereq-route",
    version,
    about = "Route prerequisite arrows with hop-over bridges"
)]
pub struct Args {
    /// Scene file (.json / .json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for SVG and JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme, routing and render settings)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Minimum canvas width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Minimum canvas height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Overlay bridge and unresolved-crossing markers
    #[arg(long = "diagnostics")]
    pub diagnostics: bool,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    if args.diagnostics {
        config.render.diagnostics = true;
    }

    let input = read_input(args.input.as_deref())?;
    let scene = parse_scene(&input)?;
    let paths = route_scene(&scene, &config.routing);
    tracing::info!(
        connectors = paths.len(),
        bridges = paths.iter().map(|p| p.bridges.len()).sum::<usize>(),
        "routed scene"
    );

    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg(&scene, &paths, &config.theme, &config.routing, &config.render);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let svg = render_svg(&scene, &paths, &config.theme, &config.routing, &config.render);
            write_png(&svg, &output, &config.render)?;
        }
        OutputFormat::Json => {
            match args.output.as_deref() {
                Some(path) => write_routing_dump(path, &paths)?,
                None => println!("{}", RoutingDump::from_paths(&paths).to_json()?),
            }
        }
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, render: &crate::config::RenderConfig) -> Result<()> {
    crate::render::write_output_png(svg, output, render)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _render: &crate::config::RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires building with the `png` feature"
    ))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
