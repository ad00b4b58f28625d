use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use prereq_router::config::{RenderConfig, RoutingConfig};
use prereq_router::geometry::{NodeBox, Point, Segment, segments_from_waypoints};
use prereq_router::render::render_svg;
use prereq_router::routing::{PathOptimizer, detect_intersections};
use prereq_router::scene::{Connector, Scene, SceneNode, route_scene};
use prereq_router::theme::Theme;
use std::hint::black_box;

/// A lattice of `rows` horizontal and `cols` vertical connectors, each pair crossing once.
fn lattice(rows: usize, cols: usize) -> Vec<(String, Vec<Point>)> {
    let pitch = 60.0;
    let width = (cols + 1) as f32 * pitch;
    let height = (rows + 1) as f32 * pitch;
    let mut connectors = Vec::new();
    for r in 0..rows {
        let y = (r + 1) as f32 * pitch;
        connectors.push((
            format!("h{r}"),
            vec![Point::new(0.0, y), Point::new(width, y)],
        ));
    }
    for c in 0..cols {
        let x = (c + 1) as f32 * pitch;
        connectors.push((
            format!("v{c}"),
            vec![Point::new(x, 0.0), Point::new(x, height)],
        ));
    }
    connectors
}

/// Staircase connectors that each turn several times and cross their neighbours.
fn staircase(count: usize) -> Vec<(String, Vec<Point>)> {
    (0..count)
        .map(|i| {
            let offset = i as f32 * 17.0;
            let points = (0..6)
                .flat_map(|step| {
                    let base = step as f32 * 80.0;
                    [
                        Point::new(base + offset, base),
                        Point::new(base + 80.0 + offset, base),
                    ]
                })
                .collect();
            (format!("s{i}"), points)
        })
        .collect()
}

fn scene_from(connectors: &[(String, Vec<Point>)]) -> Scene {
    Scene {
        nodes: (0..8)
            .map(|i| SceneNode {
                id: format!("N{i}"),
                label: Some(format!("Course {i}")),
                x: i as f32 * 150.0,
                y: -80.0,
                width: 120.0,
                height: 40.0,
            })
            .collect(),
        connectors: connectors
            .iter()
            .map(|(id, waypoints)| Connector {
                id: id.clone(),
                from: None,
                to: None,
                waypoints: waypoints.clone(),
            })
            .collect(),
    }
}

fn bench_detect(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect_intersections");
    let config = RoutingConfig::default();
    let nodes = vec![NodeBox::new(10_000.0, 10_000.0, 100.0, 40.0)];
    for (name, size) in [("lattice_8", 8usize), ("lattice_16", 16), ("lattice_32", 32)] {
        let segments: Vec<Segment> = lattice(size, size)
            .iter()
            .flat_map(|(id, points)| segments_from_waypoints(id, points))
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(name), &segments, |b, data| {
            b.iter(|| {
                let found = detect_intersections(black_box(data), &nodes, &config);
                black_box(found.len());
            });
        });
    }
    group.finish();
}

fn bench_optimize(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimize_path");
    let config = RoutingConfig::default();
    for (name, connectors) in [
        ("lattice_8", lattice(8, 8)),
        ("lattice_24", lattice(24, 24)),
        ("staircase_20", staircase(20)),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &connectors, |b, data| {
            b.iter(|| {
                let mut optimizer = PathOptimizer::new(config.clone());
                let paths = optimizer.route_all(
                    data.iter()
                        .map(|(id, points)| (id.as_str(), points.as_slice())),
                );
                black_box(paths.len());
            });
        });
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end");
    let theme = Theme::modern();
    let routing = RoutingConfig::default();
    let render = RenderConfig::default();
    for (name, connectors) in [("lattice_12", lattice(12, 12)), ("staircase_12", staircase(12))] {
        let scene = scene_from(&connectors);
        group.bench_with_input(BenchmarkId::from_parameter(name), &scene, |b, data| {
            b.iter(|| {
                let paths = route_scene(black_box(data), &routing);
                let svg = render_svg(data, &paths, &theme, &routing, &render);
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_detect, bench_optimize, bench_end_to_end
);
criterion_main!(benches);
