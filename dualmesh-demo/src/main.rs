mod cli;
mod svg;

use anyhow::{Context, Result};
use clap::Parser;
use dualmesh::{check_mesh, generate_boundary_points, Bounds, Canvas, Color, DualMesh, TerrainMap, TerrainParams};
use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use tracing::info;

use cli::Cli;
use svg::SvgCanvas;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "dualmesh_demo=info,dualmesh=warn",
        1 => "dualmesh_demo=debug,dualmesh=info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();

    run(&cli)
}

fn load_params(cli: &Cli) -> Result<TerrainParams> {
    let mut params = TerrainParams {
        seed: cli.seed,
        wind_angle_radians: cli.wind_degrees.to_radians(),
        ..TerrainParams::default()
    };

    if let Some(path) = &cli.config {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        params = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
    }

    Ok(params)
}

fn build_points(cli: &Cli) -> (Vec<DVec2>, usize) {
    let bounds = Bounds::new(0.0, 0.0, cli.size, cli.size);
    let boundary = generate_boundary_points(&bounds, cli.spacing);
    let num_boundary_regions = boundary.num_boundary_points();

    let mut points = boundary.interior.clone();
    points.extend(boundary.exterior.iter().copied());

    let mut rng = StdRng::seed_from_u64(cli.seed as u64);
    let target_interior = ((cli.size / cli.spacing) * (cli.size / cli.spacing)) as usize;
    for _ in 0..target_interior {
        points.push(DVec2::new(
            rng.random_range(0.0..cli.size),
            rng.random_range(0.0..cli.size),
        ));
    }

    (points, num_boundary_regions)
}

fn run(cli: &Cli) -> Result<()> {
    let params = load_params(cli)?;
    let (points, num_boundary_regions) = build_points(cli);

    info!(num_points = points.len(), num_boundary_regions, "building mesh");
    let mesh = DualMesh::build(points, num_boundary_regions)
        .context("failed to build dual mesh from generated points")?;

    if cli.verify {
        let report = check_mesh(&mesh).context("structural invariant check failed")?;
        info!(
            below_10 = report.below_10_degrees,
            below_20 = report.below_20_degrees,
            below_30 = report.below_30_degrees,
            "structural invariants hold; skinny-triangle histogram"
        );
    }

    info!(seed = params.seed, "generating terrain");
    let terrain = TerrainMap::generate(&mesh, &params);

    render(&mesh, &terrain, cli)?;
    info!(output = %cli.output.display(), "wrote SVG map");
    Ok(())
}

fn elevation_color(elevation: f32) -> Color {
    if elevation < 0.0 {
        let depth = (-elevation).min(1.0);
        Color::rgb(10, (20.0 + depth * 40.0) as u8, (80.0 + depth * 100.0) as u8)
    } else {
        let height = elevation.min(1.0);
        Color::rgb(
            (60.0 + height * 120.0) as u8,
            (110.0 + height * 100.0) as u8,
            (60.0 + height * 40.0) as u8,
        )
    }
}

fn render(mesh: &DualMesh, terrain: &TerrainMap, cli: &Cli) -> Result<()> {
    let mut canvas = SvgCanvas::create(&cli.output, cli.size, cli.size)?;

    for r in 0..mesh.num_solid_regions() {
        let r = dualmesh::RegionId(r);
        let elevation = terrain.elevation_r[r.0];
        let mut coords = Vec::new();
        for t in mesh.t_around_r(r) {
            if mesh.is_ghost_t(t) {
                continue;
            }
            let pos = mesh.pos_of_t(t);
            coords.push(pos.x);
            coords.push(pos.y);
        }
        if coords.len() >= 6 {
            canvas.draw_polygon(elevation_color(elevation), &coords);
        }
    }

    let river_color = Color::rgb(60, 140, 220);
    for s in 0..mesh.num_solid_sides() {
        let s = dualmesh::SideId(s);
        let flow = terrain.flow_s[s.0];
        if flow <= 0.0 {
            continue;
        }
        let t_inner = mesh.t_inner(s);
        let t_outer = mesh.t_outer(s);
        if mesh.is_ghost_t(t_outer) {
            continue;
        }
        let a = mesh.pos_of_t(t_inner);
        let b = mesh.pos_of_t(t_outer);
        let width = (flow.sqrt() * 4.0).clamp(0.3, 6.0) as f64;
        canvas.draw_line_segment(river_color, width, a.x, a.y, b.x, b.y);
    }

    canvas.finish()
}
