use std::path::PathBuf;

/// Generate a dual mesh and terrain map, rendering it to SVG.
#[derive(clap::Parser, Debug)]
#[command(name = "dualmesh-demo", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Map width and height in world units (a square map).
    #[arg(long, default_value_t = 1000.0)]
    pub size: f64,

    /// Target spacing between boundary/interior points.
    #[arg(long, default_value_t = 50.0)]
    pub spacing: f64,

    /// Terrain and interior-point-jitter seed.
    #[arg(long, default_value_t = 287)]
    pub seed: u32,

    /// Wind direction in degrees, measured from +x toward +y.
    #[arg(long, default_value_t = 0.0)]
    pub wind_degrees: f64,

    /// Optional JSON file overriding TerrainParams defaults.
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Output SVG path.
    #[arg(short, long, default_value = "map.svg", value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    /// Run the structural-invariant checker and print its report before rendering.
    #[arg(long)]
    pub verify: bool,
}
