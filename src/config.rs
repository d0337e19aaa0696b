use std::path::PathBuf;

use clap::Parser;

use crate::algorithms::{Heuristic, TerrainCosting};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Screen width in pixels; the grid width is this divided by the cell size.
    #[arg(long, default_value_t = 800)]
    pub screen_width: u32,

    #[arg(long, default_value_t = 480)]
    pub screen_height: u32,

    #[arg(long, default_value_t = 20)]
    pub cell_size: u32,

    #[arg(long, value_enum, default_value_t = Heuristic::Manhattan)]
    pub heuristic: Heuristic,

    #[arg(long, value_enum, default_value_t = TerrainCosting::Literal)]
    pub costing: TerrainCosting,

    /// Run every heuristic on the same environment and compare them.
    #[arg(long, default_value_t = false)]
    pub compare: bool,

    #[arg(long, default_value_t = 150)]
    pub num_walls: usize,

    #[arg(long, default_value_t = 20)]
    pub num_mud: usize,

    #[arg(long, default_value_t = 20)]
    pub num_goop: usize,

    /// Seed for the generated environment; random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Text map to load instead of generating one.
    #[arg(long)]
    pub map: Option<PathBuf>,

    #[arg(long, default_value_t = 50)]
    pub delay_ms: u64,

    #[arg(long, default_value_t = false)]
    pub no_visualization: bool,

    #[arg(long, default_value_t = false)]
    pub grid_lines: bool,

    #[arg(long, default_value_t = false)]
    pub quiet: bool,

    #[arg(long, default_value_t = false)]
    pub batch_mode: bool,

    #[arg(long, default_value_t = 100)]
    pub num_simulations: usize,

    #[arg(long, default_value = "astar_results.csv")]
    pub output_file: String,

    #[arg(long, default_value_t = 300)]
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config::parse_from(["stepwise_astar"])
    }
}
