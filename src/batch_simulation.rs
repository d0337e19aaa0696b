use std::fs::{File, OpenOptions};
use std::io::Write;
use std::time::{Duration, Instant};

use log::{info, warn};
use rustc_hash::FxHashMap;

use crate::algorithms::Heuristic;
use crate::config::Config;
use crate::error::AStarError;
use crate::simulation::{EnvironmentSetup, Simulation};
use crate::statistics::Statistics;

const CSV_HEADER: &str = "simulation_id,seed,heuristic,costing,grid_width,grid_height,num_walls,success,explored,path_length,path_cost,optimal_cost,route_efficiency,optimal,elapsed_us";

#[derive(Debug, Clone)]
pub struct BatchResult {
    pub simulation_id: usize,
    pub seed: u64,
    pub grid_width: usize,
    pub grid_height: usize,
    pub statistics: Statistics,
}

/// Running per-heuristic totals; kept apart from `results`, which is
/// flushed to disk in batches.
#[derive(Debug, Clone, Default)]
struct HeuristicSummary {
    runs: usize,
    successes: usize,
    optimal: usize,
    explored: usize,
    efficiency: f64,
    elapsed: Duration,
}

pub struct BatchSimulation {
    config: Config,
    results: Vec<BatchResult>,
    summaries: FxHashMap<Heuristic, HeuristicSummary>,
    start_time: Instant,
    batch_size: usize,
    total_results_written: usize,
}

impl BatchSimulation {
    pub fn new(config: Config) -> Self {
        BatchSimulation {
            config,
            results: Vec::new(),
            summaries: FxHashMap::default(),
            start_time: Instant::now(),
            batch_size: 100,
            total_results_written: 0,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn total_results_written(&self) -> usize {
        self.total_results_written
    }

    /// Runs `num_simulations` environments, each searched with every
    /// heuristic, appending one CSV row per search.
    pub fn run(&mut self) -> Result<(), AStarError> {
        self.start_time = Instant::now();
        self.initialize_csv_file()?;
        if !self.config.quiet {
            println!("=== BATCH SIMULATION STARTED ===");
            println!(
                "Screen: {}x{} px, cell size {} px",
                self.config.screen_width, self.config.screen_height, self.config.cell_size
            );
            println!(
                "Walls: {}, Mud: {}, Goop: {}",
                self.config.num_walls, self.config.num_mud, self.config.num_goop
            );
            println!("Simulations: {}", self.config.num_simulations);
            println!("Output file: {}", self.config.output_file);
            println!();
        }

        let timeout = Duration::from_secs(self.config.timeout_seconds);
        let base_seed = self.config.seed.unwrap_or_else(rand::random::<u64>);
        let mut completed = 0;

        for sim_id in 0..self.config.num_simulations {
            if self.start_time.elapsed() > timeout {
                warn!("batch timeout reached after {} simulations", completed);
                break;
            }
            let seed = base_seed.wrapping_add(sim_id as u64);
            self.run_environment(sim_id, seed)?;
            completed += 1;

            if self.results.len() >= self.batch_size {
                self.flush_results_to_csv()?;
            }
        }
        self.flush_results_to_csv()?;

        info!(
            "batch finished: {} simulations, {} rows in {:.2?}",
            completed,
            self.total_results_written,
            self.start_time.elapsed()
        );
        if !self.config.quiet {
            println!("\n=== BATCH SIMULATION COMPLETED ===");
            println!("Total results written: {}", self.total_results_written);
            println!("Results saved to: {}", self.config.output_file);
            println!("Total time: {:.2?}", self.start_time.elapsed());
        }
        Ok(())
    }

    fn run_environment(&mut self, sim_id: usize, seed: u64) -> Result<(), AStarError> {
        let environment = EnvironmentSetup::generate(&self.config, Some(seed))?;
        let grid = environment.create_grid()?;
        let (grid_width, grid_height) = (grid.width(), grid.height());

        for heuristic in Heuristic::ALL {
            let mut run_config = self.config.clone();
            run_config.heuristic = heuristic;
            run_config.no_visualization = true;
            run_config.quiet = true;

            let statistics = Simulation::with_grid(run_config, grid.clone()).run();

            let summary = self.summaries.entry(heuristic).or_default();
            summary.runs += 1;
            if statistics.path_found {
                summary.successes += 1;
                summary.explored += statistics.explored;
                summary.efficiency += statistics.route_efficiency;
                summary.elapsed += statistics.elapsed;
            }
            if statistics.is_optimal() {
                summary.optimal += 1;
            }

            self.results.push(BatchResult {
                simulation_id: sim_id,
                seed,
                grid_width,
                grid_height,
                statistics,
            });
        }
        Ok(())
    }

    fn flush_results_to_csv(&mut self) -> Result<(), AStarError> {
        if self.results.is_empty() {
            return Ok(());
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.config.output_file)?;

        for result in &self.results {
            let stats = &result.statistics;
            writeln!(
                file,
                "{},{},{},{:?},{},{},{},{},{},{},{},{},{:.6},{},{}",
                result.simulation_id,
                result.seed,
                stats.heuristic,
                self.config.costing,
                result.grid_width,
                result.grid_height,
                self.config.num_walls,
                stats.path_found,
                stats.explored,
                stats.path_length,
                stats.path_cost,
                stats.optimal_cost.map_or_else(String::new, |c| c.to_string()),
                stats.route_efficiency,
                stats.is_optimal(),
                stats.elapsed.as_micros()
            )?;
        }

        self.total_results_written += self.results.len();
        if !self.config.quiet {
            println!(
                "Flushed {} results to CSV (total: {})",
                self.results.len(),
                self.total_results_written
            );
        }
        self.results.clear();
        Ok(())
    }

    fn initialize_csv_file(&self) -> Result<(), AStarError> {
        let mut file = File::create(&self.config.output_file)?;
        writeln!(file, "{}", CSV_HEADER)?;
        Ok(())
    }

    pub fn print_summary(&self) {
        if self.summaries.is_empty() {
            println!("No results to summarize.");
            return;
        }

        println!("\n=== BATCH SIMULATION SUMMARY ===");
        for heuristic in Heuristic::ALL {
            let Some(summary) = self.summaries.get(&heuristic) else {
                continue;
            };
            println!("\n{} heuristic:", heuristic);
            let success_rate = (summary.successes as f64 / summary.runs as f64) * 100.0;
            println!(
                "  Success rate: {}/{} ({:.1}%)",
                summary.successes, summary.runs, success_rate
            );
            if summary.successes > 0 {
                let n = summary.successes as f64;
                println!("  Optimal routes: {}/{}", summary.optimal, summary.successes);
                println!("  Average explored: {:.1}", summary.explored as f64 / n);
                println!("  Average efficiency: {:.3}", summary.efficiency / n);
                println!("  Average search time: {:.2?}", summary.elapsed / summary.successes as u32);
            }
        }
    }
}
