use anyhow::Context;
use clap::Parser;

use stepwise_astar::batch_simulation::BatchSimulation;
use stepwise_astar::config::Config;
use stepwise_astar::simulation::Simulation;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = Config::parse();

    if !config.quiet {
        println!("Starting A* path search...");
        println!(
            "Screen: {}x{} px, cell size: {} px",
            config.screen_width, config.screen_height, config.cell_size
        );
        match &config.map {
            Some(path) => println!("Map: {}", path.display()),
            None => println!(
                "Walls: {}, Mud: {}, Goop: {}",
                config.num_walls, config.num_mud, config.num_goop
            ),
        }
        println!("Heuristic: {} | Terrain costing: {:?}", config.heuristic, config.costing);
        if config.no_visualization || config.batch_mode || config.compare {
            println!("Visualization disabled - running in fast mode");
        } else {
            println!("Visualization enabled with {}ms delay", config.delay_ms);
        }
        println!();
    }

    if config.batch_mode {
        let mut batch = BatchSimulation::new(config.clone());
        batch.run().context("batch simulation failed")?;
        if !config.quiet {
            batch.print_summary();
        }
    } else if config.compare {
        let results = Simulation::run_all_heuristics(config).context("comparison run failed")?;
        Simulation::print_comparison_results(&results);
    } else {
        let mut simulation = Simulation::new(config).context("failed to set up the grid")?;
        let stats = simulation.run();

        println!("\n=== FINAL RESULTS ===");
        println!("{}", stats);
        if stats.optimal_cost.is_none() {
            println!("No route exists between source and destination with the current terrain");
            println!("Try reducing --num-walls or editing the map");
        }
    }
    Ok(())
}
