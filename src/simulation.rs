use std::fs;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;

use crate::algorithms::{route_cost, Heuristic, ReferenceDijkstra, SearchState};
use crate::cell::{CellType, Position};
use crate::config::Config;
use crate::error::AStarError;
use crate::grid::Grid;
use crate::session::Session;
use crate::statistics::Statistics;

/// A reproducible terrain layout, generated once and turned into fresh grids
/// so that every heuristic searches the same world.
#[derive(Debug, Clone)]
pub struct EnvironmentSetup {
    pub screen_width: u32,
    pub screen_height: u32,
    pub cell_size: u32,
    pub source: Position,
    pub destination: Position,
    pub walls: FxHashSet<Position>,
    pub mud: FxHashSet<Position>,
    pub goop: FxHashSet<Position>,
}

impl EnvironmentSetup {
    /// Random layout: source in the top-left quadrant, destination in the
    /// bottom-right one, terrain scattered over the remaining cells.
    pub fn generate(config: &Config, seed: Option<u64>) -> Result<Self, AStarError> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        // Validates the dimensions before anything is placed.
        let grid = Grid::from_screen(config.screen_width, config.screen_height, config.cell_size)?;
        let (width, height) = (grid.width(), grid.height());

        let source = Position::new(
            rng.gen_range(0..(width / 2).max(1)),
            rng.gen_range(0..(height / 2).max(1)),
        );
        let mut destination = Position::new(rng.gen_range(width / 2..width), rng.gen_range(height / 2..height));
        if destination == source {
            destination = Position::new(width - 1, height - 1);
        }

        let mut taken = FxHashSet::default();
        taken.insert(source);
        taken.insert(destination);
        let capacity = width * height;
        let scatter = |count: usize, rng: &mut StdRng, taken: &mut FxHashSet<Position>| {
            let mut placed = FxHashSet::default();
            let mut attempts = 0;
            while placed.len() < count && attempts < count * 3 && taken.len() < capacity {
                let pos = Position::new(rng.gen_range(0..width), rng.gen_range(0..height));
                if taken.insert(pos) {
                    placed.insert(pos);
                }
                attempts += 1;
            }
            placed
        };

        let walls = scatter(config.num_walls, &mut rng, &mut taken);
        let mud = scatter(config.num_mud, &mut rng, &mut taken);
        let goop = scatter(config.num_goop, &mut rng, &mut taken);

        debug!(
            "generated environment {}x{}: source {:?}, destination {:?}, {} walls, {} mud, {} goop",
            width,
            height,
            source,
            destination,
            walls.len(),
            mud.len(),
            goop.len()
        );

        Ok(EnvironmentSetup {
            screen_width: config.screen_width,
            screen_height: config.screen_height,
            cell_size: config.cell_size,
            source,
            destination,
            walls,
            mud,
            goop,
        })
    }

    pub fn create_grid(&self) -> Result<Grid, AStarError> {
        let mut grid = Grid::from_screen(self.screen_width, self.screen_height, self.cell_size)?;
        let layers = [
            (&self.walls, CellType::Unwalkable),
            (&self.mud, CellType::ThickMud),
            (&self.goop, CellType::SlowGoop),
        ];
        for (positions, kind) in layers {
            for &pos in positions {
                if let Some(index) = grid.index_at(pos) {
                    grid.set_type(index, kind);
                }
            }
        }
        for (pos, kind) in [(self.source, CellType::Source), (self.destination, CellType::Destination)] {
            if let Some(index) = grid.index_at(pos) {
                grid.set_type(index, kind);
            }
        }
        Ok(grid)
    }
}

/// Terminal front end: drives one search a step per tick and draws it.
pub struct Simulation {
    session: Session,
    config: Config,
    optimal_cost: Option<u32>,
}

impl Simulation {
    pub fn new(config: Config) -> Result<Self, AStarError> {
        let grid = match &config.map {
            Some(path) => Grid::parse(&fs::read_to_string(path)?, config.cell_size)?,
            None => EnvironmentSetup::generate(&config, config.seed)?.create_grid()?,
        };
        Ok(Self::with_grid(config, grid))
    }

    pub fn with_grid(config: Config, grid: Grid) -> Self {
        let optimal_cost = ReferenceDijkstra::new().shortest_route(&grid).map(|r| r.cost);
        let mut session = Session::new(grid, config.heuristic).with_costing(config.costing);
        session.set_grid_lines(config.grid_lines);
        Simulation {
            session,
            config,
            optimal_cost,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn run(&mut self) -> Statistics {
        let heuristic = self.session.heuristic();
        let mut stats = Statistics::new(heuristic, self.optimal_cost);
        let started = Instant::now();

        if !self.session.start() {
            info!("grid has no source or destination; nothing to search");
            stats.elapsed = started.elapsed();
            return stats;
        }

        let visualize = !self.config.no_visualization;
        if visualize {
            self.draw_frame(&stats);
        }

        while self.session.step() == SearchState::Active {
            stats.steps += 1;
            if visualize {
                self.draw_frame(&stats);
                thread::sleep(Duration::from_millis(self.config.delay_ms));
            }
        }
        stats.steps += 1;
        stats.elapsed = started.elapsed();

        let search = self.session.search();
        stats.path_found = search.path_found();
        stats.explored = search.explored_count();
        stats.path_length = search.path_length();
        if let Some(source) = self.session.grid().source() {
            if search.path_found() {
                stats.path_cost = route_cost(self.session.grid(), source, search.solution_path());
            }
        }
        stats.calculate_efficiency();

        if visualize {
            self.draw_frame(&stats);
        }
        if !self.config.quiet {
            self.print_solution_path();
        }
        stats
    }

    fn draw_frame(&self, stats: &Statistics) {
        let search = self.session.search();
        self.clear_screen();
        println!("=== A* PATH SEARCH ===");
        let grid = self.session.grid();
        let (screen_width, screen_height) = grid.screen_size();
        println!(
            "Grid: {}x{} ({} cells, {}x{} px) | Costing: {:?}",
            grid.width(),
            grid.height(),
            grid.len(),
            screen_width,
            screen_height,
            search.costing()
        );
        println!("Heuristic: {} | Step: {} | Visited nodes: {}", stats.heuristic, stats.steps, search.explored_count());
        match search.state() {
            SearchState::Succeeded => println!("Path length = {}", search.path_length()),
            SearchState::Failed => println!("No path to the destination"),
            _ => println!("Frontier: {} cells", search.frontier().count()),
        }
        print!("{}", self.session.render());
        println!();
    }

    fn print_solution_path(&self) {
        let search = self.session.search();
        if !search.path_found() {
            return;
        }
        println!("Solution path: ==================");
        for &index in search.solution_path() {
            let cell = self.session.grid().cell(index);
            let screen = cell.screen();
            println!(
                "Position: ({}, {})\tScreen: ({}, {})",
                cell.position().x,
                cell.position().y,
                screen.x,
                screen.y
            );
        }
    }

    /// Clear the terminal screen (only used when visualization is enabled)
    fn clear_screen(&self) {
        print!("\x1B[2J\x1B[1;1H");
    }

    /// Searches one environment with every heuristic.
    pub fn run_all_heuristics(config: Config) -> Result<Vec<Statistics>, AStarError> {
        let grid = match &config.map {
            Some(path) => Grid::parse(&fs::read_to_string(path)?, config.cell_size)?,
            None => {
                let seed = config.seed.unwrap_or_else(rand::random::<u64>);
                if !config.quiet {
                    println!("Environment seed: {} (for reproducibility)", seed);
                }
                EnvironmentSetup::generate(&config, Some(seed))?.create_grid()?
            }
        };

        let mut results = Vec::with_capacity(Heuristic::ALL.len());
        for heuristic in Heuristic::ALL {
            let mut run_config = config.clone();
            run_config.heuristic = heuristic;
            run_config.no_visualization = true;
            run_config.quiet = true;
            let mut simulation = Simulation::with_grid(run_config, grid.clone());
            results.push(simulation.run());
        }
        Ok(results)
    }

    pub fn print_comparison_results(results: &[Statistics]) {
        println!("\n=== HEURISTIC COMPARISON RESULTS ===");
        println!();
        println!(
            "{:<12} {:<8} {:<10} {:<10} {:<10} {:<10} {:<12} {:<12}",
            "Heuristic", "Success", "Explored", "Length", "Cost", "Optimal", "Efficiency", "Elapsed"
        );
        println!("{}", "-".repeat(90));

        for result in results {
            let success_str = if result.path_found { "yes" } else { "no" };
            let optimal_str = result
                .optimal_cost
                .map_or_else(|| "-".to_string(), |c| c.to_string());
            println!(
                "{:<12} {:<8} {:<10} {:<10} {:<10} {:<10} {:<12} {:<12}",
                result.heuristic.to_string(),
                success_str,
                result.explored,
                result.path_length,
                result.path_cost,
                optimal_str,
                format!("{:.3}", result.route_efficiency),
                format!("{:.2?}", result.elapsed)
            );
        }
        println!();

        let successful: Vec<_> = results.iter().filter(|r| r.path_found).collect();
        if let Some(fewest) = successful.iter().min_by_key(|r| r.explored) {
            println!("Fewest explored: {} ({} cells)", fewest.heuristic, fewest.explored);
        }
        if let Some(cheapest) = successful.iter().min_by_key(|r| r.path_cost) {
            println!("Cheapest route: {} (cost {})", cheapest.heuristic, cheapest.path_cost);
        }
        if successful.is_empty() {
            println!("No heuristic reached the destination.");
        }
    }
}
