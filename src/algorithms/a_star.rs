use clap::ValueEnum;
use log::{debug, info, warn};

use crate::algorithms::common::{route_cost, step_cost, PathfindingAlgorithm, Route};
use crate::algorithms::heuristic::{tie_break, Heuristic};
use crate::algorithms::open_list::OpenList;
use crate::cell::{CellState, CellType};
use crate::grid::Grid;

/// Scale applied to heuristic estimates so they share units with step costs.
const HEURISTIC_SCALE: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Active,
    Succeeded,
    Failed,
}

/// How terrain surcharges combine with the base step cost when a cell is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TerrainCosting {
    /// Mud and goop add their surcharge to the cell's existing `g` and never
    /// receive the parent's cost; only plain walkable cells get
    /// `parent.g + step`. The destination keeps its existing `g`.
    #[default]
    Literal,
    /// Every entered cell costs `parent.g + step + surcharge`.
    Stacked,
}

impl TerrainCosting {
    fn opened_g(self, kind: CellType, existing_g: i32, parent_g: i32, step: i32) -> i32 {
        match self {
            TerrainCosting::Literal => {
                let mut g = existing_g + kind.surcharge() as i32;
                if kind == CellType::Walkable {
                    g = parent_g + step;
                }
                g
            }
            TerrainCosting::Stacked => parent_g + step + kind.surcharge() as i32,
        }
    }
}

/// Steppable A* search over a [`Grid`].
///
/// The engine does not own the grid; every call that touches cells borrows it.
/// Cells are opened once and closed once: a cheaper route found later to an
/// already opened cell is ignored.
pub struct PathSearch {
    heuristic: Heuristic,
    costing: TerrainCosting,
    state: SearchState,
    open_list: OpenList<usize>,
    current: Option<usize>,
    explored: usize,
    path_found: bool,
    solution_path: Vec<usize>,
    path_length: usize,
}

impl PathSearch {
    pub fn new(heuristic: Heuristic) -> Self {
        PathSearch {
            heuristic,
            costing: TerrainCosting::default(),
            state: SearchState::Idle,
            open_list: OpenList::new(),
            current: None,
            explored: 0,
            path_found: false,
            solution_path: Vec::new(),
            path_length: 0,
        }
    }

    pub fn with_costing(mut self, costing: TerrainCosting) -> Self {
        self.costing = costing;
        self
    }

    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    /// Takes effect from the next expansion onwards.
    pub fn set_heuristic(&mut self, heuristic: Heuristic) {
        self.heuristic = heuristic;
    }

    pub fn costing(&self) -> TerrainCosting {
        self.costing
    }

    pub fn set_costing(&mut self, costing: TerrainCosting) {
        self.costing = costing;
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SearchState::Active
    }

    pub fn path_found(&self) -> bool {
        self.path_found
    }

    /// Cells from the one after the source up to and including the destination.
    pub fn solution_path(&self) -> &[usize] {
        &self.solution_path
    }

    pub fn explored_count(&self) -> usize {
        self.explored
    }

    pub fn path_length(&self) -> usize {
        self.path_length
    }

    /// The cell most recently closed.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Cells discovered but not yet closed.
    pub fn frontier(&self) -> impl Iterator<Item = usize> + '_ {
        self.open_list.iter().copied()
    }

    /// Begins a search between the grid's endpoints. Returns `false`, leaving
    /// the engine untouched, if either endpoint is missing.
    ///
    /// Search bookkeeping on the cells is not cleared here; call
    /// [`Grid::reset`] first when the grid has been searched before.
    pub fn start(&mut self, grid: &mut Grid) -> bool {
        let (Some(source), Some(destination)) = (grid.source(), grid.destination()) else {
            warn!("search not started: source and destination must both be set");
            return false;
        };
        if source == destination {
            warn!("search not started: source and destination are the same cell");
            return false;
        }

        self.open_list.clear();
        self.current = Some(source);
        grid.cell_mut(source).state = CellState::Closed;
        self.explored = 0;
        self.path_found = false;
        self.solution_path.clear();
        self.path_length = 0;
        self.state = SearchState::Active;
        info!(
            "{} search started from {:?} to {:?}",
            self.heuristic,
            grid.cell(source).position(),
            grid.cell(destination).position()
        );
        true
    }

    /// Expands the current cell and moves on to the cheapest open cell.
    /// Does nothing unless the search is active.
    pub fn advance(&mut self, grid: &mut Grid) -> SearchState {
        if self.state != SearchState::Active {
            return self.state;
        }
        let (Some(current), Some(source), Some(destination)) =
            (self.current, grid.source(), grid.destination())
        else {
            warn!("search endpoints disappeared mid-search");
            self.state = SearchState::Failed;
            return self.state;
        };

        let source_pos = grid.cell(source).position();
        let destination_pos = grid.cell(destination).position();
        let current_pos = grid.cell(current).position();
        let current_g = grid.cell(current).g;

        for neighbor in grid.walkable_neighbors(current) {
            let cell = grid.cell_mut(neighbor);
            if cell.state == CellState::Open {
                continue;
            }
            let pos = cell.position();
            cell.state = CellState::Open;
            cell.parent = Some(current);
            cell.h = f64::from(self.heuristic.estimate(pos, destination_pos) * HEURISTIC_SCALE)
                + tie_break(pos, source_pos, destination_pos);
            cell.g = self
                .costing
                .opened_g(cell.kind(), cell.g, current_g, step_cost(current_pos, pos));
            cell.f = f64::from(cell.g) + cell.h;
            self.open_list.insert(cell.f, neighbor);
        }

        if self.open_list.is_empty() {
            self.state = SearchState::Failed;
            info!("no path: open list exhausted after {} cells", self.explored);
            return self.state;
        }

        self.explored += 1;
        let next = self.open_list.remove_min();
        let cell = grid.cell_mut(next);
        cell.state = CellState::Closed;
        debug!("closed {:?} g={} f={:.3}", cell.position(), cell.g, cell.f);
        self.current = Some(next);

        if cell.kind() == CellType::Destination {
            self.build_solution_path(grid, next);
        }
        self.state
    }

    fn build_solution_path(&mut self, grid: &mut Grid, destination: usize) {
        self.solution_path = grid.reconstruct_path(destination);
        // The destination itself was popped, not explored.
        self.explored = self.explored.saturating_sub(1);
        self.path_found = true;
        self.path_length = self.solution_path.len();
        self.state = SearchState::Succeeded;
        info!(
            "path found: {} cells, {} explored",
            self.path_length, self.explored
        );
    }

    /// Runs the search to a terminal state.
    pub fn find_path(&mut self, grid: &mut Grid) -> SearchState {
        while self.is_active() {
            self.advance(grid);
        }
        self.state
    }

    /// Returns the engine to `Idle`, forgetting the open list, the counts and
    /// the last route. Call it after the grid's cells are rebuilt: stored
    /// indices refer to the old cells.
    pub fn reset(&mut self) {
        self.open_list.clear();
        self.current = None;
        self.explored = 0;
        self.path_found = false;
        self.solution_path.clear();
        self.path_length = 0;
        self.state = SearchState::Idle;
    }

    /// Stops an active search as failed. Terminal and idle searches are left alone.
    pub fn cancel(&mut self) {
        if self.state == SearchState::Active {
            self.state = SearchState::Failed;
            info!("search cancelled after {} cells", self.explored);
        }
    }
}

impl PathfindingAlgorithm for PathSearch {
    fn name(&self) -> String {
        format!("A* {}", self.heuristic)
    }

    fn find_route(&mut self, grid: &mut Grid) -> Option<Route> {
        grid.reset();
        if !self.start(grid) {
            return None;
        }
        self.find_path(grid);
        if !self.path_found {
            return None;
        }
        let source = grid.source()?;
        Some(Route {
            cells: self
                .solution_path
                .iter()
                .map(|&i| grid.cell(i).position())
                .collect(),
            cost: route_cost(grid, source, &self.solution_path),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Position;

    fn run(map: &str, heuristic: Heuristic, costing: TerrainCosting) -> (Grid, PathSearch) {
        let mut grid = Grid::parse(map, 20).unwrap();
        let mut search = PathSearch::new(heuristic).with_costing(costing);
        assert!(search.start(&mut grid));
        search.find_path(&mut grid);
        (grid, search)
    }

    fn positions(grid: &Grid, path: &[usize]) -> Vec<(usize, usize)> {
        path.iter()
            .map(|&i| {
                let p = grid.cell(i).position();
                (p.x, p.y)
            })
            .collect()
    }

    const OPEN_5X5: &str = "S....\n.....\n.....\n.....\n....D\n";

    #[test]
    fn open_grid_diagonal_with_manhattan() {
        let (grid, search) = run(OPEN_5X5, Heuristic::Manhattan, TerrainCosting::Literal);

        assert_eq!(search.state(), SearchState::Succeeded);
        assert!(search.path_found());
        assert!(!search.is_active());
        assert_eq!(search.path_length(), 4);
        assert_eq!(
            positions(&grid, search.solution_path()),
            vec![(1, 1), (2, 2), (3, 3), (4, 4)]
        );
        assert_eq!(search.explored_count(), 3);
        let source = grid.source().unwrap();
        assert_eq!(route_cost(&grid, source, search.solution_path()), 56);
        assert_eq!(
            grid.to_string(),
            "Soo..\no*oo.\noo*oo\n.oo*o\n..ooD\n"
        );
    }

    #[test]
    fn first_step_opens_the_ring_and_closes_the_best() {
        let mut grid = Grid::parse(OPEN_5X5, 20).unwrap();
        let mut search = PathSearch::new(Heuristic::Manhattan);
        search.start(&mut grid);
        assert_eq!(search.current(), grid.source());

        assert_eq!(search.advance(&mut grid), SearchState::Active);
        let current = search.current().unwrap();
        assert_eq!(grid.cell(current).position(), Position::new(1, 1));
        assert_eq!(grid.cell(current).g, 14);
        assert_eq!(grid.cell(current).state, CellState::Closed);
        assert_eq!(search.explored_count(), 1);

        let mut frontier: Vec<_> = search.frontier().map(|i| grid.cell(i).position()).collect();
        frontier.sort();
        assert_eq!(frontier, vec![Position::new(0, 1), Position::new(1, 0)]);
        let side = grid.cell_at(1, 0).unwrap();
        assert_eq!(side.g, 10);
        assert!((side.f - 80.004).abs() < 1e-9);
    }

    #[test]
    fn start_needs_both_endpoints() {
        let mut grid = Grid::parse("S..\n...\n", 20).unwrap();
        let mut search = PathSearch::new(Heuristic::Manhattan);
        assert!(!search.start(&mut grid));
        assert_eq!(search.state(), SearchState::Idle);
        assert_eq!(search.advance(&mut grid), SearchState::Idle);
        assert_eq!(search.explored_count(), 0);
    }

    #[test]
    fn same_cell_endpoints_are_rejected() {
        let mut grid = Grid::new(3, 3, 20).unwrap();
        grid.set_type_at(0, 0, CellType::Source);
        grid.set_type_at(0, 0, CellType::Destination);
        let mut search = PathSearch::new(Heuristic::Manhattan);
        assert!(!search.start(&mut grid));
        assert_eq!(search.state(), SearchState::Idle);
        assert!(search.solution_path().is_empty());
    }

    #[test]
    fn walled_off_destination_fails() {
        let (grid, search) = run(
            "S.#..\n..#.D\n..#..\n",
            Heuristic::Manhattan,
            TerrainCosting::Literal,
        );
        assert_eq!(search.state(), SearchState::Failed);
        assert!(!search.path_found());
        assert!(search.solution_path().is_empty());
        assert_eq!(search.path_length(), 0);
        assert_eq!(search.explored_count(), 5);
        assert_eq!(grid.to_string(), "Sx#..\nxx#.D\nxx#..\n");
    }

    #[test]
    fn corner_gap_is_not_a_way_through() {
        let (_, search) = run(
            "S#...\n#....\n....D\n",
            Heuristic::Diagonal,
            TerrainCosting::Literal,
        );
        assert_eq!(search.state(), SearchState::Failed);
        assert_eq!(search.explored_count(), 0);
    }

    #[test]
    fn path_goes_around_a_wall() {
        let (grid, search) = run(
            ".....\n.###.\nS#.#D\n.....\n",
            Heuristic::Euclidean,
            TerrainCosting::Stacked,
        );
        assert!(search.path_found());
        let path = positions(&grid, search.solution_path());
        assert_eq!(path.last(), Some(&(4, 2)));
        assert!(path.iter().all(|&(x, y)| grid
            .cell_at(x as i32, y as i32)
            .is_some_and(|c| c.kind() != CellType::Unwalkable)));
        assert!(path.iter().any(|&(_, y)| y == 0 || y == 3));
    }

    #[test]
    fn literal_costing_ignores_parent_cost_on_terrain() {
        let (grid, search) = run("SmD\n", Heuristic::Manhattan, TerrainCosting::Literal);
        assert!(search.path_found());
        assert_eq!(grid.cell_at(1, 0).unwrap().g, 100);
        assert_eq!(grid.cell_at(2, 0).unwrap().g, 0);
        let source = grid.source().unwrap();
        assert_eq!(route_cost(&grid, source, search.solution_path()), 120);
    }

    #[test]
    fn literal_costing_adds_goop_to_stale_cost() {
        let (grid, search) = run("SgD\n", Heuristic::Manhattan, TerrainCosting::Literal);
        assert!(search.path_found());
        assert_eq!(grid.cell_at(1, 0).unwrap().g, 5);
        assert_eq!(grid.cell_at(2, 0).unwrap().g, 0);
        let source = grid.source().unwrap();
        assert_eq!(route_cost(&grid, source, search.solution_path()), 25);
    }

    #[test]
    fn reset_returns_to_idle() {
        let (_, mut search) = run(OPEN_5X5, Heuristic::Manhattan, TerrainCosting::Literal);
        assert!(search.path_found());
        search.reset();
        assert_eq!(search.state(), SearchState::Idle);
        assert!(!search.path_found());
        assert!(search.solution_path().is_empty());
        assert_eq!(search.current(), None);
        assert_eq!(search.explored_count(), 0);
        assert_eq!(search.path_length(), 0);
        assert_eq!(search.frontier().count(), 0);
    }

    #[test]
    fn stacked_costing_accumulates() {
        let (grid, search) = run("SgD\n", Heuristic::Manhattan, TerrainCosting::Stacked);
        assert!(search.path_found());
        assert_eq!(grid.cell_at(1, 0).unwrap().g, 15);
        assert_eq!(grid.cell_at(2, 0).unwrap().g, 25);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut grid = Grid::parse(OPEN_5X5, 20).unwrap();
        let mut search = PathSearch::new(Heuristic::Dijkstra);
        search.start(&mut grid);
        search.advance(&mut grid);
        search.cancel();
        assert_eq!(search.state(), SearchState::Failed);
        search.cancel();
        assert_eq!(search.state(), SearchState::Failed);
        assert_eq!(search.advance(&mut grid), SearchState::Failed);
        assert!(!search.path_found());
    }

    #[test]
    fn cancel_leaves_success_alone() {
        let (_, mut search) = run("SD\n", Heuristic::Manhattan, TerrainCosting::Literal);
        search.cancel();
        assert_eq!(search.state(), SearchState::Succeeded);
        assert_eq!(search.path_length(), 1);
        assert_eq!(search.explored_count(), 0);
    }

    #[test]
    fn rerun_after_reset_is_identical() {
        let mut grid = Grid::parse("S..#....\n.#.#.##.\n.#...#..\n...#.m.D\n", 20).unwrap();
        let mut search = PathSearch::new(Heuristic::Manhattan);

        let mut outcomes = Vec::new();
        for _ in 0..2 {
            grid.reset();
            search.start(&mut grid);
            search.find_path(&mut grid);
            outcomes.push((
                search.solution_path().to_vec(),
                search.path_length(),
                search.explored_count(),
            ));
        }
        assert!(search.path_found());
        assert_eq!(outcomes[0], outcomes[1]);
    }

    #[test]
    fn route_through_trait_excludes_source() {
        let mut grid = Grid::parse(OPEN_5X5, 20).unwrap();
        let mut search = PathSearch::new(Heuristic::Diagonal);
        let route = search.find_route(&mut grid).unwrap();
        assert_eq!(route.cells.len(), 4);
        assert_eq!(route.cells.last(), Some(&Position::new(4, 4)));
        assert_eq!(route.cost, 56);
        assert_eq!(search.name(), "A* Diagonal");
    }
}
