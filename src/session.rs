use log::warn;

use crate::algorithms::{Heuristic, PathSearch, SearchState, TerrainCosting};
use crate::cell::{CellType, TypeChange};
use crate::error::AStarError;
use crate::grid::Grid;

/// A grid together with the search running over it.
///
/// This is the edit boundary for front ends: terrain edits and grid-wide
/// operations are refused while a search is active.
pub struct Session {
    grid: Grid,
    search: PathSearch,
    show_grid_lines: bool,
}

impl Session {
    pub fn new(grid: Grid, heuristic: Heuristic) -> Self {
        Session {
            grid,
            search: PathSearch::new(heuristic),
            show_grid_lines: false,
        }
    }

    pub fn with_costing(mut self, costing: TerrainCosting) -> Self {
        self.search.set_costing(costing);
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn search(&self) -> &PathSearch {
        &self.search
    }

    fn ensure_idle(&self) -> Result<(), AStarError> {
        if self.search.is_active() {
            warn!("grid edit rejected while search is active");
            return Err(AStarError::SearchActive);
        }
        Ok(())
    }

    /// Retypes the cell at grid coordinate `(x, y)`. Out-of-range
    /// coordinates are ignored and yield `Ok(None)`.
    pub fn set_cell_type(&mut self, x: i32, y: i32, kind: CellType) -> Result<Option<TypeChange>, AStarError> {
        self.ensure_idle()?;
        Ok(self.grid.set_type_at(x, y, kind))
    }

    pub fn set_cell_type_at_screen(
        &mut self,
        px: f32,
        py: f32,
        kind: CellType,
    ) -> Result<Option<TypeChange>, AStarError> {
        self.ensure_idle()?;
        Ok(self
            .grid
            .index_at_screen(px, py)
            .map(|index| self.grid.set_type(index, kind)))
    }

    pub fn heuristic(&self) -> Heuristic {
        self.search.heuristic()
    }

    pub fn set_heuristic(&mut self, heuristic: Heuristic) {
        self.search.set_heuristic(heuristic);
    }

    /// Clears the previous search from the grid and starts a new one.
    /// Returns `false` if the grid lacks an endpoint.
    pub fn start(&mut self) -> bool {
        self.grid.reset();
        self.search.start(&mut self.grid)
    }

    pub fn step(&mut self) -> SearchState {
        self.search.advance(&mut self.grid)
    }

    pub fn run(&mut self) -> SearchState {
        self.search.find_path(&mut self.grid)
    }

    pub fn cancel(&mut self) {
        self.search.cancel();
    }

    pub fn reset(&mut self) -> Result<(), AStarError> {
        self.ensure_idle()?;
        self.grid.reset();
        Ok(())
    }

    /// Wipes all terrain and endpoints, and the last search with them.
    pub fn clear(&mut self) -> Result<(), AStarError> {
        self.ensure_idle()?;
        self.grid.clear();
        self.search.reset();
        Ok(())
    }

    /// Rebuilds the grid for a new cell size. The last search refers to the
    /// old cells and is dropped.
    pub fn resize(&mut self, cell_size: u32) -> Result<(), AStarError> {
        self.ensure_idle()?;
        self.grid.resize(cell_size)?;
        self.search.reset();
        Ok(())
    }

    pub fn show_grid_lines(&self) -> bool {
        self.show_grid_lines
    }

    pub fn set_grid_lines(&mut self, show: bool) {
        self.show_grid_lines = show;
    }

    pub fn toggle_grid_lines(&mut self) -> bool {
        self.show_grid_lines = !self.show_grid_lines;
        self.show_grid_lines
    }

    pub fn render(&self) -> String {
        self.grid.render(self.show_grid_lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(map: &str) -> Session {
        Session::new(Grid::parse(map, 20).unwrap(), Heuristic::Manhattan)
    }

    #[test]
    fn edits_are_refused_while_searching() {
        let mut s = session("S...\n....\n...D\n");
        assert!(s.start());
        assert_eq!(s.step(), SearchState::Active);

        assert!(matches!(
            s.set_cell_type(2, 1, CellType::Unwalkable),
            Err(AStarError::SearchActive)
        ));
        assert!(matches!(s.clear(), Err(AStarError::SearchActive)));
        assert!(matches!(s.resize(10), Err(AStarError::SearchActive)));
        assert_eq!(s.grid().cell_at(2, 1).unwrap().kind(), CellType::Walkable);

        assert_eq!(s.run(), SearchState::Succeeded);
        assert!(s.set_cell_type(2, 1, CellType::Unwalkable).unwrap().is_some());
    }

    #[test]
    fn cancelling_reopens_the_grid_for_edits() {
        let mut s = session("S...\n....\n...D\n");
        s.start();
        s.cancel();
        assert_eq!(s.search().state(), SearchState::Failed);
        assert!(s.reset().is_ok());
    }

    #[test]
    fn out_of_range_edits_are_ignored() {
        let mut s = session("S.\n.D\n");
        assert_eq!(s.set_cell_type(5, 5, CellType::Unwalkable).unwrap(), None);
        assert_eq!(s.set_cell_type_at_screen(-1.0, 3.0, CellType::Unwalkable).unwrap(), None);
    }

    #[test]
    fn screen_edits_place_endpoints() {
        let mut s = Session::new(Grid::new(4, 4, 20).unwrap(), Heuristic::Diagonal);
        assert!(!s.start());

        s.set_cell_type_at_screen(5.0, 5.0, CellType::Source).unwrap();
        let change = s
            .set_cell_type_at_screen(79.0, 61.0, CellType::Destination)
            .unwrap()
            .unwrap();
        assert_eq!((change.position.x, change.position.y), (3, 3));
        assert_eq!(change.old, CellType::Walkable);

        assert!(s.start());
        assert_eq!(s.run(), SearchState::Succeeded);
        assert_eq!(s.search().path_length(), 3);
    }

    #[test]
    fn restart_clears_the_previous_route() {
        let mut s = session("S...\n.#..\n...D\n");
        s.start();
        s.run();
        let first = s.search().solution_path().to_vec();
        let explored = s.search().explored_count();

        s.set_heuristic(Heuristic::Manhattan);
        s.start();
        s.run();
        assert_eq!(s.search().solution_path(), first.as_slice());
        assert_eq!(s.search().explored_count(), explored);
    }

    #[test]
    fn resize_drops_the_finished_search() {
        let mut s = Session::new(Grid::new(10, 10, 10).unwrap(), Heuristic::Manhattan);
        s.set_cell_type(0, 0, CellType::Source).unwrap();
        s.set_cell_type(9, 9, CellType::Destination).unwrap();
        assert!(s.start());
        assert_eq!(s.run(), SearchState::Succeeded);

        s.resize(50).unwrap();
        assert_eq!(s.grid().len(), 4);
        assert_eq!(s.search().state(), SearchState::Idle);
        assert!(!s.search().path_found());
        assert!(s.search().solution_path().is_empty());
        assert_eq!(s.search().current(), None);
    }

    #[test]
    fn clear_drops_the_finished_search() {
        let mut s = session("S...\n....\n...D\n");
        s.start();
        assert_eq!(s.run(), SearchState::Succeeded);

        s.clear().unwrap();
        assert_eq!(s.search().state(), SearchState::Idle);
        assert!(!s.search().path_found());
        assert_eq!(s.search().path_length(), 0);
        assert!(s.grid().cells().all(|c| c.kind() == CellType::Walkable));
    }

    #[test]
    fn failed_resize_keeps_the_search() {
        let mut s = session("S...\n....\n...D\n");
        s.start();
        s.run();
        assert!(matches!(s.resize(0), Err(AStarError::InvalidCellSize(0))));
        assert!(s.search().path_found());
        assert_eq!(s.grid().len(), 12);
    }

    #[test]
    fn grid_lines_toggle_only_changes_rendering() {
        let mut s = session("SD\n");
        assert_eq!(s.render(), "SD\n");
        assert!(s.toggle_grid_lines());
        assert_eq!(s.render(), "S|D\n");
        assert!(!s.toggle_grid_lines());
    }
}
