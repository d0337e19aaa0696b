//! Steppable A* search over a uniform 8-connected grid.
//!
//! A [`Grid`] holds the cells and their terrain; a [`PathSearch`] expands one
//! cell per [`PathSearch::advance`] call so a front end can draw the frontier
//! as it grows. [`Session`] pairs the two and refuses terrain edits while a
//! search is running.
//!
//! ```
//! use stepwise_astar::{Grid, Heuristic, PathSearch, SearchState};
//!
//! let mut grid = Grid::parse("S...\n.#..\n...D\n", 20).unwrap();
//! let mut search = PathSearch::new(Heuristic::Manhattan);
//! assert!(search.start(&mut grid));
//! assert_eq!(search.find_path(&mut grid), SearchState::Succeeded);
//! assert_eq!(search.solution_path().last().copied(), grid.destination());
//! ```

pub mod algorithms;
pub mod batch_simulation;
pub mod cell;
pub mod config;
pub mod error;
pub mod grid;
pub mod session;
pub mod simulation;
pub mod statistics;

pub use algorithms::{Heuristic, OpenList, PathSearch, SearchState, TerrainCosting};
pub use cell::{CellState, CellType, GridCell, Position, TypeChange};
pub use error::AStarError;
pub use grid::Grid;
pub use session::Session;
