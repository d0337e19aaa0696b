pub mod a_star;
pub mod common;
pub mod heuristic;
pub mod open_list;
pub mod reference;

pub use a_star::{PathSearch, SearchState, TerrainCosting};
pub use common::{route_cost, PathfindingAlgorithm, Route};
pub use heuristic::Heuristic;
pub use open_list::OpenList;
pub use reference::ReferenceDijkstra;
