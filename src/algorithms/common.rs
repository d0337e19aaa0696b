use crate::cell::Position;
use crate::grid::Grid;

pub const ORTHOGONAL_COST: i32 = 10;
pub const DIAGONAL_COST: i32 = 14;

/// Base cost of moving between two adjacent positions.
pub fn step_cost(from: Position, to: Position) -> i32 {
    if from.is_orthogonal_to(&to) {
        ORTHOGONAL_COST
    } else {
        DIAGONAL_COST
    }
}

/// Movement cost of walking `path` starting from `source`: the base step
/// cost plus the surcharge of every entered cell.
pub fn route_cost(grid: &Grid, source: usize, path: &[usize]) -> u32 {
    let mut previous = grid.cell(source).position();
    let mut cost = 0;
    for &index in path {
        let cell = grid.cell(index);
        cost += step_cost(previous, cell.position()) as u32 + cell.kind().surcharge();
        previous = cell.position();
    }
    cost
}

/// A route between the grid's endpoints, source excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub cells: Vec<Position>,
    pub cost: u32,
}

pub trait PathfindingAlgorithm {
    fn name(&self) -> String;

    /// Searches from the grid's source to its destination.
    fn find_route(&mut self, grid: &mut Grid) -> Option<Route>;
}
