use pathfinding::prelude::dijkstra;

use crate::algorithms::common::{step_cost, PathfindingAlgorithm, Route};
use crate::cell::CellType;
use crate::grid::Grid;

/// Exhaustive uniform-cost search with the same movement rules as the
/// stepped engine (8-connected, no corner cutting, terrain surcharges on
/// entry) but with full cost relaxation. Used as the optimal-cost yardstick.
#[derive(Default)]
pub struct ReferenceDijkstra;

impl ReferenceDijkstra {
    pub fn new() -> Self {
        ReferenceDijkstra
    }

    /// Cheapest route between the grid's endpoints, ignoring search state.
    pub fn shortest_route(&self, grid: &Grid) -> Option<Route> {
        let source = grid.source()?;
        let destination = grid.destination()?;

        let (path, cost) = dijkstra(
            &source,
            |&index| {
                let from = grid.cell(index).position();
                grid.neighbors8(index)
                    .into_iter()
                    .filter(|&n| grid.cell(n).kind() != CellType::Unwalkable && grid.can_step(index, n))
                    .map(|n| {
                        let cell = grid.cell(n);
                        let cost = step_cost(from, cell.position()) as u32 + cell.kind().surcharge();
                        (n, cost)
                    })
                    .collect::<Vec<_>>()
            },
            |&index| index == destination,
        )?;

        Some(Route {
            cells: path.iter().skip(1).map(|&i| grid.cell(i).position()).collect(),
            cost,
        })
    }
}

impl PathfindingAlgorithm for ReferenceDijkstra {
    fn name(&self) -> String {
        "Reference".to_string()
    }

    fn find_route(&mut self, grid: &mut Grid) -> Option<Route> {
        self.shortest_route(grid)
    }
}
