use std::fmt;

use clap::ValueEnum;

use crate::cell::Position;

/// Distance estimates available to the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum Heuristic {
    #[default]
    Manhattan,
    Diagonal,
    Euclidean,
    /// Always zero; turns A* into uniform-cost search.
    Dijkstra,
}

impl Heuristic {
    pub const ALL: [Heuristic; 4] = [
        Heuristic::Manhattan,
        Heuristic::Diagonal,
        Heuristic::Euclidean,
        Heuristic::Dijkstra,
    ];

    /// Estimate in whole cells; the search scales it by the orthogonal step cost.
    pub fn estimate(self, from: Position, to: Position) -> i32 {
        let dx = (to.x as i64 - from.x as i64).abs();
        let dy = (to.y as i64 - from.y as i64).abs();
        let estimate = match self {
            Heuristic::Manhattan => dx + dy,
            Heuristic::Diagonal => dx.max(dy),
            Heuristic::Euclidean => ((dx * dx + dy * dy) as f64).sqrt() as i64,
            Heuristic::Dijkstra => 0,
        };
        estimate as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            Heuristic::Manhattan => "Manhattan",
            Heuristic::Diagonal => "Diagonal",
            Heuristic::Euclidean => "Euclidean",
            Heuristic::Dijkstra => "Dijkstra",
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Small penalty proportional to how far `cell` sits off the straight line
/// from `source` to `destination` (magnitude of the 2D cross product).
pub fn tie_break(cell: Position, source: Position, destination: Position) -> f64 {
    let dx1 = cell.x as i64 - destination.x as i64;
    let dy1 = cell.y as i64 - destination.y as i64;
    let dx2 = source.x as i64 - destination.x as i64;
    let dy2 = source.y as i64 - destination.y as i64;
    let cross = (dx1 * dy2 - dx2 * dy1).abs();
    cross as f64 * 0.001
}
