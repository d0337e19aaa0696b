use std::fmt;
use std::time::Duration;

use crate::algorithms::Heuristic;

#[derive(Debug, Clone)]
pub struct Statistics {
    pub heuristic: Heuristic,
    pub path_found: bool,
    pub explored: usize,
    pub path_length: usize,
    pub path_cost: u32,
    pub optimal_cost: Option<u32>,
    pub route_efficiency: f64,
    pub steps: usize,
    pub elapsed: Duration,
}

impl Statistics {
    pub fn new(heuristic: Heuristic, optimal_cost: Option<u32>) -> Self {
        Statistics {
            heuristic,
            path_found: false,
            explored: 0,
            path_length: 0,
            path_cost: 0,
            optimal_cost,
            route_efficiency: 0.0,
            steps: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Ratio of the optimal route cost to the found route cost; 1.0 is optimal.
    pub fn calculate_efficiency(&mut self) {
        self.route_efficiency = match self.optimal_cost {
            Some(optimal) if self.path_found && self.path_cost > 0 => {
                optimal as f64 / self.path_cost as f64
            }
            _ => 0.0,
        };
    }

    pub fn is_optimal(&self) -> bool {
        self.path_found && self.optimal_cost == Some(self.path_cost)
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Heuristic: {}", self.heuristic)?;
        if self.path_found {
            writeln!(f, "Path found: yes")?;
            writeln!(f, "Path length: {} cells", self.path_length)?;
            writeln!(f, "Route cost: {}", self.path_cost)?;
        } else {
            writeln!(f, "Path found: no")?;
        }
        match self.optimal_cost {
            Some(cost) => writeln!(f, "Optimal cost (reference): {}", cost)?,
            None => writeln!(f, "Optimal cost (reference): unreachable")?,
        }
        writeln!(f, "Explored cells: {}", self.explored)?;
        writeln!(f, "Route efficiency: {:.3}", self.route_efficiency)?;
        writeln!(f, "Search steps: {}", self.steps)?;
        write!(f, "Elapsed: {:.2?}", self.elapsed)
    }
}
