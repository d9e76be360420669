//! A* planner implementation.

use std::collections::{BinaryHeap, HashMap};

use log::{debug, trace};

use crate::core::PixelCoord;
use crate::grid::NavigabilityGrid;

use super::types::{AStarNode, PathResult, SearchBudget, SearchOutcome, step_cost};

/// Neighbor offsets: 4 orthogonal, then 4 diagonal.
const NEIGHBORS_8: [(isize, isize); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// A* pathfinder over a navigability grid
pub struct AStarPlanner<'a> {
    grid: &'a NavigabilityGrid,
    budget: SearchBudget,
}

impl<'a> AStarPlanner<'a> {
    /// Create a new A* planner
    pub fn new(grid: &'a NavigabilityGrid, budget: SearchBudget) -> Self {
        Self { grid, budget }
    }

    /// Create a planner without search limits
    pub fn unbounded(grid: &'a NavigabilityGrid) -> Self {
        Self::new(grid, SearchBudget::unbounded())
    }

    /// Find a path from start to goal.
    ///
    /// Only cells stepped onto must be traversable; the start cell is taken
    /// as given.
    pub fn find_path(&self, start: PixelCoord, goal: PixelCoord) -> PathResult {
        trace!(
            "[AStar] find_path: start=({},{}) goal=({},{})",
            start.row, start.col, goal.row, goal.col
        );

        if !self.grid.in_bounds(start) || !self.grid.in_bounds(goal) {
            debug!("[AStar] FAILED: start or goal outside grid");
            return PathResult::failed(SearchOutcome::NoPath, 0);
        }

        let (height, width) = (self.grid.height(), self.grid.width());
        let mut open_set = BinaryHeap::new();
        let mut came_from: HashMap<PixelCoord, PixelCoord> = HashMap::new();
        let mut g_scores: HashMap<PixelCoord, f64> = HashMap::new();

        open_set.push(AStarNode {
            coord: start,
            g_cost: 0.0,
            f_cost: heuristic(start, goal),
        });
        g_scores.insert(start, 0.0);

        let mut nodes_expanded = 0;

        while let Some(current) = open_set.pop() {
            // Goal reached
            if current.coord == goal {
                debug!(
                    "[AStar] path found: cost={:.2}, {} nodes expanded",
                    current.g_cost, nodes_expanded
                );
                return reconstruct_path(&came_from, goal, current.g_cost, nodes_expanded);
            }

            // Stale heap entry: a cheaper route to this cell was pushed later
            let best_g = g_scores.get(&current.coord).copied().unwrap_or(f64::INFINITY);
            if current.g_cost > best_g {
                continue;
            }

            nodes_expanded += 1;
            if self.budget.exhausted(nodes_expanded) {
                debug!(
                    "[AStar] FAILED: budget exhausted after {} nodes",
                    nodes_expanded
                );
                return PathResult::failed(SearchOutcome::BudgetExhausted, nodes_expanded);
            }

            for &(dr, dc) in &NEIGHBORS_8 {
                let Some(neighbor) = current.coord.offset(dr, dc, height, width) else {
                    continue;
                };
                if !self.grid.is_traversable(neighbor) {
                    continue;
                }

                let tentative_g = current.g_cost + step_cost(current.coord, neighbor);
                let neighbor_g = g_scores.get(&neighbor).copied().unwrap_or(f64::INFINITY);
                if tentative_g < neighbor_g {
                    came_from.insert(neighbor, current.coord);
                    g_scores.insert(neighbor, tentative_g);
                    open_set.push(AStarNode {
                        coord: neighbor,
                        g_cost: tentative_g,
                        f_cost: tentative_g + heuristic(neighbor, goal),
                    });
                }
            }
        }

        debug!(
            "[AStar] FAILED: NoPath after expanding {} nodes",
            nodes_expanded
        );
        PathResult::failed(SearchOutcome::NoPath, nodes_expanded)
    }
}

/// Manhattan distance between two cells
#[inline]
fn heuristic(from: PixelCoord, to: PixelCoord) -> f64 {
    from.manhattan_distance(&to) as f64
}

/// Walk `came_from` back from the goal and return the path start → goal.
fn reconstruct_path(
    came_from: &HashMap<PixelCoord, PixelCoord>,
    goal: PixelCoord,
    cost: f64,
    nodes_expanded: usize,
) -> PathResult {
    let mut cells = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        cells.push(prev);
        current = prev;
    }
    cells.reverse();

    PathResult {
        cells,
        outcome: SearchOutcome::Found,
        cost,
        nodes_expanded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::AffineTransform;

    fn open_grid(size: usize) -> NavigabilityGrid {
        let t = AffineTransform::pixel_space(size, size).unwrap();
        NavigabilityGrid::from_cells(vec![1; size * size], t.into()).unwrap()
    }

    #[test]
    fn test_expansion_cap_degrades() {
        let grid = open_grid(50);
        let planner = AStarPlanner::new(&grid, SearchBudget::unbounded().with_max_expansions(5));
        let result = planner.find_path(PixelCoord::new(0, 0), PixelCoord::new(49, 10));

        assert_eq!(result.outcome, SearchOutcome::BudgetExhausted);
        assert!(result.cells.is_empty());
        assert_eq!(result.nodes_expanded, 6);
    }

    #[test]
    fn test_generous_budget_matches_unbounded() {
        let grid = open_grid(30);
        let (start, goal) = (PixelCoord::new(3, 4), PixelCoord::new(25, 11));

        let unbounded = AStarPlanner::unbounded(&grid).find_path(start, goal);
        let budget = SearchBudget::unbounded()
            .with_max_expansions(unbounded.nodes_expanded)
            .with_timeout(std::time::Duration::from_secs(60));
        let bounded = AStarPlanner::new(&grid, budget).find_path(start, goal);

        assert_eq!(bounded.outcome, SearchOutcome::Found);
        assert_eq!(bounded.cells, unbounded.cells);
    }

    #[test]
    fn test_expired_deadline() {
        let grid = open_grid(10);
        let budget = SearchBudget::unbounded().with_timeout(std::time::Duration::ZERO);
        let result = AStarPlanner::new(&grid, budget).find_path(PixelCoord::new(0, 0), PixelCoord::new(9, 9));
        assert_eq!(result.outcome, SearchOutcome::BudgetExhausted);
    }

    #[test]
    fn test_every_step_is_adjacent() {
        let grid = open_grid(20);
        let result = AStarPlanner::unbounded(&grid).find_path(PixelCoord::new(19, 0), PixelCoord::new(2, 17));
        for w in result.cells.windows(2) {
            assert!(w[0].is_adjacent(&w[1]));
        }
    }
}
