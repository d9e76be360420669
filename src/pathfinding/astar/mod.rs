//! A* search on an 8-connected navigability grid.
//!
//! - Orthogonal steps cost 1.0, diagonal steps 1.4
//! - Manhattan distance heuristic
//! - Optional expansion cap and wall-clock deadline

mod planner;
mod types;

pub use planner::AStarPlanner;
pub use types::{
    DIAGONAL_COST, ORTHOGONAL_COST, PathProvenance, PathResult, SearchBudget, SearchOutcome,
    path_cost,
};

use crate::core::PixelCoord;
use crate::grid::NavigabilityGrid;

/// Quick path finding without a search budget
pub fn find_path(grid: &NavigabilityGrid, start: PixelCoord, goal: PixelCoord) -> PathResult {
    AStarPlanner::unbounded(grid).find_path(start, goal)
}
