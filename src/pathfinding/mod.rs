//! Path planning over navigability grids.
//!
//! ## A* Pathfinding
//!
//! ```rust
//! use marga::core::PixelCoord;
//! use marga::grid::{AffineTransform, NavigabilityGrid};
//! use marga::pathfinding::{AStarPlanner, SearchOutcome};
//!
//! let transform = AffineTransform::pixel_space(3, 3).unwrap();
//! let grid = NavigabilityGrid::from_cells(vec![1; 9], transform.into()).unwrap();
//!
//! let result = AStarPlanner::unbounded(&grid).find_path(PixelCoord::new(0, 0), PixelCoord::new(2, 2));
//! assert_eq!(result.outcome, SearchOutcome::Found);
//! assert_eq!(result.cells.len(), 3);
//! ```

pub mod astar;

pub use astar::{
    AStarPlanner, DIAGONAL_COST, ORTHOGONAL_COST, PathProvenance, PathResult, SearchBudget,
    SearchOutcome, find_path, path_cost,
};
