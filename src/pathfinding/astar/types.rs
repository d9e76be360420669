//! A* pathfinding types.

use std::cmp::Ordering;
use std::time::{Duration, Instant};

use crate::core::PixelCoord;

/// Cost of a horizontal or vertical step.
pub const ORTHOGONAL_COST: f64 = 1.0;

/// Cost of a diagonal step. Deliberately 1.4, not sqrt(2).
pub const DIAGONAL_COST: f64 = 1.4;

/// A node in the A* search
#[derive(Clone, Debug)]
pub(super) struct AStarNode {
    pub coord: PixelCoord,
    pub g_cost: f64, // Cost from start
    pub f_cost: f64, // g_cost + heuristic
}

impl Eq for AStarNode {}

impl PartialEq for AStarNode {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord
    }
}

impl Ord for AStarNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .f_cost
            .partial_cmp(&self.f_cost)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for AStarNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Limits on a single search. Unbounded by default.
///
/// Limits are checked between node expansions; a search that finishes within
/// budget behaves exactly as an unbounded one.
#[derive(Clone, Debug, Default)]
pub struct SearchBudget {
    /// Maximum number of nodes to expand before giving up
    pub max_expansions: Option<usize>,
    /// Wall-clock instant after which the search gives up
    pub deadline: Option<Instant>,
}

impl SearchBudget {
    /// No limits.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Cap node expansions.
    pub fn with_max_expansions(mut self, max: usize) -> Self {
        self.max_expansions = Some(max);
        self
    }

    /// Give up `timeout` from now.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    /// True once `expanded` nodes or the deadline exceed the budget.
    pub(super) fn exhausted(&self, expanded: usize) -> bool {
        if self.max_expansions.is_some_and(|max| expanded > max) {
            return true;
        }
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// How a search ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Goal reached
    Found,
    /// Frontier exhausted, or start/goal outside the grid
    NoPath,
    /// Expansion cap or deadline hit first
    BudgetExhausted,
}

/// Whether a path came from the search or needs the fallback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathProvenance {
    SearchSuccess,
    Fallback,
}

impl PathProvenance {
    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PathProvenance::SearchSuccess => "search-success",
            PathProvenance::Fallback => "fallback",
        }
    }
}

/// Result of A* pathfinding
#[derive(Clone, Debug)]
pub struct PathResult {
    /// Path from start to goal inclusive (empty if no path found)
    pub cells: Vec<PixelCoord>,
    /// How the search ended
    pub outcome: SearchOutcome,
    /// Total step cost (infinite when no path)
    pub cost: f64,
    /// Number of nodes expanded during search
    pub nodes_expanded: usize,
}

impl PathResult {
    /// Create a failed result
    pub fn failed(outcome: SearchOutcome, nodes_expanded: usize) -> Self {
        Self {
            cells: Vec::new(),
            outcome,
            cost: f64::INFINITY,
            nodes_expanded,
        }
    }

    /// Whether the goal was reached
    pub fn is_found(&self) -> bool {
        self.outcome == SearchOutcome::Found
    }

    /// `SearchSuccess` when a path exists, otherwise `Fallback`.
    pub fn provenance(&self) -> PathProvenance {
        if self.cells.is_empty() {
            PathProvenance::Fallback
        } else {
            PathProvenance::SearchSuccess
        }
    }

    /// Path length in cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True when no cells were returned
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Cost of a single step between neighboring cells.
#[inline]
pub(super) fn step_cost(from: PixelCoord, to: PixelCoord) -> f64 {
    if from.row != to.row && from.col != to.col {
        DIAGONAL_COST
    } else {
        ORTHOGONAL_COST
    }
}

/// Sum of step costs along a path of neighboring cells.
pub fn path_cost(cells: &[PixelCoord]) -> f64 {
    cells.windows(2).map(|w| step_cost(w[0], w[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    #[test]
    fn test_heap_pops_lowest_f() {
        let mut heap = BinaryHeap::new();
        for (i, f) in [3.0, 1.0, 2.0].into_iter().enumerate() {
            heap.push(AStarNode {
                coord: PixelCoord::new(i, 0),
                g_cost: 0.0,
                f_cost: f,
            });
        }
        assert_eq!(heap.pop().unwrap().f_cost, 1.0);
        assert_eq!(heap.pop().unwrap().f_cost, 2.0);
    }

    #[test]
    fn test_path_cost() {
        let cells = [
            PixelCoord::new(0, 0),
            PixelCoord::new(0, 1),
            PixelCoord::new(1, 2),
            PixelCoord::new(2, 2),
        ];
        assert!((path_cost(&cells) - 3.4).abs() < 1e-12);
        assert_eq!(path_cost(&cells[..1]), 0.0);
    }

    #[test]
    fn test_budget() {
        let budget = SearchBudget::unbounded().with_max_expansions(10);
        assert!(!budget.exhausted(10));
        assert!(budget.exhausted(11));

        let expired = SearchBudget::unbounded().with_timeout(Duration::ZERO);
        assert!(expired.exhausted(0));
        assert!(!SearchBudget::unbounded().exhausted(usize::MAX));
    }

    #[test]
    fn test_provenance_names() {
        let failed = PathResult::failed(SearchOutcome::BudgetExhausted, 5);
        assert_eq!(failed.provenance().as_str(), "fallback");
        assert_eq!(PathProvenance::SearchSuccess.as_str(), "search-success");
    }
}
