//! Turn a search result into a geographic route.
//!
//! A path of two or more cells is mapped cell by cell through the grid
//! transform. Anything shorter is replaced by a straight line of
//! `fallback_points` evenly spaced points from start to end inclusive.
//!
//! The `method` tag follows a [`ProvenancePolicy`]; the raw search outcome is
//! kept next to it either way.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::GeoPoint;
use crate::error::{Result, RouteError};
use crate::grid::CoordinateTransform;
use crate::pathfinding::{PathResult, SearchOutcome};

/// Final route tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteMethod {
    Astar,
    Fallback,
}

impl RouteMethod {
    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteMethod::Astar => "astar",
            RouteMethod::Fallback => "fallback",
        }
    }
}

/// How the `method` tag is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProvenancePolicy {
    /// `astar` only when the raw path has more than two cells. A two-cell
    /// path keeps its pixel coordinates but is tagged `fallback`.
    #[default]
    Legacy,
    /// Tag names the branch that produced the coordinates.
    Branch,
}

/// Assembler parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct AssemblerConfig {
    /// Points in a fallback line (at least 2).
    pub fallback_points: usize,
    /// Tagging policy.
    pub provenance: ProvenancePolicy,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            fallback_points: 50,
            provenance: ProvenancePolicy::Legacy,
        }
    }
}

/// A geographic route.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    /// Route points, start first.
    pub points: Vec<GeoPoint>,
    /// Final tag.
    pub method: RouteMethod,
    /// How the search ended.
    pub outcome: SearchOutcome,
    /// Cells in the raw search path.
    pub search_cells: usize,
}

impl Route {
    /// True when the coordinates came from the search path.
    pub fn from_search(&self) -> bool {
        self.search_cells >= 2
    }
}

/// `n` evenly spaced points from `start` to `end`, both included.
pub fn interpolate(start: GeoPoint, end: GeoPoint, n: usize) -> Vec<GeoPoint> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => (0..n)
            .map(|i| {
                if i == n - 1 {
                    end
                } else {
                    start.lerp(&end, i as f64 / (n - 1) as f64)
                }
            })
            .collect(),
    }
}

/// Builds routes from search results.
#[derive(Clone, Debug, Default)]
pub struct RouteAssembler {
    config: AssemblerConfig,
}

impl RouteAssembler {
    /// Create an assembler. Fewer than two fallback points is an input error.
    pub fn new(config: AssemblerConfig) -> Result<Self> {
        if config.fallback_points < 2 {
            return Err(RouteError::input(format!(
                "fallback line needs at least 2 points, got {}",
                config.fallback_points
            )));
        }
        Ok(Self { config })
    }

    /// Assembler parameters.
    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    /// Assemble the route for a search result.
    pub fn assemble(
        &self,
        path: &PathResult,
        transform: &CoordinateTransform,
        start: GeoPoint,
        end: GeoPoint,
    ) -> Result<Route> {
        let search_cells = path.cells.len();
        let (points, from_search) = if search_cells >= 2 {
            let points = path
                .cells
                .iter()
                .map(|&p| transform.pixel_to_geo(p))
                .collect::<Result<Vec<_>>>()?;
            (points, true)
        } else {
            (interpolate(start, end, self.config.fallback_points), false)
        };

        let method = match self.config.provenance {
            ProvenancePolicy::Legacy if search_cells > 2 => RouteMethod::Astar,
            ProvenancePolicy::Legacy => RouteMethod::Fallback,
            ProvenancePolicy::Branch if from_search => RouteMethod::Astar,
            ProvenancePolicy::Branch => RouteMethod::Fallback,
        };

        debug!(
            "[Planner] route: {} points, method={}, outcome={:?}",
            points.len(),
            method.as_str(),
            path.outcome
        );
        Ok(Route {
            points,
            method,
            outcome: path.outcome,
            search_cells,
        })
    }
}
