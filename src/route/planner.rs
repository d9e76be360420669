//! End-to-end route planning.
//!
//! Two pipelines share the search and assembly steps:
//!
//! - vector: request features → [`FeatureDistanceStrategy`] → linear grid
//! - raster: [`GeoRaster`] → [`ColorClassificationStrategy`] → affine grid
//!
//! Then: endpoints → cells → A* → [`RouteAssembler`] → optional corridor check.
//! Everything is request-scoped; the planner itself only holds read-only
//! configuration and the corridor.

use std::time::Duration;

use log::{debug, info, warn};

use crate::config::MargaConfig;
use crate::core::GeoPoint;
use crate::corridor::CorridorFilter;
use crate::error::{Result, RouteError};
use crate::grid::{
    ColorClassificationStrategy, ColorThresholds, FeatureDistanceConfig, FeatureDistanceStrategy,
    NavigabilityGrid, NavigabilityStrategy,
};
use crate::io::GeoRaster;
use crate::pathfinding::{AStarPlanner, PathResult, SearchBudget, SearchOutcome};

use super::assembler::{AssemblerConfig, RouteAssembler};
use super::request::{RoutePlan, RouteRequest};

/// Search limits applied to every request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchLimits {
    pub max_expansions: Option<usize>,
    pub timeout: Option<Duration>,
}

impl SearchLimits {
    /// Budget for a search starting now.
    pub fn budget(&self) -> SearchBudget {
        let mut budget = SearchBudget::unbounded();
        if let Some(max) = self.max_expansions {
            budget = budget.with_max_expansions(max);
        }
        if let Some(timeout) = self.timeout {
            budget = budget.with_timeout(timeout);
        }
        budget
    }
}

/// Plans routes for requests.
#[derive(Debug)]
pub struct RoutePlanner {
    features: FeatureDistanceStrategy,
    colors: ColorClassificationStrategy,
    limits: SearchLimits,
    assembler: RouteAssembler,
    corridor: Option<CorridorFilter>,
    restrict_grid: bool,
}

impl Default for RoutePlanner {
    fn default() -> Self {
        Self {
            features: FeatureDistanceStrategy::default(),
            colors: ColorClassificationStrategy::default(),
            limits: SearchLimits::default(),
            assembler: RouteAssembler::default(),
            corridor: None,
            restrict_grid: false,
        }
    }
}

impl RoutePlanner {
    /// Build a planner from explicit parts.
    pub fn new(
        grid: FeatureDistanceConfig,
        thresholds: ColorThresholds,
        limits: SearchLimits,
        assembler: AssemblerConfig,
    ) -> Result<Self> {
        Ok(Self {
            features: FeatureDistanceStrategy::new(grid),
            colors: ColorClassificationStrategy::new(thresholds),
            limits,
            assembler: RouteAssembler::new(assembler)?,
            corridor: None,
            restrict_grid: false,
        })
    }

    /// Build a planner from configuration, loading the corridor if one is configured.
    pub fn from_config(config: &MargaConfig) -> Result<Self> {
        let mut planner = Self::new(
            config.feature_distance_config(),
            config.color_thresholds(),
            config.search_limits(),
            config.assembler_config(),
        )?;
        if let Some(source) = &config.corridor.source {
            let corridor = CorridorFilter::from_file(source, &config.corridor_config())?;
            planner = planner.with_corridor(corridor, config.corridor.restrict_grid);
        }
        Ok(planner)
    }

    /// Attach a corridor. With `restrict_grid`, cells outside it are blocked
    /// before searching.
    pub fn with_corridor(mut self, corridor: CorridorFilter, restrict_grid: bool) -> Self {
        self.corridor = Some(corridor);
        self.restrict_grid = restrict_grid;
        self
    }

    /// The attached corridor, if any.
    pub fn corridor(&self) -> Option<&CorridorFilter> {
        self.corridor.as_ref()
    }

    /// Vector pipeline: plan from a request's feature collection.
    pub fn plan(&self, request: &RouteRequest) -> Result<RoutePlan> {
        request.validate()?;
        let features = request.geojson.geometries()?;
        let grid = self.features.build(&features)?;
        self.run(
            grid,
            request.start_point(),
            request.end_point(),
            request.use_corridor,
        )
    }

    /// Raster pipeline: plan over classified imagery.
    pub fn plan_raster(
        &self,
        raster: &GeoRaster,
        start: GeoPoint,
        end: GeoPoint,
        use_corridor: bool,
    ) -> Result<RoutePlan> {
        let grid = self.colors.build(raster)?;
        self.run(grid, start, end, use_corridor)
    }

    fn corridor_for(&self, use_corridor: bool) -> Result<Option<&CorridorFilter>> {
        if !use_corridor {
            return Ok(None);
        }
        self.corridor
            .as_ref()
            .map(Some)
            .ok_or_else(|| RouteError::computation("corridor requested but none is configured"))
    }

    fn run(
        &self,
        mut grid: NavigabilityGrid,
        start: GeoPoint,
        end: GeoPoint,
        use_corridor: bool,
    ) -> Result<RoutePlan> {
        let corridor = self.corridor_for(use_corridor)?;

        if let Some(corridor) = corridor.filter(|_| self.restrict_grid) {
            let blocked = grid.retain_traversable(|p, transform| {
                corridor.contains(transform.pixel_to_geo(p)?)
            })?;
            debug!("[Planner] corridor blocked {} cells", blocked);
        }

        let path = match (grid.transform().locate(start)?, grid.transform().locate(end)?) {
            (Some(from), Some(to)) => {
                AStarPlanner::new(&grid, self.limits.budget()).find_path(from, to)
            }
            _ => {
                warn!("[Planner] start or end outside the grid, using fallback");
                PathResult::failed(SearchOutcome::NoPath, 0)
            }
        };

        let route = self.assembler.assemble(&path, grid.transform(), start, end)?;
        let corridor_points_outside = match corridor {
            Some(c) => Some(c.count_outside(&route.points)?),
            None => None,
        };

        info!(
            "[Planner] {} route with {} points ({:?}, {} nodes expanded)",
            route.method.as_str(),
            route.points.len(),
            route.outcome,
            path.nodes_expanded
        );
        Ok(RoutePlan {
            route,
            corridor_points_outside,
        })
    }
}
