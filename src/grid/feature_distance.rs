//! Feature-distance strategy for vector input.
//!
//! Every feature is reduced to a representative point (the point itself, or
//! the centroid of anything larger). The grid spans the total bounds of the
//! input geometries; a cell is traversable when the nearest representative
//! point lies strictly closer than the distance threshold.

use geo::{BoundingRect, Centroid, Geometry, Point};
use log::{debug, info};
use rstar::RTree;

use crate::core::{BoundingBox, PixelCoord};
use crate::error::{Result, RouteError};

use super::strategy::NavigabilityStrategy;
use super::transform::LinearTransform;
use super::NavigabilityGrid;

/// Feature-distance grid parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureDistanceConfig {
    /// Grid columns.
    pub width: usize,
    /// Grid rows.
    pub height: usize,
    /// Maximum distance (input units, exclusive) from a feature for a cell to be traversable.
    pub distance_threshold: f64,
}

impl Default for FeatureDistanceConfig {
    fn default() -> Self {
        Self {
            width: 200,
            height: 200,
            distance_threshold: 0.02,
        }
    }
}

/// Representative point of a geometry: the point itself, otherwise its centroid.
///
/// `None` for geometries without a centroid (e.g. an empty collection).
pub fn representative_point(geometry: &Geometry<f64>) -> Option<Point<f64>> {
    match geometry {
        Geometry::Point(p) => Some(*p),
        other => other.centroid(),
    }
}

/// Vector grid builder: proximity to a feature marks a cell traversable.
#[derive(Clone, Debug, Default)]
pub struct FeatureDistanceStrategy {
    config: FeatureDistanceConfig,
}

impl FeatureDistanceStrategy {
    /// Create a strategy with the given parameters.
    pub fn new(config: FeatureDistanceConfig) -> Self {
        Self { config }
    }

    /// Strategy parameters.
    pub fn config(&self) -> &FeatureDistanceConfig {
        &self.config
    }

    /// Total bounds of all geometries.
    fn total_bounds(features: &[Geometry<f64>]) -> Result<BoundingBox> {
        let mut bounds = BoundingBox::empty();
        for (i, g) in features.iter().enumerate() {
            let rect = g
                .bounding_rect()
                .ok_or_else(|| RouteError::input(format!("feature {i} has an empty geometry")))?;
            bounds.expand_to_include(rect.min().x, rect.min().y);
            bounds.expand_to_include(rect.max().x, rect.max().y);
        }
        bounds.validate()?;
        Ok(bounds)
    }
}

impl NavigabilityStrategy for FeatureDistanceStrategy {
    type Input = [Geometry<f64>];

    fn name(&self) -> &'static str {
        "feature-distance"
    }

    fn build(&self, features: &[Geometry<f64>]) -> Result<NavigabilityGrid> {
        if features.is_empty() {
            return Err(RouteError::input("feature collection is empty"));
        }
        let threshold = self.config.distance_threshold;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(RouteError::input(format!(
                "distance threshold must be positive, got {threshold}"
            )));
        }

        let points = features
            .iter()
            .enumerate()
            .map(|(i, g)| {
                representative_point(g)
                    .map(|p| [p.x(), p.y()])
                    .ok_or_else(|| RouteError::input(format!("feature {i} has no representative point")))
            })
            .collect::<Result<Vec<_>>>()?;
        let bounds = Self::total_bounds(features)?;
        let transform = LinearTransform::new(bounds, self.config.height, self.config.width)?;

        let index = RTree::bulk_load(points);
        debug!(
            "[GridBuilder] {} representative points over {:?}",
            index.size(),
            bounds
        );

        let threshold_sq = threshold * threshold;
        let (xs, ys) = (transform.xs().to_vec(), transform.ys().to_vec());
        let mut grid = NavigabilityGrid::blocked(transform.into());
        for (row, &y) in ys.iter().enumerate() {
            for (col, &x) in xs.iter().enumerate() {
                let near = index
                    .nearest_neighbor(&[x, y])
                    .is_some_and(|p| sq_dist(p, &[x, y]) < threshold_sq);
                if near {
                    grid.set_traversable(PixelCoord::new(row, col), true);
                }
            }
        }

        info!(
            "[GridBuilder] {}: {}x{} grid, {} traversable cells",
            self.name(),
            grid.height(),
            grid.width(),
            grid.traversable_count()
        );
        Ok(grid)
    }
}

#[inline]
fn sq_dist(a: &[f64; 2], b: &[f64; 2]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx * dx + dy * dy
}
