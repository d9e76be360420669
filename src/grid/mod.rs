//! Navigability grids and the transforms that bind them to geography.
//!
//! A grid is built by one of two named strategies:
//!
//! - [`FeatureDistanceStrategy`]: vector features. A cell is traversable when
//!   it lies close to a feature.
//! - [`ColorClassificationStrategy`]: RGB imagery. A pixel is traversable when
//!   it classifies as open water.
//!
//! The two labelings mean different things;
//! both produce a [`NavigabilityGrid`] that owns its [`CoordinateTransform`].
//!
//! ## Example
//!
//! ```rust
//! use geo::{Geometry, Point};
//! use marga::grid::{FeatureDistanceConfig, FeatureDistanceStrategy, NavigabilityStrategy};
//!
//! let features = vec![
//!     Geometry::Point(Point::new(0.0, 0.0)),
//!     Geometry::Point(Point::new(1.0, 1.0)),
//! ];
//! let strategy = FeatureDistanceStrategy::new(FeatureDistanceConfig::default());
//! let grid = strategy.build(&features).unwrap();
//! assert_eq!((grid.height(), grid.width()), (200, 200));
//! ```

mod color;
mod feature_distance;
mod storage;
mod strategy;
pub mod transform;

pub use color::{
    ClassifiedPixels, ColorClassificationStrategy, ColorThresholds, PixelClass, classify_pixel,
    classify_pixels,
};
pub use feature_distance::{FeatureDistanceConfig, FeatureDistanceStrategy, representative_point};
pub use storage::NavigabilityGrid;
pub use strategy::NavigabilityStrategy;
pub use transform::{AffineTransform, CoordinateTransform, LinearTransform};
