//! # Marga: Sea-Ice Route Planning
//!
//! Plans a path between two geographic points across a region whose
//! navigability comes either from vector features (e.g. ice floes) or from
//! classified RGB imagery, optionally checked against a shipping corridor.
//!
//! ## Quick Start
//!
//! ```rust
//! use marga::route::{RoutePlanner, RouteRequest};
//!
//! let request = RouteRequest::from_json(r#"{
//!     "start": [0.5, 0.5],
//!     "end": [9.5, 9.5],
//!     "geojson": {"type": "FeatureCollection", "features": [
//!         {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [1.0, 1.0]}},
//!         {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [9.0, 9.0]}}
//!     ]}
//! }"#).unwrap();
//!
//! let plan = RoutePlanner::default().plan(&request).unwrap();
//! // No traversable connection between the two features: straight-line fallback
//! assert_eq!(plan.route.points.len(), 50);
//! assert_eq!(plan.route.method.as_str(), "fallback");
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: Value types (GeoPoint, PixelCoord, BoundingBox)
//! - [`projection`]: CRS identifiers and reprojection
//! - [`grid`]: Coordinate transforms, grid storage and the two grid strategies
//! - [`pathfinding`]: 8-connected A* with an optional search budget
//! - [`corridor`]: Buffered shipping corridor containment
//! - [`route`]: Route assembly, fallback, request planning
//! - [`io`]: GeoJSON, GeoTIFF loading, route export
//! - [`config`]: YAML configuration
//!
//! ## Data Flow
//!
//! ```text
//!   features / raster
//!          │ NavigabilityStrategy::build
//!          ▼
//!   NavigabilityGrid + CoordinateTransform
//!          │ locate(start), locate(end)
//!          ▼
//!   AStarPlanner::find_path ──► PathResult
//!          │ RouteAssembler::assemble (or 50-point fallback)
//!          ▼
//!   Route ──► CorridorFilter::count_outside (optional)
//! ```

pub mod config;
pub mod core;
pub mod corridor;
pub mod error;
pub mod grid;
pub mod io;
pub mod pathfinding;
pub mod projection;
pub mod route;

pub use config::{ConfigLoadError, MargaConfig};
pub use core::{BoundingBox, GeoPoint, PixelCoord};
pub use corridor::{CorridorConfig, CorridorFilter};
pub use error::{Result, RouteError};
pub use grid::{
    ColorClassificationStrategy, CoordinateTransform, FeatureDistanceStrategy, NavigabilityGrid,
    NavigabilityStrategy,
};
pub use pathfinding::{AStarPlanner, PathResult, SearchBudget, SearchOutcome};
pub use route::{Route, RouteMethod, RoutePlan, RoutePlanner, RouteRequest};
