//! Unified configuration loading for Marga.
//!
//! Loads all configuration from a single YAML file. Every field has a
//! default, so an empty file (or no file) gives the stock behavior.

mod corridor;
mod defaults;
mod error;
mod grid;
mod marga;
mod raster;
mod route;
mod search;

// Re-export main types
pub use error::ConfigLoadError;
pub use marga::MargaConfig;

// Re-export section types
pub use corridor::CorridorSection;
pub use grid::GridSection;
pub use raster::RasterSection;
pub use route::RouteSection;
pub use search::SearchSection;
