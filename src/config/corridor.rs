//! Shipping corridor configuration section.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::projection::Crs;

use super::defaults;

/// Corridor settings section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CorridorSection {
    /// GeoJSON file with the reference geometries (no corridor when unset)
    #[serde(default)]
    pub source: Option<PathBuf>,

    /// CRS of the source file, unless it declares one
    #[serde(default = "defaults::source_crs")]
    pub source_crs: Crs,

    /// Planar CRS the buffer is applied in
    #[serde(default = "defaults::working_crs")]
    pub working_crs: Crs,

    /// Buffer distance in working CRS units
    #[serde(default = "defaults::buffer_distance")]
    pub buffer_distance: f64,

    /// Block grid cells outside the corridor before searching
    #[serde(default)]
    pub restrict_grid: bool,
}

impl Default for CorridorSection {
    fn default() -> Self {
        Self {
            source: None,
            source_crs: defaults::source_crs(),
            working_crs: defaults::working_crs(),
            buffer_distance: defaults::buffer_distance(),
            restrict_grid: false,
        }
    }
}
