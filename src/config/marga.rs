//! Main MargaConfig and conversion methods.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::corridor::CorridorConfig;
use crate::grid::{ColorThresholds, FeatureDistanceConfig};
use crate::route::{AssemblerConfig, SearchLimits};

use super::corridor::CorridorSection;
use super::error::ConfigLoadError;
use super::grid::GridSection;
use super::raster::RasterSection;
use super::route::RouteSection;
use super::search::SearchSection;

/// Full Marga configuration loaded from YAML
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct MargaConfig {
    /// Feature-distance grid settings
    #[serde(default)]
    pub grid: GridSection,

    /// Color classification settings
    #[serde(default)]
    pub raster: RasterSection,

    /// Search budget
    #[serde(default)]
    pub search: SearchSection,

    /// Route assembly settings
    #[serde(default)]
    pub route: RouteSection,

    /// Shipping corridor settings
    #[serde(default)]
    pub corridor: CorridorSection,
}

impl MargaConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigLoadError::Io(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Load from default config path (configs/config.yaml)
    pub fn load_default() -> Result<Self, ConfigLoadError> {
        let path = Path::new("configs/config.yaml");
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigLoadError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no request could work with
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.grid.width < 2 || self.grid.height < 2 {
            return Err(ConfigLoadError::Invalid(format!(
                "grid must be at least 2x2, got {}x{}",
                self.grid.height, self.grid.width
            )));
        }
        if !(self.grid.distance_threshold > 0.0) {
            return Err(ConfigLoadError::Invalid(
                "grid.distance_threshold must be positive".to_string(),
            ));
        }
        if self.route.fallback_points < 2 {
            return Err(ConfigLoadError::Invalid(
                "route.fallback_points must be at least 2".to_string(),
            ));
        }
        if !(self.corridor.buffer_distance >= 0.0) {
            return Err(ConfigLoadError::Invalid(
                "corridor.buffer_distance must be non-negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Convert to FeatureDistanceConfig
    pub fn feature_distance_config(&self) -> FeatureDistanceConfig {
        FeatureDistanceConfig {
            width: self.grid.width,
            height: self.grid.height,
            distance_threshold: self.grid.distance_threshold,
        }
    }

    /// Convert to ColorThresholds
    pub fn color_thresholds(&self) -> ColorThresholds {
        ColorThresholds {
            blue_ratio: self.raster.blue_ratio_threshold,
            blue_min: self.raster.blue_min,
            ice_brightness: self.raster.ice_brightness_threshold,
        }
    }

    /// Convert to SearchLimits
    pub fn search_limits(&self) -> SearchLimits {
        SearchLimits {
            max_expansions: self.search.max_expansions,
            timeout: self.search.timeout_ms.map(Duration::from_millis),
        }
    }

    /// Convert to AssemblerConfig
    pub fn assembler_config(&self) -> AssemblerConfig {
        AssemblerConfig {
            fallback_points: self.route.fallback_points,
            provenance: self.route.provenance,
        }
    }

    /// Convert to CorridorConfig
    pub fn corridor_config(&self) -> CorridorConfig {
        CorridorConfig {
            source_crs: self.corridor.source_crs.clone(),
            working_crs: self.corridor.working_crs.clone(),
            buffer_distance: self.corridor.buffer_distance,
        }
    }
}
