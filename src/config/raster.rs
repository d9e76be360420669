//! Color classification configuration section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Raster classification settings section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RasterSection {
    /// Minimum blue / mean(red, green) ratio for water
    #[serde(default = "defaults::blue_ratio_threshold")]
    pub blue_ratio_threshold: f32,

    /// Minimum blue value for water
    #[serde(default = "defaults::blue_min")]
    pub blue_min: u8,

    /// Minimum value of all channels for ice
    #[serde(default = "defaults::ice_brightness_threshold")]
    pub ice_brightness_threshold: u8,
}

impl Default for RasterSection {
    fn default() -> Self {
        Self {
            blue_ratio_threshold: 1.2,
            blue_min: 80,
            ice_brightness_threshold: 220,
        }
    }
}
