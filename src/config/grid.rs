//! Feature-distance grid configuration section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Grid settings section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GridSection {
    /// Grid columns
    #[serde(default = "defaults::grid_size")]
    pub width: usize,

    /// Grid rows
    #[serde(default = "defaults::grid_size")]
    pub height: usize,

    /// Cells closer than this to a feature are traversable (input units)
    #[serde(default = "defaults::distance_threshold")]
    pub distance_threshold: f64,
}

impl Default for GridSection {
    fn default() -> Self {
        Self {
            width: 200,
            height: 200,
            distance_threshold: 0.02,
        }
    }
}
