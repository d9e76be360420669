//! Route assembly configuration section.

use serde::{Deserialize, Serialize};

use crate::route::ProvenancePolicy;

use super::defaults;

/// Route settings section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RouteSection {
    /// Points in a straight-line fallback
    #[serde(default = "defaults::fallback_points")]
    pub fallback_points: usize,

    /// `legacy` or `branch` method tagging
    #[serde(default)]
    pub provenance: ProvenancePolicy,
}

impl Default for RouteSection {
    fn default() -> Self {
        Self {
            fallback_points: 50,
            provenance: ProvenancePolicy::Legacy,
        }
    }
}
