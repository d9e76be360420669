//! Search budget configuration section.

use serde::{Deserialize, Serialize};

/// Search settings section. Both limits are off unless set.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SearchSection {
    /// Maximum nodes to expand
    #[serde(default)]
    pub max_expansions: Option<usize>,

    /// Wall-clock limit per search (milliseconds)
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}
