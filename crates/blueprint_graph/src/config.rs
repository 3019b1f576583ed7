// SPDX-License-Identifier: MIT OR Apache-2.0
//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Timing and safety limits for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How long a node visit lasts, in milliseconds
    pub node_visit_ms: u64,
    /// How long an edge visit lasts, in milliseconds
    pub edge_visit_ms: u64,
    /// Deepest chain of nested execute/resolve steps before the run is aborted
    pub max_depth: usize,
}

impl EngineConfig {
    /// Nominal node visit duration
    pub const DEFAULT_NODE_VISIT_MS: u64 = 150;
    /// Nominal edge visit duration
    pub const DEFAULT_EDGE_VISIT_MS: u64 = 300;
    /// Default nesting limit, a guard for the call stack
    pub const DEFAULT_MAX_DEPTH: usize = 1024;

    /// Configuration with zero-length visits
    pub fn instant() -> Self {
        Self {
            node_visit_ms: 0,
            edge_visit_ms: 0,
            ..Self::default()
        }
    }

    /// Node visit duration
    pub fn node_visit(&self) -> Duration {
        Duration::from_millis(self.node_visit_ms)
    }

    /// Edge visit duration
    pub fn edge_visit(&self) -> Duration {
        Duration::from_millis(self.edge_visit_ms)
    }

    /// Parse from RON text
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Load from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_ron_str(&text)
    }

    /// Serialize to pretty RON
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            node_visit_ms: Self::DEFAULT_NODE_VISIT_MS,
            edge_visit_ms: Self::DEFAULT_EDGE_VISIT_MS,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

/// Error while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Text is not valid RON for [`EngineConfig`]
    #[error("Failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Config could not be written out
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),
}
