//! Follower configuration contracts that can be shared across crates.

use serde::{Deserialize, Serialize};

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete follower configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowerBlueprint {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Follower definitions
    pub followers: Vec<FollowerConfig>,
}

impl FollowerBlueprint {
    /// Look up a follower by id
    pub fn follower(&self, id: &str) -> Option<&FollowerConfig> {
        self.followers.iter().find(|f| f.id == id)
    }
}

/// AnyBefore follower configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowerConfig {
    /// Follower stream ID (used for logging/metrics)
    pub id: String,

    /// Delay behind the driving range upper stamp (seconds)
    #[serde(default)]
    pub delay_s: f64,

    /// Queue configuration
    #[serde(default)]
    pub queue: QueueConfig,

    /// Occupancy monitor configuration
    #[serde(default)]
    pub monitor: MonitorConfig,
}

/// Queue configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Maximum buffered elements before the oldest is dropped
    pub capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { capacity: 1000 }
    }
}

/// Occupancy monitor configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Depth at which a backpressure warning is raised (None = never)
    #[serde(default)]
    pub high_watermark: Option<usize>,
}
