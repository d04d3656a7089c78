//! Navigation tuning shared by every session of a host.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest accepted `MaxIteration`.
pub const MIN_ITERATIONS: usize = 100;
/// Largest accepted `MaxIteration`.
pub const MAX_ITERATIONS: usize = 10_000;

/// Global pathfinding options.
///
/// Field names on the wire follow the host's plugin parameter names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Cap on nodes a single A* search may expand.
    #[serde(rename = "MaxIteration")]
    pub max_iterations: usize,
    /// Whether a hard-blocked agent with no alternative route may walk
    /// through the obstacle for one step.
    #[serde(rename = "ThroughIfHardBlocked")]
    pub through_if_hard_blocked: bool,
    /// Largest ring radius the nearest-reachable fallback searches.
    #[serde(rename = "NearestRadius")]
    pub nearest_radius: i32,
    /// Consecutive blocked ticks tolerated before replanning.
    #[serde(rename = "StuckThreshold")]
    pub stuck_threshold: u32,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            through_if_hard_blocked: false,
            nearest_radius: 6,
            stuck_threshold: 3,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid navigation config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl NavConfig {
    /// Parse a JSON object of options; absent keys keep their defaults and
    /// out-of-range values are clamped.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: NavConfig = serde_json::from_str(s)?;
        Ok(cfg.sanitized())
    }

    /// Clamp every option into its accepted range, logging what changed.
    pub fn sanitized(mut self) -> Self {
        let iterations = self.max_iterations.clamp(MIN_ITERATIONS, MAX_ITERATIONS);
        if iterations != self.max_iterations {
            log::warn!(
                "MaxIteration {} outside {MIN_ITERATIONS}..={MAX_ITERATIONS}, using {iterations}",
                self.max_iterations
            );
            self.max_iterations = iterations;
        }
        if self.nearest_radius < 0 {
            log::warn!("NearestRadius {} is negative, using 0", self.nearest_radius);
            self.nearest_radius = 0;
        }
        if self.stuck_threshold == 0 {
            log::warn!("StuckThreshold 0 would replan before any wait, using 1");
            self.stuck_threshold = 1;
        }
        self
    }
}
