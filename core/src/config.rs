//! Engine configuration
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! is a valid configuration.

use std::path::Path;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::AlgorithmError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Seed for the per-run random source; entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,

    /// Wait used for the "fastest" speed, in milliseconds
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,

    /// `env_logger` filter directives applied by the host
    #[serde(default)]
    pub log_filter: Option<String>,
}

fn default_frame_interval_ms() -> u64 {
    16
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            frame_interval_ms: default_frame_interval_ms(),
            log_filter: None,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, AlgorithmError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AlgorithmError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), AlgorithmError> {
        if self.frame_interval_ms == 0 || self.frame_interval_ms > 1000 {
            return Err(AlgorithmError::Config(format!(
                "frame_interval_ms must be within 1..=1000, got {}",
                self.frame_interval_ms
            )));
        }
        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    /// Fresh random source for one run
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
