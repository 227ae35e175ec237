//! Configuration loading for Pariksha

use crate::error::{ParikshaError, Result};
use crate::params::{BlendingParameters, DetectionParameters, ParameterSet, ScanParameters};
use crate::stages::SimulationConfig;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
///
/// The three parameter groups are required: they become both the current and
/// the default parameters at startup.
#[derive(Clone, Debug, Deserialize)]
pub struct ParikshaConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    pub robot_scan: ScanParameters,
    pub surface_detection: DetectionParameters,
    pub blending_plan: BlendingParameters,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Service runtime settings
#[derive(Clone, Debug, Deserialize)]
pub struct ServiceConfig {
    /// Republish the region cloud periodically (default: false)
    #[serde(default)]
    pub publish_region_point_cloud: bool,

    /// Region cloud publish period in milliseconds (default: 1000)
    #[serde(default = "default_publish_period")]
    pub publish_period_ms: u64,

    /// Number of dispatch workers (default: 4)
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Default request timeout in milliseconds (default: none)
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            publish_region_point_cloud: false,
            publish_period_ms: default_publish_period(),
            workers: default_workers(),
            request_timeout_ms: None,
        }
    }
}

fn default_publish_period() -> u64 {
    1000
}
fn default_workers() -> usize {
    4
}

impl ServiceConfig {
    pub fn publish_period(&self) -> Duration {
        Duration::from_millis(self.publish_period_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

impl ParikshaConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ParikshaError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: ParikshaConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.service.workers == 0 {
            return Err(ParikshaError::Config("service.workers must be at least 1".into()));
        }
        if self.service.publish_period_ms == 0 {
            return Err(ParikshaError::Config(
                "service.publish_period_ms must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Initial (and default) values of all parameter groups
    pub fn parameter_set(&self) -> ParameterSet {
        ParameterSet {
            robot_scan: self.robot_scan.clone(),
            surface_detection: self.surface_detection.clone(),
            blending_plan: self.blending_plan.clone(),
        }
    }
}
