//! Runtime configuration.
//!
//! A [`PomConfig`] is fixed when the [`App`](crate::App) is created and
//! shared by every page and robot built on it. It can be built in code or
//! loaded from a YAML or JSON file:
//!
//! ```yaml
//! default_timeout_ms: 15000
//! poll_interval_ms: 250
//! failure_classification: collapsed
//! capabilities:
//!   requires_descendant_drill_down: true
//!   supports_accessibility_audit: false
//! ```

use crate::capabilities::PlatformCapabilities;
use crate::result::{PomError, PomResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default accessor timeout (10 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval of the wait loop (100ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// How wait failures are reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureClassification {
    /// `NotFound` and `NotHittable` are reported separately
    #[default]
    Distinct,
    /// Every wait failure is reported as `NotFound`
    Collapsed,
}

/// Configuration shared by an application handle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PomConfig {
    /// Timeout used when an accessor is not given one
    pub default_timeout_ms: u64,
    /// Delay between checks in the wait loop
    pub poll_interval_ms: u64,
    /// Whether hittability failures are kept distinct
    pub failure_classification: FailureClassification,
    /// Platform-dependent behaviour
    pub capabilities: PlatformCapabilities,
}

impl Default for PomConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            failure_classification: FailureClassification::Distinct,
            capabilities: PlatformCapabilities::default(),
        }
    }
}

impl PomConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default accessor timeout, rounded up to whole milliseconds
    #[must_use]
    pub const fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout_ms = ceil_millis(timeout);
        self
    }

    /// Set the polling interval, rounded up to whole milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = ceil_millis(interval);
        self
    }

    /// Set the failure classification
    #[must_use]
    pub const fn with_failure_classification(mut self, mode: FailureClassification) -> Self {
        self.failure_classification = mode;
        self
    }

    /// Set the platform capabilities
    #[must_use]
    pub const fn with_capabilities(mut self, capabilities: PlatformCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Default accessor timeout as Duration
    #[must_use]
    pub const fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    /// Poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Check the config for values the wait loop cannot run with
    pub fn validate(&self) -> PomResult<()> {
        if self.poll_interval_ms == 0 {
            return Err(PomError::InvalidConfig {
                message: "poll_interval_ms must be greater than zero".into(),
            });
        }
        Ok(())
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> PomResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> PomResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, picking the format from its extension
    pub fn load(path: impl AsRef<Path>) -> PomResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&raw),
            Some("yaml" | "yml") => Self::from_yaml_str(&raw),
            other => Err(PomError::InvalidConfig {
                message: format!(
                    "unsupported config extension {:?} for {}",
                    other.unwrap_or(""),
                    path.display()
                ),
            }),
        }
    }
}

// Rounds up so a positive duration never stores as zero.
const fn ceil_millis(duration: Duration) -> u64 {
    duration.as_nanos().div_ceil(1_000_000) as u64
}
