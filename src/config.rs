// Configuration for bucketing and synthesis
//
// Only the window width and the synthesis strategy affect results. Everything
// else (which files to read, where to write) belongs to the CLI.

use crate::error::SynthError;
use crate::synth::StrategyKind;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default window width in milliseconds
pub const DEFAULT_BUCKET_SIZE_MS: i64 = 1000;

/// Core configuration
///
/// # Example
/// ```
/// use probesynth::config::SynthConfig;
///
/// let config = SynthConfig::default();
/// assert_eq!(config.bucket_size_ms, 1000);
/// assert!(config.validate().is_ok());
/// ```
///
/// # Example TOML
/// ```toml
/// bucket_size_ms = 250
/// strategy = "net-outstanding"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynthConfig {
    /// Window width in milliseconds, must be positive
    pub bucket_size_ms: i64,

    /// How start/end counts become an in-flight estimate
    pub strategy: StrategyKind,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            bucket_size_ms: DEFAULT_BUCKET_SIZE_MS,
            strategy: StrategyKind::CumulativeDelta,
        }
    }
}

impl SynthConfig {
    /// Load configuration from a TOML file; missing keys take defaults
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: SynthConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), SynthError> {
        if self.bucket_size_ms <= 0 {
            return Err(SynthError::InvalidConfiguration(format!(
                "bucket_size_ms must be > 0, got {}",
                self.bucket_size_ms
            )));
        }
        Ok(())
    }
}
