//! Container configuration with precedence and validation
//!
//! Values are resolved in increasing precedence: built-in defaults, an
//! optional JSON file, then `LINEAR_*` environment variables.

use crate::errors::{LinearError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the byte budget
pub const CAPACITY_ENV_VAR: &str = "LINEAR_CAPACITY_BYTES";
/// Environment variable overriding the eviction mode
pub const EVICT_ENV_VAR: &str = "LINEAR_EVICT_ON_OVERFLOW";

const DEFAULT_CAPACITY_BYTES: u64 = 1024 * 1024; // 1MB

/// Construction parameters for [`Linear`](crate::Linear)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearConfig {
    /// Byte budget shared by all entries
    pub capacity_bytes: u64,
    /// Drop the oldest entries instead of refusing writes that exceed the budget
    pub evict_on_overflow: bool,
}

impl Default for LinearConfig {
    fn default() -> Self {
        Self {
            capacity_bytes: DEFAULT_CAPACITY_BYTES,
            evict_on_overflow: false,
        }
    }
}

impl LinearConfig {
    pub fn new(capacity_bytes: u64, evict_on_overflow: bool) -> Self {
        Self {
            capacity_bytes,
            evict_on_overflow,
        }
    }

    /// Reject configurations a container cannot be built from
    pub fn validate(&self) -> Result<()> {
        if self.capacity_bytes == 0 {
            return Err(LinearError::configuration(
                "capacity_bytes must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// Source of configuration for debugging and precedence tracking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Built-in defaults
    Default,
    /// JSON configuration file
    ConfigFile(PathBuf),
    /// Environment variable
    EnvironmentVariable(String),
}

/// Configuration together with the layer that last changed it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub config: LinearConfig,
    pub source: ConfigSource,
}

/// Builder for creating container configurations
#[derive(Debug, Default)]
pub struct LinearConfigBuilder {
    config: LinearConfig,
}

impl LinearConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity_bytes(mut self, capacity_bytes: u64) -> Self {
        self.config.capacity_bytes = capacity_bytes;
        self
    }

    pub fn with_evict_on_overflow(mut self, evict: bool) -> Self {
        self.config.evict_on_overflow = evict;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<LinearConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Partial configuration as read from a file; absent fields keep the
/// lower-precedence value.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    capacity_bytes: Option<u64>,
    evict_on_overflow: Option<bool>,
}

/// Configuration loader that handles precedence
pub struct LinearConfigLoader;

impl LinearConfigLoader {
    /// Load configuration from defaults, `config_file` (if given and present)
    /// and the process environment.
    pub fn load(config_file: Option<&Path>) -> Result<ResolvedConfig> {
        Self::load_with(config_file, |name| std::env::var(name).ok())
    }

    /// Same as [`load`](Self::load) with an injectable environment lookup
    pub fn load_with<F>(config_file: Option<&Path>, lookup: F) -> Result<ResolvedConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut resolved = ResolvedConfig {
            config: LinearConfig::default(),
            source: ConfigSource::Default,
        };

        if let Some(path) = config_file {
            if let Some(file_config) = Self::load_from_config_file(path)? {
                if let Some(capacity) = file_config.capacity_bytes {
                    resolved.config.capacity_bytes = capacity;
                }
                if let Some(evict) = file_config.evict_on_overflow {
                    resolved.config.evict_on_overflow = evict;
                }
                resolved.source = ConfigSource::ConfigFile(path.to_path_buf());
            }
        }

        if Self::apply_env(&mut resolved.config, lookup)? {
            resolved.source = ConfigSource::EnvironmentVariable("LINEAR_*".to_string());
        }

        resolved.config.validate()?;
        tracing::debug!(
            capacity_bytes = resolved.config.capacity_bytes,
            evict_on_overflow = resolved.config.evict_on_overflow,
            source = ?resolved.source,
            "Resolved container configuration"
        );
        Ok(resolved)
    }

    fn load_from_config_file(path: &Path) -> Result<Option<FileConfig>> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            LinearError::configuration(format!(
                "failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        let file_config = serde_json::from_str(&content).map_err(|e| {
            LinearError::configuration(format!(
                "failed to parse config file {}: {e}",
                path.display()
            ))
        })?;

        Ok(Some(file_config))
    }

    /// Returns whether any override was applied
    fn apply_env<F>(config: &mut LinearConfig, lookup: F) -> Result<bool>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = false;

        if let Some(raw) = lookup(CAPACITY_ENV_VAR) {
            config.capacity_bytes = raw.trim().parse().map_err(|_| {
                LinearError::configuration(format!(
                    "{CAPACITY_ENV_VAR} must be a positive integer, got '{raw}'"
                ))
            })?;
            applied = true;
        }

        if let Some(raw) = lookup(EVICT_ENV_VAR) {
            config.evict_on_overflow = parse_flag(&raw).ok_or_else(|| {
                LinearError::configuration(format!(
                    "{EVICT_ENV_VAR} must be a boolean, got '{raw}'"
                ))
            })?;
            applied = true;
        }

        Ok(applied)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
