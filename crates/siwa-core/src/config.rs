//! Configuration for the credential store and the scripted platform.
//!
//! Loaded from a TOML file; every field has a default so a missing or
//! partial file is fine.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::platform::ScriptedSignal;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "SIWA_CONFIG";
/// Environment variable overriding the log filter.
pub const LOG_ENV: &str = "SIWA_LOG";
/// Config file name used when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "siwa.toml";

/// Scripted platform configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Signal reported for users without an entry in `users`.
    pub default_signal: ScriptedSignal,
    /// Delay before the platform answers, in milliseconds (0 answers at once).
    pub delay_ms: u64,
    /// Per-user signals.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub users: BTreeMap<String, ScriptedSignal>,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            default_signal: ScriptedSignal::NotFound,
            delay_ms: 0,
            users: BTreeMap::new(),
        }
    }
}

impl PlatformConfig {
    pub fn delay(&self) -> Option<Duration> {
        (self.delay_ms > 0).then(|| Duration::from_millis(self.delay_ms))
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seconds the platform adapter waits for an answer (0 disables).
    pub query_timeout_secs: u32,

    /// Tracing filter directive, e.g. "siwa_core=debug".
    pub log_filter: Option<String>,

    /// Scripted platform answers.
    pub platform: PlatformConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            query_timeout_secs: Self::DEFAULT_QUERY_TIMEOUT_SECS,
            log_filter: None,
            platform: PlatformConfig::default(),
        }
    }
}

impl Config {
    const DEFAULT_QUERY_TIMEOUT_SECS: u32 = 10;

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Writes the default config template to `path`.
    ///
    /// Fails if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            bail!("Config file already exists at {}", path.display());
        }
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(path, default_config_template())
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// Platform answer timeout, `None` when disabled.
    pub fn query_timeout(&self) -> Option<Duration> {
        (self.query_timeout_secs > 0)
            .then(|| Duration::from_secs(u64::from(self.query_timeout_secs)))
    }
}

/// Resolves the config path: explicit path, then `SIWA_CONFIG`, then `./siwa.toml`.
pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match std::env::var(CONFIG_ENV) {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_CONFIG_FILE),
    }
}

/// Commented template written by `Config::init`.
pub fn default_config_template() -> &'static str {
    r#"# siwa configuration

# Seconds to wait for the platform to answer a status query (0 disables)
query_timeout_secs = 10

# Tracing filter (overridden by SIWA_LOG)
# log_filter = "siwa_core=debug"

[platform]
# Answer for users not listed below:
# authorized, revoked, not_found, transferred, error, unknown:<n>
default_signal = "not_found"

# Milliseconds before the platform answers
delay_ms = 0

[platform.users]
# "001234.abcd" = "authorized"
"#
}
