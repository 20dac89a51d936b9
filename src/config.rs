//! Configuration management module
//!
//! Driver timings come from a YAML file, then environment overrides.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use action_primitives::HandleSettings;
use anyhow::{ensure, Context, Result};
use domdriver_core_types::{DEFAULT_KEYBOARD_DELAY_MS, DEFAULT_POLLING_MS, DEFAULT_WAIT_TIMEOUT_MS};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{info, warn};

pub const ENV_POLLING_MS: &str = "DOMDRIVER_POLLING_MS";
pub const ENV_WAIT_TIMEOUT_MS: &str = "DOMDRIVER_WAIT_TIMEOUT_MS";
pub const ENV_KEYBOARD_DELAY_MS: &str = "DOMDRIVER_KEYBOARD_DELAY_MS";
pub const ENV_EVAL_TIMEOUT_MS: &str = "DOMDRIVER_EVAL_TIMEOUT_MS";
pub const ENV_LOG: &str = "DOMDRIVER_LOG";

/// Driver timings and log level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Cadence of wait-condition polling.
    pub polling_interval_ms: u64,
    /// Deadline for waits when the caller's context has none.
    pub wait_timeout_ms: u64,
    /// Pause between synthesized keystrokes.
    pub keyboard_delay_ms: u64,
    /// Upper bound for one evaluation round-trip.
    pub eval_timeout_ms: u64,
    pub log_level: String,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            polling_interval_ms: DEFAULT_POLLING_MS,
            wait_timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            keyboard_delay_ms: DEFAULT_KEYBOARD_DELAY_MS,
            eval_timeout_ms: 30_000,
            log_level: "info".to_string(),
        }
    }
}

impl DriverConfig {
    pub fn polling_interval(&self) -> Duration {
        Duration::from_millis(self.polling_interval_ms)
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }

    pub fn keyboard_delay(&self) -> Duration {
        Duration::from_millis(self.keyboard_delay_ms)
    }

    pub fn eval_timeout(&self) -> Duration {
        Duration::from_millis(self.eval_timeout_ms)
    }

    pub fn handle_settings(&self) -> HandleSettings {
        HandleSettings {
            polling: self.polling_interval(),
            wait_timeout: self.wait_timeout(),
            keyboard_delay: self.keyboard_delay(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.polling_interval_ms > 0,
            "polling_interval_ms must be greater than zero"
        );
        ensure!(
            self.eval_timeout_ms > 0,
            "eval_timeout_ms must be greater than zero"
        );
        Ok(())
    }

    /// Apply `DOMDRIVER_*` variables from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| env::var(key).ok())
    }

    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let millis = |key: &str| -> Result<Option<u64>> {
            match lookup(key) {
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .map(Some)
                    .with_context(|| format!("{key} must be a whole number of milliseconds, got '{raw}'")),
                None => Ok(None),
            }
        };

        if let Some(ms) = millis(ENV_POLLING_MS)? {
            self.polling_interval_ms = ms;
        }
        if let Some(ms) = millis(ENV_WAIT_TIMEOUT_MS)? {
            self.wait_timeout_ms = ms;
        }
        if let Some(ms) = millis(ENV_KEYBOARD_DELAY_MS)? {
            self.keyboard_delay_ms = ms;
        }
        if let Some(ms) = millis(ENV_EVAL_TIMEOUT_MS)? {
            self.eval_timeout_ms = ms;
        }
        if let Some(level) = lookup(ENV_LOG) {
            self.log_level = level;
        }
        Ok(())
    }
}

pub struct LoadedConfig {
    pub config: DriverConfig,
    pub path: PathBuf,
}

/// Default location: `./config/domdriver.yaml`, else the user config directory.
fn default_config_path() -> Result<PathBuf> {
    let local_config = PathBuf::from("config/domdriver.yaml");
    if local_config.exists() {
        return Ok(local_config);
    }
    let mut path = dirs::config_dir().context("Failed to get config directory")?;
    path.push("domdriver");
    path.push("config.yaml");
    Ok(path)
}

pub async fn load_config(config_path: Option<&Path>) -> Result<LoadedConfig> {
    let config_path = match config_path {
        Some(path) => path.to_path_buf(),
        None => default_config_path()?,
    };

    let mut config = if config_path.exists() {
        let content = fs::read_to_string(&config_path)
            .await
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
        let config: DriverConfig =
            serde_yaml::from_str(&content).context("Failed to parse config file")?;
        info!("Loaded configuration from: {}", config_path.display());
        config
    } else {
        warn!(
            "Config file not found, using defaults: {}",
            config_path.display()
        );
        DriverConfig::default()
    };

    config.apply_env_overrides()?;
    config.validate()?;

    Ok(LoadedConfig {
        config,
        path: config_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_engine_constants() {
        let config = DriverConfig::default();
        assert_eq!(config.polling_interval(), Duration::from_millis(100));
        assert_eq!(config.wait_timeout(), Duration::from_millis(5_000));
        assert_eq!(config.keyboard_delay(), Duration::from_millis(25));
        assert_eq!(config.eval_timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let config: DriverConfig = serde_yaml::from_str("polling_interval_ms: 50\n").unwrap();
        assert_eq!(config.polling_interval_ms, 50);
        assert_eq!(config.keyboard_delay_ms, 25);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn overrides_replace_file_values() {
        let vars: HashMap<&str, &str> = [(ENV_WAIT_TIMEOUT_MS, "750"), (ENV_LOG, "debug")]
            .into_iter()
            .collect();
        let mut config = DriverConfig::default();
        config
            .apply_overrides_from(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.wait_timeout_ms, 750);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.polling_interval_ms, 100);
    }

    #[test]
    fn unparsable_override_names_the_variable() {
        let mut config = DriverConfig::default();
        let err = config
            .apply_overrides_from(|key| (key == ENV_POLLING_MS).then(|| "fast".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_POLLING_MS));
    }

    #[test]
    fn zero_polling_is_rejected() {
        let config = DriverConfig {
            polling_interval_ms: 0,
            ..DriverConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
