use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "config.toml";

pub fn default_config_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/root"))
        .join(".config/docker-cleaner")
}

/// Deadlines applied to engine calls, in seconds.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct TimeoutsConfig {
    /// Overall budget of the read-only `list` command
    pub list_secs: u64,
    /// Overall budget of the `clean` command
    pub clean_secs: u64,
    /// Grace period given to each running container before the engine kills it
    pub stop_secs: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            list_secs: 30,
            clean_secs: 300,
            stop_secs: 10,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ContainersConfig {
    /// Signal sent when stopping a container fails
    pub kill_signal: String,
}

impl Default for ContainersConfig {
    fn default() -> Self {
        Self {
            kill_signal: "SIGKILL".to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub timeouts: TimeoutsConfig,
    pub containers: ContainersConfig,
}

impl AppConfig {
    pub fn list_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.list_secs)
    }

    pub fn clean_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.clean_secs)
    }

    pub fn stop_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.stop_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.timeouts.list_secs == 0 {
            bail!("timeouts.list_secs must be greater than zero");
        }
        if self.timeouts.clean_secs == 0 {
            bail!("timeouts.clean_secs must be greater than zero");
        }
        if self.containers.kill_signal.trim().is_empty() {
            bail!("containers.kill_signal must not be empty");
        }
        Ok(())
    }
}

/// Loads `config.toml` from `config_dir`, falling back to defaults when the
/// file does not exist.
pub fn load_app_config(config_dir: &Path) -> Result<AppConfig> {
    let path = config_dir.join(CONFIG_FILE_NAME);

    if !path.exists() {
        debug!("No config at {:?}, using defaults", path);
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(&path).with_context(|| format!("reading {:?}", path))?;
    let config: AppConfig =
        toml::from_str(&content).with_context(|| format!("parsing {:?}", path))?;
    config
        .validate()
        .with_context(|| format!("validating {:?}", path))?;

    debug!("Loaded config from {:?}", path);
    Ok(config)
}
