use super::inventory::short_id;
use crate::domain::{ContainerRuntime, ContainerSummary};
use crate::infra::AppConfig;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How running containers are brought down before a prune.
#[derive(Debug, Clone)]
pub struct StopPolicy {
    pub timeout: Duration,
    pub kill_signal: String,
}

impl From<&AppConfig> for StopPolicy {
    fn from(config: &AppConfig) -> Self {
        Self {
            timeout: config.stop_timeout(),
            kill_signal: config.containers.kill_signal.clone(),
        }
    }
}

impl Default for StopPolicy {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

pub struct ContainerService {
    runtime: Arc<dyn ContainerRuntime>,
}

impl ContainerService {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { runtime }
    }

    pub fn running(&self) -> Result<Vec<ContainerSummary>> {
        self.runtime
            .list_containers(false)
            .context("listing running containers")
    }

    /// Stops one container, falling back to a kill signal. Never fails:
    /// both errors are only logged. Returns whether the container went down.
    pub fn force_stop(&self, container: &ContainerSummary, policy: &StopPolicy) -> bool {
        let short = short_id(&container.id);

        match self.runtime.stop_container(&container.id, policy.timeout) {
            Ok(()) => {
                debug!("Stopped {short}");
                return true;
            }
            Err(e) => warn!("{e}"),
        }

        match self.runtime.kill_container(&container.id, &policy.kill_signal) {
            Ok(()) => {
                debug!("Killed {short} with {}", policy.kill_signal);
                true
            }
            Err(e) => {
                warn!("{e}");
                false
            }
        }
    }

    /// Brings every running container down. Only the listing can fail.
    pub fn force_stop_all(&self, policy: &StopPolicy) -> Result<usize> {
        let running = self.running()?;
        if running.is_empty() {
            return Ok(0);
        }

        info!("Stopping {} running container(s)...", running.len());

        let stopped = running
            .iter()
            .filter(|c| self.force_stop(c, policy))
            .count();

        Ok(stopped)
    }
}
