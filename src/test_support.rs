use crate::domain::{
    ContainerRuntime, ContainerSummary, DiskUsage, EngineInfo, ImageSummary, PruneFilter,
    PruneReport, ResourceKind, RuntimeError, RuntimeResult, VolumeSummary,
};
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct MockContainer {
    pub id: String,
    pub name: String,
    pub image: String,
    pub running: bool,
    /// Refuses `stop`, so only `kill` can bring it down
    pub stuck: bool,
}

/// In-memory engine recording every call as `"op:arg"`.
#[derive(Debug)]
pub struct MockRuntime {
    containers: RwLock<Vec<MockContainer>>,
    images: RwLock<Vec<ImageSummary>>,
    volumes: RwLock<Vec<VolumeSummary>>,
    prunable: RwLock<HashMap<ResourceKind, PruneReport>>,
    disk_usage: RwLock<DiskUsage>,
    commands: RwLock<Vec<String>>,
    filters: RwLock<Vec<(ResourceKind, PruneFilter)>>,
    fail_on: RwLock<HashSet<String>>,
    closed: RwLock<bool>,
}

impl MockRuntime {
    pub fn new() -> Self {
        Self {
            containers: RwLock::new(Vec::new()),
            images: RwLock::new(Vec::new()),
            volumes: RwLock::new(Vec::new()),
            prunable: RwLock::new(HashMap::new()),
            disk_usage: RwLock::new(DiskUsage::default()),
            commands: RwLock::new(Vec::new()),
            filters: RwLock::new(Vec::new()),
            fail_on: RwLock::new(HashSet::new()),
            closed: RwLock::new(false),
        }
    }

    pub fn add_container(&self, id: &str, name: &str, running: bool) {
        self.containers.write().unwrap().push(MockContainer {
            id: id.to_string(),
            name: name.to_string(),
            image: "alpine:latest".to_string(),
            running,
            stuck: false,
        });
    }

    /// A running container whose stop call fails.
    pub fn add_stuck_container(&self, id: &str, name: &str) {
        self.containers.write().unwrap().push(MockContainer {
            id: id.to_string(),
            name: name.to_string(),
            image: "alpine:latest".to_string(),
            running: true,
            stuck: true,
        });
    }

    pub fn add_image(&self, id: &str, repo_tags: &[&str], size: u64) {
        self.images.write().unwrap().push(ImageSummary {
            id: id.to_string(),
            repo_tags: repo_tags.iter().map(|t| t.to_string()).collect(),
            size,
        });
    }

    pub fn add_volume(&self, name: &str, driver: &str, mountpoint: &str) {
        self.volumes.write().unwrap().push(VolumeSummary {
            name: name.to_string(),
            driver: driver.to_string(),
            mountpoint: mountpoint.to_string(),
        });
    }

    /// What the next prune of `kind` reports. Container prunes also report
    /// every stopped container.
    pub fn set_prunable(&self, kind: ResourceKind, ids: &[&str], bytes: u64) {
        self.prunable.write().unwrap().insert(
            kind,
            PruneReport {
                removed: ids.iter().map(|s| s.to_string()).collect(),
                space_reclaimed: bytes,
            },
        );
    }

    pub fn set_disk_usage(&self, usage: DiskUsage) {
        *self.disk_usage.write().unwrap() = usage;
    }

    pub fn set_fail_on(&self, operation: &str) {
        self.fail_on.write().unwrap().insert(operation.to_string());
    }

    pub fn get_commands(&self) -> Vec<String> {
        self.commands.read().unwrap().clone()
    }

    /// Calls that would change engine state.
    pub fn mutating_commands(&self) -> Vec<String> {
        self.get_commands()
            .into_iter()
            .filter(|c| c.starts_with("prune:") || c.starts_with("stop:") || c.starts_with("kill:"))
            .collect()
    }

    pub fn filter_for(&self, kind: ResourceKind) -> Option<PruneFilter> {
        self.filters
            .read()
            .unwrap()
            .iter()
            .rev()
            .find(|(k, _)| *k == kind)
            .map(|(_, f)| f.clone())
    }

    pub fn is_running(&self, id: &str) -> Option<bool> {
        self.containers
            .read()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.running)
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.read().unwrap()
    }

    fn record_command(&self, cmd: &str) {
        self.commands.write().unwrap().push(cmd.to_string());
    }

    fn should_fail(&self, operation: &str) -> bool {
        self.fail_on.read().unwrap().contains(operation)
    }

    fn check_fail(&self, operation: &str, err: impl FnOnce() -> RuntimeError) -> RuntimeResult<()> {
        if *self.closed.read().unwrap() {
            return Err(RuntimeError::Connection("connection closed".into()));
        }
        if self.should_fail(operation) {
            return Err(err());
        }
        Ok(())
    }

    fn prune(&self, kind: ResourceKind, filter: &PruneFilter) -> RuntimeResult<PruneReport> {
        self.record_command(&format!("prune:{kind}"));
        self.filters.write().unwrap().push((kind, filter.clone()));
        self.check_fail(&format!("prune_{kind}"), || {
            RuntimeError::prune(kind, "mock failure")
        })?;

        Ok(self
            .prunable
            .write()
            .unwrap()
            .remove(&kind)
            .unwrap_or_default())
    }
}

impl Default for MockRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerRuntime for MockRuntime {
    fn list_containers(&self, include_stopped: bool) -> RuntimeResult<Vec<ContainerSummary>> {
        self.record_command(&format!("list_containers:{include_stopped}"));
        self.check_fail("list_containers", || {
            RuntimeError::list("containers", "mock failure")
        })?;

        Ok(self
            .containers
            .read()
            .unwrap()
            .iter()
            .filter(|c| include_stopped || c.running)
            .map(|c| ContainerSummary {
                id: c.id.clone(),
                names: vec![format!("/{}", c.name)],
                image: c.image.clone(),
                status: if c.running { "Up 2 hours" } else { "Exited (0)" }.to_string(),
                state: if c.running { "running" } else { "exited" }.to_string(),
            })
            .collect())
    }

    fn list_images(&self) -> RuntimeResult<Vec<ImageSummary>> {
        self.record_command("list_images");
        self.check_fail("list_images", || RuntimeError::list("images", "mock failure"))?;
        Ok(self.images.read().unwrap().clone())
    }

    fn list_volumes(&self) -> RuntimeResult<Vec<VolumeSummary>> {
        self.record_command("list_volumes");
        self.check_fail("list_volumes", || RuntimeError::list("volumes", "mock failure"))?;
        Ok(self.volumes.read().unwrap().clone())
    }

    fn system_info(&self) -> RuntimeResult<EngineInfo> {
        self.record_command("system_info");
        self.check_fail("system_info", || {
            RuntimeError::list("system info", "mock failure")
        })?;

        let containers = self.containers.read().unwrap();
        Ok(EngineInfo {
            name: "mock-host".to_string(),
            server_version: "27.0.0".to_string(),
            operating_system: "MockOS".to_string(),
            containers: containers.len() as u64,
            containers_running: containers.iter().filter(|c| c.running).count() as u64,
            images: self.images.read().unwrap().len() as u64,
        })
    }

    fn disk_usage(&self) -> RuntimeResult<DiskUsage> {
        self.record_command("disk_usage");
        self.check_fail("disk_usage", || RuntimeError::list("disk usage", "mock failure"))?;
        Ok(self.disk_usage.read().unwrap().clone())
    }

    fn stop_container(&self, id: &str, timeout: Duration) -> RuntimeResult<()> {
        self.record_command(&format!("stop:{id}:{}", timeout.as_secs()));
        self.check_fail("stop", || RuntimeError::stop(id, "mock failure"))?;

        let mut containers = self.containers.write().unwrap();
        match containers.iter_mut().find(|c| c.id == id) {
            Some(c) if c.stuck => Err(RuntimeError::stop(id, "container did not stop")),
            Some(c) => {
                c.running = false;
                Ok(())
            }
            None => Err(RuntimeError::stop(id, "no such container")),
        }
    }

    fn kill_container(&self, id: &str, signal: &str) -> RuntimeResult<()> {
        self.record_command(&format!("kill:{id}:{signal}"));
        self.check_fail("kill", || RuntimeError::kill(id, "mock failure"))?;

        let mut containers = self.containers.write().unwrap();
        match containers.iter_mut().find(|c| c.id == id) {
            Some(c) => {
                c.running = false;
                Ok(())
            }
            None => Err(RuntimeError::kill(id, "no such container")),
        }
    }

    fn prune_containers(&self, filter: &PruneFilter) -> RuntimeResult<PruneReport> {
        let mut report = self.prune(ResourceKind::Containers, filter)?;

        let mut containers = self.containers.write().unwrap();
        report
            .removed
            .extend(containers.iter().filter(|c| !c.running).map(|c| c.id.clone()));
        containers.retain(|c| c.running);

        Ok(report)
    }

    fn prune_images(&self, filter: &PruneFilter) -> RuntimeResult<PruneReport> {
        self.prune(ResourceKind::Images, filter)
    }

    fn prune_volumes(&self, filter: &PruneFilter) -> RuntimeResult<PruneReport> {
        self.prune(ResourceKind::Volumes, filter)
    }

    fn prune_networks(&self, filter: &PruneFilter) -> RuntimeResult<PruneReport> {
        let mut report = self.prune(ResourceKind::Networks, filter)?;
        report.space_reclaimed = 0;
        Ok(report)
    }

    fn close(&self) {
        self.record_command("close");
        *self.closed.write().unwrap() = true;
    }
}
