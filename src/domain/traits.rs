use super::{
    ContainerSummary, DiskUsage, EngineInfo, ImageSummary, PruneFilter, PruneReport,
    RuntimeError, VolumeSummary,
};
use std::fmt::Debug;
use std::time::Duration;

pub type RuntimeResult<T> = std::result::Result<T, RuntimeError>;

/// Trait for container engine operations
pub trait ContainerRuntime: Send + Sync + Debug {
    /// List containers; running ones only unless `include_stopped`
    fn list_containers(&self, include_stopped: bool) -> RuntimeResult<Vec<ContainerSummary>>;

    /// List all images
    fn list_images(&self) -> RuntimeResult<Vec<ImageSummary>>;

    /// List all volumes
    fn list_volumes(&self) -> RuntimeResult<Vec<VolumeSummary>>;

    /// Engine name, version and object counts
    fn system_info(&self) -> RuntimeResult<EngineInfo>;

    /// Space used per resource kind
    fn disk_usage(&self) -> RuntimeResult<DiskUsage>;

    /// Stop a container, waiting at most `timeout` before the engine kills it
    fn stop_container(&self, id: &str, timeout: Duration) -> RuntimeResult<()>;

    /// Send `signal` to a container
    fn kill_container(&self, id: &str, signal: &str) -> RuntimeResult<()>;

    /// Remove stopped containers
    fn prune_containers(&self, filter: &PruneFilter) -> RuntimeResult<PruneReport>;

    /// Remove unused images
    fn prune_images(&self, filter: &PruneFilter) -> RuntimeResult<PruneReport>;

    /// Remove unused volumes
    fn prune_volumes(&self, filter: &PruneFilter) -> RuntimeResult<PruneReport>;

    /// Remove unused networks; never reports reclaimed space
    fn prune_networks(&self, filter: &PruneFilter) -> RuntimeResult<PruneReport>;

    /// Release the connection. Safe to call more than once.
    fn close(&self);
}
