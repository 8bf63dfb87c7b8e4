use crate::domain::{ContainerRuntime, PruneFilter, PruneReport, ResourceKind, RuntimeResult};
use std::sync::Arc;
use tracing::debug;

/// Engine-wide prune operations
pub struct SystemService {
    runtime: Arc<dyn ContainerRuntime>,
}

impl SystemService {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { runtime }
    }

    pub fn prune(&self, kind: ResourceKind, filter: &PruneFilter) -> RuntimeResult<PruneReport> {
        debug!("Pruning {kind} (filter: {filter})");

        let report = match kind {
            ResourceKind::Containers => self.runtime.prune_containers(filter),
            ResourceKind::Images => self.runtime.prune_images(filter),
            ResourceKind::Volumes => self.runtime.prune_volumes(filter),
            ResourceKind::Networks => self.runtime.prune_networks(filter),
        }?;

        debug!(
            "Pruned {} {kind}, {} bytes reclaimed",
            report.count(),
            report.space_reclaimed
        );
        Ok(report)
    }

    pub fn prune_containers(&self) -> RuntimeResult<PruneReport> {
        self.prune(ResourceKind::Containers, &PruneFilter::none())
    }

    pub fn prune_images(&self, dangling_only: bool) -> RuntimeResult<PruneReport> {
        self.prune(ResourceKind::Images, &PruneFilter::dangling(dangling_only))
    }

    pub fn prune_volumes(&self) -> RuntimeResult<PruneReport> {
        self.prune(ResourceKind::Volumes, &PruneFilter::none())
    }

    pub fn prune_networks(&self) -> RuntimeResult<PruneReport> {
        self.prune(ResourceKind::Networks, &PruneFilter::none())
    }
}
