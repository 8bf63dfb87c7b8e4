use crate::domain::{CleanupStats, PruneReport, ResourceKind};
use crate::services::{ContainerService, StopPolicy, SystemService};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Which kinds to clean and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupOptions {
    pub containers: bool,
    pub images: bool,
    pub volumes: bool,
    pub networks: bool,
    /// Stop (or kill) running containers so the prune can remove them
    pub force_stop: bool,
    /// Restrict the image prune to untagged images
    pub dangling_only: bool,
}

impl CleanupOptions {
    pub fn all() -> Self {
        Self {
            containers: true,
            images: true,
            volumes: true,
            networks: true,
            force_stop: true,
            dangling_only: true,
        }
    }

    pub fn none() -> Self {
        Self {
            containers: false,
            images: false,
            volumes: false,
            networks: false,
            force_stop: false,
            dangling_only: true,
        }
    }

    /// Builds options from command-line flags. With no kind selected the
    /// default is containers and images; `all` overrides every kind flag.
    pub fn from_flags(
        all: bool,
        containers: bool,
        images: bool,
        volumes: bool,
        networks: bool,
        dangling_only: bool,
    ) -> Self {
        if all {
            return Self {
                dangling_only,
                ..Self::all()
            };
        }

        if !containers && !images && !volumes && !networks {
            return Self {
                containers: true,
                images: true,
                dangling_only,
                ..Self::none()
            };
        }

        Self {
            containers,
            images,
            volumes,
            networks,
            force_stop: false,
            dangling_only,
        }
    }

    pub fn includes(&self, kind: ResourceKind) -> bool {
        match kind {
            ResourceKind::Containers => self.containers,
            ResourceKind::Images => self.images,
            ResourceKind::Volumes => self.volumes,
            ResourceKind::Networks => self.networks,
        }
    }

    /// Selected kinds in cleanup order.
    pub fn kinds(&self) -> Vec<ResourceKind> {
        ResourceKind::ALL
            .into_iter()
            .filter(|k| self.includes(*k))
            .collect()
    }
}

/// Progress of a cleanup run, one event per kind boundary.
#[derive(Debug)]
pub enum Step<'a> {
    Started(ResourceKind),
    Finished(ResourceKind, &'a PruneReport),
    Failed(ResourceKind, &'a anyhow::Error),
}

/// Sequences per-kind cleanup steps and totals their results
pub struct Orchestrator {
    container_service: Arc<ContainerService>,
    system_service: Arc<SystemService>,
    stop_policy: StopPolicy,
}

impl Orchestrator {
    pub fn new(
        container_service: Arc<ContainerService>,
        system_service: Arc<SystemService>,
        stop_policy: StopPolicy,
    ) -> Self {
        Self {
            container_service,
            system_service,
            stop_policy,
        }
    }

    pub fn cleanup(&self, options: &CleanupOptions) -> CleanupStats {
        self.cleanup_with(options, |_| {})
    }

    /// Runs every selected kind in order. A failing kind is logged and
    /// skipped; the returned stats only hold what the engine reported.
    pub fn cleanup_with<F>(&self, options: &CleanupOptions, mut observe: F) -> CleanupStats
    where
        F: FnMut(Step<'_>),
    {
        let mut stats = CleanupStats::new();

        for kind in options.kinds() {
            observe(Step::Started(kind));

            match self.clean_kind(kind, options) {
                Ok(report) => {
                    debug!("{kind}: removed {}", report.count());
                    stats.absorb(kind, &report);
                    observe(Step::Finished(kind, &report));
                }
                Err(e) => {
                    warn!("{kind} cleanup failed: {e:#}");
                    observe(Step::Failed(kind, &e));
                }
            }
        }

        info!(
            "Cleanup finished: {} resource(s) removed, {} bytes reclaimed",
            stats.total_removed(),
            stats.space_reclaimed
        );

        stats
    }

    fn clean_kind(&self, kind: ResourceKind, options: &CleanupOptions) -> Result<PruneReport> {
        let report = match kind {
            ResourceKind::Containers => {
                if options.force_stop {
                    self.container_service.force_stop_all(&self.stop_policy)?;
                }
                self.system_service.prune_containers()?
            }
            ResourceKind::Images => self.system_service.prune_images(options.dangling_only)?,
            ResourceKind::Volumes => self.system_service.prune_volumes()?,
            ResourceKind::Networks => self.system_service.prune_networks()?,
        };
        Ok(report)
    }
}
