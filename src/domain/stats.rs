use super::{PruneReport, ResourceKind};
use std::ops::AddAssign;

const MEGABYTE: f64 = 1024.0 * 1024.0;

/// Totals for one cleanup run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupStats {
    pub containers_removed: u64,
    pub images_removed: u64,
    pub volumes_removed: u64,
    pub networks_removed: u64,
    pub space_reclaimed: u64,
}

impl CleanupStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds what one prune call reported to the counter of `kind`.
    pub fn absorb(&mut self, kind: ResourceKind, report: &PruneReport) {
        let count = report.count();
        match kind {
            ResourceKind::Containers => self.containers_removed += count,
            ResourceKind::Images => self.images_removed += count,
            ResourceKind::Volumes => self.volumes_removed += count,
            ResourceKind::Networks => self.networks_removed += count,
        }
        self.space_reclaimed += report.space_reclaimed;
    }

    pub fn removed(&self, kind: ResourceKind) -> u64 {
        match kind {
            ResourceKind::Containers => self.containers_removed,
            ResourceKind::Images => self.images_removed,
            ResourceKind::Volumes => self.volumes_removed,
            ResourceKind::Networks => self.networks_removed,
        }
    }

    pub fn total_removed(&self) -> u64 {
        ResourceKind::ALL.iter().map(|k| self.removed(*k)).sum()
    }

    pub fn space_reclaimed_mb(&self) -> f64 {
        self.space_reclaimed as f64 / MEGABYTE
    }
}

impl AddAssign for CleanupStats {
    fn add_assign(&mut self, other: Self) {
        self.containers_removed += other.containers_removed;
        self.images_removed += other.images_removed;
        self.volumes_removed += other.volumes_removed;
        self.networks_removed += other.networks_removed;
        self.space_reclaimed += other.space_reclaimed;
    }
}
