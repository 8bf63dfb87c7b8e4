use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// The four resource kinds the cleaner knows how to prune.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Containers,
    Images,
    Volumes,
    Networks,
}

impl ResourceKind {
    /// Fixed cleanup order.
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Containers,
        ResourceKind::Images,
        ResourceKind::Volumes,
        ResourceKind::Networks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Containers => "containers",
            Self::Images => "images",
            Self::Volumes => "volumes",
            Self::Networks => "networks",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter passed to a prune call, e.g. `dangling=true`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneFilter {
    entries: BTreeMap<String, Vec<String>>,
}

impl PruneFilter {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn dangling(only_dangling: bool) -> Self {
        Self::none().with("dangling", if only_dangling { "true" } else { "false" })
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.entries
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Shape expected by the engine client.
    pub fn to_map(&self) -> HashMap<String, Vec<String>> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl fmt::Display for PruneFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return f.write_str("<none>");
        }
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|(k, v)| format!("{k}={}", v.join(",")))
            .collect();
        f.write_str(&parts.join(" "))
    }
}

/// What the daemon reported back from a single prune call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    pub removed: Vec<String>,
    pub space_reclaimed: u64,
}

impl PruneReport {
    pub fn count(&self) -> u64 {
        self.removed.len() as u64
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerSummary {
    pub id: String,
    pub names: Vec<String>,
    pub image: String,
    pub status: String,
    pub state: String,
}

impl ContainerSummary {
    pub fn is_running(&self) -> bool {
        self.state == "running"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSummary {
    pub id: String,
    pub repo_tags: Vec<String>,
    pub size: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeSummary {
    pub name: String,
    pub driver: String,
    pub mountpoint: String,
}

/// Subset of the engine's system information shown in the overview header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineInfo {
    pub name: String,
    pub server_version: String,
    pub operating_system: String,
    pub containers: u64,
    pub containers_running: u64,
    pub images: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiskUsage {
    pub images_size: u64,
    pub containers_size: u64,
    pub volumes_size: u64,
    pub build_cache_size: u64,
}

impl DiskUsage {
    pub fn total(&self) -> u64 {
        self.images_size + self.containers_size + self.volumes_size + self.build_cache_size
    }
}
