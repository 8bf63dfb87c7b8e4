use crate::domain::{
    ContainerRuntime, ContainerSummary, DiskUsage, EngineInfo, ImageSummary, PruneFilter,
    PruneReport, ResourceKind, RuntimeError, RuntimeResult, VolumeSummary,
};
use bollard::Docker;
use bollard::container::{
    KillContainerOptions, ListContainersOptions, PruneContainersOptions, StopContainerOptions,
};
use bollard::image::{ListImagesOptions, PruneImagesOptions};
use bollard::models;
use bollard::network::PruneNetworksOptions;
use bollard::volume::{ListVolumesOptions, PruneVolumesOptions};
use std::fmt;
use std::future::Future;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

const DEADLINE_EXCEEDED: &str = "deadline exceeded";

/// Blocking adapter over the Docker Engine API.
///
/// Every call made through one adapter shares a single deadline, fixed at
/// [`DockerAdapter::connect`]. Calls made after the deadline fail immediately.
pub struct DockerAdapter {
    docker: RwLock<Option<Docker>>,
    rt: Runtime,
    deadline: Instant,
}

impl DockerAdapter {
    /// Connects to the engine named by `DOCKER_HOST`, or the local socket,
    /// negotiating the API version and pinging the daemon.
    pub fn connect(budget: Duration) -> RuntimeResult<Self> {
        let deadline = Instant::now() + budget;
        let rt = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| RuntimeError::Connection(e.to_string()))?;

        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| RuntimeError::Connection(e.to_string()))?;

        let docker = block_on_until(&rt, deadline, docker.negotiate_version())
            .map_err(RuntimeError::Connection)?;
        block_on_until(&rt, deadline, docker.ping()).map_err(RuntimeError::Connection)?;

        debug!("Connected to container engine");

        Ok(Self {
            docker: RwLock::new(Some(docker)),
            rt,
            deadline,
        })
    }

    fn client(&self) -> RuntimeResult<Docker> {
        let guard = self
            .docker
            .read()
            .map_err(|_| RuntimeError::Connection("connection lock poisoned".into()))?;
        guard
            .clone()
            .ok_or_else(|| RuntimeError::Connection("connection closed".into()))
    }

    fn call<T, F>(&self, fut: F) -> Result<T, String>
    where
        F: Future<Output = Result<T, bollard::errors::Error>>,
    {
        block_on_until(&self.rt, self.deadline, fut)
    }
}

fn block_on_until<T, F>(rt: &Runtime, deadline: Instant, fut: F) -> Result<T, String>
where
    F: Future<Output = Result<T, bollard::errors::Error>>,
{
    let remaining = deadline.saturating_duration_since(Instant::now());
    if remaining.is_zero() {
        return Err(DEADLINE_EXCEEDED.to_string());
    }

    rt.block_on(async move {
        match tokio::time::timeout(remaining, fut).await {
            Ok(result) => result.map_err(|e| e.to_string()),
            Err(_) => Err(DEADLINE_EXCEEDED.to_string()),
        }
    })
}

fn non_negative(value: Option<i64>) -> u64 {
    value.unwrap_or(0).max(0) as u64
}

fn container_prune_report(response: models::ContainerPruneResponse) -> PruneReport {
    PruneReport {
        removed: response.containers_deleted.unwrap_or_default(),
        space_reclaimed: non_negative(response.space_reclaimed),
    }
}

/// Counts both deleted layers and untagged references.
fn image_prune_report(response: models::ImagePruneResponse) -> PruneReport {
    let removed = response
        .images_deleted
        .unwrap_or_default()
        .into_iter()
        .filter_map(|item| item.deleted.or(item.untagged))
        .collect();

    PruneReport {
        removed,
        space_reclaimed: non_negative(response.space_reclaimed),
    }
}

fn volume_prune_report(response: models::VolumePruneResponse) -> PruneReport {
    PruneReport {
        removed: response.volumes_deleted.unwrap_or_default(),
        space_reclaimed: non_negative(response.space_reclaimed),
    }
}

// The engine reports no reclaimed space for networks.
fn network_prune_report(response: models::NetworkPruneResponse) -> PruneReport {
    PruneReport {
        removed: response.networks_deleted.unwrap_or_default(),
        space_reclaimed: 0,
    }
}

fn image_summary(image: models::ImageSummary) -> ImageSummary {
    ImageSummary {
        id: image.id,
        repo_tags: image.repo_tags,
        size: image.size.max(0) as u64,
    }
}

fn disk_usage_summary(df: models::SystemDataUsageResponse) -> DiskUsage {
    let containers_size = df
        .containers
        .unwrap_or_default()
        .iter()
        .map(|c| non_negative(c.size_rw))
        .sum();
    // Volume size is -1 when the driver does not report it.
    let volumes_size = df
        .volumes
        .unwrap_or_default()
        .iter()
        .filter_map(|v| v.usage_data.as_ref())
        .map(|u| u.size.max(0) as u64)
        .sum();
    let build_cache_size = df
        .build_cache
        .unwrap_or_default()
        .iter()
        .map(|b| non_negative(b.size))
        .sum();

    DiskUsage {
        images_size: non_negative(df.layers_size),
        containers_size,
        volumes_size,
        build_cache_size,
    }
}

impl fmt::Debug for DockerAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = self.docker.read().map(|d| d.is_some()).unwrap_or(false);
        f.debug_struct("DockerAdapter")
            .field("open", &open)
            .field("deadline", &self.deadline)
            .finish()
    }
}

impl ContainerRuntime for DockerAdapter {
    fn list_containers(&self, include_stopped: bool) -> RuntimeResult<Vec<ContainerSummary>> {
        let docker = self.client()?;
        let options = ListContainersOptions::<String> {
            all: include_stopped,
            ..Default::default()
        };

        let containers = self
            .call(docker.list_containers(Some(options)))
            .map_err(|e| RuntimeError::list("containers", e))?;

        Ok(containers
            .into_iter()
            .map(|c| ContainerSummary {
                id: c.id.unwrap_or_default(),
                names: c.names.unwrap_or_default(),
                image: c.image.unwrap_or_default(),
                status: c.status.unwrap_or_default(),
                state: c.state.unwrap_or_default(),
            })
            .collect())
    }

    fn list_images(&self) -> RuntimeResult<Vec<ImageSummary>> {
        let docker = self.client()?;
        let options = ListImagesOptions::<String> {
            all: true,
            ..Default::default()
        };

        let images = self
            .call(docker.list_images(Some(options)))
            .map_err(|e| RuntimeError::list("images", e))?;

        Ok(images.into_iter().map(image_summary).collect())
    }

    fn list_volumes(&self) -> RuntimeResult<Vec<VolumeSummary>> {
        let docker = self.client()?;

        let response = self
            .call(docker.list_volumes(None::<ListVolumesOptions<String>>))
            .map_err(|e| RuntimeError::list("volumes", e))?;

        Ok(response
            .volumes
            .unwrap_or_default()
            .into_iter()
            .map(|v| VolumeSummary {
                name: v.name,
                driver: v.driver,
                mountpoint: v.mountpoint,
            })
            .collect())
    }

    fn system_info(&self) -> RuntimeResult<EngineInfo> {
        let docker = self.client()?;

        let info = self
            .call(docker.info())
            .map_err(|e| RuntimeError::list("system info", e))?;

        Ok(EngineInfo {
            name: info.name.unwrap_or_default(),
            server_version: info.server_version.unwrap_or_default(),
            operating_system: info.operating_system.unwrap_or_default(),
            containers: non_negative(info.containers),
            containers_running: non_negative(info.containers_running),
            images: non_negative(info.images),
        })
    }

    fn disk_usage(&self) -> RuntimeResult<DiskUsage> {
        let docker = self.client()?;

        self.call(docker.df())
            .map(disk_usage_summary)
            .map_err(|e| RuntimeError::list("disk usage", e))
    }

    fn stop_container(&self, id: &str, timeout: Duration) -> RuntimeResult<()> {
        let docker = self.client()?;
        let options = StopContainerOptions {
            t: timeout.as_secs() as i64,
        };

        self.call(docker.stop_container(id, Some(options)))
            .map_err(|e| RuntimeError::stop(id, e))
    }

    fn kill_container(&self, id: &str, signal: &str) -> RuntimeResult<()> {
        let docker = self.client()?;
        let options = KillContainerOptions {
            signal: signal.to_string(),
        };

        self.call(docker.kill_container(id, Some(options)))
            .map_err(|e| RuntimeError::kill(id, e))
    }

    fn prune_containers(&self, filter: &PruneFilter) -> RuntimeResult<PruneReport> {
        let docker = self.client()?;
        let options = PruneContainersOptions {
            filters: filter.to_map(),
        };

        self.call(docker.prune_containers(Some(options)))
            .map(container_prune_report)
            .map_err(|e| RuntimeError::prune(ResourceKind::Containers, e))
    }

    fn prune_images(&self, filter: &PruneFilter) -> RuntimeResult<PruneReport> {
        let docker = self.client()?;
        let options = PruneImagesOptions {
            filters: filter.to_map(),
        };

        self.call(docker.prune_images(Some(options)))
            .map(image_prune_report)
            .map_err(|e| RuntimeError::prune(ResourceKind::Images, e))
    }

    fn prune_volumes(&self, filter: &PruneFilter) -> RuntimeResult<PruneReport> {
        let docker = self.client()?;
        let options = PruneVolumesOptions {
            filters: filter.to_map(),
        };

        self.call(docker.prune_volumes(Some(options)))
            .map(volume_prune_report)
            .map_err(|e| RuntimeError::prune(ResourceKind::Volumes, e))
    }

    fn prune_networks(&self, filter: &PruneFilter) -> RuntimeResult<PruneReport> {
        let docker = self.client()?;
        let options = PruneNetworksOptions {
            filters: filter.to_map(),
        };

        self.call(docker.prune_networks(Some(options)))
            .map(network_prune_report)
            .map_err(|e| RuntimeError::prune(ResourceKind::Networks, e))
    }

    fn close(&self) {
        if let Ok(mut guard) = self.docker.write() {
            if guard.take().is_some() {
                debug!("Closed container engine connection");
            }
        }
    }
}
