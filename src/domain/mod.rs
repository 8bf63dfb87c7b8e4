mod error;
mod resources;
mod stats;
pub mod traits;

pub use error::RuntimeError;
pub use resources::{
    ContainerSummary, DiskUsage, EngineInfo, ImageSummary, PruneFilter, PruneReport,
    ResourceKind, VolumeSummary,
};
pub use stats::CleanupStats;
pub use traits::{ContainerRuntime, RuntimeResult};
