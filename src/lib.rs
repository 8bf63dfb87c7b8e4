pub mod cli;
pub mod domain;
pub mod infra;
pub mod services;

// Make test_support available for integration tests
pub mod test_support;

pub use domain::{
    CleanupStats, ContainerRuntime, PruneFilter, PruneReport, ResourceKind, RuntimeError,
};
pub use infra::DockerAdapter;
pub use services::{
    CleanupOptions, ContainerService, InventoryService, Orchestrator, SystemService,
};
