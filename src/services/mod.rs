mod container_service;
mod inventory;
mod orchestrator;
mod system_service;

pub use container_service::{ContainerService, StopPolicy};
pub use inventory::{Inventory, InventoryService, format_size, short_id, split_repo_tag, truncate};
pub use orchestrator::{CleanupOptions, Orchestrator, Step};
pub use system_service::SystemService;
