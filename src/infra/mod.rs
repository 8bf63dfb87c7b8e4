pub mod config;
pub mod docker_adapter;

pub use config::AppConfig;
pub use docker_adapter::DockerAdapter;
