use crate::domain::ContainerRuntime;
use crate::infra::{AppConfig, DockerAdapter};
use crate::services::InventoryService;
use anyhow::{Context, Result};
use clap::Args;
use std::io::{self, Write};
use std::sync::Arc;

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Also show disk usage per resource kind
    #[arg(long)]
    pub usage: bool,
}

pub fn execute<W: Write>(
    args: &ListArgs,
    runtime: Arc<dyn ContainerRuntime>,
    out: &mut W,
) -> Result<()> {
    let inventory = InventoryService::new(runtime).snapshot(args.usage)?;
    inventory.render(out)
}

pub fn run(args: &ListArgs, config: &AppConfig) -> Result<()> {
    let runtime: Arc<dyn ContainerRuntime> = Arc::new(
        DockerAdapter::connect(config.list_timeout())
            .context("failed to create Docker client")?,
    );

    let stdout = io::stdout();
    let result = execute(args, runtime.clone(), &mut stdout.lock());
    runtime.close();
    result
}
