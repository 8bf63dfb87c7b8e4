use crate::domain::{CleanupStats, ContainerRuntime, ResourceKind};
use crate::infra::{AppConfig, DockerAdapter};
use crate::services::{
    CleanupOptions, ContainerService, Orchestrator, Step, StopPolicy, SystemService,
};
use anyhow::{Context, Result};
use clap::{ArgAction, Args};
use std::io::{self, BufRead, Write};
use std::sync::Arc;

#[derive(Args, Debug, Clone)]
pub struct CleanArgs {
    /// Clean all resources (containers, images, volumes, networks)
    #[arg(short, long)]
    pub all: bool,
    /// Clean containers
    #[arg(short, long)]
    pub containers: bool,
    /// Clean images
    #[arg(short, long)]
    pub images: bool,
    /// Clean volumes
    #[arg(short, long)]
    pub volumes: bool,
    /// Clean networks
    #[arg(short, long)]
    pub networks: bool,
    /// Force removal without confirmation
    #[arg(short, long)]
    pub force: bool,
    /// Only remove dangling images
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = true,
        default_missing_value = "true"
    )]
    pub dangling: bool,
}

impl Default for CleanArgs {
    fn default() -> Self {
        Self {
            all: false,
            containers: false,
            images: false,
            volumes: false,
            networks: false,
            force: false,
            dangling: true,
        }
    }
}

impl CleanArgs {
    pub fn options(&self) -> CleanupOptions {
        CleanupOptions::from_flags(
            self.all,
            self.containers,
            self.images,
            self.volumes,
            self.networks,
            self.dangling,
        )
    }
}

/// Asks for a `y/N` answer on `input`. Only `y` or `Y` confirms.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<bool> {
    writeln!(out, "This will remove Docker resources. Continue? (y/N)")?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer).context("reading confirmation")?;

    Ok(matches!(answer.trim(), "y" | "Y"))
}

fn header(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Containers => "🧹 Cleaning containers...",
        ResourceKind::Images => "🖼️  Cleaning images...",
        ResourceKind::Volumes => "💾 Cleaning volumes...",
        ResourceKind::Networks => "🌐 Cleaning networks...",
    }
}

pub fn print_summary<W: Write>(stats: &CleanupStats, out: &mut W) -> Result<()> {
    writeln!(out, "\n📊 Cleanup Summary:")?;
    writeln!(out, "   Containers: {}", stats.containers_removed)?;
    writeln!(out, "   Images: {}", stats.images_removed)?;
    writeln!(out, "   Volumes: {}", stats.volumes_removed)?;
    writeln!(out, "   Networks: {}", stats.networks_removed)?;
    writeln!(out, "   Space reclaimed: {:.2} MB", stats.space_reclaimed_mb())?;
    Ok(())
}

/// Runs `clean` against an already connected runtime. Returns `None` when
/// the prompt was declined.
pub fn execute<R: BufRead, W: Write>(
    args: &CleanArgs,
    runtime: Arc<dyn ContainerRuntime>,
    config: &AppConfig,
    input: &mut R,
    out: &mut W,
) -> Result<Option<CleanupStats>> {
    if !args.force && !confirm(input, out)? {
        writeln!(out, "Operation cancelled")?;
        return Ok(None);
    }

    let container_service = Arc::new(ContainerService::new(runtime.clone()));
    let system_service = Arc::new(SystemService::new(runtime));
    let orchestrator =
        Orchestrator::new(container_service, system_service, StopPolicy::from(config));

    let mut write_result: io::Result<()> = Ok(());
    let stats = orchestrator.cleanup_with(&args.options(), |step| {
        if write_result.is_err() {
            return;
        }
        write_result = match step {
            Step::Started(kind) => writeln!(out, "{}", header(kind)),
            Step::Finished(kind, report) => {
                writeln!(out, "   ✓ Removed {} {kind}", report.count())
            }
            Step::Failed(kind, _) => writeln!(out, "   ✗ Skipped {kind}"),
        };
    });
    write_result?;

    print_summary(&stats, out)?;
    Ok(Some(stats))
}

pub fn run(args: &CleanArgs, config: &AppConfig) -> Result<()> {
    let runtime: Arc<dyn ContainerRuntime> = Arc::new(
        DockerAdapter::connect(config.clean_timeout())
            .context("failed to create Docker client")?,
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let result = execute(
        args,
        runtime.clone(),
        config,
        &mut stdin.lock(),
        &mut stdout.lock(),
    );
    runtime.close();

    result.map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_confirm_accepts_y() {
        for answer in ["y\n", "Y\n", "  y  \n", "y"] {
            let mut out = Vec::<u8>::new();
            assert!(confirm(&mut Cursor::new(answer), &mut out).unwrap());
        }
    }

    #[test]
    fn test_confirm_rejects_everything_else() {
        for answer in ["n\n", "\n", "yes\n", "N\n", ""] {
            let mut out = Vec::<u8>::new();
            assert!(!confirm(&mut Cursor::new(answer), &mut out).unwrap());
        }
    }

    #[test]
    fn test_confirm_prints_prompt() {
        let mut out = Vec::new();
        confirm(&mut Cursor::new("n\n"), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "This will remove Docker resources. Continue? (y/N)\n"
        );
    }

    #[test]
    fn test_summary_format() {
        let stats = CleanupStats {
            containers_removed: 2,
            images_removed: 3,
            volumes_removed: 0,
            networks_removed: 1,
            space_reclaimed: 1_572_864,
        };
        let mut out = Vec::new();
        print_summary(&stats, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("   Containers: 2\n"));
        assert!(text.contains("   Images: 3\n"));
        assert!(text.contains("   Volumes: 0\n"));
        assert!(text.contains("   Networks: 1\n"));
        assert!(text.contains("   Space reclaimed: 1.50 MB\n"));
    }
}
