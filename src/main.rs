use anyhow::Result;
use clap::{Parser, Subcommand};
use docker_cleaner::cli::{self, CleanArgs, ListArgs};
use docker_cleaner::infra::config::{self, load_app_config};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "docker-cleaner",
    about = "A CLI tool to clean Docker resources",
    long_about = "Docker Cleaner removes unused containers, images, volumes and networks \
                  to free up disk space."
)]
struct Cli {
    /// Configuration directory (default: ~/.config/docker-cleaner)
    #[arg(long, env = "DOCKER_CLEANER_CONFIG_DIR", default_value_os_t = config::default_config_dir())]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean Docker resources (stopped containers and dangling images by default)
    Clean(CleanArgs),
    /// List containers, images and volumes
    List(ListArgs),
    /// Print version information
    Version,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("DOCKER_CLEANER_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None => {
            println!("Docker Cleaner - Use --help for available commands");
            Ok(())
        }
        Some(Commands::Version) => cli::version::run(),
        Some(Commands::Clean(args)) => {
            let config = load_app_config(&cli.config_dir)?;
            cli::clean::run(&args, &config)
        }
        Some(Commands::List(args)) => {
            let config = load_app_config(&cli.config_dir)?;
            cli::list::run(&args, &config)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
