//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod pins;
pub mod search;
pub mod serve;
pub mod status;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Geospatial pin store with radius queries and catalog search
#[derive(Parser)]
#[command(name = "geopins")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Create a pin in the local store
    Add(pins::AddArgs),

    /// List pins near a location
    Nearby(pins::NearbyArgs),

    /// Search the point-of-interest catalog
    Search(search::SearchArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// Check whether the server is running
    Status(status::StatusArgs),
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => serve::run(args).await,
        Commands::Add(args) => pins::add(args),
        Commands::Nearby(args) => pins::nearby(args),
        Commands::Search(args) => search::run(args),
        Commands::Config(args) => config::run(args),
        Commands::Status(args) => status::run(args).await,
    }
}

/// Initialize logging to stderr
///
/// `RUST_LOG` takes precedence over `default_filter`.
pub fn init_logging(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();
}
