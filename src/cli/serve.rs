//! Serve command handler
//!
//! Starts the HTTP server in foreground mode.

use crate::cli::init_logging;
use crate::config::Config;
use crate::error::Result;
use crate::server;
use clap::Args;
use tracing::info;

/// Serve command arguments
#[derive(Args)]
pub struct ServeArgs {
    /// Host address to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides $PORT)
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Keep pins in memory only
    #[arg(long)]
    pub memory: bool,
}

/// Run the serve command
pub async fn run(args: ServeArgs) -> Result<()> {
    init_logging("info");

    // File, then $PORT, then flags
    let mut config = Config::load()?;
    config.apply_env();

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.memory {
        config.storage.backend = "memory".to_string();
    }

    info!(
        "Starting geopins server v{} on {}",
        env!("CARGO_PKG_VERSION"),
        config.server_addr()
    );

    server::run(config).await
}
