//! Status command handler
//!
//! Probes the health endpoints of a running server.

use crate::config::Config;
use crate::error::Result;
use clap::Args;
use std::time::Duration;

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Status command arguments
#[derive(Args)]
pub struct StatusArgs {
    /// Server address as host:port (defaults to the configured one)
    #[arg(long)]
    pub addr: Option<String>,
}

/// Result of probing one endpoint
#[derive(Debug, Clone, PartialEq)]
pub enum Probe {
    Up(String),
    Failed(u16),
    Unreachable,
}

/// Run the status command
pub async fn run(args: StatusArgs) -> Result<()> {
    let config = Config::load()?;
    let addr = args.addr.unwrap_or_else(|| config.server_addr());

    let client = reqwest::Client::builder().timeout(PROBE_TIMEOUT).build()?;

    println!("geopins v{}", env!("CARGO_PKG_VERSION"));
    println!("Server: {}", addr);

    for endpoint in ["healthz", "readyz"] {
        let url = format!("http://{}/{}", addr, endpoint);
        let line = match probe(&client, &url).await {
            Probe::Up(body) => format!("UP ({})", body.trim()),
            Probe::Failed(code) => format!("ERROR (status {})", code),
            Probe::Unreachable => "NOT RUNNING".to_string(),
        };
        println!("  /{}: {}", endpoint, line);
    }

    println!("Storage: {}", config.storage.backend);
    Ok(())
}

async fn probe(client: &reqwest::Client, url: &str) -> Probe {
    match client.get(url).send().await {
        Ok(response) if response.status().is_success() => {
            Probe::Up(response.text().await.unwrap_or_default())
        }
        Ok(response) => Probe::Failed(response.status().as_u16()),
        Err(_) => Probe::Unreachable,
    }
}
