//! geopins CLI entry point
//!
//! Pin store server and command-line tools

use geopins::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
