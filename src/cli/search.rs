//! Search command handler

use crate::cli::pins::resolve_formatter;
use crate::config::Config;
use crate::error::Result;
use clap::Args;

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Text to look for in names and categories
    pub query: String,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,
}

/// Run the search command
pub fn run(args: SearchArgs) -> Result<()> {
    let config = Config::load()?;
    let formatter = resolve_formatter(args.format.as_deref(), &config)?;

    let catalog = config.load_catalog()?;
    let results = catalog.search(&args.query)?;

    print!("{}", formatter.format_pois(&results)?);
    Ok(())
}
