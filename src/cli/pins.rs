//! Pin command handlers
//!
//! `add` and `nearby` work directly on the configured store, without a
//! running server.

use crate::cli::init_logging;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter, OutputFormatter};
use crate::pins::PinStore;
use clap::Args;

/// Add command arguments
#[derive(Args)]
pub struct AddArgs {
    /// Pin name
    pub name: String,

    /// Latitude
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,
}

/// Nearby command arguments
#[derive(Args)]
pub struct NearbyArgs {
    /// Center as "lat,lng"
    #[arg(long, allow_hyphen_values = true)]
    pub near: String,

    /// Radius in meters (1 to 10000)
    #[arg(long, short = 'r')]
    pub radius: String,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,
}

/// Run the add command
pub fn add(args: AddArgs) -> Result<()> {
    init_logging("warn");
    let config = Config::load()?;
    let formatter = resolve_formatter(args.format.as_deref(), &config)?;

    let store = PinStore::open(config.open_repository()?)?;
    let pin = store.create(&args.name, args.lat, args.lng)?;

    print!("{}", formatter.format_pin(&pin)?);
    Ok(())
}

/// Run the nearby command
pub fn nearby(args: NearbyArgs) -> Result<()> {
    init_logging("warn");
    let config = Config::load()?;
    let formatter = resolve_formatter(args.format.as_deref(), &config)?;

    let store = PinStore::open(config.open_repository()?)?;
    let pins = store.nearby(Some(&args.near), Some(&args.radius))?;

    print!("{}", formatter.format_nearby(&pins)?);
    Ok(())
}

/// Pick the formatter named on the command line, else the configured default
pub(crate) fn resolve_formatter(
    name: Option<&str>,
    config: &Config,
) -> Result<Box<dyn OutputFormatter>> {
    let name = name.unwrap_or(&config.output.format);
    get_formatter(name).ok_or_else(|| {
        let known: Vec<String> = available_formats().into_iter().map(|f| f.name).collect();
        Error::Config(format!(
            "Unknown format: {} (available: {})",
            name,
            known.join(", ")
        ))
    })
}
