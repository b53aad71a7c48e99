//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 4000;

/// Environment variable that overrides the configured port
pub const PORT_ENV_VAR: &str = "PORT";

/// Default storage backend
pub const DEFAULT_STORAGE_BACKEND: &str = "file";

/// Default output format for CLI results
pub const DEFAULT_FORMAT: &str = "text";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "geopins";
