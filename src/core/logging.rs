use crate::core::errors::{Error, Result};
use log::LevelFilter;

/*-------------------------------------------------------------------------------------------------
  Logging
-------------------------------------------------------------------------------------------------*/

/// Log level of the Lambda handlers: errors only, or informational detail when `DEBUG=true`.
pub fn handler_level(debug: bool) -> LevelFilter {
    if debug {
        LevelFilter::Info
    } else {
        LevelFilter::Error
    }
}

/// Install the stderr logger. Lambda forwards stderr to CloudWatch Logs and timestamps each line
/// itself, so no timestamp is written here.
pub fn init(level: LevelFilter) -> Result<()> {
    stderrlog::new()
        .verbosity(level)
        .show_module_names(true)
        .timestamp(stderrlog::Timestamp::Off)
        .init()
        .map_err(|error| Error::config(format!("Failed to initialize logging: {}", error)))
}
