use log::{info, warn};
use wafipsync::ServicePrefix;

/*-------------------------------------------------------------------------------------------------
  Logging Functions
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Selected Prefixes
--------------------------------------------------------------------------------------*/

pub fn selected_prefixes(service: &str, prefixes: &[ServicePrefix]) {
    let count = prefixes.len();
    if count > 0 {
        info!("Selected {count} prefix(es) used by {service}");
    } else {
        warn!("No prefixes found for service {service}; service names are case-sensitive");
    }
}
