use std::path::Path;
use wafipsync::{Error, Result, ServicePrefix};

/*-------------------------------------------------------------------------------------------------
  Save Selected Prefixes to CSV File
-------------------------------------------------------------------------------------------------*/

pub fn save(prefixes: &[ServicePrefix], path: &Path) -> Result<()> {
    write(prefixes, path)
        .map_err(|error| Error::config(format!("Unable to write {}: {}", path.display(), error)))
}

fn write(prefixes: &[ServicePrefix], path: &Path) -> std::result::Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;

    // Write header
    writer.write_record(["IP Prefix", "Region", "Service"])?;

    // Write prefix records
    for prefix in prefixes {
        writer.serialize((&prefix.ip_prefix, &prefix.region, &prefix.service))?;
    }

    writer.flush()?;

    Ok(())
}
