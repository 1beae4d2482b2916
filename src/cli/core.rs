use crate::cli;
use wafipsync::{ChangeNotification, ExpectedDigest, Result, UpdateConfig, UpdateConfigBuilder};

/*-------------------------------------------------------------------------------------------------
  Core functions
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Build a change notification from CLI arguments
--------------------------------------------------------------------------------------*/

pub fn build_notification(args: &cli::Args) -> ChangeNotification {
    let url = match &args.file {
        Some(path) => path.to_string_lossy().to_string(),
        None => args.url.clone(),
    };

    ChangeNotification {
        create_time: args.label.clone(),
        synctoken: String::new(),
        md5: args
            .md5
            .as_deref()
            .map(ExpectedDigest::from)
            .unwrap_or(ExpectedDigest::Seed),
        url,
    }
}

/*--------------------------------------------------------------------------------------
  Build the update configuration from CLI arguments
--------------------------------------------------------------------------------------*/

pub fn build_update_config(args: &cli::Args) -> Result<UpdateConfig> {
    let mut builder = UpdateConfigBuilder::default();
    builder.service(&args.service).scope(args.scope);
    if let Some(ipset_name) = &args.ipset_name {
        builder.ipset_name(ipset_name);
    }
    builder.build()
}
