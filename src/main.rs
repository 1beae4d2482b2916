mod cli;

use clap::Parser;
use log::{error, info};
use std::process::ExitCode;
use wafipsync::{
    ip_set_description, logging, replace_addresses, retrieve_prefixes, FileRangeFeed,
    HttpRangeFeed, Result, WafIpSetStore,
};

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::Args::parse();

    if logging::init(args.verbose.log_level_filter()).is_err() {
        eprintln!("Unable to initialize logging");
    }

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{}", error);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &cli::Args) -> Result<()> {
    let notification = cli::build_notification(args);

    let prefixes = match args.file {
        Some(_) => retrieve_prefixes(&FileRangeFeed, &notification, &args.service).await?,
        None => retrieve_prefixes(&HttpRangeFeed::new()?, &notification, &args.service).await?,
    };
    cli::log::selected_prefixes(&args.service, &prefixes);

    if args.cidr_format {
        cli::output::prefixes_in_cidr_format(&prefixes);
    } else {
        cli::output::prefix_table(&prefixes);
    }

    if let Some(csv_file) = &args.csv_file {
        cli::csv::save(&prefixes, csv_file)?;
        info!("Saved {} prefix(es) to {}", prefixes.len(), csv_file.display());
    }

    if args.apply {
        let config = cli::build_update_config(args)?;
        let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let store = WafIpSetStore::new(&sdk_config);

        let addresses: Vec<String> = prefixes
            .iter()
            .map(|prefix| prefix.ip_prefix.clone())
            .collect();
        let response = replace_addresses(
            &store,
            config.ipset_name(),
            config.scope(),
            ip_set_description(config.service(), &notification.create_time),
            &addresses,
        )
        .await?;

        info!(
            "Updated IP set {}; next lock token {}",
            config.ipset_name(),
            response.next_lock_token
        );
    }

    Ok(())
}
