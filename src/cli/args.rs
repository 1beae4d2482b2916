use clap::Parser;
use std::path::PathBuf;
use wafipsync::{Scope, DEFAULT_SERVICE, IP_RANGES_URL};

/*-------------------------------------------------------------------------------------------------
  Command Line Interface (CLI) Arguments
-------------------------------------------------------------------------------------------------*/

#[derive(Parser, Debug)]
#[command(author, version, about="Sync AWS IP ranges into an AWS WAF IP set.", long_about = None)]
pub struct Args {
    /// Select prefixes used by this AWS service (case-sensitive)
    #[arg(short = 's', long, default_value = DEFAULT_SERVICE)]
    pub service: String,

    /// URL of the AWS IP Ranges JSON document
    #[arg(short = 'u', long, default_value = IP_RANGES_URL, conflicts_with = "file")]
    pub url: String,

    /// Read the AWS IP Ranges JSON document from a local file
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// Expected MD5 digest of the document; verification is skipped when omitted
    #[arg(long)]
    pub md5: Option<String>,

    /// Output Format: List of (RFC4632) CIDR-format prefixes
    #[arg(short = 'C', long)]
    pub cidr_format: bool,

    /// Save the selected prefixes to a CSV file
    #[arg(long = "csv")]
    pub csv_file: Option<PathBuf>,

    /// Replace the addresses of the AWS WAF IP set with the selected prefixes
    #[arg(long, requires = "ipset_name")]
    pub apply: bool,

    /// Name of the AWS WAF IP set to update
    #[arg(long)]
    pub ipset_name: Option<String>,

    /// Scope of the AWS WAF IP set (REGIONAL or CLOUDFRONT)
    #[arg(long, default_value = "REGIONAL")]
    pub scope: Scope,

    /// Label written into the AWS WAF IP set description
    #[arg(long, default_value = "manual sync")]
    pub label: String,

    /// Logging verbosity
    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,
}
