//! # Countries Subcommand

use anyhow::Result;
use clap::Args;
use taxdesk_client::GatewayConfig;

use crate::load_session;

/// Arguments for the `taxdesk countries` subcommand.
#[derive(Args, Debug)]
pub struct CountriesArgs {
    /// Print as a JSON array.
    #[arg(long)]
    pub json: bool,
}

/// Print the distinct country names, in first-seen order.
pub async fn run_countries(args: &CountriesArgs, config: &GatewayConfig) -> Result<u8> {
    let session = load_session(config).await?;
    let options = session.filter_options();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&options)?);
    } else {
        for name in &options {
            println!("{name}");
        }
    }
    Ok(0)
}
