//! # List Subcommand
//!
//! Loads both collections, applies the requested country filter, and
//! prints the table.

use anyhow::{Context, Result};
use clap::Args;
use taxdesk_client::GatewayConfig;

use crate::load_session;
use crate::render::render_table;

/// Arguments for the `taxdesk list` subcommand.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show records in this country. Repeat to include several.
    #[arg(long = "country", value_name = "NAME")]
    pub countries: Vec<String>,

    /// Print the table view as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Execute the list subcommand.
pub async fn run_list(args: &ListArgs, config: &GatewayConfig) -> Result<u8> {
    let mut session = load_session(config).await?;

    for name in &args.countries {
        // One choice per dropdown opening.
        session.toggle_filter_dropdown();
        session
            .choose_filter_country(name)
            .with_context(|| format!("cannot filter by country {name:?}"))?;
    }

    let table = session.table();
    tracing::info!(rows = table.rows.len(), "table rendered");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&table)?);
    } else {
        print!("{}", render_table(&table));
    }
    Ok(0)
}
