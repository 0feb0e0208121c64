//! # taxdesk-cli: CLI Tool for taxdesk
//!
//! Provides the `taxdesk` command-line interface over a remote customer
//! tax-record store.
//!
//! ## Subcommands
//!
//! - `taxdesk list`: Print the customer table, optionally filtered by country.
//! - `taxdesk countries`: Print the distinct country filter options.
//! - `taxdesk edit`: Change a record's name and/or country.
//! - `taxdesk shell`: Interactive session: filter dropdown, edit modal, save.
//!
//! ```bash
//! taxdesk list --country Canada --country Peru
//! taxdesk edit 7 --name "Alice" --country Canada
//! TAXDESK_API_URL=http://localhost:3000 taxdesk shell
//! ```

pub mod countries;
pub mod edit;
pub mod list;
pub mod render;
pub mod shell;

use anyhow::{Context, Result};
use taxdesk_client::{GatewayClient, GatewayConfig};
use taxdesk_core::RecordGateway;
use taxdesk_state::Session;

/// Build a gateway client from `config` and run the initial load.
///
/// On failure the load notice is printed to stderr before the error is
/// returned.
pub async fn load_session(config: &GatewayConfig) -> Result<Session<GatewayClient>> {
    let client = GatewayClient::new(config.clone()).context("failed to build gateway client")?;
    let mut session = Session::new(client);

    eprintln!("Loading...");
    if let Err(e) = session.load().await {
        report_notices(&mut session);
        return Err(e).context("initial load failed");
    }
    Ok(session)
}

/// Print and clear pending notices on stderr.
pub fn report_notices<G: RecordGateway>(session: &mut Session<G>) {
    for notice in session.take_notices() {
        eprintln!("! {notice}");
    }
}
