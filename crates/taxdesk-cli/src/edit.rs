//! # Edit Subcommand
//!
//! Non-interactive edit: opens the modal on one record, applies the given
//! fields, and saves. Exits non-zero on a rejected draft or failed save,
//! after printing the notice.

use anyhow::{bail, Context, Result};
use clap::Args;
use taxdesk_client::GatewayConfig;
use taxdesk_core::{DraftField, RecordId};
use taxdesk_state::{present, CountryFilter, MergeOutcome};

use crate::render::render_table;
use crate::{load_session, report_notices};

/// Arguments for the `taxdesk edit` subcommand.
#[derive(Args, Debug)]
pub struct EditArgs {
    /// Identifier of the record to edit.
    pub id: String,

    /// New name.
    #[arg(long)]
    pub name: Option<String>,

    /// New country; must be one of the known countries.
    #[arg(long)]
    pub country: Option<String>,
}

/// Execute the edit subcommand.
pub async fn run_edit(args: &EditArgs, config: &GatewayConfig) -> Result<u8> {
    let id = RecordId::new(args.id.as_str()).context("invalid record id")?;
    let mut session = load_session(config).await?;

    session.open_edit(&id)?;
    if let Some(name) = &args.name {
        session.update_draft_field(DraftField::Name, name.as_str())?;
    }
    if let Some(country) = &args.country {
        if !session.store().countries().iter().any(|c| &c.name == country) {
            bail!("unknown country: {country}");
        }
        session.select_draft_country(country)?;
    }

    match session.submit().await {
        Ok(MergeOutcome::Replaced) => {}
        Ok(MergeOutcome::NoMatch) => {
            tracing::warn!(id = %id, "server returned a record with a different id");
        }
        Err(e) => {
            report_notices(&mut session);
            return Err(e.into());
        }
    }

    let saved: Vec<_> = session.store().record(&id).into_iter().collect();
    print!("{}", render_table(&present(&saved, &CountryFilter::new(), &[])));
    Ok(0)
}
