//! # taxdesk CLI entry point
//!
//! Parses command-line arguments, resolves the gateway configuration, and
//! dispatches to subcommand handlers.

use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use taxdesk_cli::countries::{run_countries, CountriesArgs};
use taxdesk_cli::edit::{run_edit, EditArgs};
use taxdesk_cli::list::{run_list, ListArgs};
use taxdesk_cli::shell::{run_shell, ShellArgs};
use taxdesk_client::GatewayConfig;

/// taxdesk: customer tax records from the terminal.
///
/// Lists customer tax records with a country filter, and edits a record's
/// name and country against the remote data store.
#[derive(Parser, Debug)]
#[command(name = "taxdesk", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Base URL of the data store. Overrides TAXDESK_API_URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Per-request timeout in seconds. Overrides TAXDESK_TIMEOUT_SECS.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the customer table, optionally filtered by country.
    List(ListArgs),

    /// Print the distinct countries offered by the filter.
    Countries(CountriesArgs),

    /// Change a record's name and/or country.
    Edit(EditArgs),

    /// Interactive session with the filter dropdown and edit modal.
    Shell(ShellArgs),
}

impl Cli {
    fn gateway_config(&self) -> anyhow::Result<GatewayConfig> {
        let mut config = GatewayConfig::from_env().context("invalid gateway configuration")?;
        if let Some(raw) = &self.base_url {
            config = config
                .with_base_url(raw)
                .context("invalid --base-url")?;
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout_secs(secs);
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match cli.gateway_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(1);
        }
    };
    tracing::debug!(base_url = %config.base_url, "resolved gateway configuration");

    let result = match &cli.command {
        Commands::List(args) => run_list(args, &config).await,
        Commands::Countries(args) => run_countries(args, &config).await,
        Commands::Edit(args) => run_edit(args, &config).await,
        Commands::Shell(args) => run_shell(args, &config).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_list_with_repeated_country() {
        let cli =
            Cli::try_parse_from(["taxdesk", "list", "--country", "Peru", "--country", "Chile"])
                .unwrap();
        if let Commands::List(args) = cli.command {
            assert_eq!(args.countries, vec!["Peru", "Chile"]);
            assert!(!args.json);
        } else {
            panic!("expected list");
        }
    }

    #[test]
    fn cli_parse_edit() {
        let cli = Cli::try_parse_from(["taxdesk", "edit", "7", "--name", "Alice"]).unwrap();
        if let Commands::Edit(args) = cli.command {
            assert_eq!(args.id, "7");
            assert_eq!(args.name.as_deref(), Some("Alice"));
            assert!(args.country.is_none());
        } else {
            panic!("expected edit");
        }
    }

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "taxdesk",
            "countries",
            "-vv",
            "--base-url",
            "http://localhost:3000",
            "--timeout-secs",
            "5",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:3000"));
        assert_eq!(cli.timeout_secs, Some(5));
        assert!(matches!(cli.command, Commands::Countries(_)));
    }

    #[test]
    fn cli_parse_shell() {
        let cli = Cli::try_parse_from(["taxdesk", "shell"]).unwrap();
        assert!(matches!(cli.command, Commands::Shell(_)));
    }

    #[test]
    fn cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["taxdesk"]).is_err());
    }
}
