//! # Interactive Shell
//!
//! A line-oriented stand-in for the page. Each command maps to one user
//! interaction: opening the filter dropdown, choosing a country, opening the
//! edit modal, typing in a field, picking from the country picker, saving.
//! After every command that changes something the table (and the modal,
//! when open) is printed again from the session's derived views.
//!
//! | Command            | Interaction                                  |
//! |--------------------|----------------------------------------------|
//! | `show`             | Print the table and modal                    |
//! | `filter`           | Open or close the country filter dropdown    |
//! | `toggle <country>` | Choose a country in the open dropdown        |
//! | `edit <id>`        | Open the edit modal on a record              |
//! | `name <value>`     | Type into the name field                     |
//! | `country <value>`  | Type into the country field                  |
//! | `picker`           | Expand or collapse the country picker        |
//! | `pick <n>`         | Select the n-th picker entry                 |
//! | `edit-country <n>` | Edit action on the n-th picker entry         |
//! | `save`             | Submit the draft                             |
//! | `cancel`           | Close the modal without saving               |
//! | `help`, `quit`     |                                              |

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use clap::Args;
use taxdesk_client::GatewayConfig;
use taxdesk_core::{DraftField, RecordGateway, RecordId};
use taxdesk_state::Session;

use crate::load_session;
use crate::render::{render_modal, render_table};

const HELP: &str = "\
commands:
  show                print the table
  filter              open or close the country filter
  toggle <country>    choose a country in the open filter
  edit <id>           open the edit modal
  name <value>        set the draft name
  country <value>     set the draft country
  picker              expand or collapse the country picker
  pick <n>            select a country from the picker
  edit-country <n>    edit a country from the picker
  save                save the draft
  cancel              close the modal
  help                show this text
  quit                leave the shell
";

/// Arguments for the `taxdesk shell` subcommand.
#[derive(Args, Debug)]
pub struct ShellArgs {}

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Print the current views.
    Show,
    /// Open or close the filter dropdown.
    Filter,
    /// Choose a country in the filter dropdown.
    Toggle(String),
    /// Open the edit modal.
    Edit(String),
    /// Set the draft name.
    Name(String),
    /// Set the draft country.
    Country(String),
    /// Expand or collapse the picker.
    Picker,
    /// Select a 1-based picker entry.
    Pick(usize),
    /// Edit action on a 1-based picker entry.
    EditCountry(usize),
    /// Submit the draft.
    Save,
    /// Close the modal.
    Cancel,
    /// Print the command list.
    Help,
    /// Leave the shell.
    Quit,
}

impl ShellCommand {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    ///
    /// Field values keep their inner spacing; an empty value is allowed so
    /// that a field can be cleared.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let cmd = match verb {
            "show" => Self::Show,
            "filter" => Self::Filter,
            "toggle" => Self::Toggle(required(verb, rest)?),
            "edit" => Self::Edit(required(verb, rest)?),
            "name" => Self::Name(rest.to_string()),
            "country" => Self::Country(rest.to_string()),
            "picker" => Self::Picker,
            "pick" => Self::Pick(index(verb, rest)?),
            "edit-country" => Self::EditCountry(index(verb, rest)?),
            "save" => Self::Save,
            "cancel" => Self::Cancel,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => bail!("unknown command: {other} (try `help`)"),
        };
        Ok(Some(cmd))
    }
}

fn required(verb: &str, rest: &str) -> Result<String> {
    if rest.is_empty() {
        bail!("`{verb}` needs an argument");
    }
    Ok(rest.to_string())
}

fn index(verb: &str, rest: &str) -> Result<usize> {
    let n: usize = rest
        .parse()
        .with_context(|| format!("`{verb}` needs a picker number, got {rest:?}"))?;
    if n == 0 {
        bail!("picker numbers start at 1");
    }
    Ok(n)
}

/// Execute the shell subcommand on stdin and stdout.
pub async fn run_shell(_args: &ShellArgs, config: &GatewayConfig) -> Result<u8> {
    let mut session = load_session(config).await?;
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_shell_loop(&mut session, stdin.lock(), stdout.lock()).await?;
    Ok(0)
}

/// Drive `session` from `input` until `quit` or end of input.
///
/// Command errors are printed and the loop continues; only I/O errors on
/// `input` or `out` end it early.
pub async fn run_shell_loop<G, R, W>(session: &mut Session<G>, input: R, mut out: W) -> Result<()>
where
    G: RecordGateway,
    R: BufRead,
    W: Write,
{
    print_views(session, &mut out)?;

    for line in input.lines() {
        let line = line.context("failed to read shell input")?;
        let cmd = match ShellCommand::parse(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "error: {e}")?;
                continue;
            }
        };
        tracing::debug!(?cmd, "shell command");

        match cmd {
            ShellCommand::Quit => break,
            ShellCommand::Help => {
                write!(out, "{HELP}")?;
                continue;
            }
            ShellCommand::Show => {}
            other => {
                if let Err(e) = apply(session, other).await {
                    writeln!(out, "error: {e:#}")?;
                }
            }
        }

        for notice in session.take_notices() {
            writeln!(out, "! {notice}")?;
        }
        print_views(session, &mut out)?;
    }
    out.flush()?;
    Ok(())
}

async fn apply<G: RecordGateway>(session: &mut Session<G>, cmd: ShellCommand) -> Result<()> {
    match cmd {
        ShellCommand::Filter => session.toggle_filter_dropdown(),
        ShellCommand::Toggle(name) => session.choose_filter_country(&name)?,
        ShellCommand::Edit(id) => session.open_edit(&RecordId::new(id)?)?,
        ShellCommand::Name(value) => session.update_draft_field(DraftField::Name, value)?,
        ShellCommand::Country(value) => session.update_draft_field(DraftField::Country, value)?,
        ShellCommand::Picker => session.toggle_country_picker()?,
        ShellCommand::Pick(n) => {
            let name = picker_entry(session, n)?.name;
            session.select_draft_country(&name)?;
        }
        ShellCommand::EditCountry(n) => {
            let id = picker_entry(session, n)?.id;
            session.edit_country(&id)?;
        }
        ShellCommand::Save => {
            session.submit().await?;
        }
        ShellCommand::Cancel => session.cancel_edit()?,
        ShellCommand::Show | ShellCommand::Help | ShellCommand::Quit => {}
    }
    Ok(())
}

fn picker_entry<G: RecordGateway>(
    session: &Session<G>,
    n: usize,
) -> Result<taxdesk_state::table::PickerOption> {
    let modal = session.modal().context("no record is being edited")?;
    if !modal.picker_open {
        bail!("the country picker is closed; run `picker` first");
    }
    let count = modal.picker_options.len();
    modal
        .picker_options
        .into_iter()
        .nth(n - 1)
        .with_context(|| format!("picker entry {n} out of range (1-{count})"))
}

fn print_views<G: RecordGateway, W: Write>(session: &Session<G>, out: &mut W) -> Result<()> {
    write!(out, "{}", render_table(&session.table()))?;
    if let Some(modal) = session.modal() {
        writeln!(out)?;
        write!(out, "{}", render_modal(&modal))?;
    }
    Ok(())
}
