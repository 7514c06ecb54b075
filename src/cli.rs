//! CLI interface for moorings.
//!
//! Two long-running sessions and two one-shot reads:
//!
//! - `moorings panel` — the interactive operator session. Edits stay in
//!   memory until an explicit `persist`.
//! - `moorings tv` — the rotating status-board display. Read-only.
//! - `moorings list` / `moorings report <index>` — print from the
//!   persisted document without opening a session.
//!
//! The global `--as` flag picks the operator identity the document is
//! keyed by; see `identity` for the fallback chain.

use clap::{Parser, Subcommand};

use crate::identity;
use crate::panel;
use crate::report;
use crate::storage::Store;
use crate::tv;

/// moorings — rig support-vessel board.
#[derive(Debug, Parser)]
#[command(name = "moorings")]
pub struct Cli {
    /// Operator identity the board document is keyed by.
    /// Falls back to MOORINGS_IDENTITY, then ~/.moorings/config.toml.
    #[arg(long = "as", global = true)]
    identity: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive operator panel. Requires an identity.
    Panel,

    /// Run the status-board display loop (Ctrl-C to exit).
    ///
    /// With no resolvable identity the legacy unscoped document is
    /// shown, the same as a display link without a user parameter.
    Tv,

    /// Print one vessel's report from the persisted document.
    Report {
        /// Vessel index, as shown by `list`.
        index: usize,
    },

    /// List vessels from the persisted document.
    List,
}

/// Run the CLI, returning an error message on failure.
pub fn run(store: &Store) -> Result<(), String> {
    let cli = Cli::parse();
    match cli.command {
        Command::Panel => {
            let id = identity::resolve(cli.identity.as_deref())?;
            panel::run(store, &id)
        }
        Command::Tv => {
            let id = identity::resolve_optional(cli.identity.as_deref())?;
            tv::run(store, id.as_deref())
        }
        Command::Report { index } => cmd_report(store, cli.identity.as_deref(), index),
        Command::List => cmd_list(store, cli.identity.as_deref()),
    }
}

fn cmd_report(store: &Store, explicit: Option<&str>, index: usize) -> Result<(), String> {
    let id = identity::resolve_optional(explicit)?;
    let doc = store.load(id.as_deref());
    let vessel = doc
        .vessels
        .get(index)
        .ok_or_else(|| format!("no vessel at index {index}"))?;
    print!("{}", report::vessel_report(vessel));
    Ok(())
}

fn cmd_list(store: &Store, explicit: Option<&str>) -> Result<(), String> {
    let id = identity::resolve_optional(explicit)?;
    let doc = store.load(id.as_deref());

    if doc.vessels.is_empty() {
        println!("No vessels");
        return Ok(());
    }

    for (i, vessel) in doc.vessels.iter().enumerate() {
        let berth = if vessel.berth.is_empty() {
            String::new()
        } else {
            format!(" @ {}", vessel.berth)
        };
        println!("{i}  [{}] {}{berth}", vessel.kind, vessel.name);
    }

    Ok(())
}
