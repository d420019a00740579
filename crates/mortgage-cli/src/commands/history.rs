use clap::{Args, Subcommand};
use serde_json::{json, Value};

use mortgage_core::history::{HistoryStore, NewHistoryEntry};

use crate::config::Config;
use crate::input;

/// Saved calculation history
#[derive(Args)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub command: HistoryCommand,
}

#[derive(Subcommand)]
pub enum HistoryCommand {
    /// List saved calculations, newest first
    List,
    /// Show one saved calculation
    Show {
        /// Entry id
        id: String,
    },
    /// Save a calculation ({"inputs": ..., "results": ..., "label": ...})
    Add(HistoryAddArgs),
    /// Delete a saved calculation
    Remove {
        /// Entry id
        id: String,
    },
}

#[derive(Args)]
pub struct HistoryAddArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Label to store (overrides any label in the payload)
    #[arg(long)]
    pub label: Option<String>,
}

pub fn run_history(args: HistoryArgs, config: &Config) -> Result<Value, Box<dyn std::error::Error>> {
    let store = config.open_history().map_err(|e| format!("{e:#}"))?;
    execute(&store, args.command)
}

fn execute(
    store: &impl HistoryStore,
    command: HistoryCommand,
) -> Result<Value, Box<dyn std::error::Error>> {
    match command {
        HistoryCommand::List => Ok(serde_json::to_value(store.list()?)?),
        HistoryCommand::Show { id } => match store.get(&id)? {
            Some(entry) => Ok(serde_json::to_value(entry)?),
            None => Err(format!("History entry not found: {id}").into()),
        },
        HistoryCommand::Add(add) => {
            let mut entry: NewHistoryEntry = if let Some(ref path) = add.input {
                input::file::read_json(path)?
            } else if let Some(data) = input::stdin::read_stdin()? {
                serde_json::from_value(data)?
            } else {
                return Err("--input <file.json> or stdin required for history add".into());
            };
            if add.label.is_some() {
                entry.label = add.label;
            }
            Ok(serde_json::to_value(store.add(entry)?)?)
        }
        HistoryCommand::Remove { id } => {
            if !store.remove(&id)? {
                return Err(format!("History entry not found: {id}").into());
            }
            Ok(json!({ "removed": true, "id": id }))
        }
    }
}
