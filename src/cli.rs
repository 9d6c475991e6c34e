//! Command-line argument parsing
//!
//! Supports:
//! - Replaying a scripted drag session against a board fixture
//! - Printing the effective board configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Board drag-and-reorder engine
#[derive(Parser, Debug)]
#[command(name = "board-dnd", version, about = "Board drag-and-reorder engine")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay scripted messages against a board fixture and print the result as JSON
    Replay(ReplayArgs),
    /// Print the effective board configuration as YAML
    Config {
        /// Also write it to the config file, creating the directory if needed
        #[arg(long)]
        save: bool,
    },
}

#[derive(clap::Args, Debug)]
pub struct ReplayArgs {
    /// Board fixture (YAML)
    #[arg(long, value_name = "FILE")]
    pub board: PathBuf,

    /// Message script (JSON array of messages)
    #[arg(long, value_name = "FILE")]
    pub script: PathBuf,

    /// Sub-group order settings file (JSON). Without a value the file in
    /// the config directory is used; in-memory when omitted.
    #[arg(long, value_name = "FILE")]
    pub settings: Option<Option<PathBuf>>,

    /// Make every detail update fail
    #[arg(long)]
    pub fail_details: bool,

    /// Make every order persist fail
    #[arg(long)]
    pub fail_orders: bool,
}
