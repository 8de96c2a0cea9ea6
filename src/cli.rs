use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Interactive, file-backed task tracker.
/// Tasks live in memory; save/load writes the flat text format described in
/// the store module.
#[derive(Parser)]
#[command(name = "tt", version, about = "Interactive task tracker")]
pub struct Cli {
    /// Task file loaded at startup (if it exists) and offered as the default
    /// path in the save/load prompts.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the interactive menu (the default when no subcommand is given).
    Menu,
    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}
