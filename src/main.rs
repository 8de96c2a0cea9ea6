//! # tt - Interactive Task Tracker
//!
//! A small terminal task tracker: create tasks, mark them complete, annotate
//! them with attachments, comments, and test cases, and persist the whole
//! collection to a flat text file.
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the interactive menu
//! tt
//!
//! # Launch with a task file loaded at startup
//! tt --db ~/tasks.txt
//! ```
//!
//! All interaction happens through a numbered menu: add a task (description,
//! due date, priority, platform, assignee, status), complete it by id, list
//! all or only pending tasks, attach files/comments/test cases, and save or
//! load the collection. Completing a task records its elapsed time from
//! creation to completion.
//!
//! Data is stored wherever you point the save prompt (or `--db`) — one flat
//! text file per collection, four lines per task.

use clap::{CommandFactory, Parser};
use clap_complete::Shell;

pub mod cli;
pub mod menu;
pub mod registry;
pub mod store;
pub mod task;

use cli::{Cli, Commands};
use registry::Registry;

fn main() {
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        print_completions(shell);
        return;
    }

    let mut registry = Registry::new();
    if let Some(db) = cli.db.as_deref() {
        if let Err(e) = registry.load(db) {
            eprintln!("Failed to load {}: {e:#}", db.display());
            std::process::exit(1);
        }
    }

    if let Err(e) = menu::run(&mut registry, cli.db.as_deref()) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}
