//! `taskdue` command-line entry point.
//!
//! # Responsibility
//! - Expose normalization, task registration and due-date repair from a shell.
//! - Print machine-readable JSON for everything that touches storage.

mod app;
mod cli;

use clap::Parser;
use cli::Cli;
use taskdue_core::{default_log_level, init_logging};

fn main() {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("Warning: file logging disabled: {err}");
        }
    }

    let mut stdout = std::io::stdout().lock();
    if let Err(err) = app::run(cli, &mut stdout) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
