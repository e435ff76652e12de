//! `track`: a command-line tracker for coding-practice questions.
//!
//! Run `track --help` for the available commands. With no command, the
//! question list is shown.

use clap::Parser;

mod cli;
use cli::Cli;

fn main() -> anyhow::Result<()> {
    Cli::parse().run()
}
