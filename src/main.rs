//! Lathe - a build pipeline for hand-written static sites.

mod cli;
mod config;
mod logger;
mod pipeline;
mod routes;
mod serve;
mod stamp;
mod task;
mod template;
mod transform;
mod utils;
mod watch;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::Cli;

fn main() -> Result<()> {
    // Foreground workflows (watch/serve) block forever; Ctrl+C is the
    // way out
    ctrlc::set_handler(|| std::process::exit(0))?;

    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    cli::run(&cli)
}
