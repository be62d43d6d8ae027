//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Static site build pipeline CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (default: staticsite.json)
    #[arg(short = 'C', long, default_value = "staticsite.json", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Empty the output folder
    Clean,

    /// Full development build (readable output)
    #[command(visible_alias = "d")]
    Dev,

    /// Full production build (minified, cache-busted)
    #[command(visible_alias = "b")]
    Build,

    /// Development build, then rebuild on source changes
    #[command(visible_alias = "w")]
    Watch,

    /// Serve the existing output folder
    Serve {
        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Development build, then watch and serve with live reload
    #[command(visible_alias = "s")]
    Start {
        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
}
