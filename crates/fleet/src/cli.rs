//! CLI argument definitions using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Fleet operator CLI
///
/// Runs slash commands and the scheduled shutdown against the configured
/// compute gateway and retained list.
#[derive(Parser, Debug)]
#[command(name = "fleet")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (defaults to $FLEET_DIR/config.toml)
    #[arg(short, long, global = true, env = "FLEET_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one command as if it came from chat (e.g. `fleet exec start devbox`)
    Exec {
        /// User the command runs as; also the default alias
        #[arg(short, long, env = "USER")]
        user: String,

        /// Command text
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Run the scheduled shutdown once
    Sweep,

    /// List configured aliases
    Aliases {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show version
    Version,
}
