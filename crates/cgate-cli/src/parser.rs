//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for the Cursor agent gateway.
#[derive(Parser)]
#[command(name = "cgate")]
#[command(about = "OpenAI-compatible gateway and terminal front end for cursor-agent")]
#[command(version)]
pub struct Cli {
    /// Directory the agent works in and where `.cgate/` state lives
    #[arg(short = 'w', long = "workspace", global = true)]
    pub workspace: Option<PathBuf>,

    /// Agent executable name or path
    #[arg(long = "agent-bin", env = "CGATE_AGENT_BIN", global = true)]
    pub agent_bin: Option<String>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
