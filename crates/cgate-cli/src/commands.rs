//! Main commands enum and primary subcommands.

use clap::{Subcommand, ValueEnum};

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run the OpenAI-compatible gateway until Ctrl-C
    Serve {
        /// Address to bind
        #[arg(long, env = "CGATE_HOST")]
        host: Option<String>,
        /// Port to bind
        #[arg(short, long, env = "CGATE_PORT")]
        port: Option<u16>,
        /// Fetch the model list from the Cursor API at start-up
        #[arg(long)]
        fetch_models: bool,
    },

    /// Ask the agent a question and print the answer
    Chat {
        /// Prompt to send
        prompt: String,
        /// Model to use (default from settings, normally "auto")
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Run the agent on a task in the workspace
    Agent {
        /// Task description
        prompt: String,
        /// Model to use (default from settings, normally "auto")
        #[arg(short, long)]
        model: Option<String>,
        /// Allow the agent to modify files
        #[arg(short, long)]
        force: bool,
    },

    /// List available models
    Models {
        /// Query the Cursor API instead of the built-in list
        #[arg(long)]
        fetch: bool,
    },

    /// Enable or disable the terminal front end
    Toggle {
        #[arg(value_enum, default_value_t = ToggleAction::Toggle)]
        action: ToggleAction,
    },
}

/// What `cgate toggle` does with the persisted flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ToggleAction {
    On,
    Off,
    Toggle,
    Status,
}
