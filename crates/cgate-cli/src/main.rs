//! CLI entry point - the composition root.

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use cgate_cli::{Cli, CliConfig, Commands, bootstrap, handlers};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads `env` defaults
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let ctx = bootstrap(CliConfig::new(cli.workspace, cli.agent_bin)?).await?;

    match command {
        Commands::Serve {
            host,
            port,
            fetch_models,
        } => {
            let args = handlers::serve::ServeArgs {
                host,
                port,
                fetch_models,
            };
            handlers::serve::execute(&ctx, args).await?;
        }
        Commands::Chat { prompt, model } => {
            handlers::chat::execute(&ctx, &prompt, model.as_deref()).await?;
        }
        Commands::Agent {
            prompt,
            model,
            force,
        } => {
            handlers::agent::execute(&ctx, &prompt, model.as_deref(), force).await?;
        }
        Commands::Models { fetch } => {
            handlers::models::execute(&ctx, fetch).await?;
        }
        Commands::Toggle { action } => {
            handlers::toggle::execute(&ctx, action).await?;
        }
    }

    Ok(())
}
