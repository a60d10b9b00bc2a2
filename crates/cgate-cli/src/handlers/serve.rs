//! Serve command handler.
//!
//! Runs the chat-completions gateway until Ctrl-C.

use std::sync::Arc;

use anyhow::{Context, Result};
use cgate_proxy::{AppState, GatewayConfig};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::bootstrap::CliContext;

/// Command-line overrides for `serve`.
#[derive(Debug, Clone, Default)]
pub struct ServeArgs {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub fetch_models: bool,
}

/// Execute the serve command.
pub async fn execute(ctx: &CliContext, args: ServeArgs) -> Result<()> {
    let host = args
        .host
        .unwrap_or_else(|| ctx.settings.effective_host().to_string());
    let port = args.port.unwrap_or_else(|| ctx.settings.effective_port());
    let fetch = args.fetch_models || ctx.settings.effective_fetch_models();

    let registry = ctx.registry(fetch).await;
    info!(models = registry.len(), fetched = fetch, "Model registry ready");

    let state = AppState::new(
        Arc::clone(&ctx.runner),
        Arc::new(registry),
        Arc::clone(&ctx.audit),
        GatewayConfig::from_settings(&ctx.settings, Some(ctx.workspace.clone())),
    );

    let listener = TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind {host}:{port}"))?;
    let addr = listener.local_addr()?;

    println!("🚀 Cursor gateway listening on http://{addr}");
    println!("   Base URL for OpenAI-compatible clients: http://{addr}/v1");
    println!("   Workspace: {}", ctx.workspace.display());
    println!("   Press Ctrl-C to stop");

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C received, shutting down");
        }
        shutdown.cancel();
    });

    cgate_proxy::serve(listener, state, cancel).await
}
