//! Axum HTTP server for the chat-completions gateway.
//!
//! This module provides the `serve()` function that runs the gateway on a
//! pre-bound listener, and `create_router()` for tests and embedding.

use axum::{
    Router,
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{debug, info};

use crate::handlers::{chat_completions, health_check, list_models, not_found};
use crate::state::AppState;

/// Start the gateway with a pre-bound listener.
///
/// Runs until the cancellation token is triggered.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!("Gateway starting on {addr}");

    let app = create_router(state.clone());

    state
        .audit
        .record(&format!("Cursor gateway started on http://{addr}"));
    info!("Gateway listening on {addr}");
    info!("Point OpenAI-compatible clients at: http://{addr}/v1");

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await?;

    state.audit.record("Cursor gateway shutting down");
    info!("Gateway shut down");
    Ok(())
}

const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization";

/// Build the router with CORS and request logging.
///
/// Every response carries the allow-origin, allow-methods and allow-headers
/// headers, not only preflights.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/health", get(health_check).fallback(not_found))
        .route("/v1/models", get(list_models).fallback(not_found))
        .route(
            "/v1/chat/completions",
            post(chat_completions).fallback(not_found),
        )
        .fallback(not_found)
        .layer(middleware::from_fn(answer_options))
        .layer(middleware::from_fn_with_state(state.clone(), log_request))
        .layer(cors)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ))
        .with_state(state)
}

/// Append `<METHOD> <path>` to the audit log.
async fn log_request(State(state): State<AppState>, req: Request, next: Next) -> Response {
    debug!(method = %req.method(), uri = %req.uri(), "Incoming request");
    state
        .audit
        .record(&format!("{} {}", req.method(), req.uri()));
    next.run(req).await
}

/// Answer any `OPTIONS` request with 200; CORS headers are added outside.
async fn answer_options(req: Request, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    next.run(req).await
}
