//! Route handlers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use cgate_core::{AgentInvocation, GatewayError, Mode, ResponseMultiplexer};
use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

use crate::error::GatewayHttpError;
use crate::openai::{ChatCompletionRequest, ChatCompletionResponse, ErrorBody, ModelsResponse};
use crate::state::AppState;
use crate::stream::{SseSource, sse_response};

/// Health check endpoint.
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok"
    }))
}

/// List the model registry in OpenAI format.
pub async fn list_models(State(state): State<AppState>) -> impl IntoResponse {
    debug!("GET /v1/models");
    Json(ModelsResponse::from_registry(&state.registry))
}

/// Anything that is not a known route.
pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("Not found"))).into_response()
}

/// Run the agent for one chat request.
pub async fn chat_completions(State(state): State<AppState>, body: Bytes) -> Response {
    let request_id = Uuid::new_v4();
    let span = info_span!("chat", %request_id);
    match handle_chat(state, body).instrument(span).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

async fn handle_chat(state: AppState, body: Bytes) -> Result<Response, GatewayHttpError> {
    let request: ChatCompletionRequest = serde_json::from_slice(&body)
        .map_err(|e| GatewayError::InvalidRequest(e.to_string()))?;

    info!(
        model = %request.model,
        streaming = request.stream,
        messages = request.messages.len(),
        "Processing chat completion request"
    );
    state.audit.record(&format!(
        "Request: model={}, messages={}, stream={}",
        request.model,
        request.messages.len(),
        request.stream
    ));

    let model = state.registry.resolve(&request.model).map_err(|e| {
        state.audit.record(&format!("Unknown model: {}", e.model));
        GatewayError::from(e)
    })?;

    let mut invocation = AgentInvocation::new(&model, request.prompt())
        .with_stream_partial(request.stream)
        .with_force(state.config.force)
        .with_approve_mcps(state.config.approve_mcps);
    if let Some(workspace) = &state.config.workspace {
        invocation = invocation.with_workspace(workspace.clone());
    }

    state
        .audit
        .record(&format!("Executing: cursor-agent with model={model}"));
    let run = state.runner.run(invocation).await.map_err(|e| {
        state.audit.record(&format!("Error: {e}"));
        GatewayError::from(e)
    })?;

    let pipeline = state.pipeline();

    if request.stream {
        let guard = state
            .config
            .kill_on_disconnect
            .then(|| run.cancel.clone().drop_guard());
        let (fragments, transcript) = pipeline.fragments(run.output);
        return Ok(sse_response(SseSource {
            fragments,
            model: request.model,
            audit: std::sync::Arc::clone(&state.audit),
            transcript,
            exit: run.exit,
            guard,
        }));
    }

    let text = pipeline
        .collect(run, ResponseMultiplexer::new(Mode::Batch))
        .await
        .map_err(|e| {
            state.audit.record(&format!("Error: {e}"));
            e
        })?;
    info!(chars = text.chars().count(), "Completion ready");
    state
        .audit
        .record(&format!("Response length: {} chars", text.chars().count()));

    Ok(Json(ChatCompletionResponse::new(request.model, text)).into_response())
}
