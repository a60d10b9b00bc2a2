//! SSE rendering of a live agent run.
//!
//! Pulls fragments from the pipeline and writes one `chat.completion.chunk`
//! event per forwarded fragment. However the source ends, the body finishes
//! with exactly one stop chunk and the `[DONE]` sentinel.

use std::io;
use std::sync::Arc;

use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use cgate_core::{AgentExit, AuditSink, Fragment, Mode, RawTranscript, ResponseMultiplexer};
use futures_util::stream::BoxStream;
use futures_util::{Stream, StreamExt};
use tokio::sync::oneshot;
use tokio_util::sync::DropGuard;
use tracing::{debug, info, warn};

use crate::openai::{ChatCompletionChunk, SSE_DONE, sse_event};

/// Everything the SSE body owns for the lifetime of the response.
pub struct SseSource {
    pub fragments: BoxStream<'static, io::Result<Fragment>>,
    /// Model string exactly as the client sent it.
    pub model: String,
    pub audit: Arc<dyn AuditSink>,
    pub transcript: RawTranscript,
    pub exit: oneshot::Receiver<AgentExit>,
    /// Kills the agent if the body is dropped before completion.
    pub guard: Option<DropGuard>,
}

/// State threaded through the `unfold` stream.
struct SseState {
    source: SseSource,
    mux: ResponseMultiplexer,
    done: bool,
}

/// Turn a fragment source into SSE bytes.
pub fn sse_stream(source: SseSource) -> impl Stream<Item = io::Result<Bytes>> + Send {
    let state = SseState {
        source,
        mux: ResponseMultiplexer::new(Mode::Streaming),
        done: false,
    };

    futures_util::stream::unfold(state, |mut st| async move {
        if st.done {
            return None;
        }

        loop {
            match st.source.fragments.next().await {
                Some(Ok(fragment)) => {
                    if let Some(content) = st.mux.accept(fragment) {
                        let chunk = ChatCompletionChunk::delta(&st.source.model, content);
                        return Some((Ok(Bytes::from(sse_event(&chunk))), st));
                    }
                }
                Some(Err(e)) => {
                    warn!(error = %e, "Agent output read failed mid-stream");
                    st.source
                        .audit
                        .record(&format!("Error: Failed to read agent output: {e}"));
                    break;
                }
                None => break,
            }
        }

        st.done = true;
        let tail = finish(&mut st);
        Some((Ok(Bytes::from(tail)), st))
    })
}

/// Stop chunk plus sentinel; also settles logging and the drop guard.
fn finish(st: &mut SseState) -> String {
    let chars = st.mux.accumulated().chars().count();
    info!(chars, "Streaming complete");
    st.source
        .audit
        .record(&format!("Streaming complete: {chars} chars"));
    st.source.transcript.write_to(st.source.audit.as_ref());

    // The agent closed stdout on its own; let it exit normally.
    if let Some(guard) = st.source.guard.take() {
        guard.disarm();
    }
    let (_, placeholder) = oneshot::channel();
    let exit = std::mem::replace(&mut st.source.exit, placeholder);
    tokio::spawn(async move {
        match exit.await {
            Ok(exit) if exit.success() => debug!("cursor-agent exited cleanly"),
            Ok(exit) => warn!(
                code = ?exit.code,
                stderr = exit.first_stderr_line().unwrap_or_default(),
                "cursor-agent exited unsuccessfully"
            ),
            Err(_) => debug!("Exit report dropped"),
        }
    });

    let mut tail = sse_event(&ChatCompletionChunk::stop(&st.source.model));
    tail.push_str(SSE_DONE);
    tail
}

/// Wrap a fragment source as a `text/event-stream` response.
pub fn sse_response(source: SseSource) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header("content-type", "text/event-stream")
        .header("cache-control", "no-cache")
        .header("connection", "keep-alive")
        .header("x-accel-buffering", "no") // Disable nginx buffering
        .body(Body::from_stream(sse_stream(source)))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgate_core::NoopAuditSink;
    use tokio_util::sync::CancellationToken;

    fn source(items: Vec<io::Result<Fragment>>, guard: Option<DropGuard>) -> SseSource {
        let (_tx, exit) = oneshot::channel();
        SseSource {
            fragments: futures_util::stream::iter(items).boxed(),
            model: "cursor/auto".into(),
            audit: Arc::new(NoopAuditSink),
            transcript: RawTranscript::default(),
            exit,
            guard,
        }
    }

    async fn events(source: SseSource) -> Vec<String> {
        let bytes: Vec<Bytes> = sse_stream(source).map(|b| b.unwrap()).collect().await;
        let body: String = bytes
            .iter()
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .collect();
        body.split("\n\n")
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .collect()
    }

    #[tokio::test]
    async fn forwards_then_terminates_once() {
        let events = events(source(
            vec![
                Ok(Fragment::Text("Hello".into())),
                Ok(Fragment::Outcome(cgate_core::RunOutcome::default())),
                Ok(Fragment::Narration("\n**Tool Use: edit**\n`a`\n".into())),
            ],
            None,
        ))
        .await;

        assert_eq!(events.len(), 4);
        assert!(events[0].contains(r#""content":"Hello""#));
        assert!(events[1].contains("Tool Use: edit"));
        assert!(events[2].contains(r#""finish_reason":"stop""#));
        assert_eq!(events[3], "data: [DONE]");
    }

    #[tokio::test]
    async fn read_error_still_terminates() {
        let events = events(source(
            vec![
                Ok(Fragment::Text("partial".into())),
                Err(io::Error::other("broken pipe")),
                Ok(Fragment::Text("never".into())),
            ],
            None,
        ))
        .await;

        assert_eq!(events.len(), 3);
        assert!(events[1].contains(r#""finish_reason":"stop""#));
        assert_eq!(events[2], "data: [DONE]");
        assert!(!events.iter().any(|e| e.contains("never")));
    }

    #[tokio::test]
    async fn empty_source_sends_only_stop_and_done() {
        let events = events(source(Vec::new(), None)).await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], "data: [DONE]");
    }

    #[tokio::test]
    async fn completion_disarms_guard() {
        let token = CancellationToken::new();
        let _ = events(source(
            vec![Ok(Fragment::Text("x".into()))],
            Some(token.clone().drop_guard()),
        ))
        .await;
        assert!(!token.is_cancelled());
    }

    #[tokio::test]
    async fn dropping_body_early_cancels() {
        let token = CancellationToken::new();
        let mut stream = Box::pin(sse_stream(source(
            vec![
                Ok(Fragment::Text("a".into())),
                Ok(Fragment::Text("b".into())),
            ],
            Some(token.clone().drop_guard()),
        )));
        assert!(stream.next().await.is_some());
        drop(stream);
        assert!(token.is_cancelled());
    }
}
