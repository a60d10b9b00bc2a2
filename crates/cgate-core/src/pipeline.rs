//! Wiring of an agent run into the fragment pipeline.
//!
//! Both front ends go through [`Pipeline`]: the gateway pulls fragments one at
//! a time for SSE, while batch callers use [`Pipeline::collect`].

use std::io;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::{Stream, StreamExt};
use tracing::{debug, warn};

use crate::error::GatewayError;
use crate::ports::{AgentError, AgentRun, AuditSink};
use crate::stream::{
    Classifier, EmptyResponse, Fragment, ResponseMultiplexer, Variant, classify_records,
    frame_records,
};

/// Copy of the raw agent output, kept for the audit log.
#[derive(Debug, Clone, Default)]
pub struct RawTranscript {
    buf: Option<Arc<Mutex<Vec<u8>>>>,
}

impl RawTranscript {
    /// A transcript that captures; the default one does not.
    pub fn capturing() -> Self {
        Self {
            buf: Some(Arc::new(Mutex::new(Vec::new()))),
        }
    }

    /// Pass `output` through, copying every chunk.
    pub fn tap<S>(&self, output: S) -> impl Stream<Item = io::Result<Bytes>> + Send + 'static
    where
        S: Stream<Item = io::Result<Bytes>> + Send + 'static,
    {
        let buf = self.buf.clone();
        output.inspect(move |chunk| {
            if let (Some(buf), Ok(chunk)) = (&buf, chunk)
                && let Ok(mut guard) = buf.lock()
            {
                guard.extend_from_slice(chunk);
            }
        })
    }

    /// Captured output, decoded lossily. `None` when not capturing.
    pub fn contents(&self) -> Option<String> {
        let buf = self.buf.as_ref()?;
        let guard = buf.lock().ok()?;
        Some(String::from_utf8_lossy(&guard).into_owned())
    }

    /// Write the captured output between markers.
    pub fn write_to(&self, audit: &dyn AuditSink) {
        if let Some(raw) = self.contents() {
            audit.record("===== RAW AGENT OUTPUT START =====");
            audit.record(&raw);
            audit.record("===== RAW AGENT OUTPUT END =====");
        }
    }
}

/// Shared configuration of the framer → classifier chain.
#[derive(Clone)]
pub struct Pipeline {
    classifier: Classifier,
    audit: Arc<dyn AuditSink>,
    log_raw_output: bool,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("classifier", &self.classifier)
            .field("log_raw_output", &self.log_raw_output)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    pub fn new(variant: Variant, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            classifier: Classifier::new(variant),
            audit,
            log_raw_output: false,
        }
    }

    /// Keep a copy of the raw agent output for the audit log.
    #[must_use]
    pub const fn with_raw_output(mut self, enabled: bool) -> Self {
        self.log_raw_output = enabled;
        self
    }

    pub fn audit(&self) -> &Arc<dyn AuditSink> {
        &self.audit
    }

    /// Classified fragments of `output`, plus the raw transcript being filled.
    pub fn fragments(
        &self,
        output: BoxStream<'static, io::Result<Bytes>>,
    ) -> (BoxStream<'static, io::Result<Fragment>>, RawTranscript) {
        let transcript = if self.log_raw_output {
            RawTranscript::capturing()
        } else {
            RawTranscript::default()
        };
        let records = frame_records(transcript.tap(output));
        let fragments = classify_records(records, self.classifier, Arc::clone(&self.audit));
        (fragments.boxed(), transcript)
    }

    /// Drive a run to completion and return the final text.
    ///
    /// Usable text wins over a failed exit; with no text, a failed exit is
    /// reported instead of [`EmptyResponse`].
    pub async fn collect(
        &self,
        run: AgentRun,
        mut mux: ResponseMultiplexer,
    ) -> Result<String, GatewayError> {
        let AgentRun {
            output,
            exit,
            cancel: _cancel,
        } = run;

        let (mut fragments, transcript) = self.fragments(output);
        let mut read_error = None;
        while let Some(item) = fragments.next().await {
            match item {
                Ok(fragment) => {
                    mux.accept(fragment);
                }
                Err(e) => {
                    warn!(error = %e, "Agent output read failed");
                    read_error = Some(e);
                    break;
                }
            }
        }
        drop(fragments);
        transcript.write_to(self.audit.as_ref());

        let exit = exit.await.ok();
        match &exit {
            Some(exit) => debug!(code = ?exit.code, "Agent exited"),
            None => debug!("Exit report dropped"),
        }

        if let Some(e) = read_error {
            return Err(AgentError::Read(e).into());
        }

        match (mux.finish(), exit) {
            (Ok(text), exit) => {
                if let Some(exit) = exit
                    && exit.code.is_some_and(|c| c != 0)
                {
                    warn!(code = ?exit.code, "Agent exited unsuccessfully after producing output");
                }
                Ok(text)
            }
            (Err(EmptyResponse), None) => Err(AgentError::ExitUnknown.into()),
            (Err(EmptyResponse), Some(exit)) if exit.code.is_some_and(|c| c != 0) => {
                Err(exit.to_error().into())
            }
            (Err(empty), Some(_)) => Err(empty.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{AgentExit, NoopAuditSink};
    use crate::stream::Mode;
    use tokio::sync::oneshot;
    use tokio_util::sync::CancellationToken;

    #[derive(Default)]
    struct MemoryAudit(Mutex<Vec<String>>);

    impl AuditSink for MemoryAudit {
        fn record(&self, message: &str) {
            self.0.lock().unwrap().push(message.to_string());
        }
    }

    fn run(chunks: &[&str], exit: AgentExit) -> AgentRun {
        let items: Vec<io::Result<Bytes>> = chunks
            .iter()
            .map(|c| Ok(Bytes::from(c.to_string())))
            .collect();
        let (tx, rx) = oneshot::channel();
        tx.send(exit).unwrap();
        AgentRun {
            output: futures_util::stream::iter(items).boxed(),
            exit: rx,
            cancel: CancellationToken::new(),
        }
    }

    fn ok_exit() -> AgentExit {
        AgentExit {
            code: Some(0),
            stderr: String::new(),
        }
    }

    #[tokio::test]
    async fn collect_joins_split_records() {
        let pipeline = Pipeline::new(Variant::Gateway, Arc::new(NoopAuditSink));
        let text = pipeline
            .collect(
                run(
                    &[
                        "{\"type\":\"assistant\",\"message\":{\"content\":[{\"type\":\"te",
                        "xt\",\"text\":\"Hello\"}]}}\n",
                        "{\"type\":\"result\",\"result\":\"Hello\"}\n",
                    ],
                    ok_exit(),
                ),
                ResponseMultiplexer::new(Mode::Batch),
            )
            .await
            .unwrap();
        assert_eq!(text, "Hello");
    }

    #[tokio::test]
    async fn failed_exit_without_output_is_agent_error() {
        let pipeline = Pipeline::new(Variant::Gateway, Arc::new(NoopAuditSink));
        let err = pipeline
            .collect(
                run(
                    &["not json\n"],
                    AgentExit {
                        code: Some(2),
                        stderr: "Error: not authenticated\n".into(),
                    },
                ),
                ResponseMultiplexer::new(Mode::Batch),
            )
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "cursor-agent exited with code 2: Error: not authenticated"
        );
    }

    #[tokio::test]
    async fn only_malformed_lines_is_empty_response() {
        let pipeline = Pipeline::new(Variant::Gateway, Arc::new(NoopAuditSink));
        let err = pipeline
            .collect(
                run(&["garbage\n", "{oops\n"], ok_exit()),
                ResponseMultiplexer::new(Mode::Batch),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::EmptyResponse(_)));
    }

    #[tokio::test]
    async fn lost_exit_report_without_output_is_reported() {
        let pipeline = Pipeline::new(Variant::Gateway, Arc::new(NoopAuditSink));
        let (_, exit) = oneshot::channel();
        let run = AgentRun {
            output: futures_util::stream::iter(Vec::<io::Result<Bytes>>::new()).boxed(),
            exit,
            cancel: CancellationToken::new(),
        };
        let err = pipeline
            .collect(run, ResponseMultiplexer::new(Mode::Batch))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Agent(AgentError::ExitUnknown)));
        assert_eq!(err.to_string(), "cursor-agent exit status unavailable");
    }

    #[tokio::test]
    async fn raw_output_goes_to_audit() {
        let audit = Arc::new(MemoryAudit::default());
        let pipeline =
            Pipeline::new(Variant::Gateway, audit.clone()).with_raw_output(true);
        pipeline
            .collect(
                run(
                    &["{\"type\":\"result\",\"result\":\"ok\"}\n"],
                    ok_exit(),
                ),
                ResponseMultiplexer::new(Mode::Batch),
            )
            .await
            .unwrap();

        let lines = audit.0.lock().unwrap();
        assert_eq!(lines[0], "===== RAW AGENT OUTPUT START =====");
        assert_eq!(lines[1], "{\"type\":\"result\",\"result\":\"ok\"}\n");
        assert_eq!(lines[2], "===== RAW AGENT OUTPUT END =====");
    }
}
