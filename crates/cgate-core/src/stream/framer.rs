//! Newline framing of the agent's stdout.
//!
//! Subprocess output arrives in arbitrarily sized chunks that ignore line
//! boundaries. [`LineFramer`] holds back the trailing partial line until the
//! rest of it arrives. Bytes are buffered, not text, so a UTF-8 sequence split
//! across two chunks decodes correctly once the record is complete.

use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt};
use tracing::debug;

/// Splits a byte stream into complete newline-terminated records.
#[derive(Debug, Default)]
pub struct LineFramer {
    buf: BytesMut,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk to the pending buffer.
    pub fn push(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Take the next complete record, without its line terminator.
    ///
    /// Returns `None` once only a partial line (or nothing) is left.
    pub fn next_record(&mut self) -> Option<String> {
        let end = find_newline(&self.buf)?;
        let line = self.buf.split_to(end);
        let mut record = &line[..end - 1];
        if let [rest @ .., b'\r'] = record {
            record = rest;
        }
        Some(String::from_utf8_lossy(record).into_owned())
    }

    /// Drop any unterminated trailing fragment at end of stream.
    ///
    /// A truncated last line is not a complete record. Returns the number of
    /// bytes discarded.
    pub fn finish(&mut self) -> usize {
        let discarded = self.buf.len();
        self.buf.clear();
        discarded
    }
}

/// State threaded through the `unfold` stream.
struct FrameState<S> {
    stream: S,
    framer: LineFramer,
    done: bool,
}

/// Turn a byte stream into a stream of complete, non-blank records.
///
/// Records are yielded in arrival order. A read error is yielded once and ends
/// the stream; an unterminated final fragment is discarded.
pub fn frame_records<S, E>(byte_stream: S) -> impl Stream<Item = Result<String, E>> + Send
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Send + 'static,
{
    let state = FrameState {
        stream: byte_stream.boxed(),
        framer: LineFramer::new(),
        done: false,
    };

    futures_util::stream::unfold(state, |mut st| async move {
        if st.done {
            return None;
        }

        loop {
            if let Some(record) = st.framer.next_record() {
                if record.trim().is_empty() {
                    continue;
                }
                return Some((Ok(record), st));
            }

            match st.stream.next().await {
                Some(Ok(chunk)) => st.framer.push(&chunk),
                Some(Err(e)) => {
                    st.done = true;
                    return Some((Err(e), st));
                }
                None => {
                    let discarded = st.framer.finish();
                    if discarded > 0 {
                        debug!(bytes = discarded, "Discarding unterminated trailing record");
                    }
                    return None;
                }
            }
        }
    })
}

/// Find the next newline in the buffer, returning the position after it.
fn find_newline(buf: &BytesMut) -> Option<usize> {
    buf.iter().position(|&b| b == b'\n').map(|pos| pos + 1)
}
