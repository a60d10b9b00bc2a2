//! Agent stderr collection (non-UTF8-safe).
//!
//! `BufReader::lines()` ends on invalid UTF-8, so lines are read as bytes and
//! decoded lossily. Each line is logged and kept for the exit report.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;
use tracing::debug;

/// Read `stream` to EOF on its own task, returning everything read.
pub fn spawn_stderr_collector(stream: impl AsyncRead + Unpin + Send + 'static) -> JoinHandle<String> {
    tokio::spawn(async move {
        let mut reader = BufReader::new(stream);
        let mut buf: Vec<u8> = Vec::with_capacity(1024);
        let mut collected = String::new();

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    if buf.last() == Some(&b'\n') {
                        buf.pop();
                        if buf.last() == Some(&b'\r') {
                            buf.pop();
                        }
                    }

                    let line = String::from_utf8_lossy(&buf);
                    debug!(stream = "stderr", "agent: {}", line);
                    collected.push_str(&line);
                    collected.push('\n');
                }
                Err(e) => {
                    debug!(error = %e, "stderr reader exiting due to read error");
                    break;
                }
            }
        }

        collected
    })
}
