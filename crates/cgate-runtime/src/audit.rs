//! File-backed audit log.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use cgate_core::AuditSink;
use chrono::Utc;
use tracing::{debug, warn};

/// Appends `[<RFC 3339 timestamp>] <message>` lines to a file.
///
/// Lines are stamped when recorded and handed to a dedicated writer thread,
/// so `record` never touches the filesystem on the caller's thread. Dropping
/// the log drains the queue and joins the writer.
#[derive(Debug)]
pub struct FileAuditLog {
    path: PathBuf,
    tx: Option<Sender<String>>,
    writer: Option<JoinHandle<()>>,
}

impl FileAuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (tx, rx) = mpsc::channel();
        let target = path.clone();
        let writer = thread::Builder::new()
            .name("cgate-audit".into())
            .spawn(move || write_lines(&target, rx));

        let (tx, writer) = match writer {
            Ok(handle) => (Some(tx), Some(handle)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Audit writer unavailable");
                (None, None)
            }
        };

        Self {
            path,
            tx,
            writer,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for FileAuditLog {
    fn record(&self, message: &str) {
        let Some(tx) = &self.tx else {
            return;
        };
        let line = format!("[{}] {}", Utc::now().to_rfc3339(), message);
        if tx.send(line).is_err() {
            debug!(path = %self.path.display(), "Audit writer has stopped");
        }
    }
}

impl Drop for FileAuditLog {
    fn drop(&mut self) {
        // Closing the channel ends the writer loop once the queue is empty.
        self.tx.take();
        if let Some(handle) = self.writer.take() {
            if handle.join().is_err() {
                debug!(path = %self.path.display(), "Audit writer panicked");
            }
        }
    }
}

fn write_lines(path: &Path, rx: Receiver<String>) {
    let mut file: Option<File> = None;
    for line in rx {
        if file.is_none() {
            match open_append(path) {
                Ok(opened) => file = Some(opened),
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Audit log open failed");
                    continue;
                }
            }
        }
        let Some(out) = file.as_mut() else {
            continue;
        };
        if let Err(e) = writeln!(out, "{line}") {
            debug!(path = %path.display(), error = %e, "Audit log write failed");
            file = None;
        }
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn messages(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| {
                let (stamp, message) = line
                    .strip_prefix('[')
                    .and_then(|rest| rest.split_once("] "))
                    .unwrap();
                assert!(DateTime::parse_from_rfc3339(stamp).is_ok());
                message.to_string()
            })
            .collect()
    }

    #[test]
    fn appends_timestamped_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".cgate/gateway.log");
        let log = FileAuditLog::new(&path);
        log.record("first");
        log.record("second");
        drop(log);

        assert_eq!(messages(&path), ["first", "second"]);
    }

    #[test]
    fn reopening_appends_to_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gateway.log");
        FileAuditLog::new(&path).record("one");
        FileAuditLog::new(&path).record("two");

        assert_eq!(messages(&path), ["one", "two"]);
    }

    #[test]
    fn unwritable_path_is_ignored() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        fs::write(&file, "x").unwrap();
        let log = FileAuditLog::new(file.join("gateway.log"));
        log.record("dropped");
        drop(log);
        assert_eq!(fs::read_to_string(&file).unwrap(), "x");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn records_from_async_tasks_arrive_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gateway.log");
        let log = Arc::new(FileAuditLog::new(&path));

        let writer = Arc::clone(&log);
        tokio::spawn(async move {
            for i in 0..200 {
                writer.record(&format!("line {i}"));
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();

        // The writer thread has no handle on the runtime, so lines land even
        // though this single-threaded runtime never blocked for them.
        drop(log);
        let expected: Vec<String> = (0..200).map(|i| format!("line {i}")).collect();
        assert_eq!(messages(&path), expected);
    }
}
