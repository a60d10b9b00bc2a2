//! Audit sink port.
//!
//! An append-only, advisory record of what the gateway did. Write failures
//! must never fail a request, so the port has no error channel.

/// Destination for audit lines.
///
/// Implementations should be thread-safe and cheap to call from request tasks.
pub trait AuditSink: Send + Sync {
    /// Append one message. Timestamping is the implementation's job.
    fn record(&self, message: &str);
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _message: &str) {}
}
