//! Friendly rewrites of agent failure messages for terminal users.
//!
//! The HTTP gateway surfaces raw messages; only the CLI front end calls this.

/// Where the CLI records full error details.
pub const ERRORS_LOG_HINT: &str = ".cgate/errors.log";

/// Known failure classes, matched by substring on the raw message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentFailureKind {
    Unauthenticated,
    NotInstalled,
    ProRequired,
    RateLimited,
    SubscriptionRequired,
    Other,
}

impl AgentFailureKind {
    /// Classify a raw error message. Order matters: the Pro check runs before
    /// the generic subscription check.
    pub fn classify(message: &str) -> Self {
        let contains_any = |needles: &[&str]| needles.iter().any(|n| message.contains(n));

        if contains_any(&["CURSOR_API_KEY", "not authenticated"]) {
            Self::Unauthenticated
        } else if contains_any(&["command not found", "No such file or directory"]) {
            Self::NotInstalled
        } else if contains_any(&[
            "resource_exhausted",
            "not available for free users",
            "upgrade to Pro",
        ]) {
            Self::ProRequired
        } else if message.contains("rate limit") {
            Self::RateLimited
        } else if message.contains("subscription") {
            Self::SubscriptionRequired
        } else {
            Self::Other
        }
    }
}

/// Rewrite a raw agent error into an actionable message.
pub fn user_message(raw: &str) -> String {
    match AgentFailureKind::classify(raw) {
        AgentFailureKind::Unauthenticated => "⚠️  Cursor authentication required. Run 'cursor-agent' to login or set CURSOR_API_KEY environment variable.".to_string(),
        AgentFailureKind::NotInstalled => "⚠️  Cursor CLI not installed. Install with: curl https://cursor.com/install -fsS | bash".to_string(),
        AgentFailureKind::ProRequired => "⚠️  Cursor Pro subscription required. The Cloud Agent API is only available for Pro users. Upgrade at https://www.cursor.com/pricing".to_string(),
        AgentFailureKind::RateLimited => "⚠️  Cursor API rate limit reached. Please wait a moment and try again.".to_string(),
        AgentFailureKind::SubscriptionRequired => "⚠️  Cursor subscription required. Please upgrade at https://cursor.com/settings".to_string(),
        AgentFailureKind::Other => {
            let first_line = raw.lines().next().unwrap_or_default();
            format!("⚠️  Error: {first_line}. Check {ERRORS_LOG_HINT} for details.")
        }
    }
}
