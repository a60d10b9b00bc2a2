//! Tool-call payloads reported by the agent.
//!
//! The agent reports a tool call as an object with exactly one populated key
//! naming the tool kind (`shellToolCall`, `readToolCall`, ...). [`ToolCall`]
//! turns that into a sum type once, at decode time, so narration can match
//! exhaustively instead of probing for fields.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::debug;

/// Outcome of a finished tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome<S> {
    /// The tool ran; `S` holds the tool-specific result fields.
    Success(S),
    /// The tool was refused before running.
    Rejected(Rejection),
    /// A result object with neither `success` nor `rejected`.
    Unreported,
}

/// Why a tool call was refused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Rejection {
    pub command: Option<String>,
    pub reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "S: Deserialize<'de>"))]
struct RawOutcome<S> {
    success: Option<S>,
    rejected: Option<Rejection>,
}

impl<S> From<RawOutcome<S>> for ToolOutcome<S> {
    fn from(raw: RawOutcome<S>) -> Self {
        match (raw.success, raw.rejected) {
            (Some(success), _) => Self::Success(success),
            (None, Some(rejected)) => Self::Rejected(rejected),
            (None, None) => Self::Unreported,
        }
    }
}

impl<'de, S: Deserialize<'de>> Deserialize<'de> for ToolOutcome<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawOutcome::deserialize(deserializer).map(Self::from)
    }
}

/// Arguments plus (once completed) the outcome of one tool call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(bound(deserialize = "A: Deserialize<'de> + Default, S: Deserialize<'de>"))]
pub struct Invocation<A, S> {
    #[serde(default)]
    pub args: A,
    #[serde(default)]
    pub result: Option<ToolOutcome<S>>,
}

impl<A, S> Invocation<A, S> {
    /// Success payload, if the call completed successfully.
    pub const fn success(&self) -> Option<&S> {
        match &self.result {
            Some(ToolOutcome::Success(success)) => Some(success),
            _ => None,
        }
    }

    /// Rejection payload, if the call was refused.
    pub const fn rejection(&self) -> Option<&Rejection> {
        match &self.result {
            Some(ToolOutcome::Rejected(rejection)) => Some(rejection),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// Per-tool argument and success shapes
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShellArgs {
    pub command: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShellSuccess {
    pub exit_code: Option<i64>,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReadArgs {
    pub path: Option<String>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReadSuccess {
    pub path: Option<String>,
    pub content: Option<String>,
    pub total_lines: Option<u64>,
    pub total_chars: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WriteArgs {
    pub path: Option<String>,
    pub file_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WriteSuccess {
    pub path: Option<String>,
    pub lines_created: Option<u64>,
    pub file_size: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditArgs {
    pub path: Option<String>,
    pub old_text: Option<String>,
    pub new_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GrepArgs {
    pub pattern: Option<String>,
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GrepSuccess {
    /// Results keyed by workspace root, in the order the agent reported them.
    pub workspace_results: Option<Map<String, Value>>,
}

impl GrepSuccess {
    /// Matched-line count of the first reported workspace, when present.
    pub fn first_workspace_matches(&self) -> Option<u64> {
        self.workspace_results
            .as_ref()?
            .values()
            .next()?
            .pointer("/content/totalMatchedLines")?
            .as_u64()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlobArgs {
    pub glob_pattern: Option<String>,
    pub target_directory: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlobSuccess {
    pub total_files: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListArgs {
    pub path: Option<String>,
    pub ignore: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListSuccess {
    pub directory_tree_root: Option<DirectoryTree>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DirectoryTree {
    pub children_files: Vec<Value>,
    pub children_dirs: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PathArgs {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FunctionCall {
    pub name: Option<String>,
    pub arguments: Option<String>,
}

pub type ShellCall = Invocation<ShellArgs, ShellSuccess>;
pub type ReadCall = Invocation<ReadArgs, ReadSuccess>;
pub type WriteCall = Invocation<WriteArgs, WriteSuccess>;
pub type EditCall = Invocation<EditArgs, Value>;
pub type GrepCall = Invocation<GrepArgs, GrepSuccess>;
pub type GlobCall = Invocation<GlobArgs, GlobSuccess>;
pub type ListCall = Invocation<ListArgs, ListSuccess>;
pub type DeleteCall = Invocation<PathArgs, Value>;

/// A tool call, one variant per capability the agent reports.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    Shell(ShellCall),
    Read(ReadCall),
    Write(WriteCall),
    Edit(EditCall),
    Grep(GrepCall),
    Glob(GlobCall),
    List(ListCall),
    Delete(DeleteCall),
    Function(FunctionCall),
    /// No recognised key; the raw payload is kept for logging.
    Unknown(Value),
}

impl ToolCall {
    /// Build the variant from a raw `tool_call` payload.
    ///
    /// The first recognised key wins. A recognised key whose payload does not
    /// decode is skipped, and a payload with nothing usable becomes `Unknown`.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(map) = &value else {
            return Self::Unknown(value);
        };

        for (key, payload) in map {
            let decoded = match key.as_str() {
                "shellToolCall" => decode(payload).map(Self::Shell),
                "readToolCall" => decode(payload).map(Self::Read),
                "writeToolCall" => decode(payload).map(Self::Write),
                "editToolCall" => decode(payload).map(Self::Edit),
                "grepToolCall" => decode(payload).map(Self::Grep),
                "globToolCall" => decode(payload).map(Self::Glob),
                "lsToolCall" => decode(payload).map(Self::List),
                "deleteToolCall" => decode(payload).map(Self::Delete),
                "function" => decode(payload).map(Self::Function),
                _ => continue,
            };
            match decoded {
                Ok(call) => return call,
                Err(e) => debug!(key = %key, error = %e, "Skipping undecodable tool payload"),
            }
        }

        Self::Unknown(value)
    }

    /// Short kind name, used in logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Shell(_) => "shell",
            Self::Read(_) => "read",
            Self::Write(_) => "write",
            Self::Edit(_) => "edit",
            Self::Grep(_) => "grep",
            Self::Glob(_) => "glob",
            Self::List(_) => "list",
            Self::Delete(_) => "delete",
            Self::Function(_) => "function",
            Self::Unknown(_) => "unknown",
        }
    }
}

impl<'de> Deserialize<'de> for ToolCall {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

fn decode<T: DeserializeOwned>(payload: &Value) -> Result<T, serde_json::Error> {
    T::deserialize(payload)
}
