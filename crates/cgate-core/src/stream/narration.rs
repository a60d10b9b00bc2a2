//! Human-readable narration of tool calls.
//!
//! Each tool-call event is formatted on its own: the agent repeats the full
//! arguments on completion, so no pairing between "started" and "completed"
//! records is needed. Output is Markdown, interleaved with assistant text.

use std::fmt::Write as _;

use crate::domain::tool_call::{
    DeleteCall, EditCall, GlobCall, GrepCall, ListCall, ReadCall, ShellCall, ToolCall, ToolOutcome,
    WriteCall,
};

/// Maximum characters of shell output shown on completion.
pub const SHELL_OUTPUT_LIMIT: usize = 2000;

/// Maximum characters of file content previewed for a write.
pub const WRITE_PREVIEW_LIMIT: usize = 100;

/// Notice for a started call with nothing recognisable to show.
pub const GENERIC_STARTED: &str = "\n🔧 Tool executing\n";

/// Notice for a completed call with no recognisable outcome.
pub const GENERIC_COMPLETED: &str = "\n**Result:** Completed\n";

/// Which tool-call record is being narrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolPhase {
    Started,
    Completed,
}

/// Format one tool-call record. Never returns an empty string.
pub fn narrate(call: &ToolCall, phase: ToolPhase) -> String {
    match phase {
        ToolPhase::Started => narrate_started(call).unwrap_or_else(|| GENERIC_STARTED.to_string()),
        ToolPhase::Completed => {
            narrate_completed(call).unwrap_or_else(|| GENERIC_COMPLETED.to_string())
        }
    }
}

fn narrate_started(call: &ToolCall) -> Option<String> {
    match call {
        ToolCall::Shell(shell) => {
            let command = shell.args.command.as_deref()?;
            Some(format!("\n**Tool Use: bash**\n```bash\n{command}\n```\n"))
        }
        ToolCall::Read(read) => {
            let path = read.args.path.as_deref()?;
            let mut info = path.to_string();
            if read.args.offset.is_some() || read.args.limit.is_some() {
                let offset = read.args.offset.unwrap_or(0);
                let limit = read
                    .args
                    .limit
                    .map_or_else(|| "all".to_string(), |l| l.to_string());
                let _ = write!(info, " (offset: {offset}, limit: {limit})");
            }
            Some(format!("\n**Tool Use: read**\n`{info}`\n"))
        }
        ToolCall::Write(write) => {
            let path = write.args.path.as_deref()?;
            let text = write.args.file_text.as_deref().unwrap_or_default();
            let (preview, truncated) = truncate_chars(text, WRITE_PREVIEW_LIMIT);
            let ellipsis = if truncated { "..." } else { "" };
            Some(format!(
                "\n**Tool Use: write**\n`{path}` ({} chars)\n```\n{preview}{ellipsis}\n```\n",
                text.chars().count()
            ))
        }
        ToolCall::Edit(edit) => {
            let path = edit.args.path.as_deref()?;
            Some(format!("\n**Tool Use: edit**\n`{path}`\n"))
        }
        ToolCall::Grep(grep) => Some(format!(
            "\n**Tool Use: grep**\n`{}` in `{}`\n",
            grep.args.pattern.as_deref().unwrap_or_default(),
            grep.args.path.as_deref().unwrap_or(".")
        )),
        ToolCall::Glob(glob) => Some(format!(
            "\n**Tool Use: glob**\n`{}` in `{}`\n",
            glob.args.glob_pattern.as_deref().unwrap_or_default(),
            glob.args.target_directory.as_deref().unwrap_or(".")
        )),
        ToolCall::List(list) => {
            let mut info = list.args.path.as_deref().unwrap_or(".").to_string();
            if let Some(ignore) = list.args.ignore.as_ref().filter(|i| !i.is_empty()) {
                let _ = write!(info, " (ignore: {})", ignore.join(", "));
            }
            Some(format!("\n**Tool Use: list**\n`{info}`\n"))
        }
        ToolCall::Delete(delete) => {
            let path = delete.args.path.as_deref()?;
            Some(format!("\n**Tool Use: delete**\n`{path}`\n"))
        }
        ToolCall::Function(function) => {
            let name = function.name.as_deref()?;
            Some(format!("\n**Tool Use: {name}**\n"))
        }
        ToolCall::Unknown(_) => None,
    }
}

fn narrate_completed(call: &ToolCall) -> Option<String> {
    match call {
        ToolCall::Shell(shell) => shell_completed(shell),
        ToolCall::Read(read) => read_completed(read),
        ToolCall::Write(write) => write_completed(write),
        ToolCall::Edit(edit) => edit_completed(edit),
        ToolCall::Grep(grep) => grep_completed(grep),
        ToolCall::Glob(glob) => glob_completed(glob),
        ToolCall::List(list) => list_completed(list),
        ToolCall::Delete(delete) => delete_completed(delete),
        ToolCall::Function(_) | ToolCall::Unknown(_) => None,
    }
}

fn shell_completed(shell: &ShellCall) -> Option<String> {
    if let Some(rejection) = shell.rejection() {
        return Some(match rejection.reason.as_deref() {
            Some(reason) => format!("\n**Result:** Rejected ({reason})\n"),
            None => "\n**Result:** Rejected\n".to_string(),
        });
    }

    let success = shell.success()?;
    let mut out = format!("\n**Result:** Exit {}\n", success.exit_code.unwrap_or(0));

    let output = combined_output(
        success.stdout.as_deref().unwrap_or_default(),
        success.stderr.as_deref().unwrap_or_default(),
    );
    if !output.trim().is_empty() {
        let (shown, truncated) = truncate_chars(&output, SHELL_OUTPUT_LIMIT);
        let marker = if truncated { "\n... (truncated)" } else { "" };
        let mut body = format!("{shown}{marker}");
        if !body.ends_with('\n') {
            body.push('\n');
        }
        let _ = write!(out, "```\n{body}```\n");
    }
    Some(out)
}

fn read_completed(read: &ReadCall) -> Option<String> {
    let success = read.success()?;
    Some(format!(
        "\n**Result:** Read {} lines ({} chars)\n",
        count_or_unknown(success.total_lines),
        count_or_unknown(success.total_chars)
    ))
}

fn write_completed(write: &WriteCall) -> Option<String> {
    let success = write.success()?;
    let path = success
        .path
        .as_deref()
        .or(write.args.path.as_deref())
        .unwrap_or("?");
    Some(format!(
        "\n**Result:** Wrote {} lines ({} bytes) to `{path}`\n",
        count_or_unknown(success.lines_created),
        count_or_unknown(success.file_size)
    ))
}

fn edit_completed(edit: &EditCall) -> Option<String> {
    edit.success().map(|_| "\n**Result:** Edit applied\n".to_string())
}

fn grep_completed(grep: &GrepCall) -> Option<String> {
    let success = grep.success()?;
    if success.workspace_results.is_none() {
        return Some("\n**Result:** Grep completed\n".to_string());
    }
    Some(format!(
        "\n**Result:** Found {} matches\n",
        count_or_unknown(success.first_workspace_matches())
    ))
}

fn glob_completed(glob: &GlobCall) -> Option<String> {
    let success = glob.success()?;
    Some(format!(
        "\n**Result:** Found {} files\n",
        count_or_unknown(success.total_files)
    ))
}

fn list_completed(list: &ListCall) -> Option<String> {
    let success = list.success()?;
    let (files, dirs) = success.directory_tree_root.as_ref().map_or_else(
        || ("?".to_string(), "?".to_string()),
        |root| {
            (
                root.children_files.len().to_string(),
                root.children_dirs.len().to_string(),
            )
        },
    );
    Some(format!(
        "\n**Result:** Listed {files} files, {dirs} directories\n"
    ))
}

fn delete_completed(delete: &DeleteCall) -> Option<String> {
    match delete.result.as_ref()? {
        ToolOutcome::Success(_) => Some("\n**Result:** Deleted\n".to_string()),
        ToolOutcome::Rejected(rejection) => Some(match rejection.reason.as_deref() {
            Some(reason) => format!("\n**Result:** Delete rejected: {reason}\n"),
            None => "\n**Result:** Delete rejected\n".to_string(),
        }),
        ToolOutcome::Unreported => None,
    }
}

/// Join stdout and stderr, keeping stderr on its own line.
fn combined_output(stdout: &str, stderr: &str) -> String {
    match (stdout.trim().is_empty(), stderr.trim().is_empty()) {
        (false, false) => {
            let mut out = stdout.to_string();
            if !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(stderr);
            out
        }
        (false, true) => stdout.to_string(),
        (true, false) => stderr.to_string(),
        (true, true) => String::new(),
    }
}

/// First `limit` chars of `text`, and whether anything was cut.
fn truncate_chars(text: &str, limit: usize) -> (&str, bool) {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => (&text[..byte_idx], true),
        None => (text, false),
    }
}

fn count_or_unknown(count: Option<u64>) -> String {
    count.map_or_else(|| "?".to_string(), |c| c.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(value: serde_json::Value) -> ToolCall {
        ToolCall::from_value(value)
    }

    #[test]
    fn shell_started_is_fenced_command() {
        let started = narrate(
            &call(json!({ "shellToolCall": { "args": { "command": "ls -la" } } })),
            ToolPhase::Started,
        );
        assert_eq!(started, "\n**Tool Use: bash**\n```bash\nls -la\n```\n");
    }

    #[test]
    fn shell_completed_shows_exit_and_output() {
        let completed = narrate(
            &call(json!({ "shellToolCall": {
                "args": { "command": "ls -la" },
                "result": { "success": { "exitCode": 0, "stdout": "file.txt\n", "stderr": "" } }
            } })),
            ToolPhase::Completed,
        );
        assert_eq!(completed, "\n**Result:** Exit 0\n```\nfile.txt\n```\n");
    }

    #[test]
    fn shell_completed_combines_streams_and_defaults_exit_code() {
        let completed = narrate(
            &call(json!({ "shellToolCall": {
                "result": { "success": { "stdout": "out", "stderr": "err\n" } }
            } })),
            ToolPhase::Completed,
        );
        assert_eq!(completed, "\n**Result:** Exit 0\n```\nout\nerr\n```\n");
    }

    #[test]
    fn shell_output_keeps_trailing_blank_lines() {
        let completed = narrate(
            &call(json!({ "shellToolCall": {
                "args": { "command": "printf" },
                "result": { "success": { "exitCode": 0, "stdout": "a\n\n\n", "stderr": "" } }
            } })),
            ToolPhase::Completed,
        );
        assert_eq!(completed, "\n**Result:** Exit 0\n```\na\n\n\n```\n");
    }

    #[test]
    fn shell_completed_without_output_has_no_block() {
        let completed = narrate(
            &call(json!({ "shellToolCall": {
                "result": { "success": { "exitCode": 1, "stdout": "  \n" } }
            } })),
            ToolPhase::Completed,
        );
        assert_eq!(completed, "\n**Result:** Exit 1\n");
    }

    #[test]
    fn shell_output_is_truncated() {
        let long = "x".repeat(SHELL_OUTPUT_LIMIT + 50);
        let completed = narrate(
            &call(json!({ "shellToolCall": {
                "result": { "success": { "exitCode": 0, "stdout": long } }
            } })),
            ToolPhase::Completed,
        );
        assert!(completed.contains(&"x".repeat(SHELL_OUTPUT_LIMIT)));
        assert!(!completed.contains(&"x".repeat(SHELL_OUTPUT_LIMIT + 1)));
        assert!(completed.contains("\n... (truncated)\n```\n"));
    }

    #[test]
    fn shell_rejected() {
        let with_reason = narrate(
            &call(json!({ "shellToolCall": {
                "result": { "rejected": { "command": "rm -rf /", "reason": "denied" } }
            } })),
            ToolPhase::Completed,
        );
        assert_eq!(with_reason, "\n**Result:** Rejected (denied)\n");

        let bare = narrate(
            &call(json!({ "shellToolCall": { "result": { "rejected": {} } } })),
            ToolPhase::Completed,
        );
        assert_eq!(bare, "\n**Result:** Rejected\n");
    }

    #[test]
    fn read_started_with_and_without_range() {
        let plain = narrate(
            &call(json!({ "readToolCall": { "args": { "path": "src/main.rs" } } })),
            ToolPhase::Started,
        );
        assert_eq!(plain, "\n**Tool Use: read**\n`src/main.rs`\n");

        let ranged = narrate(
            &call(json!({ "readToolCall": { "args": { "path": "a.rs", "limit": 20 } } })),
            ToolPhase::Started,
        );
        assert_eq!(
            ranged,
            "\n**Tool Use: read**\n`a.rs (offset: 0, limit: 20)`\n"
        );

        let offset_only = narrate(
            &call(json!({ "readToolCall": { "args": { "path": "a.rs", "offset": 5 } } })),
            ToolPhase::Started,
        );
        assert!(offset_only.contains("(offset: 5, limit: all)"));
    }

    #[test]
    fn read_completed_counts() {
        let completed = narrate(
            &call(json!({ "readToolCall": {
                "args": { "path": "a.rs" },
                "result": { "success": { "totalLines": 12, "totalChars": 300 } }
            } })),
            ToolPhase::Completed,
        );
        assert_eq!(completed, "\n**Result:** Read 12 lines (300 chars)\n");

        let unknown = narrate(
            &call(json!({ "readToolCall": { "result": { "success": {} } } })),
            ToolPhase::Completed,
        );
        assert_eq!(unknown, "\n**Result:** Read ? lines (? chars)\n");
    }

    #[test]
    fn write_started_previews_content() {
        let text = "a".repeat(120);
        let started = narrate(
            &call(json!({ "writeToolCall": { "args": { "path": "out.txt", "fileText": text } } })),
            ToolPhase::Started,
        );
        assert_eq!(
            started,
            format!(
                "\n**Tool Use: write**\n`out.txt` (120 chars)\n```\n{}...\n```\n",
                "a".repeat(WRITE_PREVIEW_LIMIT)
            )
        );

        let short = narrate(
            &call(json!({ "writeToolCall": { "args": { "path": "o.txt", "fileText": "hi" } } })),
            ToolPhase::Started,
        );
        assert_eq!(short, "\n**Tool Use: write**\n`o.txt` (2 chars)\n```\nhi\n```\n");
    }

    #[test]
    fn write_preview_respects_char_boundaries() {
        let text = "é".repeat(150);
        let started = narrate(
            &call(json!({ "writeToolCall": { "args": { "path": "u.txt", "fileText": text } } })),
            ToolPhase::Started,
        );
        assert!(started.contains(&format!("{}...", "é".repeat(WRITE_PREVIEW_LIMIT))));
        assert!(started.contains("(150 chars)"));
    }

    #[test]
    fn write_completed() {
        let completed = narrate(
            &call(json!({ "writeToolCall": {
                "args": { "path": "out.txt" },
                "result": { "success": { "path": "/ws/out.txt", "linesCreated": 3, "fileSize": 42 } }
            } })),
            ToolPhase::Completed,
        );
        assert_eq!(
            completed,
            "\n**Result:** Wrote 3 lines (42 bytes) to `/ws/out.txt`\n"
        );
    }

    #[test]
    fn edit_narration() {
        let edit = call(json!({ "editToolCall": {
            "args": { "path": "lib.rs" },
            "result": { "success": { "diff": "..." } }
        } }));
        assert_eq!(narrate(&edit, ToolPhase::Started), "\n**Tool Use: edit**\n`lib.rs`\n");
        assert_eq!(narrate(&edit, ToolPhase::Completed), "\n**Result:** Edit applied\n");
    }

    #[test]
    fn grep_narration() {
        let started = narrate(
            &call(json!({ "grepToolCall": { "args": { "pattern": "TODO" } } })),
            ToolPhase::Started,
        );
        assert_eq!(started, "\n**Tool Use: grep**\n`TODO` in `.`\n");

        let found = narrate(
            &call(json!({ "grepToolCall": { "result": { "success": { "workspaceResults": {
                "/ws": { "content": { "totalMatchedLines": 4 } }
            } } } } })),
            ToolPhase::Completed,
        );
        assert_eq!(found, "\n**Result:** Found 4 matches\n");

        let no_map = narrate(
            &call(json!({ "grepToolCall": { "result": { "success": {} } } })),
            ToolPhase::Completed,
        );
        assert_eq!(no_map, "\n**Result:** Grep completed\n");
    }

    #[test]
    fn glob_narration() {
        let started = narrate(
            &call(json!({ "globToolCall": { "args": { "globPattern": "**/*.rs", "targetDirectory": "src" } } })),
            ToolPhase::Started,
        );
        assert_eq!(started, "\n**Tool Use: glob**\n`**/*.rs` in `src`\n");

        let completed = narrate(
            &call(json!({ "globToolCall": { "result": { "success": { "totalFiles": 9 } } } })),
            ToolPhase::Completed,
        );
        assert_eq!(completed, "\n**Result:** Found 9 files\n");
    }

    #[test]
    fn list_narration() {
        let started = narrate(
            &call(json!({ "lsToolCall": { "args": { "path": "src", "ignore": ["target", "node_modules"] } } })),
            ToolPhase::Started,
        );
        assert_eq!(
            started,
            "\n**Tool Use: list**\n`src (ignore: target, node_modules)`\n"
        );

        let completed = narrate(
            &call(json!({ "lsToolCall": { "result": { "success": { "directoryTreeRoot": {
                "childrenFiles": [{}, {}, {}],
                "childrenDirs": [{}]
            } } } } })),
            ToolPhase::Completed,
        );
        assert_eq!(completed, "\n**Result:** Listed 3 files, 1 directories\n");
    }

    #[test]
    fn delete_narration() {
        let deleted = call(json!({ "deleteToolCall": {
            "args": { "path": "old.txt" },
            "result": { "success": {} }
        } }));
        assert_eq!(narrate(&deleted, ToolPhase::Started), "\n**Tool Use: delete**\n`old.txt`\n");
        assert_eq!(narrate(&deleted, ToolPhase::Completed), "\n**Result:** Deleted\n");

        let rejected = call(json!({ "deleteToolCall": {
            "result": { "rejected": { "reason": "protected" } }
        } }));
        assert_eq!(
            narrate(&rejected, ToolPhase::Completed),
            "\n**Result:** Delete rejected: protected\n"
        );
    }

    #[test]
    fn function_narration() {
        let function = call(json!({ "function": { "name": "todo_write", "arguments": "{}" } }));
        assert_eq!(narrate(&function, ToolPhase::Started), "\n**Tool Use: todo_write**\n");
        assert_eq!(narrate(&function, ToolPhase::Completed), GENERIC_COMPLETED);
    }

    #[test]
    fn unknown_and_argless_calls_fall_back() {
        let unknown = call(json!({ "mcpToolCall": {} }));
        assert_eq!(narrate(&unknown, ToolPhase::Started), GENERIC_STARTED);
        assert_eq!(narrate(&unknown, ToolPhase::Completed), GENERIC_COMPLETED);

        let argless = call(json!({ "shellToolCall": { "args": {} } }));
        assert_eq!(narrate(&argless, ToolPhase::Started), GENERIC_STARTED);
        assert_eq!(narrate(&argless, ToolPhase::Completed), GENERIC_COMPLETED);
    }

    #[test]
    fn truncate_chars_boundaries() {
        assert_eq!(truncate_chars("abc", 3), ("abc", false));
        assert_eq!(truncate_chars("abcd", 3), ("abc", true));
        assert_eq!(truncate_chars("ééé", 2), ("éé", true));
    }
}
