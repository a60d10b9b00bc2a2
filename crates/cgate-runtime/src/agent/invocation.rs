//! `cursor-agent` command construction.

use std::path::PathBuf;
use std::process::Command;

use cgate_core::AgentInvocation;

/// Output format the pipeline understands.
pub const OUTPUT_FORMAT: &str = "stream-json";

/// Builder for a headless `cursor-agent` invocation.
///
/// Flags are emitted in a fixed order with the prompt last:
///
/// ```text
/// <binary> -p [--force] --model <model> --output-format stream-json
///          [--stream-partial-output] [--approve-mcps] [--workspace <dir>] <prompt>
/// ```
///
/// # Example
///
/// ```rust,ignore
/// let cmd = AgentCommandBuilder::new("cursor-agent", "gpt-5", "hello")
///     .force(true)
///     .workspace("/srv/project")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct AgentCommandBuilder {
    binary: PathBuf,
    model: String,
    prompt: String,
    force: bool,
    stream_partial: bool,
    approve_mcps: bool,
    workspace: Option<PathBuf>,
}

impl AgentCommandBuilder {
    pub fn new(
        binary: impl Into<PathBuf>,
        model: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            binary: binary.into(),
            model: model.into(),
            prompt: prompt.into(),
            force: false,
            stream_partial: false,
            approve_mcps: false,
            workspace: None,
        }
    }

    /// Builder preloaded from a port-level invocation.
    pub fn from_invocation(binary: impl Into<PathBuf>, invocation: &AgentInvocation) -> Self {
        let mut builder = Self::new(binary, &invocation.model, &invocation.prompt)
            .force(invocation.force)
            .stream_partial(invocation.stream_partial)
            .approve_mcps(invocation.approve_mcps);
        if let Some(dir) = &invocation.workspace {
            builder = builder.workspace(dir);
        }
        builder
    }

    #[must_use]
    pub const fn force(mut self, enabled: bool) -> Self {
        self.force = enabled;
        self
    }

    #[must_use]
    pub const fn stream_partial(mut self, enabled: bool) -> Self {
        self.stream_partial = enabled;
        self
    }

    #[must_use]
    pub const fn approve_mcps(mut self, enabled: bool) -> Self {
        self.approve_mcps = enabled;
        self
    }

    #[must_use]
    pub fn workspace(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workspace = Some(dir.into());
        self
    }

    /// Build the command. Stdio is left to the caller.
    pub fn build(self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-p");
        if self.force {
            cmd.arg("--force");
        }
        cmd.arg("--model").arg(&self.model);
        cmd.arg("--output-format").arg(OUTPUT_FORMAT);
        if self.stream_partial {
            cmd.arg("--stream-partial-output");
        }
        if self.approve_mcps {
            cmd.arg("--approve-mcps");
        }
        if let Some(dir) = &self.workspace {
            cmd.arg("--workspace").arg(dir);
        }
        cmd.arg(&self.prompt);
        cmd
    }
}
