//! Chat command handler.
//!
//! Runs the agent once in the terminal variant: banner, narration and the
//! timing footer are part of the printed answer.

use std::sync::Arc;

use anyhow::Result;
use cgate_core::{
    AgentInvocation, GatewayError, Mode, Pipeline, ResponseMultiplexer, Variant,
    strip_provider_prefix, user_message,
};
use tracing::{Instrument, info, info_span};

use crate::bootstrap::CliContext;

/// One terminal run of the agent.
#[derive(Debug, Clone)]
pub struct RunRequest<'a> {
    pub prompt: &'a str,
    pub model: Option<&'a str>,
    /// Let the agent modify files.
    pub force: bool,
}

/// Run the agent and collect its answer.
///
/// Refuses with [`GatewayError::Disabled`] when the toggle is off.
pub async fn run_agent(ctx: &CliContext, request: RunRequest<'_>) -> Result<String, GatewayError> {
    if !ctx.settings.effective_enabled() {
        return Err(GatewayError::Disabled);
    }

    let model = strip_provider_prefix(
        request
            .model
            .unwrap_or_else(|| ctx.settings.effective_default_model()),
    )
    .to_string();
    let invocation = AgentInvocation::new(&model, request.prompt)
        .with_stream_partial(true)
        .with_force(request.force)
        .with_approve_mcps(ctx.settings.effective_approve_mcps())
        .with_workspace(ctx.workspace.clone());

    let span = info_span!("run", %model, force = request.force);
    async {
        info!("Running cursor-agent");
        ctx.audit
            .record(&format!("Executing: cursor-agent with model={model}"));
        let run = ctx.runner.run(invocation).await?;

        let pipeline = Pipeline::new(Variant::Cli, Arc::clone(&ctx.audit))
            .with_raw_output(ctx.settings.effective_log_raw_output());
        let text = pipeline
            .collect(
                run,
                ResponseMultiplexer::new(Mode::Batch)
                    .with_timing_footer()
                    .with_result_separator("\n\n"),
            )
            .await?;
        ctx.audit
            .record(&format!("Response length: {} chars", text.chars().count()));
        Ok::<_, GatewayError>(text)
    }
    .instrument(span)
    .await
}

/// Record a failure in `errors.log` and turn it into a terminal message.
pub(crate) fn report_failure(ctx: &CliContext, command: &str, err: &GatewayError) -> String {
    if matches!(err, GatewayError::Disabled) {
        return err.to_string();
    }
    ctx.errors.record(&format!("[{command}] {err}"));
    user_message(&err.to_string())
}

/// Execute the chat command.
pub async fn execute(ctx: &CliContext, prompt: &str, model: Option<&str>) -> Result<()> {
    let request = RunRequest {
        prompt,
        model,
        force: false,
    };
    match run_agent(ctx, request).await {
        Ok(text) => {
            println!("{text}");
            Ok(())
        }
        Err(e) => anyhow::bail!(report_failure(ctx, "chat", &e)),
    }
}
