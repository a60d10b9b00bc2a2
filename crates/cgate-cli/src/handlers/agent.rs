//! Agent command handler.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::handlers::chat::{RunRequest, report_failure, run_agent};

/// Appended when the agent ran without permission to modify files.
pub const NOT_APPLIED_NOTE: &str =
    "\n\n⚠️  Note: File modifications were proposed but not applied. Use --force to apply changes.";

/// Run the agent and append [`NOT_APPLIED_NOTE`] unless `force` is set.
pub async fn run(
    ctx: &CliContext,
    prompt: &str,
    model: Option<&str>,
    force: bool,
) -> Result<String, cgate_core::GatewayError> {
    let mut text = run_agent(
        ctx,
        RunRequest {
            prompt,
            model,
            force,
        },
    )
    .await?;
    if !force {
        text.push_str(NOT_APPLIED_NOTE);
    }
    Ok(text)
}

/// Execute the agent command.
pub async fn execute(ctx: &CliContext, prompt: &str, model: Option<&str>, force: bool) -> Result<()> {
    match run(ctx, prompt, model, force).await {
        Ok(text) => {
            println!("{text}");
            Ok(())
        }
        Err(e) => anyhow::bail!(report_failure(ctx, "agent", &e)),
    }
}
