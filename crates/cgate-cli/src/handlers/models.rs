//! Models command handler.

use anyhow::Result;
use cgate_core::{ModelRegistry, PROVIDER_PREFIX};

use crate::bootstrap::CliContext;

/// Execute the models command.
pub async fn execute(ctx: &CliContext, fetch: bool) -> Result<()> {
    let registry = ctx.registry(fetch || ctx.settings.effective_fetch_models()).await;
    println!("{}", render(&registry));
    Ok(())
}

/// Terminal listing of the registry.
pub fn render(registry: &ModelRegistry) -> String {
    let list = registry
        .ids()
        .iter()
        .map(|id| format!("  - {id}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "🎯 Available Cursor Models ({} models):\n\n{list}\n\n💡 Use \"auto\" to let Cursor pick the best model. Gateway clients may also write \"{PROVIDER_PREFIX}<model>\".",
        registry.len()
    )
}
