//! Toggle command handler.
//!
//! The flag lives in `settings.json`; only `chat` and `agent` honour it.

use anyhow::{Context, Result};
use cgate_core::SettingsStore;

use crate::bootstrap::CliContext;
use crate::commands::ToggleAction;

/// Apply `action` to the persisted flag and return the resulting state.
///
/// `Status` reads without writing.
pub async fn apply(store: &dyn SettingsStore, action: ToggleAction) -> Result<bool> {
    let mut settings = store.load().await.context("Failed to load settings")?;
    let current = settings.effective_enabled();
    let next = match action {
        ToggleAction::On => true,
        ToggleAction::Off => false,
        ToggleAction::Toggle => !current,
        ToggleAction::Status => return Ok(current),
    };
    settings.enabled = Some(next);
    store
        .save(&settings)
        .await
        .context("Failed to save settings")?;
    Ok(next)
}

/// Execute the toggle command.
pub async fn execute(ctx: &CliContext, action: ToggleAction) -> Result<()> {
    let enabled = apply(ctx.store.as_ref(), action).await?;
    let state = if enabled { "✅ ENABLED" } else { "❌ DISABLED" };
    match action {
        ToggleAction::Status => println!("🔍 Cursor agent status: {state}"),
        _ => {
            tracing::info!(enabled, "Toggle updated");
            println!("Cursor agent {state}");
            if !enabled {
                println!("`cgate chat` and `cgate agent` will refuse to run until re-enabled.");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgate_core::{MemorySettingsStore, Settings};

    #[tokio::test]
    async fn actions_update_the_store() {
        let store = MemorySettingsStore::new(Settings::with_defaults());

        assert!(!apply(&store, ToggleAction::Toggle).await.unwrap());
        assert!(!store.load().await.unwrap().effective_enabled());

        assert!(!apply(&store, ToggleAction::Status).await.unwrap());

        assert!(apply(&store, ToggleAction::On).await.unwrap());
        assert!(apply(&store, ToggleAction::Toggle).await.is_ok_and(|on| !on));
        assert!(!apply(&store, ToggleAction::Off).await.unwrap());
    }

    #[tokio::test]
    async fn persists_across_file_store_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".cgate/settings.json");

        let first = cgate_runtime::JsonFileSettingsStore::new(&path);
        apply(&first, ToggleAction::Off).await.unwrap();

        let second = cgate_runtime::JsonFileSettingsStore::new(&path);
        assert!(!apply(&second, ToggleAction::Status).await.unwrap());
    }
}
