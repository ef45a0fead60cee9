use crate::models::AppSettings;
use crate::state::AppState;

pub async fn load_settings(state: &AppState) -> Result<AppSettings, String> {
    let settings = state
        .store
        .load_settings()
        .await
        .map_err(|e| format!("Failed to load settings: {}", e))?;
    state.set_settings(settings.clone());
    Ok(settings)
}

/// Store new settings. A changed endpoint triggers a fresh bootstrap.
pub async fn save_settings(state: &AppState, settings: AppSettings) -> Result<(), String> {
    let endpoint_changed = state.settings().active_endpoint() != settings.active_endpoint();

    state
        .store
        .save_settings(&settings)
        .await
        .map_err(|e| format!("Failed to save settings: {}", e))?;
    state.set_settings(settings);

    if endpoint_changed {
        state.bootstrap().await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn saved_settings_are_reloaded() {
        let state = AppState::new(AppSettings::default(), Arc::new(SqliteStore::in_memory().unwrap()));

        let mut settings = load_settings(&state).await.unwrap();
        settings.editor.theme = "dracula".to_string();
        settings.editor.paper = true;
        save_settings(&state, settings).await.unwrap();

        state.set_settings(AppSettings::default());
        let reloaded = load_settings(&state).await.unwrap();
        assert_eq!(reloaded.editor.theme, "dracula");
        assert!(state.settings().editor.paper);
    }
}
