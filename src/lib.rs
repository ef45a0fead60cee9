pub mod client;
pub mod commands;
pub mod db;
pub mod error;
pub mod models;
pub mod session;
pub mod state;

#[cfg(test)]
mod test_helpers;

use std::path::Path;
use std::sync::Arc;

use db::{QueryStore, SqliteStore};
use error::StorageError;
use state::AppState;

/// Open the local database under `app_data_dir`, load settings and bootstrap
/// a session. `endpoint` overrides the stored endpoint when given.
pub async fn init(app_data_dir: &Path, endpoint: Option<String>) -> Result<AppState, StorageError> {
    let store = SqliteStore::open(app_data_dir)?;

    let mut settings = store.load_settings().await?;
    if let Some(endpoint) = endpoint {
        settings.endpoint = Some(endpoint);
    }

    let app_state = AppState::new(settings, Arc::new(store));
    app_state.bootstrap().await;

    Ok(app_state)
}
