use std::sync::Arc;

use crate::models::ClientSchema;
use crate::state::AppState;

/// The schema of the current endpoint, if introspection succeeded
pub fn get_schema(state: &AppState) -> Option<Arc<ClientSchema>> {
    state.session().schema()
}

/// Fetch the schema again
pub async fn refresh_schema(state: &AppState) -> Result<bool, String> {
    if state.endpoint().is_none() {
        return Err("No endpoint configured".to_string());
    }
    Ok(state.refresh_schema().await)
}

/// Field names on `type_name` that start with `prefix`
pub fn complete_field(state: &AppState, type_name: &str, prefix: &str) -> Vec<String> {
    get_schema(state)
        .map(|schema| {
            schema
                .complete_field(type_name, prefix)
                .into_iter()
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
