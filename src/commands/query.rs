use serde::{Deserialize, Serialize};

use crate::models::{RendererProps, SelectedQuery, SessionEvent};
use crate::state::AppState;

/// Parameters sent by the editor when it runs a query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlParams {
    pub query: String,
    #[serde(default)]
    pub variables: String,
}

/// Execute a query and return the GraphQL `data`, the blank-query message, or null
pub async fn execute_query(state: &AppState, params: GraphqlParams) -> Result<serde_json::Value, String> {
    let outcome = state.execute(&params.query, &params.variables).await;
    Ok(outcome.into_response())
}

/// Execute whatever is currently in the editor
pub async fn execute_selected_query(state: &AppState) -> Result<serde_json::Value, String> {
    let params = {
        let session = state.session();
        GraphqlParams {
            query: session.selected().query.clone(),
            variables: session.selected().variables.clone(),
        }
    };
    execute_query(state, params).await
}

/// Prettify the editor's query text in place
pub fn prettify_query(state: &AppState) -> Result<String, String> {
    state
        .session()
        .prettify()
        .map_err(|e| e.to_string())
}

pub fn edit_query(state: &AppState, query: String) {
    state.session().edit_query(query);
}

pub fn edit_variables(state: &AppState, variables: String) {
    state.session().edit_variables(variables);
}

/// Clear the editor back to a new, unsaved query
pub fn reset_query(state: &AppState) -> SelectedQuery {
    let mut session = state.session();
    session.reset();
    session.selected().clone()
}

pub fn get_selected_query(state: &AppState) -> SelectedQuery {
    state.session().selected().clone()
}

/// Props for the editor renderer
pub fn get_renderer_props(state: &AppState) -> RendererProps {
    let settings = state.settings();
    state.session().renderer_props(&settings)
}

/// Form-layer signals queued since the last call
pub fn drain_session_events(state: &AppState) -> Vec<SessionEvent> {
    state.session().drain_events()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteStore;
    use crate::models::AppSettings;
    use std::sync::Arc;

    fn idle_state() -> AppState {
        AppState::new(AppSettings::default(), Arc::new(SqliteStore::in_memory().unwrap()))
    }

    #[test]
    fn prettify_surfaces_parse_errors() {
        let state = idle_state();
        edit_query(&state, "{ user(".to_string());

        let err = prettify_query(&state).unwrap_err();
        assert!(err.starts_with("Failed to parse query"));
        assert_eq!(get_selected_query(&state).query, "{ user(");

        edit_query(&state, "{user{id}}".to_string());
        assert_eq!(prettify_query(&state).unwrap(), "{\n  user {\n    id\n  }\n}");
    }

    #[test]
    fn reset_signals_form_layer() {
        let state = idle_state();
        edit_query(&state, "{ a }".to_string());
        edit_variables(&state, "{}".to_string());

        let selected = reset_query(&state);
        assert_eq!(selected, SelectedQuery::default());
        assert_eq!(drain_session_events(&state), vec![SessionEvent::ResetSaveForm]);
        assert!(drain_session_events(&state).is_empty());
    }

    #[tokio::test]
    async fn blank_editor_resolves_to_message() {
        let state = idle_state();
        let value = execute_selected_query(&state).await.unwrap();
        assert_eq!(value, serde_json::json!(crate::models::EMPTY_QUERY_MESSAGE));
    }
}
