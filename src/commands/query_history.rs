use crate::models::{HistoryKey, SelectedQuery, SidebarClick, SidebarContent, SidebarProps};
use crate::state::AppState;

/// Sidebar click on a history entry: load it as a new, unsaved query
pub fn select_history_item(
    state: &AppState,
    click: SidebarClick,
) -> Result<Option<SelectedQuery>, String> {
    if click.is_button() {
        return Ok(None);
    }

    let key: HistoryKey = click
        .item_id()
        .ok_or_else(|| "Clicked item has no history key".to_string())?
        .parse()
        .map_err(|e| format!("Invalid history key: {}", e))?;

    let mut session = state.session();
    if session.navigate_history(key) {
        Ok(Some(session.selected().clone()))
    } else {
        Err(format!("History entry not found: {}", key))
    }
}

/// Collections and history for the sidebar
pub fn get_sidebar_props(state: &AppState) -> SidebarProps {
    let kind = state.settings().sidebar;
    state.session().sidebar_props(kind)
}

pub async fn show_collections(state: &AppState) -> SidebarProps {
    show_sidebar(state, SidebarContent::Collection).await
}

pub async fn show_history(state: &AppState) -> SidebarProps {
    show_sidebar(state, SidebarContent::History).await
}

async fn show_sidebar(state: &AppState, kind: SidebarContent) -> SidebarProps {
    let mut settings = state.settings();
    if settings.sidebar != kind {
        settings.sidebar = kind;
        state.set_settings(settings);
        state.persist_settings().await;
    }
    get_sidebar_props(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{QueryStore, SqliteStore};
    use crate::models::{AppSettings, QueriesPayload, QueryHistoryEntry, QueryHistoryRecord, STATUS_HISTORY_PENDING};
    use serde_json::json;
    use std::sync::Arc;

    fn history_click(key: &str) -> SidebarClick {
        SidebarClick {
            kitid: Some(key.to_string()),
            target_tag: "A".to_string(),
            ..SidebarClick::default()
        }
    }

    fn seeded_state(store: Arc<SqliteStore>) -> AppState {
        let state = AppState::new(AppSettings::default(), store);
        state.session().seed(QueriesPayload {
            saved_queries: None,
            history: Some(vec![QueryHistoryRecord {
                key: HistoryKey(1_700_000_000_000),
                entry: QueryHistoryEntry {
                    query: "{ viewer { id } }".to_string(),
                    variables: r#"{"a":1}"#.to_string(),
                    response: json!({ "viewer": { "id": "42" } }),
                },
            }]),
        });
        state
    }

    #[test]
    fn history_click_loads_entry() {
        let state = seeded_state(Arc::new(SqliteStore::in_memory().unwrap()));

        let selected = select_history_item(&state, history_click("1700000000000"))
            .unwrap()
            .unwrap();
        assert_eq!(selected.query, "{ viewer { id } }");
        assert_eq!(selected.variables, r#"{"a":1}"#);
        assert_eq!(selected.results.status, STATUS_HISTORY_PENDING);

        assert!(select_history_item(&state, history_click("nope")).is_err());
        assert!(select_history_item(&state, history_click("42")).is_err());
    }

    #[tokio::test]
    async fn switching_sidebar_persists_choice() {
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        let state = seeded_state(store.clone());

        let props = get_sidebar_props(&state);
        assert_eq!(props.kind, SidebarContent::History);
        assert_eq!(props.history.len(), 1);

        let props = show_collections(&state).await;
        assert_eq!(props.kind, SidebarContent::Collection);
        assert_eq!(store.load_settings().await.unwrap().sidebar, SidebarContent::Collection);

        let props = show_history(&state).await;
        assert_eq!(props.kind, SidebarContent::History);
    }
}
