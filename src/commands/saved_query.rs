use crate::error::SaveFormErrors;
use crate::models::{CreateSavedQuery, SaveForm, SelectedQuery, SidebarClick};
use crate::session::validate_save_form as check_save_form;
use crate::state::AppState;

/// Choose the collection the next save goes into
pub fn change_collection(state: &AppState, collection: String) {
    state.session().change_collection(collection);
}

/// The save form, pre-filled from the selected query
pub fn open_save_form(state: &AppState) -> SaveForm {
    state.session().save_form()
}

/// Validate a save form without saving; `None` when it is valid
pub fn validate_save_form(form: SaveForm) -> Option<SaveFormErrors> {
    check_save_form(&form).err()
}

/// Save the selected query into the chosen collection
pub async fn save_query(
    state: &AppState,
    query: CreateSavedQuery,
) -> Result<SelectedQuery, SaveFormErrors> {
    state.save(query).await
}

/// Sidebar click on a saved query. Clicks on buttons are ignored.
pub fn select_collection_item(
    state: &AppState,
    click: SidebarClick,
) -> Result<Option<SelectedQuery>, String> {
    if click.is_button() {
        return Ok(None);
    }

    let id = click
        .item_id()
        .ok_or_else(|| "Clicked item has no query id".to_string())?;
    let collection = click
        .collection_key()
        .ok_or_else(|| "Clicked item has no collection".to_string())?;

    let mut session = state.session();
    if session.navigate_collection(collection, id) {
        Ok(Some(session.selected().clone()))
    } else {
        Err(format!("Saved query not found: {}/{}", collection, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{QueryStore, SqliteStore};
    use crate::models::{AppSettings, QueryResults, STATUS_WAITING};
    use std::sync::Arc;

    fn click(id: &str, collection: &str, tag: &str) -> SidebarClick {
        SidebarClick {
            kitid: Some(id.to_string()),
            collection: None,
            parent_collection: Some(collection.to_string()),
            target_tag: tag.to_string(),
        }
    }

    #[tokio::test]
    async fn save_then_reselect_clears_results() {
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        let state = AppState::new(AppSettings::default(), store.clone());
        change_collection(&state, "users".to_string());
        state.session().edit_query("{ viewer { id } }");

        let form = open_save_form(&state);
        assert_eq!(form.collection, "users");
        assert_eq!(form.name, "");

        let saved = save_query(
            &state,
            CreateSavedQuery {
                name: "viewer".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
        let id = saved.id.unwrap();
        assert_eq!(store.load_queries(1).await.unwrap().saved_queries.unwrap().len(), 1);

        let selected = select_collection_item(&state, click(&id, "users", "LI")).unwrap().unwrap();
        assert_eq!(selected.results, QueryResults::default());

        state.session().reset();
        let selected = select_collection_item(&state, click(&id, "users", "span")).unwrap().unwrap();
        assert_eq!(selected.results.status, STATUS_WAITING);
        assert_eq!(selected.query, "{ viewer { id } }");
    }

    #[test]
    fn button_clicks_are_ignored() {
        let state = AppState::new(AppSettings::default(), Arc::new(SqliteStore::in_memory().unwrap()));
        assert_eq!(select_collection_item(&state, click("x", "users", "button")), Ok(None));
        assert!(select_collection_item(&state, click("x", "users", "LI")).is_err());
    }

    #[test]
    fn standalone_validation_reports_fields() {
        let errors = validate_save_form(SaveForm::default()).unwrap();
        assert_eq!(errors.len(), 2);

        let valid = SaveForm {
            collection: "users".to_string(),
            name: "viewer".to_string(),
            description: None,
        };
        assert!(validate_save_form(valid).is_none());
    }
}
