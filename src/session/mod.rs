//! In-memory query session.
//!
//! [`QuerySession`] owns the selected query and the stores the sidebar reads
//! from. It performs no I/O: network calls happen in [`crate::state::AppState`],
//! which feeds their outcomes back through `begin_execute`,
//! `complete_execute` and `fail_execute`.

pub mod collections;
pub mod history;
pub mod prettify;
pub mod save_form;
pub mod schema_cache;

use std::sync::Arc;

use crate::client::ExecutionResponse;
use crate::error::{PrettifyError, SaveFormErrors};
use crate::models::{
    AppSettings, ClientSchema, CreateSavedQuery, ExecutionFailure, ExecutionOutcome, HistoryKey,
    QueriesPayload, QueryHistoryEntry, QueryHistoryRecord, QueryResults, RendererProps, SaveForm,
    SavedQuery, SelectedQuery, SessionEvent, SessionState, SidebarContent, SidebarProps,
    STATUS_HISTORY_PENDING, STATUS_WAITING,
};

pub use collections::CollectionStore;
pub use history::HistoryLog;
pub use prettify::{prettify, prettify_lenient};
pub use save_form::validate_save_form;
pub use schema_cache::SchemaCache;

/// Handle for one in-flight execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionTicket {
    pub generation: u64,
    pub query: String,
    pub variables: String,
}

/// Result of feeding a response back into the session
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedExecution {
    pub outcome: ExecutionOutcome,
    /// The history entry to persist, absent for superseded executions
    pub record: Option<QueryHistoryRecord>,
}

#[derive(Debug, Default)]
pub struct QuerySession {
    selected: SelectedQuery,
    state: SessionState,
    history: HistoryLog,
    collections: CollectionStore,
    schema: SchemaCache,
    generation: u64,
    last_failure: Option<ExecutionFailure>,
    events: Vec<SessionEvent>,
}

impl QuerySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> &SelectedQuery {
        &self.selected
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn collections(&self) -> &CollectionStore {
        &self.collections
    }

    pub fn last_failure(&self) -> Option<&ExecutionFailure> {
        self.last_failure.as_ref()
    }

    pub fn schema(&mut self) -> Option<Arc<ClientSchema>> {
        self.schema.schema()
    }

    pub fn edit_query(&mut self, query: impl Into<String>) {
        self.selected.query = query.into();
    }

    pub fn edit_variables(&mut self, variables: impl Into<String>) {
        self.selected.variables = variables.into();
    }

    pub fn change_collection(&mut self, collection: impl Into<String>) {
        self.selected.collection = collection.into();
    }

    /// Take the signals queued for the form layer
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Store an introspection `data` object if it carries a schema.
    ///
    /// Returns whether the cache was updated.
    pub fn apply_introspection(&mut self, data: serde_json::Value) -> bool {
        if data.get("__schema").is_none() {
            log::warn!("Introspection response has no __schema; keeping the current schema");
            return false;
        }
        self.schema.set(data);
        self.selected.results.status = STATUS_WAITING.to_string();
        true
    }

    /// Seed collections and history from persisted data
    pub fn seed(&mut self, payload: QueriesPayload) {
        if let Some(saved) = payload.saved_queries {
            log::info!("Loaded {} saved queries", saved.len());
            self.collections.extend(saved);
        }
        if let Some(history) = payload.history {
            log::info!("Loaded {} history entries", history.len());
            self.history.extend(history);
        }
    }

    /// Start an execution, superseding any still in flight.
    ///
    /// Returns `None` for blank query text, which must not reach the network.
    pub fn begin_execute(&mut self, query: &str, variables: &str) -> Option<ExecutionTicket> {
        if query.trim().is_empty() {
            return None;
        }

        self.generation += 1;
        let previous = match std::mem::take(&mut self.state) {
            SessionState::Executing { previous, .. } => previous,
            other => Box::new(other),
        };
        self.state = SessionState::Executing {
            generation: self.generation,
            previous,
        };

        Some(ExecutionTicket {
            generation: self.generation,
            query: query.to_string(),
            variables: variables.to_string(),
        })
    }

    fn is_current(&self, ticket: &ExecutionTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Whether the editor still shows the query being executed
    fn is_showing_execution(&self) -> bool {
        matches!(self.state, SessionState::Executing { .. })
    }

    /// Commit a successful response: record history and show the result.
    ///
    /// History is recorded for the current generation even when the user has
    /// navigated away meanwhile; only the selected query is left untouched then.
    pub fn complete_execute(
        &mut self,
        ticket: ExecutionTicket,
        response: ExecutionResponse,
        now_ms: i64,
    ) -> CompletedExecution {
        let data = response.data();

        if !self.is_current(&ticket) {
            log::debug!(
                "Discarding response for superseded execution {}",
                ticket.generation
            );
            return CompletedExecution {
                outcome: ExecutionOutcome::Superseded { data },
                record: None,
            };
        }

        let results = QueryResults {
            status: response.status_label(),
            time: Some(response.elapsed_ms),
            request: Some(response.request),
            headers: response.headers,
            response: response.body,
        };

        let entry = QueryHistoryEntry {
            query: ticket.query.clone(),
            variables: ticket.variables.clone(),
            response: data.clone().unwrap_or(serde_json::Value::Null),
        };
        let key = self.history.append(now_ms, entry.clone());
        self.last_failure = None;

        if self.is_showing_execution() {
            self.selected.query = ticket.query;
            self.selected.variables = ticket.variables;
            self.selected.results = results;
            self.state = SessionState::Executed {
                generation: ticket.generation,
            };
        } else {
            log::debug!(
                "Execution {} finished after the editor moved on; recorded in history only",
                ticket.generation
            );
        }

        CompletedExecution {
            outcome: ExecutionOutcome::Completed { data },
            record: Some(QueryHistoryRecord { key, entry }),
        }
    }

    /// Record a failed execution. The selected query's results stay as they were.
    pub fn fail_execute(&mut self, ticket: ExecutionTicket, failure: Option<ExecutionFailure>) {
        if !self.is_current(&ticket) {
            log::debug!("Ignoring failure of superseded execution {}", ticket.generation);
            return;
        }

        if let Some(failure) = failure {
            self.last_failure = Some(failure);
        }
        if self.is_showing_execution() {
            if let SessionState::Executing { previous, .. } = std::mem::take(&mut self.state) {
                self.state = *previous;
            }
        }
    }

    /// Prettify the current query text in place. Blank text is left alone.
    pub fn prettify(&mut self) -> Result<String, PrettifyError> {
        let text = self.selected.query.trim();
        if text.is_empty() {
            return Ok(self.selected.query.clone());
        }
        let pretty = prettify(text)?;
        self.selected.query = pretty.clone();
        Ok(pretty)
    }

    /// The save form pre-filled from the selected query
    pub fn save_form(&self) -> SaveForm {
        SaveForm {
            collection: self.selected.collection.clone(),
            name: self.selected.name.clone().unwrap_or_default(),
            description: self.selected.description.clone(),
        }
    }

    /// Check save metadata against the chosen collection without saving
    pub fn validate_save(&self, metadata: &CreateSavedQuery) -> Result<(), SaveFormErrors> {
        validate_save_form(&SaveForm {
            collection: self.selected.collection.clone(),
            name: metadata.name.clone(),
            description: metadata.description.clone(),
        })
    }

    /// Save the selected query into its chosen collection.
    ///
    /// The first save assigns the id; later saves reuse it and overwrite the
    /// stored entry. Returns the entry to persist remotely.
    pub fn save(&mut self, metadata: CreateSavedQuery) -> Result<SavedQuery, SaveFormErrors> {
        self.validate_save(&metadata)?;

        let id = self
            .selected
            .id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let results = serde_json::to_string(&self.selected.results).unwrap_or_else(|_| "{}".to_string());

        let saved = SavedQuery {
            id,
            collection: self.selected.collection.trim().to_string(),
            name: metadata.name.trim().to_string(),
            description: metadata.description.filter(|d| !d.trim().is_empty()),
            query: self.selected.query.clone(),
            variables: self.selected.variables.clone(),
            results,
        };

        let results = std::mem::take(&mut self.selected.results);
        self.selected = saved.to_selected(results);
        self.collections.upsert(saved.clone());
        let loaded = SessionState::FromCollection {
            collection: saved.collection.clone(),
            id: saved.id.clone(),
        };
        // An execution in flight still owns the editor; it falls back to the saved entry
        match &mut self.state {
            SessionState::Executing { previous, .. } => **previous = loaded,
            state => *state = loaded,
        }
        self.events.push(SessionEvent::CloseSaveModal);
        self.events.push(SessionEvent::ResetSaveForm);

        log::info!("Saved query {} into collection {}", saved.id, saved.collection);
        Ok(saved)
    }

    /// Load a history entry as an unsaved query. Returns `false` for unknown keys.
    pub fn navigate_history(&mut self, key: HistoryKey) -> bool {
        let Some(entry) = self.history.get(key).cloned() else {
            log::warn!("No history entry {}", key);
            return false;
        };

        self.selected = SelectedQuery {
            id: None,
            collection: std::mem::take(&mut self.selected.collection),
            name: None,
            description: None,
            query: entry.query,
            variables: entry.variables,
            results: QueryResults {
                status: STATUS_HISTORY_PENDING.to_string(),
                response: entry.response,
                ..QueryResults::default()
            },
        };
        self.state = SessionState::FromHistory { key };
        true
    }

    /// Load a saved query. Re-selecting the current query clears its results instead.
    pub fn navigate_collection(&mut self, collection: &str, id: &str) -> bool {
        let Some(saved) = self.collections.get(collection, id).cloned() else {
            log::warn!("No saved query {} in collection {}", id, collection);
            return false;
        };

        let results = if self.selected.id.as_deref() == Some(saved.id.as_str()) {
            QueryResults::default()
        } else {
            saved.decoded_results().waiting()
        };

        self.selected = saved.to_selected(results);
        self.state = SessionState::FromCollection {
            collection: saved.collection,
            id: saved.id,
        };
        true
    }

    /// Clear the editor back to an empty, unsaved query
    pub fn reset(&mut self) {
        self.selected = SelectedQuery::default();
        self.state = SessionState::Draft;
        self.events.push(SessionEvent::ResetSaveForm);
    }

    pub fn renderer_props(&mut self, settings: &AppSettings) -> RendererProps {
        RendererProps {
            query: prettify_lenient(&self.selected.query),
            variables: self.selected.variables.clone(),
            response: response_text(&self.selected.results.response),
            schema: self.schema.schema(),
            editor_theme: settings.editor.theme.clone(),
            paper: settings.editor.paper,
            result: self.selected.results.clone(),
            query_collection: self.selected.collection.clone(),
            failure: self.last_failure.clone(),
        }
    }

    pub fn sidebar_props(&self, kind: SidebarContent) -> SidebarProps {
        SidebarProps {
            collections: self.collections.to_lists(),
            history: self.history.list_items(),
            kind,
        }
    }
}

/// Pretty JSON for the result pane; nothing for null, `{}` or `""`
fn response_text(response: &serde_json::Value) -> Option<String> {
    match response {
        serde_json::Value::Null => None,
        serde_json::Value::Object(map) if map.is_empty() => None,
        serde_json::Value::String(s) if s.is_empty() => None,
        other => serde_json::to_string_pretty(other).ok(),
    }
}
