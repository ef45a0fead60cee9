use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::client::GraphqlClient;
use crate::db::QueryStore;
use crate::error::{ClientError, SaveFormErrors};
use crate::models::{AppSettings, CreateSavedQuery, ExecutionOutcome, SelectedQuery};
use crate::session::QuerySession;

/// Application state shared by every command.
///
/// The session lock is only ever held for synchronous updates, never across
/// a network or storage call, so a slow execution does not block edits.
pub struct AppState {
    /// The selected query, history, collections and schema
    session: Mutex<QuerySession>,

    /// Current settings (cached from the store)
    settings: Mutex<AppSettings>,

    /// Persistence for saved queries, history and settings
    pub store: Arc<dyn QueryStore>,

    /// Transport to the GraphQL endpoint
    pub client: GraphqlClient,
}

impl AppState {
    pub fn new(settings: AppSettings, store: Arc<dyn QueryStore>) -> Self {
        Self::with_client(settings, store, GraphqlClient::new())
    }

    pub fn with_client(settings: AppSettings, store: Arc<dyn QueryStore>, client: GraphqlClient) -> Self {
        Self {
            session: Mutex::new(QuerySession::new()),
            settings: Mutex::new(settings),
            store,
            client,
        }
    }

    /// Lock the session for a synchronous update
    pub fn session(&self) -> MutexGuard<'_, QuerySession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn settings(&self) -> AppSettings {
        self.settings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_settings(&self, settings: AppSettings) {
        *self.settings.lock().unwrap_or_else(PoisonError::into_inner) = settings;
    }

    /// The configured endpoint, if not blank
    pub fn endpoint(&self) -> Option<String> {
        self.settings().active_endpoint().map(str::to_string)
    }

    /// Fetch the schema and the persisted queries/history concurrently.
    ///
    /// Without an endpoint the session stays idle and nothing is fetched.
    /// Each fetch fails on its own without affecting the other.
    pub async fn bootstrap(&self) {
        let Some(endpoint) = self.endpoint() else {
            log::info!("No endpoint configured; starting idle");
            return;
        };
        let history_limit = self.settings().history_limit;

        log::info!("Bootstrapping session for {}", endpoint);
        let (schema, queries) = futures::join!(
            self.client.introspect(&endpoint),
            self.store.load_queries(history_limit)
        );

        match schema {
            Ok(data) => {
                self.session().apply_introspection(data);
            }
            Err(e) => log::error!("Failed to fetch schema from {}: {}", endpoint, e),
        }

        match queries {
            Ok(payload) => self.session().seed(payload),
            Err(e) => log::error!("Failed to load saved queries and history: {}", e),
        }
    }

    /// Re-run introspection. Returns whether a schema was stored.
    pub async fn refresh_schema(&self) -> bool {
        let Some(endpoint) = self.endpoint() else {
            return false;
        };
        match self.client.introspect(&endpoint).await {
            Ok(data) => self.session().apply_introspection(data),
            Err(e) => {
                log::error!("Failed to fetch schema from {}: {}", endpoint, e);
                false
            }
        }
    }

    /// Run a query against the endpoint.
    ///
    /// Never fails: server errors are recorded on the session, network errors
    /// are logged, and both resolve to [`ExecutionOutcome::Failed`].
    pub async fn execute(&self, query: &str, variables: &str) -> ExecutionOutcome {
        if query.trim().is_empty() {
            return ExecutionOutcome::EmptyQuery;
        }
        let Some(endpoint) = self.endpoint() else {
            log::warn!("Cannot execute without an endpoint");
            return ExecutionOutcome::Failed;
        };
        let Some(ticket) = self.session().begin_execute(query, variables) else {
            return ExecutionOutcome::EmptyQuery;
        };

        match self.client.execute(&endpoint, &ticket.query, &ticket.variables).await {
            Ok(response) => {
                let now_ms = chrono::Utc::now().timestamp_millis();
                let completed = self.session().complete_execute(ticket, response, now_ms);

                if let Some(record) = &completed.record {
                    if let Err(e) = self.store.save_query_history(record).await {
                        log::warn!("Failed to persist history entry {}: {}", record.key, e);
                    }
                }
                completed.outcome
            }
            Err(e) => {
                match &e {
                    ClientError::Server { .. } => log::warn!("Query failed: {}", e),
                    ClientError::Transport(_) => log::error!("No response from {}: {}", endpoint, e),
                }
                self.session().fail_execute(ticket, e.to_failure());
                ExecutionOutcome::Failed
            }
        }
    }

    /// Save the selected query locally, then persist it.
    ///
    /// Local state is committed even if persisting fails.
    pub async fn save(&self, metadata: CreateSavedQuery) -> Result<SelectedQuery, SaveFormErrors> {
        let (saved, selected) = {
            let mut session = self.session();
            let saved = session.save(metadata)?;
            (saved, session.selected().clone())
        };

        if let Err(e) = self.store.create_query(&saved).await {
            log::warn!("Failed to persist saved query {}: {}", saved.id, e);
        }
        Ok(selected)
    }

    /// Persist the current settings
    pub async fn persist_settings(&self) {
        let settings = self.settings();
        if let Err(e) = self.store.save_settings(&settings).await {
            log::warn!("Failed to save settings: {}", e);
        }
    }
}
