pub mod sqlite;

use async_trait::async_trait;

use crate::error::StorageError;
use crate::models::{AppSettings, QueriesPayload, QueryHistoryRecord, SavedQuery};

/// Where saved queries, history and settings are persisted.
///
/// The session treats every call as best effort: failures are logged and
/// never roll back local state.
#[async_trait]
pub trait QueryStore: Send + Sync {
    /// Saved queries and the newest `history_limit` history entries
    async fn load_queries(&self, history_limit: u32) -> Result<QueriesPayload, StorageError>;

    /// Insert or overwrite a saved query
    async fn create_query(&self, query: &SavedQuery) -> Result<(), StorageError>;

    async fn save_query_history(&self, record: &QueryHistoryRecord) -> Result<(), StorageError>;

    async fn load_settings(&self) -> Result<AppSettings, StorageError>;

    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError>;
}

pub use sqlite::SqliteStore;
