use async_trait::async_trait;
use rusqlite::{Connection, Result as SqliteResult};
use std::path::Path;
use std::sync::Mutex;

use crate::db::QueryStore;
use crate::error::StorageError;
use crate::models::{
    AppSettings, HistoryKey, QueriesPayload, QueryHistoryEntry, QueryHistoryRecord, SavedQuery,
};

/// Open (or create) the database file under `app_data_dir` and create tables
pub fn init_database(app_data_dir: &Path) -> SqliteResult<Connection> {
    std::fs::create_dir_all(app_data_dir).ok();
    let db_path = app_data_dir.join("graphkit.db");

    let conn = Connection::open(&db_path)?;
    create_tables(&conn)?;
    Ok(conn)
}

/// Create tables if they don't exist
pub fn create_tables(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        r#"
        -- Saved queries, grouped by collection
        CREATE TABLE IF NOT EXISTS saved_queries (
            id TEXT PRIMARY KEY,
            collection TEXT NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            query TEXT NOT NULL,
            variables TEXT NOT NULL DEFAULT '',
            results TEXT NOT NULL DEFAULT '',
            created_at TEXT DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT DEFAULT CURRENT_TIMESTAMP
        );

        -- Execution history, keyed by completion time in milliseconds
        CREATE TABLE IF NOT EXISTS query_history (
            key INTEGER PRIMARY KEY,
            query TEXT NOT NULL,
            variables TEXT NOT NULL DEFAULT '',
            response TEXT NOT NULL,
            executed_at TEXT DEFAULT CURRENT_TIMESTAMP
        );

        -- App settings (single row)
        CREATE TABLE IF NOT EXISTS app_settings (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            settings_json TEXT NOT NULL,
            updated_at TEXT DEFAULT CURRENT_TIMESTAMP
        );
        "#,
    )
}

// ==================== Saved Queries ====================

/// Insert a saved query, overwriting any existing row with the same id
pub fn upsert_saved_query(conn: &Connection, query: &SavedQuery) -> SqliteResult<()> {
    let now = chrono::Utc::now().to_rfc3339();

    conn.execute(
        r#"
        INSERT INTO saved_queries (id, collection, name, description, query, variables, results, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
        ON CONFLICT(id) DO UPDATE SET
            collection = excluded.collection,
            name = excluded.name,
            description = excluded.description,
            query = excluded.query,
            variables = excluded.variables,
            results = excluded.results,
            updated_at = excluded.updated_at
        "#,
        (
            &query.id,
            &query.collection,
            &query.name,
            &query.description,
            &query.query,
            &query.variables,
            &query.results,
            &now,
        ),
    )?;
    Ok(())
}

/// Load all saved queries
pub fn load_saved_queries(conn: &Connection) -> SqliteResult<Vec<SavedQuery>> {
    let mut stmt = conn.prepare(
        "SELECT id, collection, name, description, query, variables, results FROM saved_queries ORDER BY collection, name",
    )?;

    let queries = stmt.query_map([], |row| {
        Ok(SavedQuery {
            id: row.get(0)?,
            collection: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            query: row.get(4)?,
            variables: row.get(5)?,
            results: row.get(6)?,
        })
    })?;

    queries.collect()
}

// ==================== Query History ====================

/// Record an executed query; a repeated key replaces the earlier row
pub fn insert_query_history(conn: &Connection, record: &QueryHistoryRecord) -> Result<(), StorageError> {
    let response = serde_json::to_string(&record.entry.response)?;

    conn.execute(
        r#"
        INSERT OR REPLACE INTO query_history (key, query, variables, response, executed_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
        (
            record.key.millis(),
            &record.entry.query,
            &record.entry.variables,
            &response,
            chrono::Utc::now().to_rfc3339(),
        ),
    )?;
    Ok(())
}

/// Load the newest `limit` history entries, oldest first
pub fn load_query_history(conn: &Connection, limit: u32) -> SqliteResult<Vec<QueryHistoryRecord>> {
    let mut stmt = conn.prepare(
        "SELECT key, query, variables, response FROM query_history ORDER BY key DESC LIMIT ?1",
    )?;

    let rows = stmt.query_map([limit], |row| {
        let response: String = row.get(3)?;
        Ok(QueryHistoryRecord {
            key: HistoryKey(row.get(0)?),
            entry: QueryHistoryEntry {
                query: row.get(1)?,
                variables: row.get(2)?,
                response: serde_json::from_str(&response)
                    .unwrap_or(serde_json::Value::String(response)),
            },
        })
    })?;

    let mut records = rows.collect::<SqliteResult<Vec<_>>>()?;
    records.reverse();
    Ok(records)
}

// ==================== App Settings ====================

/// Load app settings from the database, returns default if none exist
pub fn load_settings(conn: &Connection) -> SqliteResult<AppSettings> {
    let mut stmt = conn.prepare("SELECT settings_json FROM app_settings WHERE id = 1")?;
    let mut rows = stmt.query([])?;

    if let Some(row) = rows.next()? {
        let json: String = row.get(0)?;
        match serde_json::from_str(&json) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                log::warn!("Stored settings are unreadable, using defaults: {}", e);
                Ok(AppSettings::default())
            }
        }
    } else {
        Ok(AppSettings::default())
    }
}

/// Save app settings to the database
pub fn save_settings(conn: &Connection, settings: &AppSettings) -> SqliteResult<()> {
    let json = serde_json::to_string(settings).unwrap_or_else(|_| "{}".to_string());

    conn.execute(
        r#"
        INSERT INTO app_settings (id, settings_json, updated_at)
        VALUES (1, ?1, CURRENT_TIMESTAMP)
        ON CONFLICT(id) DO UPDATE SET
            settings_json = excluded.settings_json,
            updated_at = CURRENT_TIMESTAMP
        "#,
        [&json],
    )?;
    Ok(())
}

/// [`QueryStore`] backed by a local SQLite database
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    pub fn open(app_data_dir: &Path) -> Result<Self, StorageError> {
        Ok(Self::new(init_database(app_data_dir)?))
    }

    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        create_tables(&conn)?;
        Ok(Self::new(conn))
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::Lock)?;
        f(&conn)
    }
}

#[async_trait]
impl QueryStore for SqliteStore {
    async fn load_queries(&self, history_limit: u32) -> Result<QueriesPayload, StorageError> {
        self.with_conn(|conn| {
            Ok(QueriesPayload {
                saved_queries: Some(load_saved_queries(conn)?),
                history: Some(load_query_history(conn, history_limit)?),
            })
        })
    }

    async fn create_query(&self, query: &SavedQuery) -> Result<(), StorageError> {
        self.with_conn(|conn| Ok(upsert_saved_query(conn, query)?))
    }

    async fn save_query_history(&self, record: &QueryHistoryRecord) -> Result<(), StorageError> {
        self.with_conn(|conn| insert_query_history(conn, record))
    }

    async fn load_settings(&self) -> Result<AppSettings, StorageError> {
        self.with_conn(|conn| Ok(load_settings(conn)?))
    }

    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError> {
        self.with_conn(|conn| Ok(save_settings(conn, settings)?))
    }
}
