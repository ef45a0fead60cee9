use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::HistoryKey;

/// Result status shown once a schema is loaded or a saved query is reopened
pub const STATUS_WAITING: &str = "Waiting...";

/// Result status shown after replaying a history entry
pub const STATUS_HISTORY_PENDING: &str = "Waiting";

/// Resolved instead of a response when execution is asked for blank text
pub const EMPTY_QUERY_MESSAGE: &str = "Please provide a query.";

/// Echo of the request that produced a result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEcho {
    pub data: String,
    pub headers: BTreeMap<String, String>,
    pub method: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResults {
    #[serde(default)]
    pub request: Option<RequestEcho>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub status: String,
    /// Elapsed wall-clock milliseconds, absent until the query has run
    #[serde(default)]
    pub time: Option<u64>,
    #[serde(default)]
    pub response: serde_json::Value,
}

impl Default for QueryResults {
    fn default() -> Self {
        QueryResults {
            request: None,
            headers: BTreeMap::new(),
            status: String::new(),
            time: None,
            response: serde_json::Value::Null,
        }
    }
}

impl QueryResults {
    /// Keep everything but mark the result as not yet re-run
    pub fn waiting(self) -> Self {
        QueryResults {
            status: STATUS_WAITING.to_string(),
            time: None,
            ..self
        }
    }
}

/// The query, variables and result currently shown in the editor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedQuery {
    /// `None` until the query is saved into a collection for the first time
    pub id: Option<String>,
    pub collection: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub query: String,
    pub variables: String,
    pub results: QueryResults,
}

/// A non-2xx answer captured from the endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionFailure {
    pub status: String,
    pub response: serde_json::Value,
    pub headers: BTreeMap<String, String>,
}

/// Where the selected query came from and whether it is running
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Draft,
    FromHistory {
        key: HistoryKey,
    },
    FromCollection {
        collection: String,
        id: String,
    },
    Executing {
        generation: u64,
        previous: Box<SessionState>,
    },
    Executed {
        generation: u64,
    },
}

/// Signals for the form layer, drained by the host after each action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionEvent {
    ResetSaveForm,
    CloseSaveModal,
}

/// What an execute call resolves to
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    /// Blank query text; nothing was sent
    EmptyQuery,
    /// The inner `data` of the GraphQL response, if any
    Completed { data: Option<serde_json::Value> },
    /// A newer execution started before this one finished; nothing was committed
    Superseded { data: Option<serde_json::Value> },
    /// Server or network failure, already captured and logged
    Failed,
}

impl ExecutionOutcome {
    /// Flatten into the value handed back to the editor
    pub fn into_response(self) -> serde_json::Value {
        match self {
            ExecutionOutcome::EmptyQuery => serde_json::Value::String(EMPTY_QUERY_MESSAGE.to_string()),
            ExecutionOutcome::Completed { data } | ExecutionOutcome::Superseded { data } => {
                data.unwrap_or(serde_json::Value::Null)
            }
            ExecutionOutcome::Failed => serde_json::Value::Null,
        }
    }
}
