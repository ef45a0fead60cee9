use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Query text that could not be parsed as a GraphQL document.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Failed to parse query: {message}")]
pub struct PrettifyError {
    /// The offending query text
    pub text: String,
    pub message: String,
}

/// Errors raised while talking to the GraphQL endpoint
#[derive(Debug, Error)]
pub enum ClientError {
    /// No response was received at all
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("{status} failed")]
    Server {
        status: u16,
        status_text: String,
        headers: BTreeMap<String, String>,
        body: serde_json::Value,
    },
}

/// Errors raised by the local persistence layer
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage lock poisoned")]
    Lock,
}

/// Field-keyed messages produced by save-form validation.
///
/// Validation failures are values, not errors in flight: they are shown next
/// to the offending form fields and nothing is mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveFormErrors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl SaveFormErrors {
    pub fn is_empty(&self) -> bool {
        self.collection.is_none() && self.name.is_none()
    }

    pub fn len(&self) -> usize {
        usize::from(self.collection.is_some()) + usize::from(self.name.is_some())
    }
}

impl std::fmt::Display for SaveFormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = [self.collection.as_deref(), self.name.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for SaveFormErrors {}

/// Reasons an introspection payload cannot be turned into a schema
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Introspection result has no __schema")]
    MissingSchema,

    #[error("Introspection result is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Introspection result does not name a query root type")]
    MissingQueryType,

    #[error("Query root type {0} is not defined")]
    UnknownQueryType(String),
}
