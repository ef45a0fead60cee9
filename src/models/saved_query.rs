use serde::{Deserialize, Serialize};

use crate::models::{QueryHistoryRecord, QueryResults, SelectedQuery};

/// A query saved into a named collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedQuery {
    pub id: String,
    pub collection: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub query: String,
    #[serde(default)]
    pub variables: String,
    /// Results of the last run, serialized as JSON text
    #[serde(default)]
    pub results: String,
}

impl SavedQuery {
    /// Decode the stored results; anything unreadable becomes the default shape
    pub fn decoded_results(&self) -> QueryResults {
        if self.results.trim().is_empty() {
            return QueryResults::default();
        }
        match serde_json::from_str(&self.results) {
            Ok(results) => results,
            Err(e) => {
                log::debug!("Saved query {} has unreadable results: {}", self.id, e);
                QueryResults::default()
            }
        }
    }

    /// The selected-query view of this entry
    pub fn to_selected(&self, results: QueryResults) -> SelectedQuery {
        SelectedQuery {
            id: Some(self.id.clone()),
            collection: self.collection.clone(),
            name: Some(self.name.clone()),
            description: self.description.clone(),
            query: self.query.clone(),
            variables: self.variables.clone(),
            results,
        }
    }
}

/// Metadata entered in the save form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSavedQuery {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// The save form as presented to the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveForm {
    pub collection: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Saved queries and history loaded at startup. Either half may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueriesPayload {
    #[serde(default)]
    pub saved_queries: Option<Vec<SavedQuery>>,
    #[serde(default)]
    pub history: Option<Vec<QueryHistoryRecord>>,
}
