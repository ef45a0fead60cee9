use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::models::{
    ClientSchema, ExecutionFailure, HistoryKey, QueryResults, SavedQuery, SidebarContent,
};

/// A click on a sidebar list item, reduced to the attributes the session reads
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarClick {
    /// `data-kitid` of the clicked element
    #[serde(default)]
    pub kitid: Option<String>,
    /// `data-collection` of the clicked element
    #[serde(default)]
    pub collection: Option<String>,
    /// `data-collection` of the clicked element's parent
    #[serde(default)]
    pub parent_collection: Option<String>,
    #[serde(default)]
    pub target_tag: String,
}

impl SidebarClick {
    /// Buttons inside list items have their own handlers
    pub fn is_button(&self) -> bool {
        self.target_tag.eq_ignore_ascii_case("button")
    }

    pub fn item_id(&self) -> Option<&str> {
        non_blank(self.kitid.as_deref())
    }

    pub fn collection_key(&self) -> Option<&str> {
        non_blank(self.parent_collection.as_deref()).or_else(|| non_blank(self.collection.as_deref()))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryListItem {
    pub key: HistoryKey,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarProps {
    pub collections: BTreeMap<String, Vec<SavedQuery>>,
    /// Newest first
    pub history: Vec<HistoryListItem>,
    #[serde(rename = "type")]
    pub kind: SidebarContent,
}

/// Everything the editor renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RendererProps {
    pub query: String,
    pub variables: String,
    /// Pretty JSON of the last response, absent when there is nothing to show
    pub response: Option<String>,
    pub schema: Option<Arc<ClientSchema>>,
    pub editor_theme: String,
    pub paper: bool,
    pub result: QueryResults,
    pub query_collection: String,
    pub failure: Option<ExecutionFailure>,
}
