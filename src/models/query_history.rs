use serde::{Deserialize, Serialize};

/// Millisecond timestamp identifying a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryKey(pub i64);

impl HistoryKey {
    pub fn millis(self) -> i64 {
        self.0
    }

    /// Human-readable local time, e.g. "March 4, 2026 14:05:09"
    pub fn label(self) -> String {
        match chrono::DateTime::from_timestamp_millis(self.0) {
            Some(utc) => utc
                .with_timezone(&chrono::Local)
                .format("%B %-d, %Y %H:%M:%S")
                .to_string(),
            None => self.0.to_string(),
        }
    }
}

impl std::fmt::Display for HistoryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for HistoryKey {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(HistoryKey)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryHistoryEntry {
    pub query: String,
    #[serde(default)]
    pub variables: String,
    /// The `data` member of the GraphQL response
    #[serde(default)]
    pub response: serde_json::Value,
}

/// A history entry together with its key, as stored and bootstrapped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryHistoryRecord {
    pub key: HistoryKey,
    #[serde(flatten)]
    pub entry: QueryHistoryEntry,
}
