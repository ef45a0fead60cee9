//! Append-only log of executed queries, keyed by completion time

use std::collections::BTreeMap;

use crate::models::{HistoryKey, HistoryListItem, QueryHistoryEntry, QueryHistoryRecord};

#[derive(Debug, Default)]
pub struct HistoryLog {
    entries: BTreeMap<HistoryKey, QueryHistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry completed at `now_ms`.
    ///
    /// Keys are strictly increasing: a completion in the same millisecond as
    /// (or earlier than) the newest entry is keyed one past it.
    pub fn append(&mut self, now_ms: i64, entry: QueryHistoryEntry) -> HistoryKey {
        let key = match self.latest_key() {
            Some(last) if last.0 >= now_ms => HistoryKey(last.0 + 1),
            _ => HistoryKey(now_ms),
        };
        log::debug!("Appending history entry {}", key);
        self.entries.insert(key, entry);
        key
    }

    /// Seed the log from persisted records, keeping their keys
    pub fn extend(&mut self, records: impl IntoIterator<Item = QueryHistoryRecord>) {
        for record in records {
            self.entries.insert(record.key, record.entry);
        }
    }

    pub fn get(&self, key: HistoryKey) -> Option<&QueryHistoryEntry> {
        self.entries.get(&key)
    }

    pub fn latest_key(&self) -> Option<HistoryKey> {
        self.entries.keys().next_back().copied()
    }

    /// Entries newest first
    pub fn iter_recent(&self) -> impl Iterator<Item = (HistoryKey, &QueryHistoryEntry)> {
        self.entries.iter().rev().map(|(key, entry)| (*key, entry))
    }

    pub fn list_items(&self) -> Vec<HistoryListItem> {
        self.entries
            .keys()
            .rev()
            .map(|key| HistoryListItem {
                key: *key,
                label: key.label(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(query: &str) -> QueryHistoryEntry {
        QueryHistoryEntry {
            query: query.to_string(),
            variables: String::new(),
            response: json!({ "ok": true }),
        }
    }

    #[test]
    fn same_millisecond_completions_get_distinct_keys() {
        let mut log = HistoryLog::new();

        let first = log.append(1_000, entry("{ a }"));
        let second = log.append(1_000, entry("{ b }"));
        let third = log.append(999, entry("{ c }"));

        assert_eq!(first, HistoryKey(1_000));
        assert_eq!(second, HistoryKey(1_001));
        assert_eq!(third, HistoryKey(1_002));
        assert_eq!(log.len(), 3);
        assert_eq!(log.get(second).unwrap().query, "{ b }");
    }

    #[test]
    fn lists_newest_first() {
        let mut log = HistoryLog::new();
        log.extend(vec![
            QueryHistoryRecord { key: HistoryKey(10), entry: entry("{ old }") },
            QueryHistoryRecord { key: HistoryKey(30), entry: entry("{ new }") },
        ]);
        log.append(20, entry("{ appended }"));

        let queries: Vec<&str> = log.iter_recent().map(|(_, e)| e.query.as_str()).collect();
        assert_eq!(queries, vec!["{ appended }", "{ new }", "{ old }"]);

        let keys: Vec<i64> = log.list_items().iter().map(|item| item.key.millis()).collect();
        assert_eq!(keys, vec![31, 30, 10]);
    }
}
