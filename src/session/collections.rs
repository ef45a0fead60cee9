//! Saved queries grouped by collection name

use std::collections::BTreeMap;

use crate::models::SavedQuery;

#[derive(Debug, Default)]
pub struct CollectionStore {
    collections: BTreeMap<String, BTreeMap<String, SavedQuery>>,
}

impl CollectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a saved query.
    ///
    /// An id lives in exactly one collection, so saving it under a new
    /// collection moves it there.
    pub fn upsert(&mut self, query: SavedQuery) {
        let mut emptied = Vec::new();
        for (name, items) in self.collections.iter_mut() {
            if *name != query.collection && items.remove(&query.id).is_some() && items.is_empty() {
                emptied.push(name.clone());
            }
        }
        for name in emptied {
            self.collections.remove(&name);
        }

        self.collections
            .entry(query.collection.clone())
            .or_default()
            .insert(query.id.clone(), query);
    }

    /// Bulk insert, grouping by each query's own collection field
    pub fn extend(&mut self, queries: impl IntoIterator<Item = SavedQuery>) {
        for query in queries {
            self.upsert(query);
        }
    }

    pub fn get(&self, collection: &str, id: &str) -> Option<&SavedQuery> {
        self.collections.get(collection)?.get(id)
    }

    pub fn to_lists(&self) -> BTreeMap<String, Vec<SavedQuery>> {
        self.collections
            .iter()
            .map(|(name, items)| (name.clone(), items.values().cloned().collect()))
            .collect()
    }

    /// Number of saved queries across all collections
    pub fn len(&self) -> usize {
        self.collections.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}
