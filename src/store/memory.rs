//! In-memory backend for tests and local development
//!
//! Keeps each collection as a plain `Vec<Document>` inside a `DashMap`.
//! Supports the same flat equality filters and `$set`/`$unset` updates the
//! repositories use against MongoDB, including unique index enforcement.

use async_trait::async_trait;
use dashmap::DashMap;
use mongodb::bson::{Bson, Document};

use super::{DocumentBackend, StoreError};

/// Process-local document store
#[derive(Default)]
pub struct MemoryBackend {
    collections: DashMap<String, Vec<Document>>,
    unique_indexes: DashMap<String, Vec<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn unique_fields(&self, collection: &str) -> Vec<String> {
        self.unique_indexes
            .get(collection)
            .map(|fields| fields.clone())
            .unwrap_or_default()
    }

    /// Reject `candidate` if an indexed field collides with any document
    /// other than the one at `skip`.
    fn check_unique(
        &self,
        collection: &str,
        docs: &[Document],
        candidate: &Document,
        skip: Option<usize>,
    ) -> Result<(), StoreError> {
        for field in self.unique_fields(collection) {
            let Some(value) = candidate.get(&field) else {
                continue;
            };
            if matches!(value, Bson::Null) {
                continue;
            }
            let collision = docs.iter().enumerate().any(|(idx, existing)| {
                Some(idx) != skip && existing.get(&field) == Some(value)
            });
            if collision {
                return Err(StoreError::DuplicateKey(format!("{collection}.{field}")));
            }
        }
        Ok(())
    }
}

/// Flat equality match over the filter's top-level keys
fn matches(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, value)| doc.get(key) == Some(value))
}

/// Apply a `$set` / `$unset` update in place, reporting whether the
/// document changed
fn apply_update(doc: &mut Document, update: &Document) -> bool {
    let before = doc.clone();
    if let Ok(set) = update.get_document("$set") {
        for (key, value) in set {
            doc.insert(key.clone(), value.clone());
        }
    }
    if let Ok(unset) = update.get_document("$unset") {
        for (key, _) in unset {
            doc.remove(key);
        }
    }
    *doc != before
}

#[async_trait]
impl DocumentBackend for MemoryBackend {
    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, StoreError> {
        Ok(self.collections.get(collection).and_then(|docs| {
            docs.iter().find(|doc| matches(doc, &filter)).cloned()
        }))
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Vec<Document>, StoreError> {
        Ok(self
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| matches(doc, &filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<(), StoreError> {
        let mut docs = self.collections.entry(collection.to_string()).or_default();
        self.check_unique(collection, &docs, &document, None)?;
        docs.push(document);
        Ok(())
    }

    async fn replace_one(
        &self,
        collection: &str,
        filter: Document,
        document: Document,
    ) -> Result<bool, StoreError> {
        let mut docs = self.collections.entry(collection.to_string()).or_default();
        let Some(position) = docs.iter().position(|doc| matches(doc, &filter)) else {
            return Ok(false);
        };
        self.check_unique(collection, &docs, &document, Some(position))?;
        docs[position] = document;
        Ok(true)
    }

    async fn update_many(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<u64, StoreError> {
        let mut changed = 0;
        if let Some(mut docs) = self.collections.get_mut(collection) {
            for doc in docs.iter_mut().filter(|doc| matches(doc, &filter)) {
                if apply_update(doc, &update) {
                    changed += 1;
                }
            }
        }
        Ok(changed)
    }

    async fn delete_one(&self, collection: &str, filter: Document) -> Result<bool, StoreError> {
        let Some(mut docs) = self.collections.get_mut(collection) else {
            return Ok(false);
        };
        match docs.iter().position(|doc| matches(doc, &filter)) {
            Some(position) => {
                docs.remove(position);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count(&self, collection: &str, filter: Document) -> Result<u64, StoreError> {
        Ok(self
            .collections
            .get(collection)
            .map(|docs| docs.iter().filter(|doc| matches(doc, &filter)).count() as u64)
            .unwrap_or(0))
    }

    async fn ensure_unique_index(&self, collection: &str, field: &str) -> Result<(), StoreError> {
        let mut fields = self
            .unique_indexes
            .entry(collection.to_string())
            .or_default();
        if !fields.iter().any(|existing| existing == field) {
            fields.push(field.to_string());
        }
        Ok(())
    }
}
