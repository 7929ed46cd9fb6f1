//! Inventory item storage

use std::sync::Arc;

use mongodb::bson::{doc, from_document, to_document, Bson};
use uuid::Uuid;

use super::{by_id, DocumentBackend, StoreError};
use crate::model::InventoryItem;

const COLLECTION: &str = "items";

/// Inventory store operations
#[derive(Clone)]
pub struct ItemStore {
    backend: Arc<dyn DocumentBackend>,
}

impl ItemStore {
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self { backend }
    }

    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        self.backend.ensure_unique_index(COLLECTION, "id").await
    }

    /// All items, in insertion order
    pub async fn list(&self) -> Result<Vec<InventoryItem>, StoreError> {
        let documents = self.backend.find_many(COLLECTION, doc! {}).await?;
        documents
            .into_iter()
            .map(|document| from_document(document).map_err(StoreError::from))
            .collect()
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<InventoryItem>, StoreError> {
        match self.backend.find_one(COLLECTION, by_id(id)).await? {
            Some(document) => Ok(Some(from_document(document)?)),
            None => Ok(None),
        }
    }

    pub async fn insert(&self, item: &InventoryItem) -> Result<(), StoreError> {
        let document = to_document(item)?;
        self.backend.insert_one(COLLECTION, document).await
    }

    /// Replace the stored item with `item`. Returns false when the id is
    /// no longer present.
    pub async fn replace(&self, item: &InventoryItem) -> Result<bool, StoreError> {
        let document = to_document(item)?;
        self.backend
            .replace_one(COLLECTION, by_id(item.id), document)
            .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        self.backend.delete_one(COLLECTION, by_id(id)).await
    }

    /// Unlink every item pointing at a supplier, returning how many changed
    pub async fn detach_supplier(&self, supplier_id: Uuid) -> Result<u64, StoreError> {
        self.backend
            .update_many(
                COLLECTION,
                doc! { "supplier": supplier_id.to_string() },
                doc! { "$set": { "supplier": Bson::Null } },
            )
            .await
    }
}
