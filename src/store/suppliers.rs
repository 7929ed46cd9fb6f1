//! Supplier storage

use std::sync::Arc;

use mongodb::bson::{doc, from_document, to_document};
use uuid::Uuid;

use super::{by_id, DocumentBackend, StoreError};
use crate::model::Supplier;

const COLLECTION: &str = "suppliers";

/// Supplier store operations
#[derive(Clone)]
pub struct SupplierStore {
    backend: Arc<dyn DocumentBackend>,
}

impl SupplierStore {
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self { backend }
    }

    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        self.backend.ensure_unique_index(COLLECTION, "id").await
    }

    /// All suppliers, in insertion order
    pub async fn list(&self) -> Result<Vec<Supplier>, StoreError> {
        let documents = self.backend.find_many(COLLECTION, doc! {}).await?;
        documents
            .into_iter()
            .map(|document| from_document(document).map_err(StoreError::from))
            .collect()
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Supplier>, StoreError> {
        match self.backend.find_one(COLLECTION, by_id(id)).await? {
            Some(document) => Ok(Some(from_document(document)?)),
            None => Ok(None),
        }
    }

    pub async fn insert(&self, supplier: &Supplier) -> Result<(), StoreError> {
        let document = to_document(supplier)?;
        self.backend.insert_one(COLLECTION, document).await
    }

    /// Replace the stored supplier. Returns false when the id is no longer
    /// present.
    pub async fn replace(&self, supplier: &Supplier) -> Result<bool, StoreError> {
        let document = to_document(supplier)?;
        self.backend
            .replace_one(COLLECTION, by_id(supplier.id), document)
            .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        self.backend.delete_one(COLLECTION, by_id(id)).await
    }
}
