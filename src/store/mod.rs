//! Data store: document backend plus typed repositories

pub mod items;
pub mod memory;
pub mod mongo;
pub mod suppliers;
pub mod users;

pub use items::ItemStore;
pub use memory::MemoryBackend;
pub use mongo::MongoBackend;
pub use suppliers::SupplierStore;
pub use users::UserStore;

use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use uuid::Uuid;

/// Document-store operations the repositories are built on
///
/// Filters are flat equality documents; `update_many` takes a `$set` /
/// `$unset` update document. That is the entire query surface the
/// application needs, so both backends implement exactly that much.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, StoreError>;

    async fn find_many(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Vec<Document>, StoreError>;

    async fn insert_one(&self, collection: &str, document: Document) -> Result<(), StoreError>;

    /// Replace the first document matching `filter`. Returns false when
    /// nothing matched.
    async fn replace_one(
        &self,
        collection: &str,
        filter: Document,
        document: Document,
    ) -> Result<bool, StoreError>;

    /// Apply `update` to every matching document, returning how many changed
    async fn update_many(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<u64, StoreError>;

    /// Delete the first document matching `filter`. Returns false when
    /// nothing matched.
    async fn delete_one(&self, collection: &str, filter: Document) -> Result<bool, StoreError>;

    async fn count(&self, collection: &str, filter: Document) -> Result<u64, StoreError>;

    /// Declare a unique index on a top-level field
    async fn ensure_unique_index(&self, collection: &str, field: &str) -> Result<(), StoreError>;
}

/// Filter matching a document by its application-level id
///
/// Ids are stored as hyphenated strings, the same form serde gives them,
/// so lookups stay consistent across backends and the wire format.
pub fn by_id(id: Uuid) -> Document {
    doc! { "id": id.to_string() }
}

/// Store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store connection failed: {0}")]
    Connection(String),

    #[error("Store operation failed: {0}")]
    Backend(String),

    #[error("Duplicate value for unique field {0}")]
    DuplicateKey(String),

    #[error("Document encoding failed: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),

    #[error("Document decoding failed: {0}")]
    Decode(#[from] mongodb::bson::de::Error),
}
