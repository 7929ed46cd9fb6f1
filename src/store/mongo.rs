//! MongoDB backend

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use tracing::info;

use super::{DocumentBackend, StoreError};

/// Document backend over a MongoDB database
#[derive(Clone)]
pub struct MongoBackend {
    db: Database,
}

impl MongoBackend {
    /// Connect to the deployment and verify it answers a ping
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        let db = client.database(database);
        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        info!(database = %database, "Connected to MongoDB");
        Ok(Self { db })
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection::<Document>(name)
    }
}

fn backend_err(err: mongodb::error::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

/// E11000 from either the write path or a command reply
fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == 11000,
        ErrorKind::Command(command_error) => command_error.code == 11000,
        _ => false,
    }
}

#[async_trait]
impl DocumentBackend for MongoBackend {
    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, StoreError> {
        self.collection(collection)
            .find_one(filter)
            .await
            .map_err(backend_err)
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Vec<Document>, StoreError> {
        let cursor = self
            .collection(collection)
            .find(filter)
            .await
            .map_err(backend_err)?;
        cursor.try_collect().await.map_err(backend_err)
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<(), StoreError> {
        self.collection(collection)
            .insert_one(document)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    StoreError::DuplicateKey(collection.to_string())
                } else {
                    backend_err(e)
                }
            })?;
        Ok(())
    }

    async fn replace_one(
        &self,
        collection: &str,
        filter: Document,
        document: Document,
    ) -> Result<bool, StoreError> {
        let result = self
            .collection(collection)
            .replace_one(filter, document)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    StoreError::DuplicateKey(collection.to_string())
                } else {
                    backend_err(e)
                }
            })?;
        Ok(result.matched_count > 0)
    }

    async fn update_many(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<u64, StoreError> {
        let result = self
            .collection(collection)
            .update_many(filter, update)
            .await
            .map_err(backend_err)?;
        Ok(result.modified_count)
    }

    async fn delete_one(&self, collection: &str, filter: Document) -> Result<bool, StoreError> {
        let result = self
            .collection(collection)
            .delete_one(filter)
            .await
            .map_err(backend_err)?;
        Ok(result.deleted_count > 0)
    }

    async fn count(&self, collection: &str, filter: Document) -> Result<u64, StoreError> {
        self.collection(collection)
            .count_documents(filter)
            .await
            .map_err(backend_err)
    }

    async fn ensure_unique_index(&self, collection: &str, field: &str) -> Result<(), StoreError> {
        let mut keys = Document::new();
        keys.insert(field, 1);
        let model = IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection(collection)
            .create_index(model)
            .await
            .map_err(backend_err)?;
        Ok(())
    }
}
