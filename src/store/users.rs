//! User account storage

use std::sync::Arc;

use mongodb::bson::{doc, from_document, to_document};
use uuid::Uuid;

use super::{by_id, DocumentBackend, StoreError};
use crate::model::User;

const COLLECTION: &str = "users";

/// User store operations
#[derive(Clone)]
pub struct UserStore {
    backend: Arc<dyn DocumentBackend>,
}

impl UserStore {
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self { backend }
    }

    /// Declare the indexes registration depends on
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        self.backend.ensure_unique_index(COLLECTION, "id").await?;
        self.backend.ensure_unique_index(COLLECTION, "email").await
    }

    /// Insert a new account. Fails with [`StoreError::DuplicateKey`] when
    /// the email is already registered.
    pub async fn insert(&self, user: &User) -> Result<(), StoreError> {
        let document = to_document(user)?;
        self.backend.insert_one(COLLECTION, document).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        match self
            .backend
            .find_one(COLLECTION, doc! { "email": email })
            .await?
        {
            Some(document) => Ok(Some(from_document(document)?)),
            None => Ok(None),
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        match self.backend.find_one(COLLECTION, by_id(id)).await? {
            Some(document) => Ok(Some(from_document(document)?)),
            None => Ok(None),
        }
    }
}
