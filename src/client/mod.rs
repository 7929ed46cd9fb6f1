//! Typed client for the Stockroom REST API
//!
//! This is the frontend's single HTTP gateway. Clones share one underlying
//! connection pool and one bearer token slot, the way the original web app
//! shared a single request instance with an auth interceptor.

use std::sync::Arc;

use parking_lot::RwLock;
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{InventoryItem, ItemInput, PublicUser, Supplier, SupplierInput};

/// API client for the Stockroom server
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

/// Registration payload
#[derive(Debug, Clone, Serialize)]
pub struct RegisterPayload {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login payload
#[derive(Debug, Clone, Serialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

/// Token plus user, returned by register and login
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

/// Current-user lookup response
#[derive(Debug, Clone, Deserialize)]
pub struct MeResponse {
    pub user: PublicUser,
}

/// Server health report
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthInfo {
    pub status: String,
    pub uptime_secs: u64,
}

/// Acknowledgement for an item delete
#[derive(Debug, Clone, Deserialize)]
pub struct DeletedItem {
    pub deleted: Uuid,
}

/// Acknowledgement for a supplier delete
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedSupplier {
    pub deleted: Uuid,
    pub detached_items: u64,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            token: Arc::new(RwLock::new(None)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Replace the bearer token used by every clone of this client
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write() = token;
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the token, send, and decode; non-2xx becomes
    /// [`ClientError::Api`] with the server's error message
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let request = match self.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = parse_error_body(response).await;
            return Err(ClientError::Api { status, message });
        }

        response.json().await.map_err(ClientError::Parse)
    }

    // ========================================================================
    // Auth
    // ========================================================================

    pub async fn register(&self, payload: &RegisterPayload) -> Result<AuthResponse, ClientError> {
        self.send(self.client.post(self.url("/api/auth/register")).json(payload))
            .await
    }

    pub async fn login(&self, payload: &LoginPayload) -> Result<AuthResponse, ClientError> {
        self.send(self.client.post(self.url("/api/auth/login")).json(payload))
            .await
    }

    pub async fn me(&self) -> Result<MeResponse, ClientError> {
        self.send(self.client.get(self.url("/api/auth/me"))).await
    }

    // ========================================================================
    // Inventory
    // ========================================================================

    pub async fn list_items(&self) -> Result<Vec<InventoryItem>, ClientError> {
        self.send(self.client.get(self.url("/api/inventory"))).await
    }

    pub async fn get_item(&self, id: Uuid) -> Result<InventoryItem, ClientError> {
        self.send(self.client.get(self.url(&format!("/api/inventory/{id}"))))
            .await
    }

    pub async fn create_item(&self, input: &ItemInput) -> Result<InventoryItem, ClientError> {
        self.send(self.client.post(self.url("/api/inventory")).json(input))
            .await
    }

    pub async fn update_item(
        &self,
        id: Uuid,
        input: &ItemInput,
    ) -> Result<InventoryItem, ClientError> {
        self.send(
            self.client
                .put(self.url(&format!("/api/inventory/{id}")))
                .json(input),
        )
        .await
    }

    pub async fn delete_item(&self, id: Uuid) -> Result<DeletedItem, ClientError> {
        self.send(self.client.delete(self.url(&format!("/api/inventory/{id}"))))
            .await
    }

    // ========================================================================
    // Suppliers
    // ========================================================================

    pub async fn list_suppliers(&self) -> Result<Vec<Supplier>, ClientError> {
        self.send(self.client.get(self.url("/api/suppliers"))).await
    }

    pub async fn get_supplier(&self, id: Uuid) -> Result<Supplier, ClientError> {
        self.send(self.client.get(self.url(&format!("/api/suppliers/{id}"))))
            .await
    }

    pub async fn create_supplier(&self, input: &SupplierInput) -> Result<Supplier, ClientError> {
        self.send(self.client.post(self.url("/api/suppliers")).json(input))
            .await
    }

    pub async fn update_supplier(
        &self,
        id: Uuid,
        input: &SupplierInput,
    ) -> Result<Supplier, ClientError> {
        self.send(
            self.client
                .put(self.url(&format!("/api/suppliers/{id}")))
                .json(input),
        )
        .await
    }

    pub async fn delete_supplier(&self, id: Uuid) -> Result<DeletedSupplier, ClientError> {
        self.send(self.client.delete(self.url(&format!("/api/suppliers/{id}"))))
            .await
    }

    // ========================================================================
    // Misc
    // ========================================================================

    pub async fn health(&self) -> Result<HealthInfo, ClientError> {
        self.send(self.client.get(self.url("/health"))).await
    }
}

/// Pull the `error` message out of a failed response body
async fn parse_error_body(response: reqwest::Response) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: String,
    }

    match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => "Request failed".to_string(),
    }
}

/// Client errors
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(reqwest::Error),
}

impl ClientError {
    /// Message to show the user: the server's own words when it sent any,
    /// otherwise the caller's fallback
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Api { message, .. } if !message.is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }

    /// HTTP status, when the server got far enough to send one
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
