//! Shared test harness: a real server over the in-memory store

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use stockroom::app::AppState;
use stockroom::client::ApiClient;
use stockroom::config::{Config, StoreBackendKind};
use stockroom::http::build_router;
use stockroom::store::MemoryBackend;
use stockroom::ui::session::{RegisterForm, Session};
use uuid::Uuid;

/// A server instance bound to an ephemeral port
pub struct TestApp {
    pub addr: SocketAddr,
    pub state: AppState,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    pub async fn spawn_with(tweak: impl FnOnce(&mut Config)) -> Self {
        let mut config = test_config();
        tweak(&mut config);

        let state = AppState::with_backend(config, Arc::new(MemoryBackend::new()));
        state.ensure_indexes().await.expect("indexes");

        let router = build_router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve");
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Fresh unauthenticated client
    pub fn client(&self) -> ApiClient {
        ApiClient::new(self.base_url())
    }

    /// Client already authenticated as a brand new user
    pub async fn logged_in_client(&self) -> ApiClient {
        let client = self.client();
        let mut session = Session::new(client.clone());
        let form = RegisterForm {
            name: "Test User".to_string(),
            email: format!("user-{}@example.com", Uuid::new_v4()),
            password: "password1".to_string(),
            confirm_password: "password1".to_string(),
        };
        session.register(&form).await.expect("register");
        client
    }
}

fn test_config() -> Config {
    Config {
        server_addr: "127.0.0.1:0".parse().expect("addr"),
        log_level: "warn".to_string(),
        store_backend: StoreBackendKind::Memory,
        mongodb_uri: None,
        database_name: "stockroom-test".to_string(),
        jwt_secret: "test-secret".to_string(),
        token_ttl_secs: 3600,
        client_origin: "http://localhost:5173".to_string(),
        static_dir: std::env::temp_dir().join("stockroom-static-unset"),
    }
}
