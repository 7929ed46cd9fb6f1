//! Configuration module - environment variable parsing

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Which document store backend to run against
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackendKind {
    /// MongoDB via the official driver
    Mongodb,
    /// In-process store for tests and local development
    Memory,
}

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Server binding address
    pub server_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Selected store backend
    pub store_backend: StoreBackendKind,
    /// MongoDB connection string (required for the mongodb backend)
    pub mongodb_uri: Option<String>,
    /// Database name within the MongoDB deployment
    pub database_name: String,

    /// Secret for signing and verifying access tokens
    pub jwt_secret: String,
    /// Access token lifetime in seconds
    pub token_ttl_secs: u64,

    /// Allowed client origin(s) for CORS, comma separated
    pub client_origin: String,
    /// Directory holding the built web frontend
    pub static_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Hosting platforms provide PORT, fall back to SERVER_ADDR or default
        let server_addr = if let Ok(port) = env::var("PORT") {
            format!("0.0.0.0:{}", port)
        } else {
            env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:2000".to_string())
        };

        let store_backend = match env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "mongodb".to_string())
            .to_lowercase()
            .as_str()
        {
            "mongodb" | "mongo" => StoreBackendKind::Mongodb,
            "memory" => StoreBackendKind::Memory,
            _ => return Err(ConfigError::Invalid("STORE_BACKEND")),
        };

        let mongodb_uri = env::var("MONGODB_URI").ok();
        if store_backend == StoreBackendKind::Mongodb && mongodb_uri.is_none() {
            return Err(ConfigError::Missing("MONGODB_URI"));
        }

        let token_ttl_secs = match env::var("TOKEN_TTL_SECS") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("TOKEN_TTL_SECS"))?,
            Err(_) => 86400,
        };

        Ok(Self {
            server_addr: server_addr
                .parse()
                .map_err(|_| ConfigError::InvalidAddress)?,

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            store_backend,
            mongodb_uri,
            database_name: env::var("DATABASE_NAME").unwrap_or_else(|_| "stockroom".to_string()),

            jwt_secret: env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?,
            token_ttl_secs,

            client_origin: env::var("CLIENT_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            static_dir: env::var("STATIC_DIR")
                .unwrap_or_else(|_| "frontend/dist".to_string())
                .into(),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Invalid server address format")]
    InvalidAddress,
}
