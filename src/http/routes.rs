//! HTTP route definitions

use axum::{
    extract::{Extension, Path, State},
    http::{header, Method, StatusCode},
    middleware,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{error, info};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::{sign_token, Claims};
use crate::http::middleware::{require_auth, AuthenticatedUser};
use crate::model::{InventoryItem, ItemInput, PublicUser, Supplier, SupplierInput, User, DEFAULT_ROLE};
use crate::store::StoreError;
use crate::util::time::uptime_secs;

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    // CORS configuration - support multiple origins (comma-separated in CLIENT_ORIGIN)
    let allowed_origins: Vec<header::HeaderValue> = state
        .config
        .client_origin
        .split(',')
        .filter_map(|s| s.trim().parse::<header::HeaderValue>().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health_handler))
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/login", post(login_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/api/auth/me", get(me_handler))
        .route(
            "/api/inventory",
            get(list_items_handler).post(create_item_handler),
        )
        .route(
            "/api/inventory/:id",
            get(get_item_handler)
                .put(update_item_handler)
                .delete(delete_item_handler),
        )
        .route(
            "/api/suppliers",
            get(list_suppliers_handler).post(create_supplier_handler),
        )
        .route(
            "/api/suppliers/:id",
            get(get_supplier_handler)
                .put(update_supplier_handler)
                .delete(delete_supplier_handler),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Anything else falls through to the built frontend, with index.html
    // standing in for client-side routes
    let static_dir = state.config.static_dir.clone();
    let spa = ServeDir::new(&static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback_service(spa)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Decode a request body while keeping rejection inside the JSON error
/// contract (400 with an `error` field, like every other failure)
fn parse_body<T: DeserializeOwned>(body: serde_json::Value) -> Result<T, AppError> {
    serde_json::from_value(body).map_err(|e| AppError::Validation(format!("Invalid request body: {e}")))
}

fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation("Invalid id format".to_string()))
}

// ============================================================================
// Health endpoint
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: uptime_secs(),
    })
}

// ============================================================================
// Auth endpoints
// ============================================================================

#[derive(Deserialize)]
struct RegisterRequest {
    name: String,
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
struct AuthResponse {
    token: String,
    user: PublicUser,
}

#[derive(Serialize)]
struct MeResponse {
    user: PublicUser,
}

fn issue_token(state: &AppState, user: &User) -> Result<String, AppError> {
    let claims = Claims::new(user.id, &user.email, &user.role, state.config.token_ttl_secs);
    sign_token(&claims, &state.config.jwt_secret).map_err(|e| AppError::Internal(e.to_string()))
}

async fn register_handler(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let req: RegisterRequest = parse_body(body)?;

    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    let email = req.email.trim().to_lowercase();
    if !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".to_string()));
    }
    if req.password.len() < 6 {
        return Err(AppError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    let password = hash_password(&req.password).map_err(|e| AppError::Internal(e.to_string()))?;
    let user = User {
        id: Uuid::new_v4(),
        name,
        email,
        password,
        role: DEFAULT_ROLE.to_string(),
        created_at: Utc::now(),
    };

    match state.users.insert(&user).await {
        Ok(()) => {}
        Err(StoreError::DuplicateKey(_)) => {
            return Err(AppError::Conflict("Email is already registered".to_string()))
        }
        Err(e) => return Err(e.into()),
    }

    let token = issue_token(&state, &user)?;
    info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.public(),
        }),
    ))
}

async fn login_handler(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<AuthResponse>, AppError> {
    let req: LoginRequest = parse_body(body)?;
    let email = req.email.trim().to_lowercase();

    // One message for both failure modes, so responses don't reveal which
    // emails exist
    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

    let user = state.users.find_by_email(&email).await?.ok_or_else(invalid)?;
    let password_ok = verify_password(&req.password, &user.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    if !password_ok {
        return Err(invalid());
    }

    let token = issue_token(&state, &user)?;
    info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        token,
        user: user.public(),
    }))
}

async fn me_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<MeResponse>, AppError> {
    let user = state
        .users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))?;

    Ok(Json(MeResponse {
        user: user.public(),
    }))
}

// ============================================================================
// Inventory endpoints
// ============================================================================

#[derive(Serialize)]
struct DeleteItemResponse {
    deleted: Uuid,
}

async fn list_items_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<InventoryItem>>, AppError> {
    Ok(Json(state.items.list().await?))
}

async fn get_item_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InventoryItem>, AppError> {
    let id = parse_id(&id)?;
    state
        .items
        .find(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Item not found".to_string()))
}

/// Field checks plus referential integrity for the supplier link
async fn validate_item_input(state: &AppState, input: &ItemInput) -> Result<(), AppError> {
    input.validate().map_err(AppError::Validation)?;
    if let Some(supplier_id) = input.supplier {
        if state.suppliers.find(supplier_id).await?.is_none() {
            return Err(AppError::Validation(
                "Referenced supplier does not exist".to_string(),
            ));
        }
    }
    Ok(())
}

async fn create_item_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<InventoryItem>), AppError> {
    let input: ItemInput = parse_body(body)?;
    validate_item_input(&state, &input).await?;

    let now = Utc::now();
    let item = InventoryItem {
        id: Uuid::new_v4(),
        name: input.name.trim().to_string(),
        quantity: input.quantity,
        low_stock_threshold: input.low_stock_threshold,
        supplier: input.supplier,
        price: input.price,
        category: input.category.trim().to_string(),
        created_at: now,
        updated_at: now,
    };
    state.items.insert(&item).await?;

    info!(user_id = %auth.user_id, item_id = %item.id, name = %item.name, "Inventory item created");
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_item_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<InventoryItem>, AppError> {
    let id = parse_id(&id)?;
    let input: ItemInput = parse_body(body)?;

    let existing = state
        .items
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Item not found".to_string()))?;
    validate_item_input(&state, &input).await?;

    // The form submits the complete field set, so updates replace
    // everything except identity and creation time
    let item = InventoryItem {
        id: existing.id,
        name: input.name.trim().to_string(),
        quantity: input.quantity,
        low_stock_threshold: input.low_stock_threshold,
        supplier: input.supplier,
        price: input.price,
        category: input.category.trim().to_string(),
        created_at: existing.created_at,
        updated_at: Utc::now(),
    };
    if !state.items.replace(&item).await? {
        return Err(AppError::NotFound("Item not found".to_string()));
    }

    info!(user_id = %auth.user_id, item_id = %item.id, "Inventory item updated");
    Ok(Json(item))
}

async fn delete_item_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<DeleteItemResponse>, AppError> {
    let id = parse_id(&id)?;
    if !state.items.delete(id).await? {
        return Err(AppError::NotFound("Item not found".to_string()));
    }

    info!(user_id = %auth.user_id, item_id = %id, "Inventory item deleted");
    Ok(Json(DeleteItemResponse { deleted: id }))
}

// ============================================================================
// Supplier endpoints
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteSupplierResponse {
    deleted: Uuid,
    /// Items that pointed at this supplier and were unlinked
    detached_items: u64,
}

async fn list_suppliers_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Supplier>>, AppError> {
    Ok(Json(state.suppliers.list().await?))
}

async fn get_supplier_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Supplier>, AppError> {
    let id = parse_id(&id)?;
    state
        .suppliers
        .find(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Supplier not found".to_string()))
}

async fn create_supplier_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<Supplier>), AppError> {
    let input: SupplierInput = parse_body(body)?;
    input.validate().map_err(AppError::Validation)?;

    let now = Utc::now();
    let supplier = Supplier {
        id: Uuid::new_v4(),
        name: input.name.trim().to_string(),
        email: input.email,
        phone: input.phone,
        address: input.address,
        created_at: now,
        updated_at: now,
    };
    state.suppliers.insert(&supplier).await?;

    info!(user_id = %auth.user_id, supplier_id = %supplier.id, name = %supplier.name, "Supplier created");
    Ok((StatusCode::CREATED, Json(supplier)))
}

async fn update_supplier_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<Supplier>, AppError> {
    let id = parse_id(&id)?;
    let input: SupplierInput = parse_body(body)?;
    input.validate().map_err(AppError::Validation)?;

    let existing = state
        .suppliers
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Supplier not found".to_string()))?;

    let supplier = Supplier {
        id: existing.id,
        name: input.name.trim().to_string(),
        email: input.email,
        phone: input.phone,
        address: input.address,
        created_at: existing.created_at,
        updated_at: Utc::now(),
    };
    if !state.suppliers.replace(&supplier).await? {
        return Err(AppError::NotFound("Supplier not found".to_string()));
    }

    info!(user_id = %auth.user_id, supplier_id = %supplier.id, "Supplier updated");
    Ok(Json(supplier))
}

async fn delete_supplier_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<DeleteSupplierResponse>, AppError> {
    let id = parse_id(&id)?;
    if state.suppliers.find(id).await?.is_none() {
        return Err(AppError::NotFound("Supplier not found".to_string()));
    }

    // Unlink referencing items before removing the supplier, so no item is
    // ever left pointing at a missing record
    let detached_items = state.items.detach_supplier(id).await?;
    if !state.suppliers.delete(id).await? {
        return Err(AppError::NotFound("Supplier not found".to_string()));
    }

    info!(
        user_id = %auth.user_id,
        supplier_id = %id,
        detached_items,
        "Supplier deleted"
    );
    Ok(Json(DeleteSupplierResponse {
        deleted: id,
        detached_items,
    }))
}

// ============================================================================
// Error handling
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey(key) => {
                AppError::Conflict(format!("Duplicate value for {key}"))
            }
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Internal(msg) => {
                // Details go to the log, clients get a generic message
                error!(error = %msg, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}
