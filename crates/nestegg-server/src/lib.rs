//! Nestegg Web Server
//!
//! Axum-based REST API for the Nestegg savings goal tracker.
//!
//! The server runs for a single configured user; there is no authentication
//! layer, so bind it to localhost or put it behind a proxy that handles access.
//!
//! - Restrictive CORS policy
//! - Input validation (pagination limits, body size limits)
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, warn};

use nestegg_core::{Database, Error as CoreError, RecommendationEngine};

mod handlers;

/// Maximum pagination limit
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Maximum JSON request body size (10 KB)
pub const MAX_BODY_SIZE: usize = 1024 * 10;

/// Environment variable with comma-separated allowed CORS origins
pub const ALLOWED_ORIGINS_ENV: &str = "NESTEGG_ALLOWED_ORIGINS";

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// User every request acts as
    pub user_id: i64,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            user_id: 1,
            allowed_origins: vec![],
        }
    }
}

impl ServerConfig {
    /// Config for a user, with CORS origins from `NESTEGG_ALLOWED_ORIGINS`
    pub fn from_env(user_id: i64) -> Self {
        let allowed_origins = std::env::var(ALLOWED_ORIGINS_ENV)
            .map(|v| parse_origins(&v))
            .unwrap_or_default();
        Self {
            user_id,
            allowed_origins,
        }
    }
}

/// Split a comma-separated origin list, dropping blanks
pub fn parse_origins(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
    pub engine: RecommendationEngine,
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router with the default recommendation policy
pub fn create_router(db: Database, static_dir: Option<&str>, config: ServerConfig) -> Router {
    create_router_with_engine(db, static_dir, config, RecommendationEngine::new())
}

/// Create the application router with a specific recommendation engine
pub fn create_router_with_engine(
    db: Database,
    static_dir: Option<&str>,
    config: ServerConfig,
    engine: RecommendationEngine,
) -> Router {
    let state = Arc::new(AppState {
        db,
        config: config.clone(),
        engine,
    });

    let api_routes = Router::new()
        .route("/me", get(handlers::get_me))
        // Transactions
        .route(
            "/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route(
            "/transactions/:id",
            get(handlers::get_transaction).delete(handlers::delete_transaction),
        )
        // Categories
        .route(
            "/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/categories/:id",
            axum::routing::delete(handlers::delete_category),
        )
        // Goals
        .route(
            "/goals",
            get(handlers::list_goals).post(handlers::create_goal),
        )
        .route("/goals/active", get(handlers::list_active_goals))
        .route(
            "/goals/:id",
            get(handlers::get_goal).delete(handlers::delete_goal),
        )
        .route(
            "/goals/:id/recommendations",
            get(handlers::goal_recommendations),
        )
        // Ad-hoc recommendations from a client-side snapshot
        .route("/recommendations", post(handlers::compute_recommendations));

    // Build CORS layer
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE])
    };

    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; connect-src 'self'; frame-ancestors 'none'",
    );

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ));

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
    engine: RecommendationEngine,
) -> anyhow::Result<()> {
    match db.get_user(config.user_id) {
        Ok(Some(user)) => info!("Serving user {} ({})", user.id, user.email),
        Ok(None) => warn!(
            "⚠️  User {} does not exist yet - run `nestegg init` first",
            config.user_id
        ),
        Err(e) => warn!("Failed to look up user {}: {}", config.user_id, e),
    }

    if host != "127.0.0.1" && host != "localhost" {
        warn!("⚠️  No authentication - do not expose {} to an untrusted network!", host);
    }

    let app = create_router_with_engine(db, static_dir, config, engine);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();

        // Caller mistakes are safe to echo back
        match err.downcast_ref::<CoreError>() {
            Some(CoreError::Validation(msg)) => return Self::bad_request(msg),
            Some(CoreError::NotFound(msg)) => return Self::not_found(msg),
            _ => {}
        }

        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

#[cfg(test)]
mod tests;
