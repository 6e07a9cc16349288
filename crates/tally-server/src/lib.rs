//! Tally Web Server
//!
//! Axum-based REST API exposing the Tally expense forecast.
//!
//! Security features:
//! - Restrictive CORS policy
//! - Security response headers
//! - Sanitized error responses (internal errors are logged, never returned)

use std::sync::Arc;

use axum::{
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use tally_core::{Clock, Database, ForecastConfig, SystemClock};

mod handlers;

/// Header carrying the caller's user id (set by the fronting auth proxy)
pub const USER_HEADER: &str = "x-tally-user";

/// Environment variable with comma-separated allowed CORS origins
pub const ALLOWED_ORIGINS_ENV: &str = "TALLY_ALLOWED_ORIGINS";

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// Forecast tuning shared by every request
    pub forecast: ForecastConfig,
}

impl ServerConfig {
    /// Read allowed origins from `TALLY_ALLOWED_ORIGINS`
    pub fn from_env(forecast: ForecastConfig) -> Self {
        let allowed_origins = std::env::var(ALLOWED_ORIGINS_ENV)
            .map(|v| parse_origins(&v))
            .unwrap_or_default();
        Self {
            allowed_origins,
            forecast,
        }
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub clock: Arc<dyn Clock>,
    pub forecast_config: ForecastConfig,
}

/// Extract the caller's user id from request headers
pub fn get_user_id(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .ok_or_else(|| AppError::bad_request("Missing x-tally-user header"))
}

/// Create the application router
pub fn create_router(db: Database, config: ServerConfig) -> Router {
    create_router_with_clock(db, config, Arc::new(SystemClock))
}

/// Create the application router with an explicit clock (for testing)
pub fn create_router_with_clock(
    db: Database,
    config: ServerConfig,
    clock: Arc<dyn Clock>,
) -> Router {
    let state = Arc::new(AppState {
        db,
        clock,
        forecast_config: config.forecast.clone(),
    });

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/forecast/expense", get(handlers::get_expense_forecast))
        .route(
            "/forecast/expense/report",
            get(handlers::get_expense_forecast_report),
        );

    let user_header = HeaderName::from_static(USER_HEADER);

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, user_header])
    } else {
        // Allow specified origins
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, user_header])
            .expose_headers([header::CONTENT_DISPOSITION])
    };

    Router::new()
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
            HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
        ))
}

/// Start the server
pub async fn serve(db: Database, host: &str, port: u16, config: ServerConfig) -> anyhow::Result<()> {
    if !config.allowed_origins.is_empty() {
        info!(origins = ?config.allowed_origins, "CORS origins allowed");
    }

    let app = create_router(db, config);
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
#[derive(Debug)]
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

    /// Map a core error: a bad month is the caller's fault, anything else is ours
    pub fn from_core(err: tally_core::Error) -> Self {
        match err {
            tally_core::Error::InvalidMonth(_) => Self::bad_request("Invalid month. Use YYYY-MM."),
            other => Self::from(other),
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
