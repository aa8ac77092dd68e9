//! HTTP API for the operator authentication server.
//!
//! # Architecture
//!
//! The API is built with:
//! - **Axum**: Async web framework
//! - **Tower**: Middleware for CORS and request correlation
//! - **Signed session tokens**: stateless authentication; no session store
//!
//! # Endpoints Overview
//!
//! ## API v1 (Recommended)
//! ```text
//! GET  /health                  - Health check (public)
//! POST /api/v1/auth/login       - Exchange credentials for a session token
//! GET  /api/v1/auth/session     - Current session view (token optional)
//! GET  /api/v1/auth/redirect    - Origin-pinned post-login redirect target
//! ```
//!
//! ## Legacy Routes (Deprecated)
//! ```text
//! POST /api/auth/login          - Use /api/v1/auth/login
//! GET  /api/auth/session        - Use /api/v1/auth/session
//! ```
//!
//! # Security
//!
//! - Session tokens expire after 30 days and roll every 24 hours
//! - Every login failure yields the same generic rejection
//! - Redirect targets never leave the configured origin
//!
//! # CORS
//!
//! CORS is configured permissively for development. In production, configure
//! appropriate origins, methods, and headers.

pub mod auth;
pub mod request_id;

use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use operator_auth::auth::{Authenticator, TokenIssuer, TokenVerifier};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers.
///
/// Cloned per request (cheap due to Arc wrappers). Every component is
/// read-only after startup; requests share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    pub authenticator: Arc<Authenticator>,
    pub issuer: Arc<TokenIssuer>,
    pub verifier: Arc<TokenVerifier>,
    pub base_url: String,
}

/// Create the complete API router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    let v1_routes = create_v1_router();

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", v1_routes)
        // Legacy routes (deprecated, use /api/v1)
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/session", get(auth::session))
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Create API v1 router with all versioned endpoints.
///
/// This allows for future API evolution (v2, v3, etc.) while maintaining
/// backward compatibility with existing clients.
fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/session", get(auth::session))
        .route("/auth/redirect", get(auth::redirect))
}

/// Health check endpoint for monitoring and load balancers.
///
/// The server holds no database or downstream connection, so liveness is the
/// whole story.
///
/// # Example
///
/// ```bash
/// curl http://localhost:4000/health
/// # {"status":"healthy","version":"1.0.0","timestamp":"2026-08-06T10:30:00Z"}
/// ```
async fn health_check() -> impl IntoResponse {
    let response = json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(response))
}
