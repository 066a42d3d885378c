//! Aptsign API server - apartment signature collection
//!
//! Provides REST endpoints for:
//! - Admin login, base-document upload and signed-document export
//! - Resident signing keyed by apartment id
//! - Roster progress and signing notifications

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod error;
pub mod handlers;
pub mod models;
pub mod state;

pub use state::{AppState, Config};

/// Build the application router.
pub fn app(state: Arc<AppState>) -> Router {
    // CORS configuration for web clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Admin gate
        .route("/api/admin/login", post(handlers::admin_login))
        // Base document
        .route(
            "/api/document",
            post(handlers::upload_document).get(handlers::get_document),
        )
        // Roster + signing
        .route("/api/roster", get(handlers::roster_status))
        .route("/api/sign-link/:id", get(handlers::sign_link))
        .route("/api/sign/:id", post(handlers::sign))
        // Export
        .route("/api/export", get(handlers::export))
        // Notifications
        .route(
            "/api/notifications",
            get(handlers::notifications).delete(handlers::clear_notifications),
        )
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
