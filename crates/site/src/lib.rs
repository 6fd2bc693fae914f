//! FootballDecoded Site library.
//!
//! This crate provides the public API functionality as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the full application router: health checks, API routes, tracing
/// and CORS layers. Sentry layers are added by the binary since they need
/// a live Sentry client.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies the data directory can be created and written to before
/// returning OK. Returns 503 Service Unavailable otherwise.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    let dir = state.config().comments_dir();
    match tokio::fs::create_dir_all(&dir).await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::error!(error = %e, dir = %dir.display(), "Data directory not writable");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
