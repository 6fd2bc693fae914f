//! HTTP route handlers for the public API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (data dir writable)
//!
//! # Comments (JSON)
//! GET  /api/comments/{slug}         - List approved comments for an article
//! POST /api/comments/{slug}         - Create a comment
//! POST /api/comments/{slug}/actions - Like or reply ({"action": "like"|"reply"})
//!
//! # Newsletter (JSON)
//! POST /api/newsletter/subscribe    - Subscribe + dispatch confirmation email
//! GET  /api/newsletter/subscribe    - Subscriber stats
//! GET  /api/newsletter/confirm      - Confirm a subscription (?token=)
//! ```

pub mod comments;
pub mod newsletter;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the comment routes router.
pub fn comment_routes() -> Router<AppState> {
    Router::new()
        .route("/{slug}", get(comments::list).post(comments::create))
        .route("/{slug}/actions", post(comments::actions))
}

/// Create the newsletter routes router.
pub fn newsletter_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/subscribe",
            post(newsletter::subscribe).get(newsletter::stats),
        )
        .route("/confirm", get(newsletter::confirm))
}

/// Create all API routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/comments", comment_routes())
        .nest("/api/newsletter", newsletter_routes())
}
