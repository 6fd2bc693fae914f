//! Integration test harness for FootballDecoded.
//!
//! Builds the real site router in-process against a temporary data
//! directory, so tests exercise the full stack (routing, extraction,
//! validation, file persistence) without a network listener. Email
//! dispatch is disabled by leaving the Resend configuration unset.
//!
//! ```rust,no_run
//! use footballdecoded_integration_tests::TestApp;
//! use tower::ServiceExt;
//!
//! # async fn demo() {
//! let app = TestApp::new();
//! let response = app.router().oneshot(TestApp::get("/health")).await.unwrap();
//! # }
//! ```

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;

use footballdecoded_site::config::SiteConfig;
use footballdecoded_site::state::AppState;

/// An in-process instance of the site rooted in a temporary data directory.
///
/// The directory lives as long as the `TestApp`; each `router()` call
/// builds a fresh router sharing it, so state persists across requests
/// within one test.
pub struct TestApp {
    data_dir: TempDir,
    state: AppState,
}

impl TestApp {
    /// Create a test instance with an empty data directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory or application state cannot be
    /// created.
    #[must_use]
    pub fn new() -> Self {
        let data_dir = TempDir::new().expect("Failed to create temp data dir");

        let config = SiteConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            base_url: "http://localhost:3000".to_string(),
            data_dir: data_dir.path().to_path_buf(),
            resend: None,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        let state = AppState::new(config).expect("Failed to build application state");

        Self { data_dir, state }
    }

    /// Build the full application router backed by this instance's state.
    #[must_use]
    pub fn router(&self) -> Router {
        footballdecoded_site::app(self.state.clone())
    }

    /// Path of the newsletter subscribers file inside the data directory.
    ///
    /// Tests read confirmation tokens from here since no email goes out.
    #[must_use]
    pub fn subscribers_path(&self) -> PathBuf {
        self.data_dir
            .path()
            .join("newsletter-subscribers.json")
    }

    /// Build a GET request.
    ///
    /// # Panics
    ///
    /// Panics if the URI is invalid.
    #[must_use]
    pub fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request")
    }

    /// Build a POST request with a JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the URI is invalid.
    #[must_use]
    pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request")
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect a response body and parse it as JSON.
///
/// # Panics
///
/// Panics if the body cannot be read or is not valid JSON.
pub async fn response_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read response body")
        .to_bytes();

    serde_json::from_slice(&bytes).expect("Failed to parse JSON")
}
