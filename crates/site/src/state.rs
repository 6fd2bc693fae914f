//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::SiteConfig;
use crate::services::{ResendClient, ResendError};
use crate::store::{CommentStore, NewsletterStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources: the file-backed stores, the email client, and
/// configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    comments: CommentStore,
    newsletter: NewsletterStore,
    mailer: Option<ResendClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Stores are rooted under the configured data directory. The mailer is
    /// only built when Resend is configured; without it, subscriptions still
    /// work but no confirmation email goes out.
    ///
    /// # Errors
    ///
    /// Returns an error if the Resend client cannot be built.
    pub fn new(config: SiteConfig) -> Result<Self, ResendError> {
        let comments = CommentStore::new(config.comments_dir());
        let newsletter = NewsletterStore::new(config.subscribers_file());
        let mailer = config
            .resend
            .as_ref()
            .map(ResendClient::new)
            .transpose()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                comments,
                newsletter,
                mailer,
            }),
        })
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the comment store.
    #[must_use]
    pub fn comments(&self) -> &CommentStore {
        &self.inner.comments
    }

    /// Get a reference to the newsletter store.
    #[must_use]
    pub fn newsletter(&self) -> &NewsletterStore {
        &self.inner.newsletter
    }

    /// Get a reference to the Resend client, if configured.
    #[must_use]
    pub fn mailer(&self) -> Option<&ResendClient> {
        self.inner.mailer.as_ref()
    }
}
