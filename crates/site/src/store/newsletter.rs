//! Newsletter subscriber store.
//!
//! A single JSON array holds every subscriber across their whole
//! lifecycle: created unconfirmed with a token, flipped to confirmed when
//! the token is exercised.

use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use footballdecoded_core::{ConfirmationToken, Email};

use super::{StoreError, read_or_default, write_atomic};

/// One email's subscription lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    /// Normalized to lowercase; unique across the store.
    pub email: Email,
    pub subscribed_at: DateTime<Utc>,
    pub confirmed: bool,
    /// Present only while unconfirmed; discarded for good on confirmation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_token: Option<ConfirmationToken>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// What happened on a subscribe call.
#[derive(Debug)]
pub enum SubscribeOutcome {
    /// The email is already subscribed and confirmed; nothing changed.
    AlreadyConfirmed,
    /// The email is subscribed but unconfirmed; the existing token should
    /// be re-sent rather than a new one minted. `None` if the record has
    /// somehow lost its token, in which case there is nothing to re-send.
    PendingConfirmation { token: Option<ConfirmationToken> },
    /// A new unconfirmed record was created with a fresh token.
    Subscribed { token: ConfirmationToken },
}

/// Read-only aggregate over the subscriber list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterStats {
    pub total: usize,
    pub confirmed: usize,
    pub pending: usize,
    /// The 5 most-recently-stored confirmed subscribers, newest first
    /// (store order, not necessarily true recency).
    pub latest: Vec<Subscriber>,
    /// Confirmed subscribers whose subscription is within the trailing 7 days.
    pub recent_count: usize,
}

/// File-backed store for the newsletter subscriber list.
pub struct NewsletterStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles across concurrent requests.
    mutations: Mutex<()>,
}

impl NewsletterStore {
    /// Create a store backed by the given subscribers file.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            mutations: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<Vec<Subscriber>, StoreError> {
        read_or_default(&self.path).await
    }

    /// Subscribe an email, idempotently.
    ///
    /// The email must already be normalized (trimmed, lowercased).
    /// Matching against existing records is case-insensitive regardless.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the subscriber file cannot be read or written.
    pub async fn subscribe(
        &self,
        email: &Email,
        ip: Option<String>,
        user_agent: Option<String>,
    ) -> Result<SubscribeOutcome, StoreError> {
        let _guard = self.mutations.lock().await;

        let mut subscribers = self.load().await?;

        if let Some(existing) = subscribers
            .iter()
            .find(|s| s.email.as_str().eq_ignore_ascii_case(email.as_str()))
        {
            if existing.confirmed {
                return Ok(SubscribeOutcome::AlreadyConfirmed);
            }
            return Ok(SubscribeOutcome::PendingConfirmation {
                token: existing.confirmation_token.clone(),
            });
        }

        let token = ConfirmationToken::generate();
        subscribers.push(Subscriber {
            email: email.clone(),
            subscribed_at: Utc::now(),
            confirmed: false,
            confirmation_token: Some(token.clone()),
            confirmed_at: None,
            ip,
            user_agent,
        });

        write_atomic(&self.path, &subscribers).await?;
        Ok(SubscribeOutcome::Subscribed { token })
    }

    /// Confirm a subscription by token, exactly once per token.
    ///
    /// Returns the subscriber's email on success. `None` means the token
    /// matched no record - either it never existed or it was already used,
    /// since a token is cleared the moment it confirms.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the subscriber file cannot be read or written.
    pub async fn confirm(&self, token: &str) -> Result<Option<Email>, StoreError> {
        let _guard = self.mutations.lock().await;

        let mut subscribers = self.load().await?;

        let Some(subscriber) = subscribers.iter_mut().find(|s| {
            s.confirmation_token
                .as_ref()
                .is_some_and(|t| t.as_str() == token)
        }) else {
            return Ok(None);
        };

        subscriber.confirmed = true;
        subscriber.confirmed_at = Some(Utc::now());
        subscriber.confirmation_token = None;
        let email = subscriber.email.clone();

        write_atomic(&self.path, &subscribers).await?;
        Ok(Some(email))
    }

    /// Compute the read-only stats aggregate.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the subscriber file cannot be read.
    pub async fn stats(&self) -> Result<NewsletterStats, StoreError> {
        let subscribers = self.load().await?;

        let confirmed: Vec<&Subscriber> = subscribers.iter().filter(|s| s.confirmed).collect();
        let week_ago = Utc::now() - Duration::days(7);
        let recent_count = confirmed
            .iter()
            .filter(|s| s.subscribed_at > week_ago)
            .count();
        let latest = confirmed
            .iter()
            .rev()
            .take(5)
            .map(|s| (*s).clone())
            .collect();

        Ok(NewsletterStats {
            total: subscribers.len(),
            confirmed: confirmed.len(),
            pending: subscribers.len() - confirmed.len(),
            latest,
            recent_count,
        })
    }
}
