//! Newsletter subscription route handlers.
//!
//! Subscriptions are double opt-in: the address is persisted first as
//! pending, then a confirmation email is dispatched in the background so a
//! mail provider outage never loses a subscriber.

use std::time::Duration;

use axum::{
    Json,
    extract::{Query, State},
};
use footballdecoded_core::{ConfirmationToken, Email};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::ClientMeta;
use crate::state::AppState;
use crate::store::{NewsletterStats, SubscribeOutcome};

/// Attempts made to deliver a confirmation email before giving up.
const SEND_ATTEMPTS: u32 = 3;

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
}

/// Subscribe an email address to the newsletter.
#[instrument(skip_all)]
pub async fn subscribe(
    State(state): State<AppState>,
    meta: ClientMeta,
    Json(body): Json<SubscribeRequest>,
) -> Result<Json<SubscribeResponse>> {
    let Some(raw) = body.email.filter(|s| !s.trim().is_empty()) else {
        return Err(AppError::Validation("Email is required".to_string()));
    };

    let email = Email::parse(&raw.trim().to_lowercase())
        .map_err(|_| AppError::Validation("Invalid email address".to_string()))?;

    let outcome = state
        .newsletter()
        .subscribe(&email, Some(meta.ip), Some(meta.user_agent))
        .await?;

    let response = match outcome {
        SubscribeOutcome::AlreadyConfirmed => {
            tracing::info!(email = %email, "Subscribe request for confirmed address");
            SubscribeResponse {
                message: "You're already subscribed and confirmed.".to_string(),
                email: None,
            }
        }
        SubscribeOutcome::PendingConfirmation { token } => {
            if let Some(token) = token {
                spawn_confirmation_email(&state, email.clone(), token);
            }
            SubscribeResponse {
                message: "We've re-sent the confirmation email. Check your inbox.".to_string(),
                email: None,
            }
        }
        SubscribeOutcome::Subscribed { token } => {
            tracing::info!(email = %email, "New newsletter subscriber");
            spawn_confirmation_email(&state, email.clone(), token);
            SubscribeResponse {
                message: "Almost there! We've sent you a confirmation email. Check your inbox."
                    .to_string(),
                email: Some(email),
            }
        }
    };

    Ok(Json(response))
}

/// Subscriber statistics (owner-facing).
#[instrument(skip_all)]
pub async fn stats(State(state): State<AppState>) -> Result<Json<NewsletterStats>> {
    let stats = state.newsletter().stats().await?;
    Ok(Json(stats))
}

#[derive(Debug, Deserialize)]
pub struct ConfirmParams {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    pub message: String,
    pub email: Email,
}

/// Confirm a pending subscription via its emailed token.
#[instrument(skip_all)]
pub async fn confirm(
    State(state): State<AppState>,
    Query(params): Query<ConfirmParams>,
) -> Result<Json<ConfirmResponse>> {
    let Some(token) = params.token.filter(|t| !t.is_empty()) else {
        return Err(AppError::Validation(
            "Confirmation token is required".to_string(),
        ));
    };

    let email = state
        .newsletter()
        .confirm(&token)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Invalid or already used confirmation token".to_string())
        })?;

    tracing::info!(email = %email, "Newsletter subscription confirmed");

    Ok(Json(ConfirmResponse {
        message: "Subscription confirmed! You'll receive the newsletter every Monday.".to_string(),
        email,
    }))
}

/// Dispatch the confirmation email on a background task.
///
/// The subscriber is already persisted when this runs; delivery failures are
/// logged and retried with backoff but never surfaced to the client, who can
/// re-request the email by subscribing again.
fn spawn_confirmation_email(state: &AppState, email: Email, token: ConfirmationToken) {
    let state = state.clone();

    tokio::spawn(async move {
        let Some(mailer) = state.mailer() else {
            tracing::warn!(
                email = %email,
                "RESEND_API_KEY not configured; skipping confirmation email"
            );
            return;
        };

        let base_url = &state.config().base_url;
        let mut delay = Duration::from_secs(1);

        for attempt in 1..=SEND_ATTEMPTS {
            match mailer.send_confirmation(&email, &token, base_url).await {
                Ok(()) => {
                    tracing::info!(email = %email, "Confirmation email sent");
                    return;
                }
                Err(e) if attempt < SEND_ATTEMPTS => {
                    tracing::warn!(
                        email = %email,
                        error = %e,
                        attempt,
                        "Confirmation email failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(e) => {
                    tracing::error!(
                        email = %email,
                        error = %e,
                        "Giving up on confirmation email after {SEND_ATTEMPTS} attempts"
                    );
                }
            }
        }
    });
}
