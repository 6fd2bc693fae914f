//! Resend API client for transactional email.
//!
//! Sends the newsletter confirmation email containing the single-use
//! confirmation link. Dispatch happens from a background task after the
//! subscriber record is persisted, so a provider outage never fails a
//! subscription request.

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;

use footballdecoded_core::{ConfirmationToken, Email};

use crate::config::ResendConfig;

/// Resend API base URL.
const BASE_URL: &str = "https://api.resend.com";

/// Errors that can occur when interacting with the Resend API.
#[derive(Debug, Error)]
pub enum ResendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to build the client or parse a response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Resend API client for confirmation email dispatch.
#[derive(Clone)]
pub struct ResendClient {
    client: reqwest::Client,
    from: String,
}

impl ResendClient {
    /// Create a new Resend API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ResendConfig) -> Result<Self, ResendError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.api_key.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| ResendError::Parse(format!("Invalid API key format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            from: config.from.clone(),
        })
    }

    /// Send the confirmation email embedding the token link.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or returns a non-success
    /// status.
    pub async fn send_confirmation(
        &self,
        to: &Email,
        token: &ConfirmationToken,
        base_url: &str,
    ) -> Result<(), ResendError> {
        let confirmation_url = confirmation_url(base_url, token);

        let body = serde_json::json!({
            "from": self.from,
            "to": [to.as_str()],
            "subject": "⚽ Confirm your FootballDecoded subscription",
            "html": confirmation_email_html(&confirmation_url),
        });

        let response = self
            .client
            .post(format!("{BASE_URL}/emails"))
            .json(&body)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ResendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

/// The link a subscriber follows to prove control of their inbox.
fn confirmation_url(base_url: &str, token: &ConfirmationToken) -> String {
    format!("{base_url}/newsletter/confirm?token={}", token.as_str())
}

/// Render the confirmation email body.
fn confirmation_email_html(confirmation_url: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Confirm your subscription</title>
</head>
<body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">

  <div style="text-align: center; margin-bottom: 30px;">
    <h1 style="color: #0ea5e9; font-size: 28px; margin-bottom: 10px;">⚽ FootballDecoded</h1>
    <p style="color: #666; font-size: 16px;">Confirm your newsletter subscription</p>
  </div>

  <div style="background: #f8fafc; border-radius: 8px; padding: 25px; margin-bottom: 25px;">
    <h2 style="color: #334155; font-size: 20px; margin-bottom: 15px;">Hi!</h2>
    <p style="margin-bottom: 15px;">Thanks for subscribing to the <strong>FootballDecoded Newsletter</strong>.</p>
    <p style="margin-bottom: 20px;">Every Monday you'll get the <strong>5 stories that mattered in football</strong>, told with judgement, without noise, and with my own analysis.</p>
  </div>

  <div style="text-align: center; margin: 30px 0;">
    <a href="{confirmation_url}"
       style="background: #0ea5e9; color: white; padding: 12px 24px; text-decoration: none; border-radius: 6px; font-weight: 500; display: inline-block;">
      Confirm subscription
    </a>
  </div>

  <div style="background: #f1f5f9; border-radius: 6px; padding: 15px; margin-top: 25px;">
    <p style="margin: 0; font-size: 14px; color: #64748b;">
      If you didn't subscribe to this newsletter, you can ignore this email.
    </p>
    <p style="margin: 10px 0 0 0; font-size: 12px; color: #94a3b8;">
      Confirmation URL: {confirmation_url}
    </p>
  </div>

  <div style="text-align: center; margin-top: 30px; padding-top: 20px; border-top: 1px solid #e2e8f0;">
    <p style="margin: 0; font-size: 14px; color: #64748b;">
      FootballDecoded • Modern football, decoded
    </p>
  </div>

</body>
</html>"##
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_url_embeds_token() {
        let token = ConfirmationToken::generate();
        let url = confirmation_url("https://footballdecoded.com", &token);
        assert_eq!(
            url,
            format!(
                "https://footballdecoded.com/newsletter/confirm?token={}",
                token.as_str()
            )
        );
    }

    #[test]
    fn test_email_html_contains_link() {
        let html = confirmation_email_html("https://example.com/newsletter/confirm?token=abc");
        // The link appears both as the button href and as plain text
        assert_eq!(
            html.matches("https://example.com/newsletter/confirm?token=abc")
                .count(),
            2
        );
        assert!(html.contains("FootballDecoded"));
    }
}
