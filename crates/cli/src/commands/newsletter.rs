//! Newsletter management commands.
//!
//! All commands read from the site's stats endpoint
//! (`GET /api/newsletter/subscribe`); they never touch the data files
//! directly, so they work against a deployed instance as well as a local
//! one.

use std::path::Path;

use chrono::{DateTime, Utc};
use footballdecoded_core::Email;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur during newsletter operations.
#[derive(Debug, Error)]
pub enum NewsletterError {
    /// The API could not be reached or returned a transport error.
    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API returned HTTP {0}")]
    Api(reqwest::StatusCode),

    /// An export file could not be written.
    #[error("Failed to write export file: {0}")]
    Io(#[from] std::io::Error),
}

/// Subscriber record as returned by the stats endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberRecord {
    pub email: Email,
    pub subscribed_at: DateTime<Utc>,
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default)]
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl SubscriberRecord {
    /// Best available date for display: confirmation if present, else signup.
    fn display_date(&self) -> DateTime<Utc> {
        self.confirmed_at.unwrap_or(self.subscribed_at)
    }
}

/// Stats payload as returned by the stats endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: usize,
    pub confirmed: usize,
    pub pending: usize,
    #[serde(default)]
    pub latest: Vec<SubscriberRecord>,
    #[serde(default)]
    pub recent_count: usize,
}

async fn fetch_stats(base_url: &str) -> Result<Stats, NewsletterError> {
    let url = format!("{base_url}/api/newsletter/subscribe");
    tracing::debug!(url = %url, "Fetching newsletter stats");

    let response = reqwest::get(&url).await?;
    if !response.status().is_success() {
        return Err(NewsletterError::Api(response.status()));
    }

    Ok(response.json().await?)
}

/// Show subscriber statistics and the latest confirmed addresses.
pub async fn stats(base_url: &str) -> Result<(), NewsletterError> {
    let stats = fetch_stats(base_url).await?;

    tracing::info!("Newsletter statistics ({base_url})");
    tracing::info!("  Total:       {}", stats.total);
    tracing::info!("  Confirmed:   {}", stats.confirmed);
    tracing::info!("  Pending:     {}", stats.pending);
    tracing::info!("  Last 7 days: {}", stats.recent_count);

    let confirmed: Vec<_> = stats.latest.iter().filter(|s| s.confirmed).collect();
    if !confirmed.is_empty() {
        tracing::info!("Latest confirmed:");
        for (index, sub) in confirmed.iter().enumerate() {
            tracing::info!(
                "  {}. {} - {}",
                index + 1,
                sub.email,
                sub.display_date().format("%Y-%m-%d")
            );
        }
    }

    Ok(())
}

/// Export confirmed emails to local files under `out_dir`.
///
/// Writes three files: a plain address list, an address-with-date list,
/// and a dated CSV with both timestamps.
pub async fn export(base_url: &str, out_dir: &Path) -> Result<(), NewsletterError> {
    let stats = fetch_stats(base_url).await?;

    let confirmed: Vec<_> = stats.latest.iter().filter(|s| s.confirmed).collect();
    if confirmed.is_empty() {
        tracing::info!("No confirmed emails to export");
        return Ok(());
    }

    tokio::fs::create_dir_all(out_dir).await?;

    let emails = confirmed
        .iter()
        .map(|s| s.email.as_ref())
        .collect::<Vec<_>>()
        .join("\n");
    let emails_file = out_dir.join("confirmed-emails.txt");
    tokio::fs::write(&emails_file, emails).await?;

    let with_dates = confirmed
        .iter()
        .map(|s| format!("{} - {}", s.email, s.display_date().format("%Y-%m-%d")))
        .collect::<Vec<_>>()
        .join("\n");
    let dates_file = out_dir.join("emails-with-dates.txt");
    tokio::fs::write(&dates_file, with_dates).await?;

    let today = Utc::now().format("%Y-%m-%d");
    let mut csv = vec!["email,confirmed_at,subscribed_at".to_string()];
    csv.extend(confirmed.iter().map(|s| {
        let confirmed_at = s
            .confirmed_at
            .map_or_else(|| "N/A".to_string(), |d| d.to_rfc3339());
        format!(
            "{},{},{}",
            s.email,
            confirmed_at,
            s.subscribed_at.to_rfc3339()
        )
    }));
    let csv_file = out_dir.join(format!("emails-{today}.csv"));
    tokio::fs::write(&csv_file, csv.join("\n")).await?;

    tracing::info!("Exported {} confirmed emails:", confirmed.len());
    tracing::info!("  {}", emails_file.display());
    tracing::info!("  {}", dates_file.display());
    tracing::info!("  {}", csv_file.display());

    Ok(())
}

/// Check connectivity to the API and dump the raw stats payload.
pub async fn test(base_url: &str) -> Result<(), NewsletterError> {
    let url = format!("{base_url}/api/newsletter/subscribe");
    tracing::info!("Testing connection to {url}");

    let response = reqwest::get(&url).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(NewsletterError::Api(status));
    }

    let body: serde_json::Value = response.json().await?;
    let pretty = serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string());
    tracing::info!("Connection OK ({status})");
    tracing::info!("{pretty}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_payload_deserializes_from_wire_format() {
        let raw = r#"{
            "total": 3,
            "confirmed": 2,
            "pending": 1,
            "latest": [
                {
                    "email": "a@example.com",
                    "subscribedAt": "2026-08-01T10:00:00Z",
                    "confirmed": true,
                    "confirmedAt": "2026-08-02T09:30:00Z"
                }
            ],
            "recentCount": 1
        }"#;

        let stats: Stats = serde_json::from_str(raw).unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.recent_count, 1);
        assert_eq!(stats.latest.len(), 1);
        assert!(stats.latest[0].confirmed);
    }

    #[test]
    fn display_date_prefers_confirmation() {
        let raw = r#"{
            "email": "a@example.com",
            "subscribedAt": "2026-08-01T10:00:00Z",
            "confirmed": false
        }"#;

        let sub: SubscriberRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(sub.display_date(), sub.subscribed_at);
        assert_eq!(sub.confirmed_at, None);
    }
}
