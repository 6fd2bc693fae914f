//! Flat-file JSON stores.
//!
//! # Layout
//!
//! Everything lives under the configured data directory:
//!
//! - `comments/{slug}.json` - one document per article, holding its
//!   top-level comments and their nested replies
//! - `newsletter-subscribers.json` - one array holding every subscriber
//!
//! Both stores follow the same discipline: read the whole document,
//! mutate it in memory, write it back pretty-printed. Two safeguards keep
//! that discipline honest:
//!
//! - every write goes to a sibling temp file first and is renamed into
//!   place, so a crash mid-write never leaves a truncated document
//! - each store serializes its read-modify-write cycles behind an async
//!   mutex, so concurrent likes or replies cannot silently drop an update
//!
//! The stores expose narrow domain operations (fetch, append, increment)
//! rather than raw file access, so the persistence mechanism could be
//! swapped for a real document store without touching the handlers.

pub mod comments;
pub mod newsletter;

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use comments::{Comment, CommentDraft, CommentStore, Reply};
pub use newsletter::{NewsletterStats, NewsletterStore, SubscribeOutcome, Subscriber};

/// Errors that can occur in the file-backed stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file holds JSON we cannot parse.
    #[error("store data corruption: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Read a JSON document, returning the default value if the file is absent.
///
/// A missing backing file is an empty-store condition, not an error.
pub(crate) async fn read_or_default<T>(path: &Path) -> Result<T, StoreError>
where
    T: DeserializeOwned + Default,
{
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(e.into()),
    }
}

/// Write a JSON document atomically: serialize pretty-printed, write to a
/// sibling temp file, rename into place.
pub(crate) async fn write_atomic<T>(path: &Path, value: &T) -> Result<(), StoreError>
where
    T: Serialize,
{
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let bytes = serde_json::to_vec_pretty(value)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);

    tokio::fs::write(&tmp, &bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
