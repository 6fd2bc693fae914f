//! Per-article comment documents.
//!
//! One JSON document per article slug, created lazily on first write.
//! Top-level comments own their replies; a reply cannot nest further.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use footballdecoded_core::{CommentId, Email, ReplyId, Slug};

use super::{StoreError, write_atomic};

/// A top-level remark on an article.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub name: String,
    pub email: Email,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Always true at creation; the fetch path still filters on it.
    pub approved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub replies: Vec<Reply>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// A reply nested under a top-level comment.
///
/// The parent relationship is not stored on the reply; it is determined by
/// which comment's list the reply lives in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: ReplyId,
    pub name: String,
    pub email: Email,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub approved: bool,
    #[serde(default)]
    pub likes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// The whole-document unit of storage: one article's comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentsDocument {
    pub post_slug: Slug,
    pub comments: Vec<Comment>,
}

impl CommentsDocument {
    fn empty(slug: Slug) -> Self {
        Self {
            post_slug: slug,
            comments: Vec::new(),
        }
    }
}

/// User-supplied fields for a new comment or reply, already validated and
/// sanitized by the handler.
#[derive(Debug, Clone)]
pub struct CommentDraft {
    pub name: String,
    pub email: Email,
    pub message: String,
    pub avatar: Option<String>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// File-backed store for per-article comment documents.
pub struct CommentStore {
    dir: PathBuf,
    /// Serializes read-modify-write cycles across concurrent requests.
    mutations: Mutex<()>,
}

impl CommentStore {
    /// Create a store rooted at the given comments directory.
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            mutations: Mutex::new(()),
        }
    }

    fn document_path(&self, slug: &Slug) -> PathBuf {
        self.dir.join(format!("{slug}.json"))
    }

    async fn load(&self, slug: &Slug) -> Result<CommentsDocument, StoreError> {
        load_document(&self.document_path(slug), slug).await
    }

    /// Fetch an article's document filtered to approved comments.
    ///
    /// A missing document is an empty one, never an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file exists but cannot be read or parsed.
    pub async fn fetch_approved(&self, slug: &Slug) -> Result<CommentsDocument, StoreError> {
        let mut doc = self.load(slug).await?;
        doc.comments.retain(|c| c.approved);
        Ok(doc)
    }

    /// Append a new auto-approved comment and persist the whole document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the document cannot be read or written.
    pub async fn add_comment(
        &self,
        slug: &Slug,
        draft: CommentDraft,
    ) -> Result<Comment, StoreError> {
        let _guard = self.mutations.lock().await;

        let mut doc = self.load(slug).await?;
        let comment = Comment {
            id: CommentId::generate(),
            name: draft.name,
            email: draft.email,
            message: draft.message,
            timestamp: Utc::now(),
            approved: true,
            ip: draft.ip,
            user_agent: draft.user_agent,
            likes: 0,
            replies: Vec::new(),
            avatar: draft.avatar,
        };
        doc.comments.push(comment.clone());

        write_atomic(&self.document_path(slug), &doc).await?;
        Ok(comment)
    }

    /// Increment the like counter of a comment or reply by exactly 1.
    ///
    /// Top-level comments are searched first, then the replies of every
    /// comment. Returns the new like count, or `None` if the id matches
    /// nothing in either scope.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the document cannot be read or written.
    pub async fn like(&self, slug: &Slug, id: &str) -> Result<Option<u64>, StoreError> {
        let _guard = self.mutations.lock().await;

        let mut doc = self.load(slug).await?;
        let Some(likes) = bump_likes(&mut doc, id) else {
            return Ok(None);
        };

        write_atomic(&self.document_path(slug), &doc).await?;
        Ok(Some(likes))
    }

    /// Append a reply to a top-level comment and persist the whole document.
    ///
    /// Returns `None` if `parent_id` does not match any top-level comment.
    /// A reply id is deliberately not a valid parent: replies cannot nest.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the document cannot be read or written.
    pub async fn add_reply(
        &self,
        slug: &Slug,
        parent_id: &str,
        draft: CommentDraft,
    ) -> Result<Option<Reply>, StoreError> {
        let _guard = self.mutations.lock().await;

        let mut doc = self.load(slug).await?;
        let Some(parent) = doc
            .comments
            .iter_mut()
            .find(|c| c.id.as_str() == parent_id)
        else {
            return Ok(None);
        };

        let reply = Reply {
            id: ReplyId::generate(),
            name: draft.name,
            email: draft.email,
            message: draft.message,
            timestamp: Utc::now(),
            approved: true,
            likes: 0,
            avatar: draft.avatar,
        };
        parent.replies.push(reply.clone());

        write_atomic(&self.document_path(slug), &doc).await?;
        Ok(Some(reply))
    }
}

async fn load_document(path: &Path, slug: &Slug) -> Result<CommentsDocument, StoreError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Ok(CommentsDocument::empty(slug.clone()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Find `id` among top-level comments first, then nested replies, and
/// increment its like counter. Returns the new count.
fn bump_likes(doc: &mut CommentsDocument, id: &str) -> Option<u64> {
    if let Some(comment) = doc.comments.iter_mut().find(|c| c.id.as_str() == id) {
        comment.likes += 1;
        return Some(comment.likes);
    }

    for comment in &mut doc.comments {
        if let Some(reply) = comment.replies.iter_mut().find(|r| r.id.as_str() == id) {
            reply.likes += 1;
            return Some(reply.likes);
        }
    }

    None
}
