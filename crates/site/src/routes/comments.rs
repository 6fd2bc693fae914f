//! Comment route handlers.
//!
//! Comments are scoped per article slug and stored as flat JSON documents.
//! Creation and replies run through the same sanitization pipeline; likes
//! and replies arrive on a shared `/actions` endpoint dispatched by an
//! `action` field in the body.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use footballdecoded_core::{CommentId, Email, Slug};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::ClientMeta;
use crate::state::AppState;
use crate::store::{Comment, CommentDraft, Reply};

/// Maximum length a comment or reply message is truncated to.
const MAX_MESSAGE_LEN: usize = 500;

/// Minimum message length for a top-level comment.
const MIN_COMMENT_LEN: usize = 10;

/// Minimum message length for a reply.
const MIN_REPLY_LEN: usize = 5;

/// Keywords that flag a comment as spam when present in the name or message.
const SPAM_KEYWORDS: &[&str] = &["viagra", "casino", "bitcoin", "crypto", "loan", "mortgage"];

/// Public view of a reply, stripped of email and client metadata.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyView {
    pub id: String,
    pub name: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub likes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl From<&Reply> for ReplyView {
    fn from(reply: &Reply) -> Self {
        Self {
            id: reply.id.as_str().to_string(),
            name: reply.name.clone(),
            message: reply.message.clone(),
            timestamp: reply.timestamp,
            likes: reply.likes,
            avatar: reply.avatar.clone(),
        }
    }
}

/// Public view of a comment, stripped of email and client metadata.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: String,
    pub name: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub likes: u64,
    pub replies: Vec<ReplyView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl From<&Comment> for CommentView {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id.as_str().to_string(),
            name: comment.name.clone(),
            message: comment.message.clone(),
            timestamp: comment.timestamp,
            likes: comment.likes,
            replies: comment.replies.iter().map(ReplyView::from).collect(),
            avatar: comment.avatar.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub post_slug: Slug,
    pub comments: Vec<CommentView>,
    pub total: usize,
}

/// List approved comments for an article.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ListResponse>> {
    let slug = parse_slug(&slug)?;
    let document = state.comments().fetch_approved(&slug).await?;

    let comments: Vec<CommentView> = document.comments.iter().map(CommentView::from).collect();
    let total = comments.len();

    Ok(Json(ListResponse {
        post_slug: document.post_slug,
        comments,
        total,
    }))
}

/// Comment creation request body.
///
/// Fields are optional so that missing ones produce a validation error
/// instead of a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedCommentView {
    pub id: CommentId,
    pub name: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateCommentResponse {
    pub message: String,
    pub comment: CreatedCommentView,
}

/// Create a new comment on an article.
#[instrument(skip_all, fields(slug = %slug))]
pub async fn create(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    meta: ClientMeta,
    Json(body): Json<CreateCommentRequest>,
) -> Result<Json<CreateCommentResponse>> {
    let slug = parse_slug(&slug)?;

    let (Some(name), Some(email), Some(message)) = (
        non_empty(body.name),
        non_empty(body.email),
        non_empty(body.message),
    ) else {
        return Err(AppError::Validation("All fields are required".to_string()));
    };

    let email = parse_email(&email)?;
    let name = sanitize(&name);
    let message = sanitize(&message);

    if message.chars().count() < MIN_COMMENT_LEN {
        return Err(AppError::Validation(format!(
            "Comment must be at least {MIN_COMMENT_LEN} characters long"
        )));
    }

    if is_likely_spam(&name, &message) {
        tracing::warn!(slug = %slug, ip = %meta.ip, "Comment rejected as spam");
        return Err(AppError::Validation("Comment flagged as spam".to_string()));
    }

    let draft = CommentDraft {
        name,
        email,
        message,
        avatar: body.avatar,
        ip: Some(meta.ip),
        user_agent: Some(meta.user_agent),
    };

    let comment = state.comments().add_comment(&slug, draft).await?;
    tracing::info!(slug = %slug, id = %comment.id, "Comment published");

    Ok(Json(CreateCommentResponse {
        message: "Comment published successfully!".to_string(),
        comment: CreatedCommentView {
            id: comment.id,
            name: comment.name,
            message: comment.message,
            timestamp: comment.timestamp,
            avatar: comment.avatar,
        },
    }))
}

/// Body for the `/actions` endpoint. The `action` field selects the
/// operation; the remaining fields are per-action.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub comment_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub success: bool,
    pub likes: u64,
    pub comment_id: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedReplyView {
    pub id: String,
    pub name: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub likes: u64,
}

#[derive(Debug, Serialize)]
pub struct ReplyResponse {
    pub message: String,
    pub reply: CreatedReplyView,
}

/// Like or reply to a comment, dispatched on the `action` field.
#[instrument(skip_all, fields(slug = %slug))]
pub async fn actions(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    meta: ClientMeta,
    Json(body): Json<ActionRequest>,
) -> Result<axum::response::Response> {
    use axum::response::IntoResponse;

    let slug = parse_slug(&slug)?;

    match body.action.as_deref() {
        Some("like") => {
            let id = body.comment_id.unwrap_or_default();
            let likes = state
                .comments()
                .like(&slug, &id)
                .await?
                .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

            Ok(Json(LikeResponse {
                success: true,
                likes,
                comment_id: id,
            })
            .into_response())
        }
        Some("reply") => {
            let (Some(comment_id), Some(name), Some(email), Some(message)) = (
                non_empty(body.comment_id),
                non_empty(body.name),
                non_empty(body.email),
                non_empty(body.message),
            ) else {
                return Err(AppError::Validation("All fields are required".to_string()));
            };

            let email = parse_email(&email)?;
            let name = sanitize(&name);
            let message = sanitize(&message);

            if message.chars().count() < MIN_REPLY_LEN {
                return Err(AppError::Validation(format!(
                    "Reply must be at least {MIN_REPLY_LEN} characters long"
                )));
            }

            let draft = CommentDraft {
                name,
                email,
                message,
                avatar: body.avatar,
                ip: Some(meta.ip),
                user_agent: Some(meta.user_agent),
            };

            let reply = state
                .comments()
                .add_reply(&slug, &comment_id, draft)
                .await?
                .ok_or_else(|| AppError::NotFound("Parent comment not found".to_string()))?;
            tracing::info!(slug = %slug, parent = %comment_id, id = %reply.id, "Reply posted");

            Ok(Json(ReplyResponse {
                message: "Reply posted successfully!".to_string(),
                reply: CreatedReplyView {
                    id: reply.id.as_str().to_string(),
                    name: reply.name,
                    message: reply.message,
                    timestamp: reply.timestamp,
                    likes: reply.likes,
                },
            })
            .into_response())
        }
        _ => Err(AppError::Validation("Invalid action".to_string())),
    }
}

fn parse_slug(raw: &str) -> Result<Slug> {
    Slug::parse(raw).map_err(|e| AppError::Validation(e.to_string()))
}

fn parse_email(raw: &str) -> Result<Email> {
    Email::parse(&raw.trim().to_lowercase())
        .map_err(|_| AppError::Validation("Invalid email address".to_string()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Trim surrounding whitespace and cap the message at [`MAX_MESSAGE_LEN`]
/// characters.
fn sanitize(input: &str) -> String {
    input.trim().chars().take(MAX_MESSAGE_LEN).collect()
}

/// Heuristic spam check: known spam keywords or more than two links
/// anywhere in the name or message.
fn is_likely_spam(name: &str, message: &str) -> bool {
    let haystack = format!("{} {}", name.to_lowercase(), message.to_lowercase());

    if SPAM_KEYWORDS.iter().any(|kw| haystack.contains(kw)) {
        return true;
    }

    let link_count = haystack.matches("http://").count() + haystack.matches("https://").count();
    link_count > 2
}
