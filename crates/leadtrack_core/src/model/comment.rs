//! Lead comment model.
//!
//! Comments are immutable once created; the only projection handed to
//! callers is [`CommentView`], which exposes the author's resolved name
//! instead of the raw reference.

use super::agent::AgentId;
use super::lead::LeadId;
use super::validation::{non_blank, parse_id, require, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable comment identifier.
pub type CommentId = Uuid;

/// Persisted comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub lead: LeadId,
    /// `None` only for rows whose author column was never populated.
    pub author: Option<AgentId>,
    pub comment_text: String,
    pub created_at: i64,
}

/// Candidate payload for a new comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentDraft {
    pub comment_text: Option<String>,
    pub author: Option<String>,
}

impl CommentDraft {
    pub fn new(author: AgentId, comment_text: impl Into<String>) -> Self {
        Self {
            comment_text: Some(comment_text.into()),
            author: Some(author.to_string()),
        }
    }
}

impl Comment {
    /// Validates `draft` and binds the new comment to `lead`.
    pub fn try_from_draft(
        lead: LeadId,
        draft: CommentDraft,
        now_ms: i64,
    ) -> Result<Self, ValidationError> {
        let comment_text = non_blank("commentText", &require("commentText", draft.comment_text)?)?;
        let author = parse_id("author", &require("author", draft.author)?)?;

        Ok(Self {
            id: Uuid::new_v4(),
            lead,
            author: Some(author),
            comment_text,
            created_at: now_ms,
        })
    }
}

/// Caller-facing comment projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: CommentId,
    pub comment_text: String,
    /// `None` when the author reference no longer resolves.
    pub author_name: Option<String>,
    pub created_at: i64,
}

impl CommentView {
    pub fn new(comment: Comment, author_name: Option<String>) -> Self {
        Self {
            id: comment.id,
            comment_text: comment.comment_text,
            author_name,
            created_at: comment.created_at,
        }
    }
}
