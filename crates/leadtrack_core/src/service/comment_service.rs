//! Comment thread service.
//!
//! # Responsibility
//! - Attach comments to leads and list a lead's thread.
//! - Replace raw author references with resolved author names.
//!
//! # Invariants
//! - Listing tolerates authors that no longer exist (`author_name = None`).
//! - Thread order is insertion order.
//! - The lead id is not checked for existence; comments may outlive leads.

use crate::model::comment::{Comment, CommentDraft, CommentView};
use crate::model::lead::LeadId;
use crate::model::now_epoch_ms;
use crate::repo::agent_repo::AgentRepository;
use crate::repo::comment_repo::CommentRepository;
use crate::service::{ServiceError, ServiceResult};
use log::info;

/// Comment thread manager over comment and agent repositories.
pub struct CommentService<C: CommentRepository, A: AgentRepository> {
    comments: C,
    agents: A,
}

impl<C: CommentRepository, A: AgentRepository> CommentService<C, A> {
    pub fn new(comments: C, agents: A) -> Self {
        Self { comments, agents }
    }

    /// Persists a comment on `lead` and returns its caller-facing view.
    pub fn add_comment(&self, lead: LeadId, draft: CommentDraft) -> ServiceResult<CommentView> {
        let comment = Comment::try_from_draft(lead, draft, now_epoch_ms())?;
        let id = self.comments.create_comment(&comment)?;
        info!("event=comment_add module=comment status=ok lead_id={lead} comment_id={id}");

        self.resolve_authors(vec![comment])?
            .pop()
            .ok_or(ServiceError::InconsistentState(
                "comment lost during author resolve",
            ))
    }

    /// Lists every comment bound to `lead`; empty when there are none.
    pub fn list_comments(&self, lead: LeadId) -> ServiceResult<Vec<CommentView>> {
        let comments = self.comments.list_comments_for_lead(lead)?;
        self.resolve_authors(comments)
    }

    fn resolve_authors(&self, comments: Vec<Comment>) -> ServiceResult<Vec<CommentView>> {
        let author_ids: Vec<_> = comments.iter().filter_map(|comment| comment.author).collect();
        let names = self.agents.agent_names(&author_ids)?;
        Ok(comments
            .into_iter()
            .map(|comment| {
                let author_name = comment.author.and_then(|id| names.get(&id).cloned());
                CommentView::new(comment, author_name)
            })
            .collect())
    }
}
