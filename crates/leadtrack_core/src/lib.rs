//! Core domain logic for LeadTrack.
//! This crate is the single source of truth for lead lifecycle and reporting rules.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging};
pub use model::agent::{AgentDraft, AgentId, AgentRef, SalesAgent};
pub use model::comment::{Comment, CommentDraft, CommentId, CommentView};
pub use model::lead::{
    Lead, LeadDraft, LeadId, LeadPatch, LeadPriority, LeadSource, LeadStatus, LeadView,
};
pub use model::validation::{parse_id, ValidationError};
pub use repo::agent_repo::{AgentRepository, SqliteAgentRepository};
pub use repo::comment_repo::{CommentRepository, SqliteCommentRepository};
pub use repo::lead_repo::{
    GroupCount, LeadFilter, LeadGroupKey, LeadRepository, SqliteLeadRepository,
};
pub use repo::{RepoError, RepoResult};
pub use service::agent_service::AgentService;
pub use service::comment_service::CommentService;
pub use service::lead_service::{partition_by_priority, LeadQuery, LeadService};
pub use service::report_service::{
    AgentClosures, PipelineSize, ReportService, StatusCount, LAST_WEEK_MS,
};
pub use service::{ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
