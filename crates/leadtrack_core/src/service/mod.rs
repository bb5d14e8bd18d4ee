//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the operations exposed to callers.
//! - Resolve entity references by explicit fetch-and-merge against the
//!   agent repository.
//!
//! # Invariants
//! - Services hold no mutable state between calls.
//! - Failures are split into `NotFound` and operation failures only.

pub mod agent_service;
pub mod comment_service;
pub mod lead_service;
pub mod report_service;

use crate::model::agent::AgentId;
use crate::model::lead::{Lead, LeadView};
use crate::model::validation::ValidationError;
use crate::repo::agent_repo::AgentRepository;
use crate::repo::{RepoError, RepoResult};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error surfaced by every service operation.
#[derive(Debug)]
pub enum ServiceError {
    /// Well-formed request, but no record with this id exists.
    NotFound(Uuid),
    /// Validation, storage or decoding failure.
    Operation(RepoError),
    /// Internal mismatch between a write and its read-back.
    InconsistentState(&'static str),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "not found: {id}"),
            Self::Operation(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Operation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Operation(other),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Operation(RepoError::Validation(value))
    }
}

/// Resolves the owning agent of every lead with one batched name lookup.
pub(crate) fn resolve_leads<A: AgentRepository>(
    agents: &A,
    leads: Vec<Lead>,
) -> RepoResult<Vec<LeadView>> {
    let ids: Vec<AgentId> = leads.iter().map(|lead| lead.sales_agent).collect();
    let names = agents.agent_names(&ids)?;
    Ok(leads
        .into_iter()
        .map(|lead| {
            let name = names.get(&lead.sales_agent).cloned();
            LeadView::resolve(lead, name)
        })
        .collect())
}
