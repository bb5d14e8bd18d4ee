//! Lead lifecycle service.
//!
//! # Responsibility
//! - Create, read, update and delete leads through the repository.
//! - Apply the closure side effect on status transitions.
//! - Provide filtered listings with priority-first ordering.
//!
//! # Invariants
//! - Every returned lead has its sales agent resolved by explicit lookup.
//! - Priority ordering is a stable two-way partition, never a full sort.
//! - Deleting a lead leaves its comments untouched.

use crate::model::agent::AgentId;
use crate::model::lead::{Lead, LeadDraft, LeadId, LeadPatch, LeadPriority, LeadStatus, LeadView};
use crate::model::now_epoch_ms;
use crate::repo::agent_repo::AgentRepository;
use crate::repo::lead_repo::{LeadFilter, LeadRepository};
use crate::repo::{RepoError, RepoResult};
use crate::service::{resolve_leads, ServiceError, ServiceResult};
use log::{info, warn};

/// Filter options for [`LeadService::list_leads_filtered`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadQuery {
    /// Equality constraint on status.
    pub status: Option<LeadStatus>,
    /// Equality constraint on owning agent.
    pub sales_agent: Option<AgentId>,
    /// Reorders results so this priority comes first. Does not filter.
    pub priority: Option<LeadPriority>,
}

/// Lead lifecycle manager over lead and agent repositories.
pub struct LeadService<L: LeadRepository, A: AgentRepository> {
    leads: L,
    agents: A,
}

impl<L: LeadRepository, A: AgentRepository> LeadService<L, A> {
    pub fn new(leads: L, agents: A) -> Self {
        Self { leads, agents }
    }

    /// Validates and persists a new lead, returning it with its agent resolved.
    pub fn create_lead(&self, draft: LeadDraft) -> ServiceResult<LeadView> {
        let lead = match Lead::try_from_draft(draft, now_epoch_ms()) {
            Ok(lead) => lead,
            Err(err) => {
                warn!("event=lead_create module=lead status=rejected reason={err}");
                return Err(err.into());
            }
        };

        let id = self.leads.create_lead(&lead)?;
        info!("event=lead_create module=lead status=ok lead_id={id}");
        self.read_back(id, "created lead not found in read-back")
    }

    /// Lists all leads in insertion order.
    pub fn list_leads(&self) -> ServiceResult<Vec<LeadView>> {
        let leads = self.leads.list_leads(&LeadFilter::default())?;
        Ok(resolve_leads(&self.agents, leads)?)
    }

    /// Gets one lead by id.
    pub fn get_lead(&self, id: LeadId) -> ServiceResult<LeadView> {
        let lead = self.leads.get_lead(id)?.ok_or(ServiceError::NotFound(id))?;
        Ok(self.resolve_one(lead)?)
    }

    /// Lists leads matching `query.status`/`query.sales_agent`, then moves
    /// leads with `query.priority` to the front.
    pub fn list_leads_filtered(&self, query: &LeadQuery) -> ServiceResult<Vec<LeadView>> {
        let filter = LeadFilter {
            status: query.status,
            sales_agent: query.sales_agent,
            ..LeadFilter::default()
        };
        let leads = self.leads.list_leads(&filter)?;
        let mut views = resolve_leads(&self.agents, leads)?;
        if let Some(priority) = query.priority {
            partition_by_priority(&mut views, priority);
        }
        Ok(views)
    }

    /// Merges `patch` into the lead.
    ///
    /// # Contract
    /// - A patch setting status to `Closed` stamps `closed_at` with the time
    ///   of this call in the same write.
    /// - Only the columns the patch supplies are written, so a concurrent
    ///   change to any other field is kept.
    /// - Returns `NotFound` when `id` does not exist.
    pub fn update_lead(&self, id: LeadId, patch: &LeadPatch) -> ServiceResult<LeadView> {
        let mut lead = self.leads.get_lead(id)?.ok_or(ServiceError::NotFound(id))?;
        let was_open = lead.status.is_open();

        if let Err(err) = lead.apply_patch(patch, now_epoch_ms()) {
            warn!("event=lead_update module=lead status=rejected lead_id={id} reason={err}");
            return Err(err.into());
        }
        self.leads.update_lead(&lead, patch)?;

        info!(
            "event=lead_update module=lead status=ok lead_id={id} lead_status={} closed_transition={} empty_patch={}",
            lead.status.as_str(),
            was_open && !lead.status.is_open(),
            patch.is_empty()
        );
        self.read_back(id, "updated lead not found in read-back")
    }

    /// Deletes the lead and returns the removed record.
    pub fn delete_lead(&self, id: LeadId) -> ServiceResult<Lead> {
        let removed = self.leads.delete_lead(id)?.ok_or(ServiceError::NotFound(id))?;
        info!("event=lead_delete module=lead status=ok lead_id={id}");
        Ok(removed)
    }

    fn read_back(&self, id: LeadId, details: &'static str) -> ServiceResult<LeadView> {
        let lead = self
            .leads
            .get_lead(id)?
            .ok_or(ServiceError::InconsistentState(details))?;
        Ok(self.resolve_one(lead)?)
    }

    fn resolve_one(&self, lead: Lead) -> RepoResult<LeadView> {
        resolve_leads(&self.agents, vec![lead])?
            .pop()
            .ok_or_else(|| RepoError::InvalidData("lead lost during agent resolve".to_string()))
    }
}

/// Moves every lead whose priority equals `priority` ahead of the rest.
///
/// Relative order inside both partitions is preserved; the other priority
/// levels are not ordered against each other.
pub fn partition_by_priority(leads: &mut [LeadView], priority: LeadPriority) {
    leads.sort_by_key(|lead| lead.priority != priority);
}
