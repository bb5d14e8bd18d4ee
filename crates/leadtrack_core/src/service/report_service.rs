//! Reporting engine over the lead collection.
//!
//! # Responsibility
//! - Compute last-week closures, closures per agent, pipeline size and
//!   status distribution.
//!
//! # Invariants
//! - Every report is read-only and evaluated against the clock at call time.
//! - Every report is defined over an empty collection (empty list or zero).
//! - Closure groups whose agent no longer exists are dropped from the
//!   per-agent report.

use crate::model::agent::AgentId;
use crate::model::lead::{LeadStatus, LeadView};
use crate::model::now_epoch_ms;
use crate::repo::agent_repo::AgentRepository;
use crate::repo::lead_repo::{GroupCount, LeadFilter, LeadGroupKey, LeadRepository};
use crate::repo::RepoError;
use crate::service::{resolve_leads, ServiceResult};
use serde::Serialize;
use uuid::Uuid;

/// Width of the "last week" window.
pub const LAST_WEEK_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Closed-lead count for one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentClosures {
    pub sales_agent_name: String,
    pub closed_leads_count: u64,
}

/// Number of leads not yet closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PipelineSize {
    pub count: u64,
}

/// Lead count for one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: LeadStatus,
    pub count: u64,
}

/// Read-only aggregate reports.
pub struct ReportService<L: LeadRepository, A: AgentRepository> {
    leads: L,
    agents: A,
}

impl<L: LeadRepository, A: AgentRepository> ReportService<L, A> {
    pub fn new(leads: L, agents: A) -> Self {
        Self { leads, agents }
    }

    /// Closed leads whose last update falls within the past seven days.
    pub fn last_week_closures(&self) -> ServiceResult<Vec<LeadView>> {
        let filter = LeadFilter {
            status: Some(LeadStatus::Closed),
            updated_since: Some(now_epoch_ms() - LAST_WEEK_MS),
            ..LeadFilter::default()
        };
        let leads = self.leads.list_leads(&filter)?;
        Ok(resolve_leads(&self.agents, leads)?)
    }

    /// Closed-lead counts per agent, highest count first.
    ///
    /// Agents without closed leads do not appear. Ties keep group order
    /// (ascending agent id).
    pub fn closures_by_agent(&self) -> ServiceResult<Vec<AgentClosures>> {
        let filter = LeadFilter {
            status: Some(LeadStatus::Closed),
            ..LeadFilter::default()
        };
        let groups = self
            .leads
            .count_leads_grouped(&filter, LeadGroupKey::SalesAgent)?
            .into_iter()
            .map(|group| Ok((parse_group_id(&group)?, group.count)))
            .collect::<Result<Vec<(AgentId, u64)>, RepoError>>()?;

        let ids: Vec<AgentId> = groups.iter().map(|(id, _)| *id).collect();
        let names = self.agents.agent_names(&ids)?;

        let mut report: Vec<AgentClosures> = groups
            .into_iter()
            .filter_map(|(id, count)| {
                names.get(&id).map(|name| AgentClosures {
                    sales_agent_name: name.clone(),
                    closed_leads_count: count,
                })
            })
            .collect();
        report.sort_by(|a, b| b.closed_leads_count.cmp(&a.closed_leads_count));
        Ok(report)
    }

    /// Count of leads in any status other than `Closed`.
    pub fn pipeline_size(&self) -> ServiceResult<PipelineSize> {
        let filter = LeadFilter {
            status_not: Some(LeadStatus::Closed),
            ..LeadFilter::default()
        };
        let count = self.leads.count_leads(&filter)?;
        Ok(PipelineSize { count })
    }

    /// Lead counts per status, sorted by status label ascending.
    ///
    /// Statuses with no leads do not appear.
    pub fn status_distribution(&self) -> ServiceResult<Vec<StatusCount>> {
        let mut report = self
            .leads
            .count_leads_grouped(&LeadFilter::default(), LeadGroupKey::Status)?
            .into_iter()
            .map(|group| {
                let status = LeadStatus::parse(&group.key).ok_or_else(|| {
                    RepoError::InvalidData(format!(
                        "invalid lead status `{}` in status group",
                        group.key
                    ))
                })?;
                Ok(StatusCount {
                    status,
                    count: group.count,
                })
            })
            .collect::<Result<Vec<StatusCount>, RepoError>>()?;
        report.sort_by(|a, b| a.status.as_str().cmp(b.status.as_str()));
        Ok(report)
    }
}

fn parse_group_id(group: &GroupCount) -> Result<Uuid, RepoError> {
    Uuid::parse_str(&group.key).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{}` in sales agent group",
            group.key
        ))
    })
}
