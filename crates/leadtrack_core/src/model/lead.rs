//! Lead domain model.
//!
//! # Responsibility
//! - Define the lead record and its enumerated fields.
//! - Turn loosely typed caller payloads into validated leads and patches.
//! - Stamp `closed_at` when a patch moves a lead into `Closed`.
//!
//! # Invariants
//! - `closed_at` is set at the moment a patch sets status to `Closed`.
//! - `closed_at` is never cleared when status later moves away from `Closed`.
//! - `time_to_close` is at least one day.

use super::agent::{AgentId, AgentRef};
use super::validation::{non_blank, parse_id, positive_u32, require, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable lead identifier.
pub type LeadId = Uuid;

/// Channel a lead came in through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadSource {
    Website,
    Referral,
    #[serde(rename = "Cold Call")]
    ColdCall,
    Advertisement,
    Email,
    Other,
}

impl LeadSource {
    pub const ALL: [Self; 6] = [
        Self::Website,
        Self::Referral,
        Self::ColdCall,
        Self::Advertisement,
        Self::Email,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Website => "Website",
            Self::Referral => "Referral",
            Self::ColdCall => "Cold Call",
            Self::Advertisement => "Advertisement",
            Self::Email => "Email",
            Self::Other => "Other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|source| source.as_str() == value)
    }
}

/// Lifecycle position of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    #[serde(rename = "Proposal Sent")]
    ProposalSent,
    Closed,
}

impl LeadStatus {
    pub const ALL: [Self; 5] = [
        Self::New,
        Self::Contacted,
        Self::Qualified,
        Self::ProposalSent,
        Self::Closed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Contacted => "Contacted",
            Self::Qualified => "Qualified",
            Self::ProposalSent => "Proposal Sent",
            Self::Closed => "Closed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }

    /// Whether a lead in this status still counts toward the pipeline.
    pub fn is_open(self) -> bool {
        self != Self::Closed
    }
}

/// Sales priority of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LeadPriority {
    High,
    #[default]
    Medium,
    Low,
}

impl LeadPriority {
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|priority| priority.as_str() == value)
    }
}

/// Canonical lead record as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub source: LeadSource,
    /// Owning agent. May point at an agent that no longer exists.
    pub sales_agent: AgentId,
    pub status: LeadStatus,
    pub tags: Vec<String>,
    /// Expected days to close, always >= 1.
    pub time_to_close: u32,
    pub priority: LeadPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Candidate payload for lead creation.
///
/// Fields stay loosely typed so that absent or out-of-set values can be
/// reported as [`ValidationError`]s instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadDraft {
    pub name: Option<String>,
    pub source: Option<String>,
    pub sales_agent: Option<String>,
    pub status: Option<String>,
    pub tags: Option<Vec<String>>,
    pub time_to_close: Option<i64>,
    pub priority: Option<String>,
}

impl LeadDraft {
    /// Builds a draft carrying only the required fields.
    pub fn new(
        name: impl Into<String>,
        source: LeadSource,
        sales_agent: AgentId,
        time_to_close: i64,
    ) -> Self {
        Self {
            name: Some(name.into()),
            source: Some(source.as_str().to_string()),
            sales_agent: Some(sales_agent.to_string()),
            time_to_close: Some(time_to_close),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: LeadStatus) -> Self {
        self.status = Some(status.as_str().to_string());
        self
    }

    pub fn with_priority(mut self, priority: LeadPriority) -> Self {
        self.priority = Some(priority.as_str().to_string());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }
}

/// Partial update for an existing lead. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadPatch {
    pub name: Option<String>,
    pub source: Option<String>,
    pub sales_agent: Option<String>,
    pub status: Option<String>,
    pub tags: Option<Vec<String>>,
    pub time_to_close: Option<i64>,
    pub priority: Option<String>,
}

impl LeadPatch {
    /// Patch that only moves the lead to `status`.
    pub fn status(status: LeadStatus) -> Self {
        Self {
            status: Some(status.as_str().to_string()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl Lead {
    /// Validates a creation payload and builds a new lead with a fresh id.
    ///
    /// # Contract
    /// - `status` defaults to `New`, `priority` to `Medium`, `tags` to empty.
    /// - `closed_at` starts unset, even for a draft created directly in `Closed`.
    pub fn try_from_draft(draft: LeadDraft, now_ms: i64) -> Result<Self, ValidationError> {
        let name = non_blank("name", &require("name", draft.name)?)?;
        let source = parse_source(&require("source", draft.source)?)?;
        let sales_agent = parse_id("salesAgent", &require("salesAgent", draft.sales_agent)?)?;
        let time_to_close =
            positive_u32("timeToClose", require("timeToClose", draft.time_to_close)?)?;
        let status = draft
            .status
            .as_deref()
            .map(parse_status)
            .transpose()?
            .unwrap_or_default();
        let priority = draft
            .priority
            .as_deref()
            .map(parse_priority)
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            source,
            sales_agent,
            status,
            tags: draft.tags.unwrap_or_default(),
            time_to_close,
            priority,
            closed_at: None,
            created_at: now_ms,
            updated_at: now_ms,
        })
    }

    /// Merges `patch` into this lead.
    ///
    /// Every supplied field is validated before any is applied, so a rejected
    /// patch leaves the lead unchanged.
    ///
    /// # Contract
    /// - Setting status to `Closed` stamps `closed_at = now_ms`, even when the
    ///   lead was already closed.
    /// - Any other change keeps `closed_at` as it was.
    /// - `updated_at` becomes `now_ms`.
    pub fn apply_patch(&mut self, patch: &LeadPatch, now_ms: i64) -> Result<(), ValidationError> {
        let name = patch
            .name
            .as_deref()
            .map(|value| non_blank("name", value))
            .transpose()?;
        let source = patch.source.as_deref().map(parse_source).transpose()?;
        let sales_agent = patch
            .sales_agent
            .as_deref()
            .map(|value| parse_id("salesAgent", value))
            .transpose()?;
        let status = patch.status.as_deref().map(parse_status).transpose()?;
        let time_to_close = patch
            .time_to_close
            .map(|value| positive_u32("timeToClose", value))
            .transpose()?;
        let priority = patch.priority.as_deref().map(parse_priority).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(source) = source {
            self.source = source;
        }
        if let Some(sales_agent) = sales_agent {
            self.sales_agent = sales_agent;
        }
        if let Some(tags) = patch.tags.as_ref() {
            self.tags = tags.clone();
        }
        if let Some(time_to_close) = time_to_close {
            self.time_to_close = time_to_close;
        }
        if let Some(priority) = priority {
            self.priority = priority;
        }
        if let Some(status) = status {
            self.status = status;
            if status == LeadStatus::Closed {
                self.closed_at = Some(now_ms);
            }
        }
        self.updated_at = now_ms;
        Ok(())
    }

    /// Checks field-level invariants of an already typed lead.
    pub fn validate(&self) -> Result<(), ValidationError> {
        non_blank("name", &self.name)?;
        if self.time_to_close == 0 {
            return Err(ValidationError::NotPositive {
                field: "timeToClose",
                value: 0,
            });
        }
        Ok(())
    }
}

/// Lead projection with the owning agent resolved for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadView {
    pub id: LeadId,
    pub name: String,
    pub source: LeadSource,
    pub sales_agent: AgentRef,
    pub status: LeadStatus,
    pub tags: Vec<String>,
    pub time_to_close: u32,
    pub priority: LeadPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl LeadView {
    /// Joins `lead` with its agent's display name (`None` when dangling).
    pub fn resolve(lead: Lead, agent_name: Option<String>) -> Self {
        Self {
            id: lead.id,
            name: lead.name,
            source: lead.source,
            sales_agent: AgentRef {
                id: lead.sales_agent,
                name: agent_name,
            },
            status: lead.status,
            tags: lead.tags,
            time_to_close: lead.time_to_close,
            priority: lead.priority,
            closed_at: lead.closed_at,
            created_at: lead.created_at,
            updated_at: lead.updated_at,
        }
    }
}

fn parse_source(value: &str) -> Result<LeadSource, ValidationError> {
    LeadSource::parse(value).ok_or_else(|| ValidationError::InvalidValue {
        field: "source",
        value: value.to_string(),
    })
}

fn parse_status(value: &str) -> Result<LeadStatus, ValidationError> {
    LeadStatus::parse(value).ok_or_else(|| ValidationError::InvalidValue {
        field: "status",
        value: value.to_string(),
    })
}

fn parse_priority(value: &str) -> Result<LeadPriority, ValidationError> {
    LeadPriority::parse(value).ok_or_else(|| ValidationError::InvalidValue {
        field: "priority",
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acme() -> Lead {
        Lead::try_from_draft(
            LeadDraft::new("Acme", LeadSource::Referral, Uuid::new_v4(), 10),
            1_000,
        )
        .unwrap()
    }

    #[test]
    fn draft_defaults_status_priority_and_tags() {
        let lead = acme();
        assert_eq!(lead.status, LeadStatus::New);
        assert_eq!(lead.priority, LeadPriority::Medium);
        assert!(lead.tags.is_empty());
        assert_eq!(lead.closed_at, None);
        assert_eq!(lead.created_at, 1_000);
        assert_eq!(lead.updated_at, 1_000);
    }

    #[test]
    fn draft_rejects_missing_and_out_of_set_fields() {
        let agent = Uuid::new_v4();

        let mut missing_source = LeadDraft::new("Acme", LeadSource::Email, agent, 5);
        missing_source.source = None;
        assert_eq!(
            Lead::try_from_draft(missing_source, 0),
            Err(ValidationError::MissingField("source"))
        );

        let mut bad_source = LeadDraft::new("Acme", LeadSource::Email, agent, 5);
        bad_source.source = Some("Carrier Pigeon".to_string());
        assert!(matches!(
            Lead::try_from_draft(bad_source, 0),
            Err(ValidationError::InvalidValue { field: "source", .. })
        ));

        let bad_status = LeadDraft {
            status: Some("closed".to_string()),
            ..LeadDraft::new("Acme", LeadSource::Email, agent, 5)
        };
        assert!(matches!(
            Lead::try_from_draft(bad_status, 0),
            Err(ValidationError::InvalidValue { field: "status", .. })
        ));

        assert!(matches!(
            Lead::try_from_draft(LeadDraft::new("Acme", LeadSource::Email, agent, 0), 0),
            Err(ValidationError::NotPositive { field: "timeToClose", value: 0 })
        ));

        assert_eq!(
            Lead::try_from_draft(LeadDraft::new("   ", LeadSource::Email, agent, 5), 0),
            Err(ValidationError::BlankField("name"))
        );
    }

    #[test]
    fn draft_created_closed_has_no_closed_at() {
        let lead = Lead::try_from_draft(
            LeadDraft::new("Acme", LeadSource::Referral, Uuid::new_v4(), 10)
                .with_status(LeadStatus::Closed),
            1_000,
        )
        .unwrap();
        assert_eq!(lead.status, LeadStatus::Closed);
        assert_eq!(lead.closed_at, None);
    }

    #[test]
    fn draft_keeps_name_as_given() {
        let lead = Lead::try_from_draft(
            LeadDraft::new("  Acme ", LeadSource::Referral, Uuid::new_v4(), 10),
            1_000,
        )
        .unwrap();
        assert_eq!(lead.name, "  Acme ");
    }

    #[test]
    fn closing_patch_stamps_closed_at_at_transition_time() {
        let mut lead = acme();
        lead.apply_patch(&LeadPatch::status(LeadStatus::Closed), 5_000)
            .unwrap();
        assert_eq!(lead.status, LeadStatus::Closed);
        assert_eq!(lead.closed_at, Some(5_000));
        assert_eq!(lead.updated_at, 5_000);
    }

    #[test]
    fn non_status_patch_keeps_closed_at() {
        let mut lead = acme();
        lead.apply_patch(&LeadPatch::status(LeadStatus::Closed), 5_000)
            .unwrap();

        let rename = LeadPatch {
            name: Some("Acme Corp".to_string()),
            ..LeadPatch::default()
        };
        lead.apply_patch(&rename, 9_000).unwrap();
        assert_eq!(lead.name, "Acme Corp");
        assert_eq!(lead.closed_at, Some(5_000));
    }

    #[test]
    fn reopening_does_not_clear_closed_at() {
        let mut lead = acme();
        lead.apply_patch(&LeadPatch::status(LeadStatus::Closed), 5_000)
            .unwrap();
        lead.apply_patch(&LeadPatch::status(LeadStatus::Contacted), 6_000)
            .unwrap();
        assert_eq!(lead.status, LeadStatus::Contacted);
        assert_eq!(lead.closed_at, Some(5_000));
    }

    #[test]
    fn rejected_patch_leaves_lead_untouched() {
        let mut lead = acme();
        let before = lead.clone();
        let patch = LeadPatch {
            name: Some("Renamed".to_string()),
            priority: Some("Urgent".to_string()),
            ..LeadPatch::default()
        };
        assert!(lead.apply_patch(&patch, 2_000).is_err());
        assert_eq!(lead, before);
    }

    #[test]
    fn labels_round_trip_through_parse() {
        for status in LeadStatus::ALL {
            assert_eq!(LeadStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(LeadSource::parse("Cold Call"), Some(LeadSource::ColdCall));
        assert_eq!(LeadPriority::parse("high"), None);
    }

    #[test]
    fn lead_serializes_with_external_labels() {
        let mut lead = acme();
        lead.status = LeadStatus::ProposalSent;
        let json = serde_json::to_value(&lead).unwrap();
        assert_eq!(json["status"], "Proposal Sent");
        assert_eq!(json["source"], "Referral");
        assert_eq!(json["timeToClose"], 10);
        assert!(json.get("closedAt").is_none());
    }
}
