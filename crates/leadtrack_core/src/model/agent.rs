//! Sales agent model.
//!
//! Agents carry a required display name plus free-form attributes that the
//! core stores but never interprets.

use super::validation::{non_blank, require, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Stable sales agent identifier.
pub type AgentId = Uuid;

/// Persisted sales agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesAgent {
    pub id: AgentId,
    pub name: String,
    /// Unconstrained caller fields, flattened into the serialized record.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
    pub created_at: i64,
}

/// Candidate payload for agent creation.
///
/// Every key other than `name` is kept verbatim as an attribute.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AgentDraft {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl AgentDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            attributes: Map::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

impl SalesAgent {
    /// Validates a creation payload and assigns a fresh id.
    pub fn try_from_draft(draft: AgentDraft, now_ms: i64) -> Result<Self, ValidationError> {
        let name = non_blank("name", &require("name", draft.name)?)?;
        let mut attributes = draft.attributes;
        // Reserved keys would collide with the flattened record.
        for reserved in ["id", "createdAt"] {
            attributes.remove(reserved);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            attributes,
            created_at: now_ms,
        })
    }
}

/// Resolved agent reference embedded in lead views.
///
/// `name` is `None` when the referenced agent no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRef {
    pub id: AgentId,
    pub name: Option<String>,
}
