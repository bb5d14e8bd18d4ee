//! Sales agent repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Listing order is insertion order.
//! - Name lookups silently skip ids with no matching agent.

use super::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use crate::model::agent::{AgentId, SalesAgent};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use serde_json::{Map, Value as JsonValue};
use std::collections::{BTreeSet, HashMap};

const AGENT_SELECT_SQL: &str = "SELECT
    id,
    name,
    attributes_json,
    created_at
FROM sales_agents";

/// Repository interface for sales agents.
pub trait AgentRepository {
    fn create_agent(&self, agent: &SalesAgent) -> RepoResult<AgentId>;
    fn get_agent(&self, id: AgentId) -> RepoResult<Option<SalesAgent>>;
    fn list_agents(&self) -> RepoResult<Vec<SalesAgent>>;
    /// Resolves display names for `ids`; missing agents are absent from the map.
    fn agent_names(&self, ids: &[AgentId]) -> RepoResult<HashMap<AgentId, String>>;
}

/// SQLite-backed agent repository.
pub struct SqliteAgentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAgentRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl AgentRepository for SqliteAgentRepository<'_> {
    fn create_agent(&self, agent: &SalesAgent) -> RepoResult<AgentId> {
        let attributes_json = serde_json::to_string(&agent.attributes).map_err(|err| {
            RepoError::InvalidData(format!("failed to encode agent attributes: {err}"))
        })?;

        self.conn.execute(
            "INSERT INTO sales_agents (id, name, attributes_json, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                agent.id.to_string(),
                agent.name.as_str(),
                attributes_json,
                agent.created_at,
            ],
        )?;

        Ok(agent.id)
    }

    fn get_agent(&self, id: AgentId) -> RepoResult<Option<SalesAgent>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{AGENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_agent_row(row)?));
        }
        Ok(None)
    }

    fn list_agents(&self) -> RepoResult<Vec<SalesAgent>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{AGENT_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut agents = Vec::new();
        while let Some(row) = rows.next()? {
            agents.push(parse_agent_row(row)?);
        }
        Ok(agents)
    }

    fn agent_names(&self, ids: &[AgentId]) -> RepoResult<HashMap<AgentId, String>> {
        let unique: BTreeSet<AgentId> = ids.iter().copied().collect();
        if unique.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = vec!["?"; unique.len()].join(", ");
        let bind_values: Vec<Value> = unique
            .iter()
            .map(|id| Value::Text(id.to_string()))
            .collect();
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, name FROM sales_agents WHERE id IN ({placeholders});"
        ))?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;

        let mut names = HashMap::with_capacity(unique.len());
        while let Some(row) = rows.next()? {
            let id_text: String = row.get("id")?;
            names.insert(parse_uuid(&id_text, "sales_agents.id")?, row.get("name")?);
        }
        Ok(names)
    }
}

fn parse_agent_row(row: &Row<'_>) -> RepoResult<SalesAgent> {
    let id_text: String = row.get("id")?;
    let attributes_text: String = row.get("attributes_json")?;
    let attributes: Map<String, JsonValue> =
        serde_json::from_str(&attributes_text).map_err(|err| {
            RepoError::InvalidData(format!(
                "invalid attributes payload in sales_agents.attributes_json: {err}"
            ))
        })?;

    Ok(SalesAgent {
        id: parse_uuid(&id_text, "sales_agents.id")?,
        name: row.get("name")?,
        attributes,
        created_at: row.get("created_at")?,
    })
}
