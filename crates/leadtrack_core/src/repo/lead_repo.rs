//! Lead repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `leads` table.
//! - Provide filtered find, count, and grouped-count primitives for reports.
//!
//! # Invariants
//! - Listing order is insertion order (`rowid ASC`).
//! - Grouped counts are ordered by group key ascending.
//! - `sales_agent_id` is not a foreign key; dangling agents are allowed.

use super::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use crate::model::agent::AgentId;
use crate::model::lead::{Lead, LeadId, LeadPatch, LeadPriority, LeadSource, LeadStatus};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const LEAD_COLUMNS: &str = "id,
    name,
    source,
    sales_agent_id,
    status,
    tags_json,
    time_to_close,
    priority,
    closed_at,
    created_at,
    updated_at";

/// Equality/range filter over leads. Absent fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadFilter {
    pub status: Option<LeadStatus>,
    /// Excludes leads in this status.
    pub status_not: Option<LeadStatus>,
    pub sales_agent: Option<AgentId>,
    /// Inclusive lower bound on `updated_at`, epoch ms.
    pub updated_since: Option<i64>,
}

/// Column used by [`LeadRepository::count_leads_grouped`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadGroupKey {
    Status,
    SalesAgent,
}

impl LeadGroupKey {
    fn column(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::SalesAgent => "sales_agent_id",
        }
    }
}

/// One row of a grouped count: the raw group key and its member count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    pub key: String,
    pub count: u64,
}

/// Repository interface for lead persistence.
pub trait LeadRepository {
    fn create_lead(&self, lead: &Lead) -> RepoResult<LeadId>;
    /// Writes the columns `patch` supplies, taking the validated values from
    /// `lead`, plus `updated_at` and, when the patch closes the lead,
    /// `closed_at`. Other columns keep their stored value. `NotFound` when absent.
    fn update_lead(&self, lead: &Lead, patch: &LeadPatch) -> RepoResult<()>;
    fn get_lead(&self, id: LeadId) -> RepoResult<Option<Lead>>;
    fn list_leads(&self, filter: &LeadFilter) -> RepoResult<Vec<Lead>>;
    /// Removes a lead and returns the removed row, if any.
    fn delete_lead(&self, id: LeadId) -> RepoResult<Option<Lead>>;
    fn count_leads(&self, filter: &LeadFilter) -> RepoResult<u64>;
    fn count_leads_grouped(
        &self,
        filter: &LeadFilter,
        key: LeadGroupKey,
    ) -> RepoResult<Vec<GroupCount>>;
}

/// SQLite-backed lead repository.
pub struct SqliteLeadRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLeadRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl LeadRepository for SqliteLeadRepository<'_> {
    fn create_lead(&self, lead: &Lead) -> RepoResult<LeadId> {
        lead.validate()?;

        self.conn.execute(
            "INSERT INTO leads (
                id,
                name,
                source,
                sales_agent_id,
                status,
                tags_json,
                time_to_close,
                priority,
                closed_at,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
            params![
                lead.id.to_string(),
                lead.name.as_str(),
                lead.source.as_str(),
                lead.sales_agent.to_string(),
                lead.status.as_str(),
                tags_to_db(&lead.tags)?,
                i64::from(lead.time_to_close),
                lead.priority.as_str(),
                lead.closed_at,
                lead.created_at,
                lead.updated_at,
            ],
        )?;

        Ok(lead.id)
    }

    fn update_lead(&self, lead: &Lead, patch: &LeadPatch) -> RepoResult<()> {
        lead.validate()?;

        let mut assignments: Vec<&str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();
        if patch.name.is_some() {
            assignments.push("name = ?");
            bind_values.push(Value::Text(lead.name.clone()));
        }
        if patch.source.is_some() {
            assignments.push("source = ?");
            bind_values.push(Value::Text(lead.source.as_str().to_string()));
        }
        if patch.sales_agent.is_some() {
            assignments.push("sales_agent_id = ?");
            bind_values.push(Value::Text(lead.sales_agent.to_string()));
        }
        if patch.status.is_some() {
            assignments.push("status = ?");
            bind_values.push(Value::Text(lead.status.as_str().to_string()));
            if lead.status == LeadStatus::Closed {
                assignments.push("closed_at = ?");
                bind_values.push(lead.closed_at.map_or(Value::Null, Value::Integer));
            }
        }
        if patch.tags.is_some() {
            assignments.push("tags_json = ?");
            bind_values.push(Value::Text(tags_to_db(&lead.tags)?));
        }
        if patch.time_to_close.is_some() {
            assignments.push("time_to_close = ?");
            bind_values.push(Value::Integer(i64::from(lead.time_to_close)));
        }
        if patch.priority.is_some() {
            assignments.push("priority = ?");
            bind_values.push(Value::Text(lead.priority.as_str().to_string()));
        }
        assignments.push("updated_at = ?");
        bind_values.push(Value::Integer(lead.updated_at));
        bind_values.push(Value::Text(lead.id.to_string()));

        let sql = format!("UPDATE leads SET {} WHERE id = ?;", assignments.join(", "));
        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;

        if changed == 0 {
            return Err(RepoError::NotFound(lead.id));
        }

        Ok(())
    }

    fn get_lead(&self, id: LeadId) -> RepoResult<Option<Lead>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_lead_row(row)?));
        }

        Ok(None)
    }

    fn list_leads(&self, filter: &LeadFilter) -> RepoResult<Vec<Lead>> {
        let (where_sql, bind_values) = filter_to_sql(filter);
        let sql = format!("SELECT {LEAD_COLUMNS} FROM leads {where_sql} ORDER BY rowid ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut leads = Vec::new();
        while let Some(row) = rows.next()? {
            leads.push(parse_lead_row(row)?);
        }

        Ok(leads)
    }

    fn delete_lead(&self, id: LeadId) -> RepoResult<Option<Lead>> {
        let deleted = self
            .conn
            .query_row(
                &format!("DELETE FROM leads WHERE id = ?1 RETURNING {LEAD_COLUMNS};"),
                [id.to_string()],
                |row| Ok(parse_lead_row(row)),
            )
            .optional()?;

        deleted.transpose()
    }

    fn count_leads(&self, filter: &LeadFilter) -> RepoResult<u64> {
        let (where_sql, bind_values) = filter_to_sql(filter);
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM leads {where_sql};"),
            params_from_iter(bind_values),
            |row| row.get(0),
        )?;
        count_to_u64(count)
    }

    fn count_leads_grouped(
        &self,
        filter: &LeadFilter,
        key: LeadGroupKey,
    ) -> RepoResult<Vec<GroupCount>> {
        let (where_sql, bind_values) = filter_to_sql(filter);
        let column = key.column();
        let sql = format!(
            "SELECT {column} AS group_key, COUNT(*) AS group_count
             FROM leads {where_sql}
             GROUP BY {column}
             ORDER BY {column} ASC;"
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut groups = Vec::new();
        while let Some(row) = rows.next()? {
            groups.push(GroupCount {
                key: row.get("group_key")?,
                count: count_to_u64(row.get("group_count")?)?,
            });
        }

        Ok(groups)
    }
}

fn filter_to_sql(filter: &LeadFilter) -> (String, Vec<Value>) {
    let mut sql = String::from("WHERE 1 = 1");
    let mut bind_values: Vec<Value> = Vec::new();

    if let Some(status) = filter.status {
        sql.push_str(" AND status = ?");
        bind_values.push(Value::Text(status.as_str().to_string()));
    }
    if let Some(status) = filter.status_not {
        sql.push_str(" AND status <> ?");
        bind_values.push(Value::Text(status.as_str().to_string()));
    }
    if let Some(agent) = filter.sales_agent {
        sql.push_str(" AND sales_agent_id = ?");
        bind_values.push(Value::Text(agent.to_string()));
    }
    if let Some(since) = filter.updated_since {
        sql.push_str(" AND updated_at >= ?");
        bind_values.push(Value::Integer(since));
    }

    (sql, bind_values)
}

fn parse_lead_row(row: &Row<'_>) -> RepoResult<Lead> {
    let id_text: String = row.get("id")?;
    let agent_text: String = row.get("sales_agent_id")?;

    let source_text: String = row.get("source")?;
    let source = LeadSource::parse(&source_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid lead source `{source_text}` in leads.source"))
    })?;

    let status_text: String = row.get("status")?;
    let status = LeadStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid lead status `{status_text}` in leads.status"))
    })?;

    let priority_text: String = row.get("priority")?;
    let priority = LeadPriority::parse(&priority_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid lead priority `{priority_text}` in leads.priority"
        ))
    })?;

    let tags_text: String = row.get("tags_json")?;
    let tags: Vec<String> = serde_json::from_str(&tags_text).map_err(|err| {
        RepoError::InvalidData(format!("invalid tags payload in leads.tags_json: {err}"))
    })?;

    let time_to_close_raw: i64 = row.get("time_to_close")?;
    let time_to_close = u32::try_from(time_to_close_raw).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid time_to_close value `{time_to_close_raw}` in leads.time_to_close"
        ))
    })?;

    let lead = Lead {
        id: parse_uuid(&id_text, "leads.id")?,
        name: row.get("name")?,
        source,
        sales_agent: parse_uuid(&agent_text, "leads.sales_agent_id")?,
        status,
        tags,
        time_to_close,
        priority,
        closed_at: row.get("closed_at")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    lead.validate()?;
    Ok(lead)
}

fn tags_to_db(tags: &[String]) -> RepoResult<String> {
    serde_json::to_string(tags)
        .map_err(|err| RepoError::InvalidData(format!("failed to encode lead tags: {err}")))
}

fn count_to_u64(count: i64) -> RepoResult<u64> {
    u64::try_from(count)
        .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
}
