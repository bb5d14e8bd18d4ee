use anyhow::Result;
use clap::Subcommand;
use leadtrack_core::{
    LeadDraft, LeadPatch, LeadPriority, LeadQuery, LeadService, LeadStatus, ServiceError,
    SqliteAgentRepository, SqliteLeadRepository, ValidationError,
};
use rusqlite::Connection;

use super::{parse_payload, parse_record_id, print_json};

#[derive(Subcommand)]
pub enum LeadCommand {
    /// Create a lead from a JSON payload
    Create {
        /// Lead payload with name, source, salesAgent and timeToClose; `-` reads stdin
        #[arg(long, value_name = "JSON")]
        json: String,
    },

    /// List every lead
    List,

    /// Show one lead
    Get {
        #[arg(value_name = "LEAD_ID")]
        id: String,
    },

    /// List leads matching optional filters
    Filter {
        /// Only leads in this status
        #[arg(long)]
        status: Option<String>,

        /// Only leads owned by this agent id
        #[arg(long, value_name = "AGENT_ID")]
        agent: Option<String>,

        /// Leads with this priority are listed first
        #[arg(long)]
        priority: Option<String>,
    },

    /// Apply a partial JSON update to a lead
    Update {
        #[arg(value_name = "LEAD_ID")]
        id: String,

        /// Fields to change; `-` reads stdin
        #[arg(long, value_name = "JSON")]
        json: String,
    },

    /// Delete a lead and print the removed record
    Delete {
        #[arg(value_name = "LEAD_ID")]
        id: String,
    },
}

pub fn handle_command(command: LeadCommand, conn: &Connection) -> Result<()> {
    let service = LeadService::new(
        SqliteLeadRepository::try_new(conn)?,
        SqliteAgentRepository::try_new(conn)?,
    );

    match command {
        LeadCommand::Create { json } => {
            let draft: LeadDraft = parse_payload(&json)?;
            print_json(&service.create_lead(draft)?)
        }
        LeadCommand::List => print_json(&service.list_leads()?),
        LeadCommand::Get { id } => {
            let id = parse_record_id("id", &id)?;
            print_json(&service.get_lead(id)?)
        }
        LeadCommand::Filter {
            status,
            agent,
            priority,
        } => {
            let query = LeadQuery {
                status: status
                    .as_deref()
                    .map(|raw| parse_enum("status", raw, LeadStatus::parse))
                    .transpose()?,
                sales_agent: agent
                    .as_deref()
                    .map(|raw| parse_record_id("salesAgent", raw))
                    .transpose()?,
                priority: priority
                    .as_deref()
                    .map(|raw| parse_enum("priority", raw, LeadPriority::parse))
                    .transpose()?,
            };
            print_json(&service.list_leads_filtered(&query)?)
        }
        LeadCommand::Update { id, json } => {
            let id = parse_record_id("id", &id)?;
            let patch: LeadPatch = parse_payload(&json)?;
            print_json(&service.update_lead(id, &patch)?)
        }
        LeadCommand::Delete { id } => {
            let id = parse_record_id("id", &id)?;
            print_json(&service.delete_lead(id)?)
        }
    }
}

fn parse_enum<T>(field: &'static str, raw: &str, parse: fn(&str) -> Option<T>) -> Result<T> {
    parse(raw).ok_or_else(|| {
        anyhow::Error::new(ServiceError::from(ValidationError::InvalidValue {
            field,
            value: raw.to_string(),
        }))
    })
}
