use anyhow::Result;
use clap::Subcommand;
use leadtrack_core::{AgentDraft, AgentService, SqliteAgentRepository};
use rusqlite::Connection;

use super::{parse_payload, print_json};

#[derive(Subcommand)]
pub enum AgentCommand {
    /// Register a sales agent from a JSON payload
    Create {
        /// Agent payload, e.g. `{"name":"Ana","email":"ana@example.com"}`; `-` reads stdin
        #[arg(long, value_name = "JSON")]
        json: String,
    },

    /// List all sales agents
    List,
}

pub fn handle_command(command: AgentCommand, conn: &Connection) -> Result<()> {
    let service = AgentService::new(SqliteAgentRepository::try_new(conn)?);

    match command {
        AgentCommand::Create { json } => {
            let draft: AgentDraft = parse_payload(&json)?;
            print_json(&service.create_agent(draft)?)
        }
        AgentCommand::List => print_json(&service.list_agents()?),
    }
}
