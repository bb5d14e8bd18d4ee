use anyhow::Result;
use clap::Subcommand;
use leadtrack_core::{ReportService, SqliteAgentRepository, SqliteLeadRepository};
use rusqlite::Connection;

use super::print_json;

#[derive(Subcommand)]
pub enum ReportCommand {
    /// Leads closed during the past seven days
    LastWeek,

    /// Closed-lead counts per sales agent
    ByAgent,

    /// Number of leads not yet closed
    Pipeline,

    /// Lead counts per status
    Distribution,
}

pub fn handle_command(command: ReportCommand, conn: &Connection) -> Result<()> {
    let service = ReportService::new(
        SqliteLeadRepository::try_new(conn)?,
        SqliteAgentRepository::try_new(conn)?,
    );

    match command {
        ReportCommand::LastWeek => print_json(&service.last_week_closures()?),
        ReportCommand::ByAgent => print_json(&service.closures_by_agent()?),
        ReportCommand::Pipeline => print_json(&service.pipeline_size()?),
        ReportCommand::Distribution => print_json(&service.status_distribution()?),
    }
}
