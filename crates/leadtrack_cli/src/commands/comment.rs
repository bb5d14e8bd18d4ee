use anyhow::Result;
use clap::Subcommand;
use leadtrack_core::{CommentDraft, CommentService, SqliteAgentRepository, SqliteCommentRepository};
use rusqlite::Connection;

use super::{parse_payload, parse_record_id, print_json};

#[derive(Subcommand)]
pub enum CommentCommand {
    /// Append a comment to a lead
    Add {
        #[arg(value_name = "LEAD_ID")]
        lead: String,

        /// Comment payload, e.g. `{"author":"<agent id>","commentText":"..."}`; `-` reads stdin
        #[arg(long, value_name = "JSON")]
        json: String,
    },

    /// List a lead's comments in creation order
    List {
        #[arg(value_name = "LEAD_ID")]
        lead: String,
    },
}

pub fn handle_command(command: CommentCommand, conn: &Connection) -> Result<()> {
    let service = CommentService::new(
        SqliteCommentRepository::try_new(conn)?,
        SqliteAgentRepository::try_new(conn)?,
    );

    match command {
        CommentCommand::Add { lead, json } => {
            let lead = parse_record_id("lead", &lead)?;
            let draft: CommentDraft = parse_payload(&json)?;
            print_json(&service.add_comment(lead, draft)?)
        }
        CommentCommand::List { lead } => {
            let lead = parse_record_id("lead", &lead)?;
            print_json(&service.list_comments(lead)?)
        }
    }
}
