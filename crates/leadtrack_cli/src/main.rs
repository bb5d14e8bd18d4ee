//! `leadtrack` command-line entry point.
//!
//! # Responsibility
//! - Map subcommands onto the core services over one SQLite connection.
//! - Print results as pretty JSON on stdout.
//!
//! # Exit codes
//! - `0` on success.
//! - `1` on any operation failure.
//! - `2` when the addressed record does not exist.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use leadtrack_core::ServiceError;
use log::info;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod commands;

use commands::{AgentCommand, CommentCommand, LeadCommand, ReportCommand};

/// Track sales leads, their comments and pipeline reports.
#[derive(Parser)]
#[command(name = "leadtrack")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// SQLite database file
    #[arg(
        long,
        global = true,
        env = "LEADTRACK_DB",
        default_value = "leadtrack.sqlite3",
        value_name = "FILE"
    )]
    db: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "LEADTRACK_LOG_LEVEL")]
    log_level: Option<String>,

    /// Directory for rolling log files; logging stays off when unset
    #[arg(long, global = true, env = "LEADTRACK_LOG_DIR", value_name = "DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sales agent management
    Agent {
        #[command(subcommand)]
        command: AgentCommand,
    },

    /// Lead lifecycle operations
    Lead {
        #[command(subcommand)]
        command: LeadCommand,
    },

    /// Comment threads on leads
    Comment {
        #[command(subcommand)]
        command: CommentCommand,
    },

    /// Aggregate pipeline reports
    Report {
        #[command(subcommand)]
        command: ReportCommand,
    },
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        init_logging(cli.log_level.as_deref(), log_dir)?;
    }

    let conn = leadtrack_core::db::open_db(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
    info!("event=cli_start module=cli status=ok");

    match cli.command {
        Commands::Agent { command } => commands::agent::handle_command(command, &conn),
        Commands::Lead { command } => commands::lead::handle_command(command, &conn),
        Commands::Comment { command } => commands::comment::handle_command(command, &conn),
        Commands::Report { command } => commands::report::handle_command(command, &conn),
    }
}

fn init_logging(level: Option<&str>, log_dir: &Path) -> Result<()> {
    let level = level.unwrap_or(leadtrack_core::default_log_level());
    let log_dir = std::path::absolute(log_dir)
        .with_context(|| format!("failed to resolve log directory `{}`", log_dir.display()))?;
    let log_dir = log_dir
        .to_str()
        .with_context(|| format!("log directory `{}` is not UTF-8", log_dir.display()))?;
    leadtrack_core::init_logging(level, log_dir).map_err(anyhow::Error::msg)
}

fn exit_code_for(err: &anyhow::Error) -> u8 {
    let not_found = err
        .downcast_ref::<ServiceError>()
        .is_some_and(ServiceError::is_not_found);
    if not_found {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::{exit_code_for, init_logging, Cli};
    use clap::{CommandFactory, Parser};
    use leadtrack_core::{parse_id, ServiceError};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "leadtrack",
            "lead",
            "filter",
            "--status",
            "Closed",
            "--db",
            "/tmp/leads.sqlite3",
        ])
        .unwrap();
        assert_eq!(cli.db.to_str(), Some("/tmp/leads.sqlite3"));
    }

    #[test]
    fn not_found_maps_to_exit_code_two() {
        let id = parse_id("id", "00000000-0000-4000-8000-000000000000").unwrap();
        let not_found = anyhow::Error::new(ServiceError::NotFound(id));
        assert_eq!(exit_code_for(&not_found), 2);

        let failure = anyhow::anyhow!("disk full");
        assert_eq!(exit_code_for(&failure), 1);
    }

    #[test]
    fn logging_without_level_uses_build_default() {
        let log_dir = tempfile::tempdir().unwrap();
        init_logging(None, log_dir.path()).unwrap();
        init_logging(Some(leadtrack_core::default_log_level()), log_dir.path())
            .expect("explicit default level matches the implicit one");
    }
}
