//! Subcommand implementations for the `leadtrack` CLI.

pub mod agent;
pub mod comment;
pub mod lead;
pub mod report;

pub use self::agent::AgentCommand;
pub use self::comment::CommentCommand;
pub use self::lead::LeadCommand;
pub use self::report::ReportCommand;

use anyhow::{Context, Result};
use leadtrack_core::{parse_id, ServiceError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Read;
use uuid::Uuid;

/// Writes `value` to stdout as pretty JSON.
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render output")?;
    println!("{rendered}");
    Ok(())
}

/// Decodes a JSON payload given inline, or read from stdin when `raw` is `-`.
pub(crate) fn parse_payload<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let text = if raw == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read payload from stdin")?;
        buffer
    } else {
        raw.to_string()
    };
    serde_json::from_str(&text).context("payload is not a valid JSON object")
}

/// Parses a record id argument; malformed ids are operation failures.
pub(crate) fn parse_record_id(field: &'static str, raw: &str) -> Result<Uuid> {
    parse_id(field, raw)
        .map_err(ServiceError::from)
        .map_err(anyhow::Error::new)
}
