//! Payload validation shared by lead, agent and comment constructors.

use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Rejection reason for a candidate entity or patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field was not supplied.
    MissingField(&'static str),
    /// Text field is empty after trimming.
    BlankField(&'static str),
    /// Enumerated field holds a value outside its allowed set.
    InvalidValue { field: &'static str, value: String },
    /// Numeric field must be a positive integer.
    NotPositive { field: &'static str, value: i64 },
    /// Reference field is not a well-formed id.
    InvalidId { field: &'static str, value: String },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "`{field}` is required"),
            Self::BlankField(field) => write!(f, "`{field}` must not be blank"),
            Self::InvalidValue { field, value } => {
                write!(f, "`{value}` is not an allowed value for `{field}`")
            }
            Self::NotPositive { field, value } => {
                write!(f, "`{field}` must be a positive integer, got {value}")
            }
            Self::InvalidId { field, value } => {
                write!(f, "`{field}` is not a valid id: `{value}`")
            }
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require<T>(field: &'static str, value: Option<T>) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::MissingField(field))
}

/// Rejects whitespace-only text; accepted text is returned as given.
pub(crate) fn non_blank(field: &'static str, value: &str) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(value.to_string())
}

pub(crate) fn positive_u32(field: &'static str, value: i64) -> Result<u32, ValidationError> {
    match u32::try_from(value) {
        Ok(parsed) if parsed >= 1 => Ok(parsed),
        _ => Err(ValidationError::NotPositive { field, value }),
    }
}

/// Parses a textual entity reference.
pub fn parse_id(field: &'static str, value: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(value.trim()).map_err(|_| ValidationError::InvalidId {
        field,
        value: value.to_string(),
    })
}
