//! Canonical domain records for training-batch administration.
//!
//! # Responsibility
//! - Define the entity shapes persisted through the record store.
//! - Validate field-level invariants before any write path runs.
//!
//! # Invariants
//! - Every entity is identified by an opaque string key, unique within its
//!   collection; keys are immutable and never reused.
//! - Cross-entity references (batch -> trainer, trainee -> batch) are weak:
//!   plain identifier fields checked by the repository, never by the store.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

pub mod assessment;
pub mod attendance;
pub mod batch;
pub mod trainee;
pub mod user;

static CALENDAR_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("calendar date pattern is valid"));

/// Field-level validation error raised before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyField(&'static str),
    BadDate(String),
    BadStatus(String),
    BadRole(String),
    NegativeCapacity(i64),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "field `{field}` must not be empty"),
            Self::BadDate(value) => {
                write!(f, "`{value}` is not a calendar date (expected YYYY-MM-DD)")
            }
            Self::BadStatus(value) => {
                write!(f, "`{value}` is not an attendance status (expected P or A)")
            }
            Self::BadRole(value) => {
                write!(f, "`{value}` is not a user role (expected Owner or Trainer)")
            }
            Self::NegativeCapacity(value) => {
                write!(f, "batch capacity must not be negative, got {value}")
            }
        }
    }
}

impl Error for ValidationError {}

/// Checks that `value` has calendar-date shape (`YYYY-MM-DD`, no time part).
pub fn is_calendar_date(value: &str) -> bool {
    CALENDAR_DATE_RE.is_match(value)
}

pub(crate) fn require_calendar_date(value: &str) -> Result<(), ValidationError> {
    if is_calendar_date(value) {
        Ok(())
    } else {
        Err(ValidationError::BadDate(value.to_string()))
    }
}

pub(crate) fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyField(field))
    } else {
        Ok(())
    }
}

/// Generates a prefixed short identifier, e.g. `TR-1a2b3c4d`.
///
/// The suffix is the first 8 characters of a v4 UUID, matching the id
/// format advertised to the front end.
pub fn new_prefixed_id(prefix: &str) -> String {
    let raw = Uuid::new_v4().to_string();
    format!("{prefix}{}", &raw[..8])
}

/// Generates a full hyphenated v4 UUID for event-like rows.
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{is_calendar_date, new_prefixed_id, now_epoch_ms};

    #[test]
    fn calendar_date_shape_is_strict() {
        assert!(is_calendar_date("2026-01-31"));
        assert!(!is_calendar_date("2026-1-31"));
        assert!(!is_calendar_date("2026-01-31T10:00:00"));
        assert!(!is_calendar_date("31/01/2026"));
    }

    #[test]
    fn prefixed_ids_carry_prefix_and_short_suffix() {
        let id = new_prefixed_id("TR-");
        assert!(id.starts_with("TR-"));
        assert_eq!(id.len(), "TR-".len() + 8);
    }

    #[test]
    fn epoch_ms_is_positive() {
        assert!(now_epoch_ms() > 0);
    }
}
