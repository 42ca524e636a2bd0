//! Daily attendance observation.
//!
//! # Invariants
//! - `status` admits only present (`P`) and absent (`A`).
//! - Multiple rows for the same (trainee, date) pair are permitted; nothing
//!   deduplicates or upserts them. The aggregator counts raw rows.

use super::{new_record_id, require_calendar_date, require_non_empty, ValidationError};
use serde::{Deserialize, Serialize};

/// Present/absent marker for one trainee on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    /// Present.
    P,
    /// Absent.
    A,
}

impl AttendanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::P => "P",
            Self::A => "A",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "P" => Ok(Self::P),
            "A" => Ok(Self::A),
            other => Err(ValidationError::BadStatus(other.to_string())),
        }
    }
}

/// One present/absent observation for one trainee on one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: String,
    pub batch_code: String,
    /// Weak reference; membership in `batch_code` is not cross-checked.
    pub trainee_id: String,
    /// Calendar date, `YYYY-MM-DD`, no time component.
    pub date: String,
    pub status: AttendanceStatus,
}

/// Per-trainee entry of a bulk attendance submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceMark {
    pub trainee_id: String,
    pub status: AttendanceStatus,
}

impl AttendanceRecord {
    /// Builds one stored row for a submitted mark, with a fresh id.
    pub fn from_mark(batch_code: &str, date: &str, mark: &AttendanceMark) -> Self {
        Self {
            id: new_record_id(),
            batch_code: batch_code.to_string(),
            trainee_id: mark.trainee_id.clone(),
            date: date.to_string(),
            status: mark.status,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("id", &self.id)?;
        require_non_empty("batch_code", &self.batch_code)?;
        require_non_empty("trainee_id", &self.trainee_id)?;
        require_calendar_date(&self.date)?;
        Ok(())
    }
}
