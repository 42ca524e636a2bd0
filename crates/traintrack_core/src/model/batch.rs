//! Training batch record.
//!
//! # Invariants
//! - `code` is the batch's collection key.
//! - `trainer_id` is a weak reference to a `Trainer` user; the repository
//!   checks it exists before the batch is written.
//! - `max_capacity` is advertised to the front end but never enforced
//!   against the trainee count (known gap carried from the source system).

use super::{require_calendar_date, require_non_empty, ValidationError};
use serde::{Deserialize, Serialize};

/// A cohort of trainees trained together over a date range by one trainer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    /// Caller-chosen code, primary key of the `Batches` collection.
    pub code: String,
    pub name: String,
    /// Weak reference to a user with role `Trainer`.
    pub trainer_id: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub start_date: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub end_date: String,
    /// Advertised capacity; not enforced.
    pub max_capacity: i64,
}

impl Batch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("code", &self.code)?;
        require_non_empty("name", &self.name)?;
        require_non_empty("trainer_id", &self.trainer_id)?;
        require_calendar_date(&self.start_date)?;
        require_calendar_date(&self.end_date)?;
        if self.max_capacity < 0 {
            return Err(ValidationError::NegativeCapacity(self.max_capacity));
        }
        Ok(())
    }
}
