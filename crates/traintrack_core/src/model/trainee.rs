//! Trainee enrollment record.

use super::{new_prefixed_id, require_non_empty, ValidationError};
use serde::{Deserialize, Serialize};

/// Prefix for generated trainee identifiers (`TR-` + 8 hex chars).
pub const TRAINEE_ID_PREFIX: &str = "TR-";

/// An individual enrolled in exactly one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trainee {
    pub id: String,
    /// Weak reference to the owning batch's code.
    pub batch_code: String,
    pub name: String,
    pub mobile: String,
    pub email: String,
}

/// Roster entry supplied by callers; the id is generated on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTrainee {
    pub name: String,
    pub mobile: String,
    pub email: String,
}

impl Trainee {
    /// Materializes a roster entry under `batch_code` with a fresh id.
    pub fn from_roster_entry(batch_code: &str, entry: &NewTrainee) -> Self {
        Self {
            id: new_prefixed_id(TRAINEE_ID_PREFIX),
            batch_code: batch_code.to_string(),
            name: entry.name.clone(),
            mobile: entry.mobile.clone(),
            email: entry.email.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("id", &self.id)?;
        require_non_empty("batch_code", &self.batch_code)?;
        require_non_empty("name", &self.name)?;
        Ok(())
    }
}
