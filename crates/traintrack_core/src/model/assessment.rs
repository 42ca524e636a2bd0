//! Per-module assessment result.
//!
//! # Invariants
//! - `trainee_name` is an immutable snapshot taken at creation time; it
//!   survives later changes to the trainee record.
//! - `score` holds a grade text or the [`PENDING_SCORE`] sentinel.

use super::{new_record_id, now_epoch_ms, require_non_empty, ValidationError};
use serde::{Deserialize, Serialize};

/// Sentinel score for a submission that has not been graded yet.
pub const PENDING_SCORE: &str = "Pending";

/// Outcome of one trainee's attempt at one curriculum module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub id: String,
    pub trainee_id: String,
    /// Denormalized snapshot of the trainee's name at submission time.
    pub trainee_name: String,
    /// Not validated against the curriculum on write.
    pub module_num: u32,
    pub score: String,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
}

impl AssessmentResult {
    /// Builds a fresh pending submission for `module_num`.
    pub fn pending(trainee_id: &str, trainee_name: &str, module_num: u32) -> Self {
        Self {
            id: new_record_id(),
            trainee_id: trainee_id.to_string(),
            trainee_name: trainee_name.to_string(),
            module_num,
            score: PENDING_SCORE.to_string(),
            created_at: now_epoch_ms(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("id", &self.id)?;
        require_non_empty("trainee_id", &self.trainee_id)?;
        require_non_empty("score", &self.score)?;
        Ok(())
    }
}
