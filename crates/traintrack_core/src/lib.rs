//! Core domain and persistence layer for training-batch administration.
//!
//! Tracks users (owners/trainers), training batches, enrolled trainees,
//! daily attendance, and per-module assessment results. Everything is built
//! on one backend-agnostic record store contract; the transport layer that
//! feeds these operations lives outside this crate.

pub mod db;
pub mod logging;
pub mod model;
pub mod progress;
pub mod repo;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::assessment::{AssessmentResult, PENDING_SCORE};
pub use model::attendance::{AttendanceMark, AttendanceRecord, AttendanceStatus};
pub use model::batch::Batch;
pub use model::trainee::{NewTrainee, Trainee};
pub use model::user::{Role, TrainerSummary, User, PENDING_SETUP};
pub use model::ValidationError;
pub use progress::{
    aggregate, curriculum_module_ids, ModuleProgress, ProgressSummary, Semester, CURRICULUM,
    SUBMITTED_SCORE,
};
pub use repo::identity_repo::{
    AuthenticatedUser, IdentityRepository, SEED_OWNER_EMAIL, SEED_OWNER_ID, SEED_OWNER_PASSWORD,
};
pub use repo::training_repo::{BatchCreated, TraineeDetail, TrainingRepository};
pub use repo::{RepoError, RepoResult};
pub use store::{
    Collection, Filter, FilterOp, MemoryRecordStore, RecordStore, SqliteRecordStore, StoreError,
    StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
