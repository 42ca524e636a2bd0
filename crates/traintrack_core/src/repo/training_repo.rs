//! Training operations: batches, rosters, attendance, assessment results.
//!
//! # Responsibility
//! - Enforce referential existence checks (batch -> trainer, trainee ->
//!   batch) before dependent writes; the store holds only weak references.
//! - Compose trainee detail from raw rows plus the progress aggregator.
//!
//! # Invariants
//! - Multi-row writes (`create_batch` roster, `record_attendance` marks)
//!   run sequentially and are **not** atomic: a failure partway leaves the
//!   earlier writes in place. Accepted semantics carried from the source
//!   system, not a transactional guarantee.
//! - `record_attendance` does not cross-check that each trainee belongs to
//!   the batch; the reference behavior is kept and documented rather than
//!   silently hardened.

use crate::model::assessment::AssessmentResult;
use crate::model::attendance::{AttendanceMark, AttendanceRecord};
use crate::model::batch::Batch;
use crate::model::require_calendar_date;
use crate::model::trainee::{NewTrainee, Trainee};
use crate::model::user::{Role, User};
use crate::progress::{self, ProgressSummary, Semester, CURRICULUM};
use crate::repo::{decode, decode_all, encode, RepoError, RepoResult};
use crate::store::{Collection, Filter, RecordStore};
use log::info;
use serde::Serialize;

/// Outcome of a successful `create_batch`, echoing generated trainee ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchCreated {
    pub batch: Batch,
    pub trainees: Vec<Trainee>,
}

/// Full trainee view: record, derived progress, static curriculum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraineeDetail {
    pub trainee: Trainee,
    pub progress: ProgressSummary,
    pub curriculum: &'static [Semester],
}

/// Batch/trainee/attendance/result operations over any record store.
pub struct TrainingRepository<'s, S: RecordStore> {
    store: &'s S,
}

impl<'s, S: RecordStore> TrainingRepository<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Creates a batch and its initial roster.
    ///
    /// # Contract
    /// - Fails with `NotFound` (no write) unless `trainer_id` references an
    ///   existing user with role `Trainer`.
    /// - Each roster entry gets a generated `TR-` id and the batch's code.
    /// - Writes are sequential; a failure partway leaves the batch with a
    ///   partial roster (at-least-attempted semantics).
    /// - Re-using an existing batch code silently overwrites the batch
    ///   record (store `put` contract).
    pub fn create_batch(&self, batch: &Batch, roster: &[NewTrainee]) -> RepoResult<BatchCreated> {
        batch.validate()?;
        self.require_trainer(&batch.trainer_id)?;

        self.store
            .put(Collection::Batches, &batch.code, &encode(batch)?)?;

        let mut trainees = Vec::with_capacity(roster.len());
        for entry in roster {
            let trainee = Trainee::from_roster_entry(&batch.code, entry);
            trainee.validate()?;
            self.store
                .put(Collection::Trainees, &trainee.id, &encode(&trainee)?)?;
            trainees.push(trainee);
        }

        info!(
            "event=batch_created module=training status=ok batch_code={} roster_size={}",
            batch.code,
            trainees.len()
        );
        Ok(BatchCreated {
            batch: batch.clone(),
            trainees,
        })
    }

    /// Lists batches visible to a caller: all of them for `Owner`, only
    /// their own for a trainer. No pagination.
    pub fn list_batches(&self, role: Role, user_id: &str) -> RepoResult<Vec<Batch>> {
        let filters = match role {
            Role::Owner => Vec::new(),
            Role::Trainer => vec![Filter::eq("trainer_id", user_id)],
        };
        let rows = self.store.scan(Collection::Batches, &filters)?;
        decode_all("batch", rows)
    }

    /// Lists the trainees enrolled in one batch.
    pub fn list_trainees(&self, batch_code: &str) -> RepoResult<Vec<Trainee>> {
        let rows = self
            .store
            .scan(Collection::Trainees, &[Filter::eq("batch_code", batch_code)])?;
        decode_all("trainee", rows)
    }

    /// Enrolls one trainee into an existing batch.
    ///
    /// # Contract
    /// - Fails with `NotFound` and performs no write when the batch does
    ///   not exist.
    pub fn add_trainee(&self, batch_code: &str, entry: &NewTrainee) -> RepoResult<Trainee> {
        self.require_batch(batch_code)?;

        let trainee = Trainee::from_roster_entry(batch_code, entry);
        trainee.validate()?;
        self.store
            .put(Collection::Trainees, &trainee.id, &encode(&trainee)?)?;
        Ok(trainee)
    }

    /// Records one attendance row per submitted mark.
    ///
    /// # Contract
    /// - Every row gets a fresh id; repeated submissions for the same
    ///   (trainee, date) accumulate rather than overwrite.
    /// - Trainee/batch membership is not validated (reference behavior).
    /// - Returns the number of rows written.
    pub fn record_attendance(
        &self,
        batch_code: &str,
        date: &str,
        marks: &[AttendanceMark],
    ) -> RepoResult<usize> {
        require_calendar_date(date)?;

        for mark in marks {
            let record = AttendanceRecord::from_mark(batch_code, date, mark);
            record.validate()?;
            self.store
                .put(Collection::Attendance, &record.id, &encode(&record)?)?;
        }

        info!(
            "event=attendance_recorded module=training status=ok batch_code={} date={} rows={}",
            batch_code,
            date,
            marks.len()
        );
        Ok(marks.len())
    }

    /// Loads one trainee with derived progress and the static curriculum.
    ///
    /// # Contract
    /// - Fails with `NotFound` when the trainee does not exist.
    /// - Progress is a pure function of the trainee's stored attendance
    ///   and result rows.
    pub fn get_trainee_detail(&self, trainee_id: &str) -> RepoResult<TraineeDetail> {
        let Some(row) = self.store.get(Collection::Trainees, trainee_id)? else {
            return Err(RepoError::NotFound {
                what: "trainee",
                key: trainee_id.to_string(),
            });
        };
        let trainee: Trainee = decode("trainee", row)?;

        let attendance_rows = self
            .store
            .scan(Collection::Attendance, &[Filter::eq("trainee_id", trainee_id)])?;
        let attendance: Vec<AttendanceRecord> = decode_all("attendance", attendance_rows)?;

        let result_rows = self
            .store
            .scan(Collection::Results, &[Filter::eq("trainee_id", trainee_id)])?;
        let results: Vec<AssessmentResult> = decode_all("result", result_rows)?;

        let summary = progress::aggregate(
            &attendance,
            &results,
            &progress::curriculum_module_ids(),
        );

        Ok(TraineeDetail {
            trainee,
            progress: summary,
            curriculum: CURRICULUM,
        })
    }

    /// Registers a pending assessment submission for one module.
    ///
    /// # Contract
    /// - `trainee_name` is stored as an immutable snapshot.
    /// - `module_num` is not validated against the curriculum; unknown
    ///   modules are simply ignored by the aggregator later.
    pub fn save_assessment_result(
        &self,
        trainee_id: &str,
        trainee_name: &str,
        module_num: u32,
    ) -> RepoResult<AssessmentResult> {
        let result = AssessmentResult::pending(trainee_id, trainee_name, module_num);
        result.validate()?;
        self.store
            .put(Collection::Results, &result.id, &encode(&result)?)?;

        info!(
            "event=result_saved module=training status=ok trainee_id={} module_num={}",
            trainee_id, module_num
        );
        Ok(result)
    }

    fn require_batch(&self, batch_code: &str) -> RepoResult<Batch> {
        match self.store.get(Collection::Batches, batch_code)? {
            Some(row) => decode("batch", row),
            None => Err(RepoError::NotFound {
                what: "batch",
                key: batch_code.to_string(),
            }),
        }
    }

    fn require_trainer(&self, trainer_id: &str) -> RepoResult<User> {
        let user: Option<User> = match self.store.get(Collection::Users, trainer_id)? {
            Some(row) => Some(decode("user", row)?),
            None => None,
        };
        match user {
            Some(user) if user.role == Role::Trainer => Ok(user),
            _ => Err(RepoError::NotFound {
                what: "trainer",
                key: trainer_id.to_string(),
            }),
        }
    }
}
