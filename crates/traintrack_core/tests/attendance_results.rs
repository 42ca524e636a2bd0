//! Attendance recording and trainee detail composition.

use traintrack_core::{
    AttendanceMark, AttendanceStatus, Batch, Collection, IdentityRepository, MemoryRecordStore,
    NewTrainee, RecordStore, RepoError, TrainingRepository, ValidationError, CURRICULUM,
    PENDING_SCORE, SUBMITTED_SCORE,
};

fn setup_batch_with_amy(store: &MemoryRecordStore) -> String {
    let identity = IdentityRepository::new(store);
    identity.ensure_seed_owner().unwrap();
    let trainer_id = identity.invite_trainer("Sam", "sam@x.com").unwrap().id;

    let repo = TrainingRepository::new(store);
    let created = repo
        .create_batch(
            &Batch {
                code: "B1".to_string(),
                name: "Cohort B1".to_string(),
                trainer_id,
                start_date: "2026-01-05".to_string(),
                end_date: "2026-03-27".to_string(),
                max_capacity: 25,
            },
            &[NewTrainee {
                name: "Amy".to_string(),
                mobile: "555-0100".to_string(),
                email: "amy@x.com".to_string(),
            }],
        )
        .unwrap();
    created.trainees[0].id.clone()
}

fn mark(trainee_id: &str, status: AttendanceStatus) -> AttendanceMark {
    AttendanceMark {
        trainee_id: trainee_id.to_string(),
        status,
    }
}

#[test]
fn attendance_rows_accumulate_even_for_the_same_date() {
    let store = MemoryRecordStore::new();
    let amy = setup_batch_with_amy(&store);
    let repo = TrainingRepository::new(&store);

    repo.record_attendance("B1", "2026-01-05", &[mark(&amy, AttendanceStatus::P)])
        .unwrap();
    repo.record_attendance("B1", "2026-01-05", &[mark(&amy, AttendanceStatus::A)])
        .unwrap();

    let rows = store.scan(Collection::Attendance, &[]).unwrap();
    assert_eq!(rows.len(), 2);
    assert_ne!(rows[0]["id"], rows[1]["id"]);
}

#[test]
fn attendance_rejects_malformed_dates_before_writing() {
    let store = MemoryRecordStore::new();
    let amy = setup_batch_with_amy(&store);
    let repo = TrainingRepository::new(&store);

    let err = repo
        .record_attendance("B1", "Jan 5th", &[mark(&amy, AttendanceStatus::P)])
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::BadDate(_))
    ));
    assert!(store.scan(Collection::Attendance, &[]).unwrap().is_empty());
}

#[test]
fn detail_for_missing_trainee_is_not_found() {
    let store = MemoryRecordStore::new();
    setup_batch_with_amy(&store);
    let repo = TrainingRepository::new(&store);

    let err = repo.get_trainee_detail("TR-ghost123").unwrap_err();
    assert!(matches!(err, RepoError::NotFound { what: "trainee", .. }));
}

#[test]
fn detail_composes_record_progress_and_curriculum() {
    let store = MemoryRecordStore::new();
    let amy = setup_batch_with_amy(&store);
    let repo = TrainingRepository::new(&store);

    repo.record_attendance("B1", "2026-01-05", &[mark(&amy, AttendanceStatus::P)])
        .unwrap();
    repo.record_attendance("B1", "2026-01-06", &[mark(&amy, AttendanceStatus::P)])
        .unwrap();
    repo.record_attendance("B1", "2026-01-07", &[mark(&amy, AttendanceStatus::A)])
        .unwrap();

    let detail = repo.get_trainee_detail(&amy).unwrap();
    assert_eq!(detail.trainee.name, "Amy");
    // 2 of 3 present, rounded half-up.
    assert_eq!(detail.progress.attendance_percentage, 67);
    assert_eq!(detail.curriculum, CURRICULUM);
    assert_eq!(detail.progress.modules.len(), 3);
    for module in &detail.progress.modules {
        assert_eq!(module.score, PENDING_SCORE);
        assert_eq!(module.attempts, 0);
    }
}

#[test]
fn pending_submission_surfaces_as_submitted_in_detail() {
    let store = MemoryRecordStore::new();
    let amy = setup_batch_with_amy(&store);
    let repo = TrainingRepository::new(&store);

    let saved = repo.save_assessment_result(&amy, "Amy", 1).unwrap();
    assert_eq!(saved.score, PENDING_SCORE);
    assert_eq!(saved.trainee_name, "Amy");

    let detail = repo.get_trainee_detail(&amy).unwrap();
    let module_one = detail
        .progress
        .modules
        .iter()
        .find(|m| m.module_num == 1)
        .unwrap();
    assert_eq!(module_one.score, SUBMITTED_SCORE);
    assert_eq!(module_one.attempts, 1);
}

#[test]
fn repeated_submissions_count_attempts() {
    let store = MemoryRecordStore::new();
    let amy = setup_batch_with_amy(&store);
    let repo = TrainingRepository::new(&store);

    repo.save_assessment_result(&amy, "Amy", 2).unwrap();
    repo.save_assessment_result(&amy, "Amy", 2).unwrap();

    let detail = repo.get_trainee_detail(&amy).unwrap();
    let module_two = detail
        .progress
        .modules
        .iter()
        .find(|m| m.module_num == 2)
        .unwrap();
    assert_eq!(module_two.attempts, 2);
}

#[test]
fn results_for_unknown_modules_are_stored_but_ignored_by_progress() {
    let store = MemoryRecordStore::new();
    let amy = setup_batch_with_amy(&store);
    let repo = TrainingRepository::new(&store);

    // Write path deliberately does not validate the module number.
    repo.save_assessment_result(&amy, "Amy", 99).unwrap();
    assert_eq!(store.scan(Collection::Results, &[]).unwrap().len(), 1);

    let detail = repo.get_trainee_detail(&amy).unwrap();
    assert!(detail.progress.modules.iter().all(|m| m.attempts == 0));
}
