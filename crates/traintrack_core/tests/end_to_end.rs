//! Full scenario against the relational backend on a real database file:
//! seed -> invite -> create batch -> attendance -> trainee detail.

use traintrack_core::{
    AttendanceMark, AttendanceStatus, Batch, IdentityRepository, NewTrainee, Role,
    SqliteRecordStore, TrainingRepository,
};

#[test]
fn admin_flow_from_seed_to_trainee_detail() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteRecordStore::open(dir.path().join("traintrack.db")).unwrap();

    let identity = IdentityRepository::new(&store);
    identity.ensure_seed_owner().unwrap();

    let owner = identity.authenticate("admin@lms.com", "12345").unwrap();
    assert_eq!(owner.role, Role::Owner);

    let sam = identity.invite_trainer("Sam", "sam@x.com").unwrap();

    let training = TrainingRepository::new(&store);
    let created = training
        .create_batch(
            &Batch {
                code: "B1".to_string(),
                name: "Backend Basics".to_string(),
                trainer_id: sam.id.clone(),
                start_date: "2026-01-05".to_string(),
                end_date: "2026-03-27".to_string(),
                max_capacity: 30,
            },
            &[NewTrainee {
                name: "Amy".to_string(),
                mobile: "555-0100".to_string(),
                email: "amy@x.com".to_string(),
            }],
        )
        .unwrap();
    let amy = created.trainees[0].id.clone();

    // Sam sees the batch; an unrelated trainer id sees nothing.
    let visible = training.list_batches(Role::Trainer, &sam.id).unwrap();
    assert_eq!(visible.len(), 1);
    assert!(training
        .list_batches(Role::Trainer, "USR-other")
        .unwrap()
        .is_empty());

    for (date, status) in [
        ("2026-01-05", AttendanceStatus::P),
        ("2026-01-06", AttendanceStatus::P),
        ("2026-01-07", AttendanceStatus::A),
    ] {
        training
            .record_attendance(
                "B1",
                date,
                &[AttendanceMark {
                    trainee_id: amy.clone(),
                    status,
                }],
            )
            .unwrap();
    }

    let detail = training.get_trainee_detail(&amy).unwrap();
    // 2 present of 3, rounded half-up.
    assert_eq!(detail.progress.attendance_percentage, 67);
    assert_eq!(detail.trainee.batch_code, "B1");
    assert_eq!(detail.progress.modules.len(), 3);
}
