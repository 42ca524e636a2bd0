//! Trainee progress aggregation.
//!
//! # Responsibility
//! - Derive attendance percentage and per-module status from raw stored
//!   rows. Pure functions of their inputs; no store access.
//!
//! # Invariants
//! - Zero attendance history yields 0%, never a division error.
//! - Percentage rounding is half-up (ties away from zero) via
//!   `f64::round`: 2/3 -> 67, 1/3 -> 33, 1/8 -> 13.
//! - Duplicate results for one module never panic; the last one in scan
//!   order determines the final score.

use crate::model::assessment::{AssessmentResult, PENDING_SCORE};
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use serde::Serialize;

/// Score marker shown once a pending submission exists for a module.
pub const SUBMITTED_SCORE: &str = "Submitted";

/// A static grouping of curriculum modules, not derived from stored data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Semester {
    pub name: &'static str,
    pub modules: &'static [u32],
}

/// The curriculum in use: semesters and the module numbers they contain.
pub const CURRICULUM: &[Semester] = &[
    Semester {
        name: "Semester 1",
        modules: &[1, 2],
    },
    Semester {
        name: "Semester 2",
        modules: &[3],
    },
];

/// All module ids of [`CURRICULUM`], in semester order.
pub fn curriculum_module_ids() -> Vec<u32> {
    CURRICULUM
        .iter()
        .flat_map(|semester| semester.modules.iter().copied())
        .collect()
}

/// Completion state of one curriculum module for one trainee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleProgress {
    pub module_num: u32,
    /// Grade text, [`SUBMITTED_SCORE`], or the initial pending marker.
    pub score: String,
    pub attempts: u32,
}

/// Aggregate progress derived from a trainee's raw event rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressSummary {
    /// Rounded half-up; 0 when no attendance exists yet.
    pub attendance_percentage: u32,
    pub modules: Vec<ModuleProgress>,
}

/// Derives attendance percentage and per-module state from raw rows.
///
/// # Contract
/// - Every id in `modules` appears in the output exactly once, initialized
///   to pending with zero attempts.
/// - Results whose `module_num` is not in `modules` are ignored.
/// - When several results target one module, each counts as an attempt and
///   the last-processed one supplies the score.
pub fn aggregate(
    attendance: &[AttendanceRecord],
    results: &[AssessmentResult],
    modules: &[u32],
) -> ProgressSummary {
    ProgressSummary {
        attendance_percentage: attendance_percentage(attendance),
        modules: module_progress(results, modules),
    }
}

fn attendance_percentage(attendance: &[AttendanceRecord]) -> u32 {
    if attendance.is_empty() {
        return 0;
    }
    let present = attendance
        .iter()
        .filter(|record| record.status == AttendanceStatus::P)
        .count();
    (present as f64 * 100.0 / attendance.len() as f64).round() as u32
}

fn module_progress(results: &[AssessmentResult], modules: &[u32]) -> Vec<ModuleProgress> {
    let mut progress: Vec<ModuleProgress> = modules
        .iter()
        .map(|&module_num| ModuleProgress {
            module_num,
            score: PENDING_SCORE.to_string(),
            attempts: 0,
        })
        .collect();

    for result in results {
        let Some(entry) = progress
            .iter_mut()
            .find(|entry| entry.module_num == result.module_num)
        else {
            continue;
        };
        entry.attempts += 1;
        entry.score = if result.score == PENDING_SCORE {
            SUBMITTED_SCORE.to_string()
        } else {
            result.score.clone()
        };
    }

    progress
}

#[cfg(test)]
mod tests {
    use super::{aggregate, curriculum_module_ids, SUBMITTED_SCORE};
    use crate::model::assessment::{AssessmentResult, PENDING_SCORE};
    use crate::model::attendance::{AttendanceMark, AttendanceRecord, AttendanceStatus};

    fn attendance_rows(statuses: &[AttendanceStatus]) -> Vec<AttendanceRecord> {
        statuses
            .iter()
            .enumerate()
            .map(|(day, &status)| {
                AttendanceRecord::from_mark(
                    "B1",
                    &format!("2026-01-{:02}", day + 1),
                    &AttendanceMark {
                        trainee_id: "TR-amy00000".to_string(),
                        status,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn empty_history_yields_zero_percent() {
        let summary = aggregate(&[], &[], &curriculum_module_ids());
        assert_eq!(summary.attendance_percentage, 0);
    }

    #[test]
    fn three_present_one_absent_is_seventy_five() {
        use AttendanceStatus::{A, P};
        let rows = attendance_rows(&[P, P, P, A]);
        let summary = aggregate(&rows, &[], &[]);
        assert_eq!(summary.attendance_percentage, 75);
    }

    #[test]
    fn rounding_is_half_up() {
        use AttendanceStatus::{A, P};
        // 2/3 rounds up to 67, 1/3 down to 33, 1/8 (12.5) up to 13.
        let two_thirds = attendance_rows(&[P, P, A]);
        assert_eq!(aggregate(&two_thirds, &[], &[]).attendance_percentage, 67);

        let one_third = attendance_rows(&[P, A, A]);
        assert_eq!(aggregate(&one_third, &[], &[]).attendance_percentage, 33);

        let one_eighth = attendance_rows(&[P, A, A, A, A, A, A, A]);
        assert_eq!(aggregate(&one_eighth, &[], &[]).attendance_percentage, 13);
    }

    #[test]
    fn modules_initialize_pending_with_zero_attempts() {
        let summary = aggregate(&[], &[], &curriculum_module_ids());
        assert_eq!(summary.modules.len(), 3);
        for module in &summary.modules {
            assert_eq!(module.score, PENDING_SCORE);
            assert_eq!(module.attempts, 0);
        }
    }

    #[test]
    fn pending_submission_shows_submitted_marker() {
        let results = vec![AssessmentResult::pending("TR-amy00000", "Amy", 1)];
        let summary = aggregate(&[], &results, &curriculum_module_ids());
        let module = &summary.modules[0];
        assert_eq!(module.score, SUBMITTED_SCORE);
        assert_eq!(module.attempts, 1);
    }

    #[test]
    fn duplicate_results_count_attempts_and_last_score_wins() {
        let mut first = AssessmentResult::pending("TR-amy00000", "Amy", 2);
        first.score = "B".to_string();
        let mut second = AssessmentResult::pending("TR-amy00000", "Amy", 2);
        second.score = "A".to_string();

        let summary = aggregate(&[], &[first, second], &curriculum_module_ids());
        let module = summary
            .modules
            .iter()
            .find(|entry| entry.module_num == 2)
            .unwrap();
        assert_eq!(module.attempts, 2);
        assert_eq!(module.score, "A");
    }

    #[test]
    fn unknown_module_results_are_ignored() {
        let results = vec![AssessmentResult::pending("TR-amy00000", "Amy", 99)];
        let summary = aggregate(&[], &results, &curriculum_module_ids());
        assert!(summary.modules.iter().all(|entry| entry.attempts == 0));
    }

    #[test]
    fn curriculum_lists_modules_in_semester_order() {
        assert_eq!(curriculum_module_ids(), vec![1, 2, 3]);
    }
}
