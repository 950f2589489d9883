//! Custom Test Assertions
//!
//! Assertion helpers that give more meaningful failure messages than
//! standard assertions.

use domain_claims::{Run, RunState, StepStatus};

/// Asserts the structural invariants every run holds between transitions
///
/// - stages before the cursor are completed, stages after it are pending
/// - at most the stage under the cursor is processing, and only while running
/// - the completed count matches the number of completed steps
/// - progress is 100 exactly when every stage is completed
pub fn assert_run_invariants(run: &Run) {
    let steps = run.steps();
    let cursor = run.cursor();

    for (index, step) in steps.iter().enumerate() {
        if index < cursor {
            assert_eq!(
                step.status,
                StepStatus::Completed,
                "stage {} ({}) is before the cursor ({}) but {:?}",
                index,
                step.stage_id,
                cursor,
                step.status
            );
        } else if index > cursor {
            assert_eq!(
                step.status,
                StepStatus::Pending,
                "stage {} ({}) is after the cursor ({}) but {:?}",
                index,
                step.stage_id,
                cursor,
                step.status
            );
        }
    }

    if let Some(step) = steps.get(cursor) {
        let expected = match run.state() {
            RunState::Running => StepStatus::Processing,
            RunState::Idle | RunState::Paused | RunState::Complete => StepStatus::Pending,
        };
        assert_eq!(
            step.status, expected,
            "stage under the cursor is {:?} while the run is {:?}",
            step.status,
            run.state()
        );
    }

    let completed = steps.iter().filter(|s| s.status == StepStatus::Completed).count();
    assert_eq!(run.completed_count(), completed, "completed count mismatch");

    let all_done = completed == steps.len();
    assert_eq!(
        run.progress() >= 100.0,
        all_done,
        "progress {} disagrees with {}/{} completed",
        run.progress(),
        completed,
        steps.len()
    );
    assert_eq!(run.is_complete(), all_done, "run state {:?} with {}/{} completed", run.state(), completed, steps.len());
}

/// Asserts `id` looks like `<prefix>-<4-digit year>-<6 digits>`
pub fn assert_claim_number_format(id: &str, prefix: &str) {
    let parts: Vec<&str> = id.split('-').collect();
    assert_eq!(parts.len(), 3, "claim number {} should have three parts", id);
    assert_eq!(parts[0], prefix, "claim number {} should start with {}", id, prefix);
    assert!(
        parts[1].len() == 4 && parts[1].chars().all(|c| c.is_ascii_digit()),
        "claim number {} has a malformed year",
        id
    );
    assert!(
        parts[2].len() == 6 && parts[2].chars().all(|c| c.is_ascii_digit()),
        "claim number {} should end in six digits",
        id
    );
}
