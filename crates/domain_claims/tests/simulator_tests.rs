//! Step simulator tests
//!
//! Property tests drive runs through random sequences of controls on a
//! virtual clock and check the ordering and progress invariants after every
//! step.

use chrono::{DateTime, TimeDelta, Utc};
use proptest::prelude::*;

use domain_claims::{ProgressRule, Run, RunEvent, RunState, StageCatalog, StepStatus};
use test_utils::{
    assert_run_invariants, catalog_strategy, monotonic_action_strategy, run_action_strategy,
    tick_increment_strategy, RunAction, TemporalFixtures, TestCatalogBuilder, TestRunBuilder,
};

fn apply(run: &mut Run, now: &mut DateTime<Utc>, action: RunAction) -> Vec<RunEvent> {
    match action {
        RunAction::Start => run.start(*now),
        RunAction::Pause => run.pause(*now),
        RunAction::Resume => run.resume(*now),
        RunAction::Reset => {
            run.reset();
            Vec::new()
        }
        RunAction::Advance(ms) => {
            *now += TimeDelta::milliseconds(ms as i64);
            run.poll(*now)
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_stages_complete_in_catalog_order(
        catalog in catalog_strategy(),
        increment in tick_increment_strategy(),
        seed in any::<u64>(),
        actions in prop::collection::vec(run_action_strategy(), 0..40),
    ) {
        let mut run = TestRunBuilder::new(catalog)
            .with_tick_increment(increment)
            .with_seed(seed)
            .build();
        let mut now = TemporalFixtures::t0();
        let mut expected_next = 0usize;

        for action in actions {
            if action == RunAction::Reset {
                expected_next = 0;
            }
            for event in apply(&mut run, &mut now, action) {
                if let RunEvent::StageCompleted { index, .. } = event {
                    prop_assert_eq!(index, expected_next);
                    expected_next += 1;
                }
            }
            assert_run_invariants(&run);
            prop_assert_eq!(run.completed_count(), expected_next);
        }
    }

    #[test]
    fn prop_progress_never_decreases_without_reset(
        catalog in catalog_strategy(),
        increment in tick_increment_strategy(),
        actions in prop::collection::vec(monotonic_action_strategy(), 0..40),
    ) {
        let mut run = TestRunBuilder::new(catalog).with_tick_increment(increment).build();
        let mut now = TemporalFixtures::t0();
        let mut last = run.progress();

        for action in actions {
            apply(&mut run, &mut now, action);
            let progress = run.progress();
            prop_assert!(progress >= last, "progress fell from {} to {} after {:?}", last, progress, action);
            prop_assert!(progress <= 100.0);
            last = progress;
        }
    }

    #[test]
    fn prop_reset_returns_to_idle(
        catalog in catalog_strategy(),
        actions in prop::collection::vec(run_action_strategy(), 0..30),
    ) {
        let mut run = TestRunBuilder::new(catalog).build();
        let mut now = TemporalFixtures::t0();
        for action in actions {
            apply(&mut run, &mut now, action);
        }

        run.reset();

        prop_assert_eq!(run.state(), RunState::Idle);
        prop_assert_eq!(run.cursor(), 0);
        prop_assert_eq!(run.progress(), 0.0);
        prop_assert!(run.steps().iter().all(|s| s.status == StepStatus::Pending && s.result.is_none()));
        prop_assert_eq!(run.next_deadline(), None);
    }

    #[test]
    fn prop_uninterrupted_run_completes(
        catalog in catalog_strategy(),
        increment in tick_increment_strategy(),
    ) {
        let mut run = TestRunBuilder::new(catalog).with_tick_increment(increment).build();
        let start = TemporalFixtures::t0();
        run.start(start);

        let mut now = start;
        while let Some(deadline) = run.next_deadline() {
            now = deadline;
            run.poll(now);
        }

        prop_assert!(run.is_complete());
        prop_assert_eq!(run.progress(), 100.0);
        prop_assert_eq!(run.completed_count(), run.steps().len());
        assert_run_invariants(&run);
    }
}

#[test]
fn test_pause_resume_continues_from_tick() {
    let catalog = TestCatalogBuilder::new().with_stage("only", 1_000).build();
    let mut run = TestRunBuilder::new(catalog).with_tick_increment(2).build();
    let t0 = TemporalFixtures::t0();

    run.start(t0);
    let paused_at = t0 + TimeDelta::milliseconds(450);
    run.pause(paused_at);
    assert_eq!(run.stage_percent(paused_at), 44);
    assert_eq!(run.next_deadline(), None);

    // time spent paused does not count
    let resumed_at = paused_at + TimeDelta::seconds(10);
    run.resume(resumed_at);
    assert_eq!(run.stage_percent(resumed_at), 44);
    assert_eq!(run.next_deadline(), Some(resumed_at + TimeDelta::milliseconds(560)));

    run.poll(resumed_at + TimeDelta::milliseconds(559));
    assert_eq!(run.completed_count(), 0);

    run.poll(resumed_at + TimeDelta::milliseconds(560));
    assert!(run.is_complete());
    assert_eq!(run.steps()[0].elapsed_millis, Some(1_000));
}

#[test]
fn test_uneven_duration_finishes_on_sampled_time() {
    // 2999ms at 2% truncates to a 59ms tick; the last tick takes up the slack
    let catalog = TestCatalogBuilder::new().with_stage("uneven", 2_999).build();
    let mut run = TestRunBuilder::new(catalog).with_tick_increment(2).build();
    let t0 = TemporalFixtures::t0();

    run.start(t0);
    assert_eq!(run.next_deadline(), Some(t0 + TimeDelta::milliseconds(2_999)));
    assert_eq!(run.stage_percent(t0 + TimeDelta::milliseconds(2_960)), 98);

    run.poll(t0 + TimeDelta::milliseconds(2_950));
    assert_eq!(run.completed_count(), 0);

    run.poll(t0 + TimeDelta::milliseconds(2_999));
    assert!(run.is_complete());
    assert_eq!(run.steps()[0].elapsed_millis, Some(2_999));
}

#[test]
fn test_half_credit_survives_pause() {
    let catalog = TestCatalogBuilder::new()
        .with_stage("a", 1_000)
        .with_stage("b", 1_000)
        .with_progress_rule(ProgressRule::HalfCredit)
        .build();
    let mut run = TestRunBuilder::new(catalog).build();
    let t0 = TemporalFixtures::t0();

    run.start(t0);
    assert_eq!(run.progress(), 25.0);
    run.pause(t0 + TimeDelta::milliseconds(100));
    assert_eq!(run.progress(), 25.0);
    assert_eq!(run.steps()[0].status, StepStatus::Pending);
}

#[test]
fn test_completed_only_counts_finished_stages() {
    let mut run = TestRunBuilder::personal().build();
    let t0 = TemporalFixtures::t0();
    run.start(t0);
    assert_eq!(run.progress(), 0.0);

    let first_deadline = run.next_deadline().unwrap();
    run.poll(first_deadline);
    assert_eq!(run.progress_percent(), 13);
    assert_eq!(run.steps()[1].status, StepStatus::Processing);
}

#[test]
fn test_results_interpolate_claim_id_or_placeholder() {
    let finish = |mut run: Run| {
        run.start(TemporalFixtures::t0());
        while let Some(deadline) = run.next_deadline() {
            run.poll(deadline);
        }
        run
    };

    let bound = finish(TestRunBuilder::commercial().with_claim_id("CAI-2024-000042").build());
    let result = bound.step("file-creation").unwrap().result.clone().unwrap();
    assert_eq!(result.text, "Claim CAI-2024-000042 created in CMS. File packet generated.");
    assert_eq!(result.fields.unwrap()["claimNumber"], "CAI-2024-000042");

    let unbound = finish(TestRunBuilder::commercial().build());
    let result = unbound.step("file-creation").unwrap().result.clone().unwrap();
    assert!(result.text.starts_with("Claim CAI-2024-123456 created"));
}

#[test]
fn test_snapshot_after_completion() {
    let mut run = TestRunBuilder::new(StageCatalog::commercial_agent_flow())
        .with_claim_id("CAI-2024-000042")
        .build();
    run.start(TemporalFixtures::t0());
    let end = TemporalFixtures::t0() + TimeDelta::seconds(60);
    run.poll(end);

    let snapshot = run.snapshot(end);
    assert_eq!(snapshot.completed, 6);
    assert_eq!(snapshot.progress, 100);
    assert_eq!(snapshot.current_stage, None);
    assert!(snapshot.completion.is_some());
    assert_eq!(snapshot.log.len(), 7);
    assert!(snapshot.log[0].message.starts_with("STEP 1 COMPLETED: FNOL Intake Agent"));
}
