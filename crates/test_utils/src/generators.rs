//! Property-Based Test Generators
//!
//! Proptest strategies for catalogs and for sequences of run controls.

use proptest::prelude::*;

use domain_claims::{Pipeline, ProgressRule, Stage, StageCatalog, StageCategory, StageDuration};

/// A control applied to a run in a generated scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunAction {
    Start,
    Pause,
    Resume,
    Reset,
    /// Advance virtual time by this many milliseconds, then poll
    Advance(u64),
}

/// Strategy for stage durations: fixed, or a small range
pub fn stage_duration_strategy() -> impl Strategy<Value = StageDuration> {
    prop_oneof![
        (1u64..5_000).prop_map(StageDuration::fixed),
        (1u64..3_000, 0u64..2_000).prop_map(|(min, span)| StageDuration::range(min, min + span)),
    ]
}

pub fn progress_rule_strategy() -> impl Strategy<Value = ProgressRule> {
    prop_oneof![Just(ProgressRule::HalfCredit), Just(ProgressRule::CompletedOnly)]
}

/// Strategy for catalogs of 1 to 8 uniquely named stages
pub fn catalog_strategy() -> impl Strategy<Value = StageCatalog> {
    (
        prop::collection::vec(stage_duration_strategy(), 1..=8),
        progress_rule_strategy(),
    )
        .prop_map(|(durations, rule)| {
            let stages = durations
                .into_iter()
                .enumerate()
                .map(|(i, duration)| {
                    Stage::new(
                        format!("stage-{}", i),
                        format!("Stage {}", i + 1),
                        "generated",
                        StageCategory::Verification,
                        duration,
                    )
                })
                .collect();
            StageCatalog::new(Pipeline::CommercialAgentFlow, stages, Default::default())
                .map(|c| c.with_progress_rule(rule))
                .expect("generated catalog is non-empty with unique ids")
        })
}

/// Strategy for a single run control, weighted towards time passing
pub fn run_action_strategy() -> impl Strategy<Value = RunAction> {
    prop_oneof![
        2 => Just(RunAction::Start),
        1 => Just(RunAction::Pause),
        1 => Just(RunAction::Resume),
        1 => Just(RunAction::Reset),
        5 => (0u64..6_000).prop_map(RunAction::Advance),
    ]
}

/// Strategy for scenarios that never reset, so progress must be monotonic
pub fn monotonic_action_strategy() -> impl Strategy<Value = RunAction> {
    prop_oneof![
        2 => Just(RunAction::Start),
        1 => Just(RunAction::Pause),
        1 => Just(RunAction::Resume),
        5 => (0u64..6_000).prop_map(RunAction::Advance),
    ]
}

/// Strategy for tick increments that divide 100 evenly or not
pub fn tick_increment_strategy() -> impl Strategy<Value = u8> {
    prop_oneof![Just(2u8), Just(5u8), Just(10u8), 1u8..=100]
}
