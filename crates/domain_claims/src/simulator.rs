//! Linear step simulator
//!
//! A [`Run`] walks a cursor through a [`StageCatalog`], marking one stage
//! processing at a time and completing it once its simulated duration has
//! elapsed. Time only moves when the caller passes a new instant to
//! [`Run::start`], [`Run::poll`], [`Run::pause`] or [`Run::resume`], so the
//! same state machine backs the real-time driver in the API and virtual-time
//! tests.
//!
//! Within a stage, progress advances in coarse ticks: a stage of duration `d`
//! with a tick increment of `p` percent gains `p` percent every `d * p / 100`
//! milliseconds. Pausing records the tick percentage reached; resuming
//! continues from that percentage rather than from the exact elapsed time.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use core_kernel::RunId;

use crate::catalog::{Pipeline, ProgressRule, StageCatalog};
use crate::error::ClaimError;
use crate::record::ClaimRecord;
use crate::result::StageResult;
use crate::stage::StageCategory;

/// Default per-tick increment of in-stage progress, in percent
pub const DEFAULT_TICK_INCREMENT_PCT: u8 = 2;

/// Status of one stage within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Processing,
    Completed,
    /// Declared for completeness; no transition produces it
    Error,
}

impl StepStatus {
    /// Badge text shown next to the stage
    pub fn label(&self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::Processing => "Processing...",
            StepStatus::Completed => "completed",
            StepStatus::Error => "error",
        }
    }
}

/// Mutable per-stage state of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepState {
    pub stage_id: String,
    pub status: StepStatus,
    pub elapsed_millis: Option<u64>,
    pub completed_at: Option<DateTime<Utc>>,
    pub result: Option<StageResult>,
}

impl StepState {
    fn pending(stage_id: &str) -> Self {
        Self {
            stage_id: stage_id.to_string(),
            status: StepStatus::Pending,
            elapsed_millis: None,
            completed_at: None,
            result: None,
        }
    }
}

/// Claim fields a run displays and interpolates into results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunContext {
    pub claim_id: Option<String>,
    pub claimant_name: Option<String>,
    pub policy_number: Option<String>,
}

impl RunContext {
    pub fn for_claim(claim_id: impl Into<String>) -> Self {
        Self {
            claim_id: Some(claim_id.into()),
            ..Default::default()
        }
    }

    /// Builds a context from a persisted claim record
    ///
    /// Personal records carry `claimantName`; commercial records carry
    /// `fleetOwnerName` and `contactPerson` instead.
    pub fn from_record(record: &ClaimRecord) -> Self {
        Self {
            claim_id: record.id().map(str::to_string),
            claimant_name: record
                .get_str("claimantName")
                .or_else(|| record.get_str("fleetOwnerName"))
                .or_else(|| record.get_str("contactPerson"))
                .map(str::to_string),
            policy_number: record.get_str("policyNumber").map(str::to_string),
        }
    }
}

/// Lifecycle of a run as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Created or reset, nothing started
    Idle,
    /// A stage is processing
    Running,
    /// Halted mid-stage; no stage is processing
    Paused,
    /// Every stage completed
    Complete,
}

/// A transition observed while advancing a run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RunEvent {
    StageStarted {
        index: usize,
        stage_id: String,
        at: DateTime<Utc>,
    },
    StageCompleted {
        index: usize,
        stage_id: String,
        elapsed_millis: u64,
        at: DateTime<Utc>,
    },
    Paused {
        index: usize,
        stage_percent: u8,
        at: DateTime<Utc>,
    },
    Resumed {
        index: usize,
        stage_percent: u8,
        at: DateTime<Utc>,
    },
    RunCompleted {
        at: DateTime<Utc>,
    },
}

/// Tunables for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// In-stage progress gained per tick, in percent (clamped to 1..=100)
    pub tick_increment_pct: u8,
    /// Seed for sampling ranged durations; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tick_increment_pct: DEFAULT_TICK_INCREMENT_PCT,
            seed: None,
        }
    }
}

/// Timing of the stage under the cursor
#[derive(Debug, Clone, Copy)]
struct ActiveStage {
    /// Shifted forward on resume so elapsed time maps back onto tick progress
    started_at: DateTime<Utc>,
    duration_millis: u64,
}

impl ActiveStage {
    fn tick_millis(&self, increment: u8) -> u64 {
        (self.duration_millis * u64::from(increment) / 100).max(1)
    }

    fn ticks_to_complete(increment: u8) -> u64 {
        let increment = u64::from(increment);
        (100 + increment - 1) / increment
    }

    /// The last tick absorbs whatever the truncated tick size leaves over,
    /// so a stage never finishes before its sampled duration.
    fn span_millis(&self, increment: u8) -> u64 {
        (self.tick_millis(increment) * Self::ticks_to_complete(increment)).max(self.duration_millis)
    }

    fn deadline(&self, increment: u8) -> DateTime<Utc> {
        self.started_at + millis(self.span_millis(increment))
    }

    fn percent_at(&self, now: DateTime<Utc>, increment: u8) -> u8 {
        let elapsed = (now - self.started_at).num_milliseconds().max(0) as u64;
        if elapsed >= self.span_millis(increment) {
            return 100;
        }
        let ticks = (elapsed / self.tick_millis(increment)).min(Self::ticks_to_complete(increment) - 1);
        (ticks * u64::from(increment)).min(100) as u8
    }
}

fn millis(value: u64) -> TimeDelta {
    TimeDelta::milliseconds(i64::try_from(value).unwrap_or(i64::MAX))
}

/// One execution of a stage catalog
#[derive(Debug, Clone)]
pub struct Run {
    id: RunId,
    catalog: Arc<StageCatalog>,
    context: RunContext,
    steps: Vec<StepState>,
    cursor: usize,
    state: RunState,
    active: Option<ActiveStage>,
    paused_percent: u8,
    tick_increment_pct: u8,
    rng: StdRng,
}

impl Run {
    /// Creates an idle run with every stage pending
    pub fn new(catalog: Arc<StageCatalog>, context: RunContext, config: SimulatorConfig) -> Self {
        let steps = catalog.stages().iter().map(|s| StepState::pending(&s.id)).collect();
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            id: RunId::new_v7(),
            catalog,
            context,
            steps,
            cursor: 0,
            state: RunState::Idle,
            active: None,
            paused_percent: 0,
            tick_increment_pct: config.tick_increment_pct.clamp(1, 100),
            rng,
        }
    }

    pub fn id(&self) -> RunId {
        self.id
    }

    pub fn catalog(&self) -> &StageCatalog {
        &self.catalog
    }

    pub fn context(&self) -> &RunContext {
        &self.context
    }

    pub fn steps(&self) -> &[StepState] {
        &self.steps
    }

    pub fn step(&self, stage_id: &str) -> Option<&StepState> {
        self.steps.iter().find(|s| s.stage_id == stage_id)
    }

    /// Index of the stage being (or about to be) processed; equals the stage
    /// count once the run is complete
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == RunState::Complete
    }

    pub fn completed_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.status == StepStatus::Completed)
            .count()
    }

    /// Overall progress in percent, per the catalog's progress rule
    pub fn progress(&self) -> f64 {
        let total = self.steps.len();
        if total == 0 {
            return 100.0;
        }
        let completed = self.completed_count() as f64;
        let partial = match self.catalog.progress_rule {
            ProgressRule::HalfCredit if self.stage_in_progress() => 0.5,
            _ => 0.0,
        };
        (completed + partial) / total as f64 * 100.0
    }

    /// Overall progress rounded for display
    pub fn progress_percent(&self) -> u8 {
        self.progress().round() as u8
    }

    /// Coarse in-stage progress of the stage under the cursor
    pub fn stage_percent(&self, now: DateTime<Utc>) -> u8 {
        match (self.state, self.active) {
            (RunState::Running, Some(active)) => active.percent_at(now, self.tick_increment_pct),
            (RunState::Paused, _) => self.paused_percent,
            _ => 0,
        }
    }

    /// Instant at which the processing stage completes, if one is processing
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        match self.state {
            RunState::Running => self.active.map(|a| a.deadline(self.tick_increment_pct)),
            _ => None,
        }
    }

    /// Starts an idle run, or resumes a paused one
    ///
    /// Has no effect on a running or complete run.
    pub fn start(&mut self, now: DateTime<Utc>) -> Vec<RunEvent> {
        match self.state {
            RunState::Idle => {
                let mut events = Vec::new();
                self.state = RunState::Running;
                info!(
                    run_id = %self.id,
                    pipeline = ?self.catalog.pipeline,
                    claim_id = self.context.claim_id.as_deref().unwrap_or("-"),
                    "Simulation run started"
                );
                self.begin_stage(now, &mut events);
                events
            }
            RunState::Paused => self.resume(now),
            RunState::Running | RunState::Complete => Vec::new(),
        }
    }

    /// Completes every stage whose deadline is at or before `now`
    pub fn poll(&mut self, now: DateTime<Utc>) -> Vec<RunEvent> {
        let mut events = Vec::new();
        while let Some(deadline) = self.next_deadline() {
            if now < deadline {
                break;
            }
            self.complete_stage(deadline, &mut events);
        }
        events
    }

    /// Halts the processing stage, keeping its coarse percentage
    pub fn pause(&mut self, now: DateTime<Utc>) -> Vec<RunEvent> {
        if self.state != RunState::Running {
            return Vec::new();
        }

        let mut events = self.poll(now);
        let Some(active) = self.active else {
            return events;
        };

        let percent = active.percent_at(now, self.tick_increment_pct);
        self.paused_percent = percent;
        self.steps[self.cursor].status = StepStatus::Pending;
        self.state = RunState::Paused;

        info!(run_id = %self.id, stage_index = self.cursor, stage_percent = percent, "Simulation run paused");
        events.push(RunEvent::Paused {
            index: self.cursor,
            stage_percent: percent,
            at: now,
        });
        events
    }

    /// Continues a paused run from the recorded coarse percentage
    pub fn resume(&mut self, now: DateTime<Utc>) -> Vec<RunEvent> {
        if self.state != RunState::Paused {
            return Vec::new();
        }
        let increment = self.tick_increment_pct;
        let Some(active) = self.active.as_mut() else {
            return Vec::new();
        };

        let done_ticks = u64::from(self.paused_percent / increment);
        active.started_at = now - millis(done_ticks * active.tick_millis(increment));
        self.steps[self.cursor].status = StepStatus::Processing;
        self.state = RunState::Running;

        info!(run_id = %self.id, stage_index = self.cursor, stage_percent = self.paused_percent, "Simulation run resumed");
        vec![RunEvent::Resumed {
            index: self.cursor,
            stage_percent: self.paused_percent,
            at: now,
        }]
    }

    /// Returns every stage to pending and the cursor to the first stage
    pub fn reset(&mut self) {
        self.steps = self
            .catalog
            .stages()
            .iter()
            .map(|s| StepState::pending(&s.id))
            .collect();
        self.cursor = 0;
        self.state = RunState::Idle;
        self.active = None;
        self.paused_percent = 0;
        info!(run_id = %self.id, "Simulation run reset");
    }

    /// Parses a user edit of a completed stage's structured result
    ///
    /// Nothing is mutated; the parsed value is applied with
    /// [`Run::apply_stage_fields`].
    pub fn prepare_stage_edit(&self, stage_id: &str, text: &str) -> Result<Value, ClaimError> {
        let index = self
            .catalog
            .position(stage_id)
            .ok_or_else(|| ClaimError::StageNotFound(stage_id.to_string()))?;
        if self.steps[index].status != StepStatus::Completed {
            return Err(ClaimError::StageNotCompleted(stage_id.to_string()));
        }
        serde_json::from_str(text).map_err(|e| ClaimError::MalformedResult(e.to_string()))
    }

    /// Replaces the structured result of a stage
    pub fn apply_stage_fields(&mut self, stage_id: &str, fields: Value) -> Result<(), ClaimError> {
        let step = self
            .steps
            .iter_mut()
            .find(|s| s.stage_id == stage_id)
            .ok_or_else(|| ClaimError::StageNotFound(stage_id.to_string()))?;
        step.result.get_or_insert_with(StageResult::fallback).fields = Some(fields);
        Ok(())
    }

    /// Renders the run for presentation
    pub fn snapshot(&self, now: DateTime<Utc>) -> RunSnapshot {
        let catalog = &self.catalog;
        let current = match self.state {
            RunState::Running | RunState::Paused => Some(self.cursor),
            RunState::Idle | RunState::Complete => None,
        };

        let steps = catalog
            .stages()
            .iter()
            .zip(&self.steps)
            .enumerate()
            .map(|(index, (stage, step))| StepView {
                index,
                id: stage.id.clone(),
                name: stage.name.clone(),
                description: stage.description.clone(),
                category: stage.category,
                status: step.status,
                label: step.status.label().to_string(),
                duration: step.elapsed_millis.map(format_seconds),
                result: step.result.clone(),
                is_current: current == Some(index),
            })
            .collect();

        RunSnapshot {
            run_id: self.id,
            pipeline: catalog.pipeline,
            title: catalog.title.clone(),
            subtitle: catalog.subtitle.clone(),
            state: self.state,
            claim_id: self
                .context
                .claim_id
                .clone()
                .unwrap_or_else(|| catalog.placeholder_claim_id.clone()),
            claimant_name: self.context.claimant_name.clone(),
            policy_number: self.context.policy_number.clone(),
            current_stage: current,
            completed: self.completed_count(),
            total: self.steps.len(),
            progress: self.progress_percent(),
            stage_progress: self.stage_percent(now),
            steps,
            log: self.log_lines(now),
            completion: self.is_complete().then(|| CompletionPanel {
                title: catalog.completion_title.clone(),
                message: catalog.completion_message.clone(),
            }),
        }
    }

    fn stage_in_progress(&self) -> bool {
        matches!(self.state, RunState::Running | RunState::Paused) && self.cursor < self.steps.len()
    }

    fn begin_stage(&mut self, at: DateTime<Utc>, events: &mut Vec<RunEvent>) {
        let Some(stage) = self.catalog.stage(self.cursor) else {
            return;
        };
        let duration_millis = stage.duration.sample(&mut self.rng);
        let stage_id = stage.id.clone();

        self.active = Some(ActiveStage {
            started_at: at,
            duration_millis,
        });
        self.paused_percent = 0;
        self.steps[self.cursor].status = StepStatus::Processing;

        debug!(run_id = %self.id, stage = %stage_id, duration_ms = duration_millis, "Stage processing");
        events.push(RunEvent::StageStarted {
            index: self.cursor,
            stage_id,
            at,
        });
    }

    fn complete_stage(&mut self, at: DateTime<Utc>, events: &mut Vec<RunEvent>) {
        let Some(active) = self.active.take() else {
            return;
        };
        let elapsed_millis = (at - active.started_at).num_milliseconds().max(0) as u64;
        let index = self.cursor;
        let result = self
            .catalog
            .resolve_result(&self.steps[index].stage_id, self.context.claim_id.as_deref());

        let step = &mut self.steps[index];
        step.status = StepStatus::Completed;
        step.elapsed_millis = Some(elapsed_millis);
        step.completed_at = Some(at);
        step.result = Some(result);
        let stage_id = step.stage_id.clone();

        info!(run_id = %self.id, stage = %stage_id, elapsed_ms = elapsed_millis, "Stage completed");
        events.push(RunEvent::StageCompleted {
            index,
            stage_id,
            elapsed_millis,
            at,
        });

        self.cursor += 1;
        if self.cursor < self.steps.len() {
            self.begin_stage(at, events);
        } else {
            self.state = RunState::Complete;
            info!(run_id = %self.id, "Simulation run complete");
            events.push(RunEvent::RunCompleted { at });
        }
    }

    fn log_lines(&self, now: DateTime<Utc>) -> Vec<LogLine> {
        let mut lines: Vec<LogLine> = self
            .catalog
            .stages()
            .iter()
            .zip(&self.steps)
            .enumerate()
            .filter(|(_, (_, step))| step.status == StepStatus::Completed)
            .map(|(index, (stage, step))| LogLine {
                at: step.completed_at,
                message: format!("STEP {} COMPLETED: {}", index + 1, stage.name),
            })
            .collect();

        let current_name = self.catalog.stage(self.cursor).map(|s| s.name.as_str());
        match (self.state, current_name) {
            (RunState::Idle, _) => lines.push(LogLine {
                at: None,
                message: "Waiting to start workflow...".to_string(),
            }),
            (RunState::Running, Some(name)) => lines.push(LogLine {
                at: Some(now),
                message: format!("PROCESSING: {}...", name),
            }),
            (RunState::Paused, Some(name)) => lines.push(LogLine {
                at: Some(now),
                message: format!("PAUSED: {} at {}%", name, self.paused_percent),
            }),
            (RunState::Complete, _) => lines.push(LogLine {
                at: self.steps.last().and_then(|s| s.completed_at),
                message: format!(
                    "{} - {}",
                    self.catalog.completion_title, self.catalog.completion_message
                ),
            }),
            _ => {}
        }
        lines
    }
}

fn format_seconds(millis: u64) -> String {
    format!("{:.1}s", millis as f64 / 1000.0)
}

/// Presentation view of one stage
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepView {
    pub index: usize,
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: StageCategory,
    pub status: StepStatus,
    pub label: String,
    pub duration: Option<String>,
    pub result: Option<StageResult>,
    pub is_current: bool,
}

/// One line of the real-time processing log
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogLine {
    pub at: Option<DateTime<Utc>>,
    pub message: String,
}

/// Terminal success panel
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionPanel {
    pub title: String,
    pub message: String,
}

/// Everything a screen needs to render a run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSnapshot {
    pub run_id: RunId,
    pub pipeline: Pipeline,
    pub title: String,
    pub subtitle: String,
    pub state: RunState,
    pub claim_id: String,
    pub claimant_name: Option<String>,
    pub policy_number: Option<String>,
    pub current_stage: Option<usize>,
    pub completed: usize,
    pub total: usize,
    pub progress: u8,
    pub stage_progress: u8,
    pub steps: Vec<StepView>,
    pub log: Vec<LogLine>,
    pub completion: Option<CompletionPanel>,
}
