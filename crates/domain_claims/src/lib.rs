//! Claims Portal Domain
//!
//! This crate implements the behaviour behind the demo claims portal: FNOL
//! submission for personal and commercial auto, the claims dashboard, and the
//! simulated "AI agent pipeline" that walks a claim through a fixed list of
//! stages on a timer.
//!
//! # Step Simulator
//!
//! ```text
//! pending -> processing -> completed      (error is declared, never produced)
//!
//! Idle --start--> Running --pause--> Paused --resume--> Running --last stage--> Complete
//!   ^                                                                              |
//!   +------------------------------------reset-------------------------------------+
//! ```
//!
//! The simulator owns no timers. Callers ask for [`Run::next_deadline`] and
//! call [`Run::poll`] once that instant has passed, which keeps every
//! transition deterministic under a virtual clock.

pub mod stage;
pub mod catalog;
pub mod result;
pub mod simulator;
pub mod record;
pub mod ports;
pub mod validation;
pub mod submission;
pub mod fleet;
pub mod claim;
pub mod dashboard;
pub mod details;
pub mod tracking;
pub mod workflow;
pub mod error;

pub use stage::{Stage, StageCategory, StageDuration};
pub use catalog::{Pipeline, ProgressRule, StageCatalog};
pub use result::{CannedResult, StageResult};
pub use simulator::{Run, RunContext, RunEvent, RunSnapshot, RunState, SimulatorConfig, StepState, StepStatus};
pub use record::{ClaimRecord, Collection, RecordPatch};
pub use ports::ClaimRecordPort;
pub use submission::{
    CommercialFnolForm, GuidedClaimForm, Navigation, QuickClaimForm, SubmissionOutcome,
    SubmissionService, UploadedFile,
};
pub use fleet::{FleetPolicy, FleetSetup, Vehicle};
pub use claim::{ClaimStatus, Priority};
pub use dashboard::{Dashboard, DashboardRow, DashboardTab, DashboardView};
pub use details::{claim_details, ClaimDetails, DetailsSource};
pub use tracking::{track_claims, TrackedClaim};
pub use workflow::{EditPersistence, SavedEdit, WorkflowSession};
pub use error::ClaimError;
