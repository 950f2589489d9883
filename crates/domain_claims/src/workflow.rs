//! Workflow sessions
//!
//! A [`WorkflowSession`] binds a simulator [`Run`] to the claim store so that
//! user edits of stage results are written back to the claim they belong to.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::catalog::Pipeline;
use crate::error::ClaimError;
use crate::ports::ClaimRecordPort;
use crate::record::{Collection, RecordPatch};
use crate::simulator::{Run, RunContext, SimulatorConfig};

/// What happened to the stored copy of an edited stage result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditPersistence {
    /// The claim record was patched
    Persisted,
    /// The run has no claim id, so only the in-memory result changed
    Unbound,
    /// No record with the run's claim id exists in the collection
    RecordMissing,
}

/// Result of a saved stage edit
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedEdit {
    pub stage_id: String,
    pub fields: Value,
    pub persistence: EditPersistence,
}

/// A run together with the store its claim lives in
pub struct WorkflowSession {
    run: Run,
    store: Arc<dyn ClaimRecordPort>,
    claim_found: bool,
}

impl WorkflowSession {
    pub fn new(run: Run, store: Arc<dyn ClaimRecordPort>) -> Self {
        Self {
            run,
            store,
            claim_found: false,
        }
    }

    /// Opens a session for `pipeline`
    ///
    /// When `claim_id` names a stored claim in the pipeline's collection the
    /// run context is filled from that record; an unknown id is still used for
    /// interpolation.
    pub async fn open(
        pipeline: Pipeline,
        claim_id: Option<&str>,
        store: Arc<dyn ClaimRecordPort>,
        config: SimulatorConfig,
    ) -> Result<Self, ClaimError> {
        let record = match claim_id {
            Some(id) => store.find_by_id(pipeline.collection(), id).await?,
            None => None,
        };
        let claim_found = record.is_some();
        let context = match (&record, claim_id) {
            (Some(record), _) => RunContext::from_record(record),
            (None, Some(id)) => RunContext::for_claim(id),
            (None, None) => RunContext::default(),
        };

        let run = Run::new(Arc::new(pipeline.catalog()), context, config);
        info!(
            run_id = %run.id(),
            pipeline = ?pipeline,
            claim_id = ?run.context().claim_id,
            "Workflow session opened"
        );
        Ok(Self {
            run,
            store,
            claim_found,
        })
    }

    /// Whether the run's context came from a stored claim record
    pub fn claim_found(&self) -> bool {
        self.claim_found
    }

    pub fn run(&self) -> &Run {
        &self.run
    }

    pub fn run_mut(&mut self) -> &mut Run {
        &mut self.run
    }

    pub fn into_run(self) -> Run {
        self.run
    }

    /// Collection the run's claim is stored in
    pub fn collection(&self) -> Collection {
        self.run.catalog().pipeline.collection()
    }

    /// Saves a user edit of a completed stage's structured result
    ///
    /// The text must parse as JSON; on any error nothing changes, neither in
    /// memory nor in the store. A valid edit replaces the claim's
    /// `agentResults.<stage id>` wholesale first and then the run's copy, so
    /// both hold the same value.
    /// A missing claim record does not fail the edit.
    pub async fn save_stage_edit(&mut self, stage_id: &str, text: &str) -> Result<SavedEdit, ClaimError> {
        let fields = self.run.prepare_stage_edit(stage_id, text)?;
        let collection = self.collection();

        let persistence = match self.run.context().claim_id.clone() {
            None => EditPersistence::Unbound,
            Some(claim_id) => {
                let patch = RecordPatch::set(&["agentResults", stage_id], fields.clone());
                match self.store.patch_by_id(collection, &claim_id, &patch).await {
                    Ok(_) => EditPersistence::Persisted,
                    Err(e) if e.is_not_found() => {
                        warn!(
                            claim_id = %claim_id,
                            collection = %collection,
                            stage_id = %stage_id,
                            "No stored claim for edited stage result"
                        );
                        EditPersistence::RecordMissing
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        };

        self.run.apply_stage_fields(stage_id, fields.clone())?;
        info!(
            run_id = %self.run.id(),
            stage_id = %stage_id,
            persistence = ?persistence,
            "Stage result edited"
        );

        Ok(SavedEdit {
            stage_id: stage_id.to_string(),
            fields,
            persistence,
        })
    }
}
