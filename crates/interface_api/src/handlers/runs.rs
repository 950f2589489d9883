//! Simulator run handlers
//!
//! Every handler locks the run's slot, brings the run up to date with the
//! clock, applies its transition, and answers with a fresh snapshot.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use core_kernel::RunId;
use domain_claims::{RunSnapshot, WorkflowSession};

use crate::dto::runs::*;
use crate::error::ApiError;
use crate::runner::{spawn_driver, SharedSlot};
use crate::AppState;

fn parse_run_id(raw: &str) -> Result<RunId, ApiError> {
    raw.parse::<RunId>()
        .map_err(|_| ApiError::BadRequest(format!("Invalid run id: {}", raw)))
}

async fn find_slot(state: &AppState, raw: &str) -> Result<SharedSlot, ApiError> {
    let id = parse_run_id(raw)?;
    state.runs.get(id).await.ok_or_else(|| ApiError::run_not_found(id))
}

/// Creates a run for a pipeline, optionally bound to a stored claim
pub async fn create_run(
    State(state): State<AppState>,
    Json(request): Json<CreateRunRequest>,
) -> Result<(StatusCode, Json<RunSnapshot>), ApiError> {
    let session = WorkflowSession::open(
        request.pipeline,
        request.claim_id.as_deref(),
        state.store.clone(),
        state.config.simulator_config(),
    )
    .await?;

    let claim_found = session.claim_found();
    let (id, shared) = state.runs.insert(session).await;
    let mut slot = shared.lock().await;
    // auto-start waits for a stored claim to show
    if request.auto_start && claim_found {
        spawn_driver(&shared, &mut slot, state.clock.clone(), Some(state.config.auto_start_delay()));
        info!(run_id = %id, delay_ms = state.config.auto_start_delay_ms, "Run scheduled to auto-start");
    } else if request.auto_start {
        info!(run_id = %id, claim_id = ?request.claim_id, "No stored claim, auto-start skipped");
    }

    let snapshot = slot.session.run().snapshot(state.clock.now());
    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// Gets the current view of a run
pub async fn get_run(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RunSnapshot>, ApiError> {
    let shared = find_slot(&state, &id).await?;
    let mut slot = shared.lock().await;
    slot.touch();
    let now = state.clock.now();
    slot.session.run_mut().poll(now);
    Ok(Json(slot.session.run().snapshot(now)))
}

/// Starts an idle run, or resumes a paused one
pub async fn start_run(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RunSnapshot>, ApiError> {
    let shared = find_slot(&state, &id).await?;
    let mut slot = shared.lock().await;
    slot.touch();
    let now = state.clock.now();
    slot.session.run_mut().poll(now);
    slot.session.run_mut().start(now);
    spawn_driver(&shared, &mut slot, state.clock.clone(), None);
    Ok(Json(slot.session.run().snapshot(now)))
}

/// Pauses a running run
pub async fn pause_run(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RunSnapshot>, ApiError> {
    let shared = find_slot(&state, &id).await?;
    let mut slot = shared.lock().await;
    slot.touch();
    slot.stop_driver();
    let now = state.clock.now();
    slot.session.run_mut().pause(now);
    Ok(Json(slot.session.run().snapshot(now)))
}

/// Resumes a paused run
pub async fn resume_run(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RunSnapshot>, ApiError> {
    let shared = find_slot(&state, &id).await?;
    let mut slot = shared.lock().await;
    slot.touch();
    let now = state.clock.now();
    slot.session.run_mut().resume(now);
    spawn_driver(&shared, &mut slot, state.clock.clone(), None);
    Ok(Json(slot.session.run().snapshot(now)))
}

/// Returns a run to idle, cancelling any pending timer
pub async fn reset_run(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RunSnapshot>, ApiError> {
    let shared = find_slot(&state, &id).await?;
    let mut slot = shared.lock().await;
    slot.touch();
    slot.stop_driver();
    slot.session.run_mut().reset();
    Ok(Json(slot.session.run().snapshot(state.clock.now())))
}

/// Discards a run
pub async fn delete_run(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_run_id(&id)?;
    if state.runs.remove(id).await {
        info!(run_id = %id, "Run discarded");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::run_not_found(id))
    }
}

/// Replaces a completed stage's result with edited JSON
pub async fn save_stage_result(
    State(state): State<AppState>,
    Path((id, stage_id)): Path<(String, String)>,
    Json(request): Json<EditStageResultRequest>,
) -> Result<Json<EditStageResultResponse>, ApiError> {
    let shared = find_slot(&state, &id).await?;
    let mut slot = shared.lock().await;
    slot.touch();
    let now = state.clock.now();
    slot.session.run_mut().poll(now);

    let saved = slot.session.save_stage_edit(&stage_id, &request.text).await?;
    Ok(Json(EditStageResultResponse {
        saved,
        run: slot.session.run().snapshot(now),
    }))
}
