//! Claims handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use domain_claims::{claim_details, track_claims, ClaimDetails, GuidedClaimForm, QuickClaimForm, TrackedClaim};

use crate::dto::claims::*;
use crate::{error::ApiError, AppState};

/// Submits a quick-upload personal claim
pub async fn submit_quick(
    State(state): State<AppState>,
    Json(form): Json<QuickClaimForm>,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    let outcome = state.submissions().submit_quick(form).await?;
    info!(claim_id = %outcome.claim_number, "Quick claim accepted");
    Ok((StatusCode::CREATED, Json(outcome.into())))
}

/// Submits a guided personal claim
pub async fn submit_guided(
    State(state): State<AppState>,
    Json(form): Json<GuidedClaimForm>,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    let outcome = state.submissions().submit_guided(form).await?;
    info!(claim_id = %outcome.claim_number, "Guided claim accepted");
    Ok((StatusCode::CREATED, Json(outcome.into())))
}

/// Submits a commercial FNOL
pub async fn submit_commercial(
    State(state): State<AppState>,
    Json(request): Json<CommercialSubmissionRequest>,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    let outcome = state
        .submissions()
        .submit_commercial(request.form, &request.fleet)
        .await?;
    info!(claim_id = %outcome.claim_number, "Commercial FNOL accepted");
    Ok((StatusCode::CREATED, Json(outcome.into())))
}

/// Gets claim details, falling back to the sample claim for unknown ids
pub async fn get_claim(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ClaimDetails>, ApiError> {
    Ok(Json(claim_details(&state.store, &id).await?))
}

/// Searches tracked claims by claim number
pub async fn track(
    State(state): State<AppState>,
    Query(query): Query<TrackQuery>,
) -> Result<Json<Vec<TrackedClaim>>, ApiError> {
    Ok(Json(track_claims(&state.store, &query.q).await?))
}
