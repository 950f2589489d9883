//! Fleet setup handlers
//!
//! Uploads are stateless: the client sends the fleet setup it holds and gets
//! it back with the new upload applied.

use axum::Json;

use crate::dto::fleet::*;
use crate::error::ApiError;

/// Acknowledges a fleet schedule upload
pub async fn upload_schedule(
    Json(request): Json<FleetUploadRequest>,
) -> Result<Json<FleetSetupResponse>, ApiError> {
    let mut fleet = request.fleet;
    fleet.upload_fleet_schedule(&request.file_name)?;
    Ok(Json(FleetSetupResponse::new(request.file_name, fleet)))
}

/// Acknowledges a policy document upload
pub async fn upload_policy(
    Json(request): Json<FleetUploadRequest>,
) -> Result<Json<FleetSetupResponse>, ApiError> {
    let mut fleet = request.fleet;
    fleet.upload_policy(&request.file_name)?;
    Ok(Json(FleetSetupResponse::new(request.file_name, fleet)))
}
