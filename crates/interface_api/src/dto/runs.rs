//! Run DTOs

use serde::{Deserialize, Serialize};

use domain_claims::{Pipeline, RunSnapshot, SavedEdit};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRunRequest {
    pub pipeline: Pipeline,
    pub claim_id: Option<String>,
    /// Start automatically after the configured delay, once `claim_id`
    /// resolves to a stored claim
    #[serde(default)]
    pub auto_start: bool,
}

/// Raw editor text for a stage result; parsed server-side
#[derive(Debug, Deserialize)]
pub struct EditStageResultRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditStageResultResponse {
    pub saved: SavedEdit,
    pub run: RunSnapshot,
}
