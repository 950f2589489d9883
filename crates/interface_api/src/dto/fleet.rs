//! Fleet setup DTOs

use serde::{Deserialize, Serialize};

use core_kernel::UploadId;
use domain_claims::submission::CommercialFnolForm;
use domain_claims::FleetSetup;

/// An upload acknowledgement request
///
/// The client echoes back the fleet setup it holds so far; the server returns
/// it updated with the acknowledged upload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetUploadRequest {
    pub file_name: String,
    #[serde(default)]
    pub fleet: FleetSetup,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSetupResponse {
    pub upload_id: UploadId,
    pub file_name: String,
    pub fleet: FleetSetup,
    pub can_proceed: bool,
    /// FNOL form prefilled from the policy, once one is on file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefilled_form: Option<CommercialFnolForm>,
}

impl FleetSetupResponse {
    pub fn new(file_name: String, fleet: FleetSetup) -> Self {
        Self {
            upload_id: UploadId::new(),
            file_name,
            can_proceed: fleet.can_proceed(),
            prefilled_form: fleet.policy.is_some().then(|| fleet.prefilled_form()),
            fleet,
        }
    }
}
