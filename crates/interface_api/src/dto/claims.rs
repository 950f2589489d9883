//! Claims DTOs

use serde::{Deserialize, Serialize};

use domain_claims::submission::{CommercialFnolForm, DeferredNavigation};
use domain_claims::{ClaimRecord, Collection, FleetSetup, Navigation, SubmissionOutcome};

/// Commercial FNOL together with the fleet it was filed against
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommercialSubmissionRequest {
    pub fleet: FleetSetup,
    pub form: CommercialFnolForm,
}

/// Client route to navigate to
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationResponse {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_millis: Option<u64>,
}

impl From<&Navigation> for NavigationResponse {
    fn from(nav: &Navigation) -> Self {
        Self {
            path: nav.path(),
            after_millis: None,
        }
    }
}

impl From<&DeferredNavigation> for NavigationResponse {
    fn from(nav: &DeferredNavigation) -> Self {
        Self {
            path: nav.target.path(),
            after_millis: Some(nav.after_millis),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub claim_id: String,
    pub collection: Collection,
    pub navigation: NavigationResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<NavigationResponse>,
    pub record: ClaimRecord,
}

impl From<SubmissionOutcome> for SubmissionResponse {
    fn from(outcome: SubmissionOutcome) -> Self {
        Self {
            claim_id: outcome.claim_number.to_string(),
            collection: outcome.collection,
            navigation: (&outcome.navigation).into(),
            follow_up: outcome.follow_up.as_ref().map(Into::into),
            record: outcome.record,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TrackQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub tab: Option<String>,
    #[serde(default)]
    pub search: String,
}
