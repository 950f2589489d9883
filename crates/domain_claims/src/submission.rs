//! FNOL submission
//!
//! Three forms feed the portal:
//!
//! - **Quick upload**: claimant name plus evidence files, for personal auto
//! - **Guided**: the four-step personal flow (claimant details, incident
//!   details, evidence, confirm)
//! - **Commercial FNOL**: fleet loss report filed against an uploaded fleet
//!   schedule and policy
//!
//! A valid submission gets a freshly generated claim number, is appended to
//! its collection exactly once, and tells the caller where to navigate next.
//! An invalid one is rejected whole: nothing is stored and no navigation
//! happens.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use core_kernel::{ClaimLine, ClaimNumber, Clock, PortError};

use crate::claim::ClaimStatus;
use crate::error::ClaimError;
use crate::fleet::FleetSetup;
use crate::ports::ClaimRecordPort;
use crate::record::{ClaimRecord, Collection};
use crate::validation::ValidationResult;

/// Delay before the commercial flow redirects to the dashboard
pub const DEFAULT_COMMERCIAL_REDIRECT_MILLIS: u64 = 15_000;

/// Display defaults stamped on personal submissions
const PERSONAL_ESTIMATED_PAYOUT: &str = "$1,850";
const PERSONAL_DAMAGE_TYPE: &str = "Rear Bumper";
const PERSONAL_CONFIDENCE: u8 = 92;

/// An evidence file, acknowledged by name only
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

impl UploadedFile {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size_bytes: None,
        }
    }
}

/// Quick-upload personal claim
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuickClaimForm {
    pub claimant_name: String,
    pub policy_number: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub files: Vec<UploadedFile>,
}

impl QuickClaimForm {
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::ok();
        result.require(&self.claimant_name, "Claimant name is required");
        if self.files.is_empty() {
            result.add_error("At least one file must be uploaded");
        }
        result.optional_email(self.email.as_deref());
        result
    }
}

/// Four-step personal claim
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuidedClaimForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub policy_number: String,
    pub incident_date: String,
    pub incident_time: String,
    pub location: String,
    pub description: String,
    pub files: Vec<UploadedFile>,
}

impl GuidedClaimForm {
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::ok();
        result.require(&self.name, "Full name is required");
        result.require(&self.policy_number, "Policy number is required");
        result.require(&self.incident_date, "Date of incident is required");
        result.require_date_format(&self.incident_date, "Date of incident");
        result.optional_email(Some(&self.email));
        result
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DriverDetails {
    pub name: String,
    pub license_number: String,
    pub is_authorized: bool,
    pub was_injured: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CargoDetails {
    pub has_cargo_damage: bool,
    pub cargo_type: String,
    pub cargo_value: String,
    pub damage_description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThirdPartyDetails {
    pub has_third_party_damage: bool,
    pub has_bodily_injury: bool,
    pub property_damage: String,
    pub injury_description: String,
    pub third_party_info: String,
}

/// Commercial auto First Notice of Loss
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommercialFnolForm {
    pub policy_number: String,
    pub fleet_owner_name: String,
    pub contact_person: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub incident_date: String,
    pub incident_time: String,
    pub incident_location: String,
    pub description: String,
    pub vehicles_involved: Vec<String>,
    pub driver_details: DriverDetails,
    pub cargo_details: CargoDetails,
    pub third_party_details: ThirdPartyDetails,
}

impl CommercialFnolForm {
    /// Validates the form against the uploaded fleet schedule
    pub fn validate(&self, fleet: &FleetSetup) -> ValidationResult {
        let mut result = ValidationResult::ok();
        result.require(&self.contact_person, "Contact person is required");
        result.require(&self.incident_date, "Incident date is required");
        result.require_date_format(&self.incident_date, "Incident date");
        if self.vehicles_involved.is_empty() {
            result.add_error("At least one vehicle must be selected");
        }
        for vin in &self.vehicles_involved {
            if !fleet.has_vehicle(vin) {
                result.add_error(format!("Vehicle {} is not on the fleet schedule", vin));
            }
        }
        result.optional_email(Some(&self.contact_email));
        result
    }

    /// Toggles a vehicle in the involved list
    pub fn select_vehicle(&mut self, vin: &str, selected: bool) {
        self.vehicles_involved.retain(|v| v != vin);
        if selected {
            self.vehicles_involved.push(vin.to_string());
        }
    }
}

/// Screen a client should show next
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Navigation {
    /// Personal workflow visualization for a claim
    Workflow { claim_id: String },
    /// Commercial agent pipeline for a claim
    CommercialAgentFlow { claim_id: String },
    /// Claims dashboard
    Dashboard,
    /// Details page of a claim
    ClaimDetails { claim_id: String },
}

impl Navigation {
    /// Client-side route for this screen
    pub fn path(&self) -> String {
        match self {
            Navigation::Workflow { claim_id } => format!("/workflow?claimId={}", claim_id),
            Navigation::CommercialAgentFlow { claim_id } => {
                format!("/commercial-report-claim?claimId={}", claim_id)
            }
            Navigation::Dashboard => "/dashboard".to_string(),
            Navigation::ClaimDetails { claim_id } => format!("/claim/{}", claim_id),
        }
    }
}

/// A navigation that should happen after a delay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeferredNavigation {
    pub target: Navigation,
    pub after_millis: u64,
}

/// Result of a successful submission
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionOutcome {
    pub claim_number: ClaimNumber,
    pub collection: Collection,
    pub record: ClaimRecord,
    pub navigation: Navigation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<DeferredNavigation>,
}

/// Validates forms, stamps claim numbers and persists submissions
pub struct SubmissionService {
    store: Arc<dyn ClaimRecordPort>,
    clock: Arc<dyn Clock>,
    commercial_redirect_millis: u64,
}

impl SubmissionService {
    pub fn new(store: Arc<dyn ClaimRecordPort>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            commercial_redirect_millis: DEFAULT_COMMERCIAL_REDIRECT_MILLIS,
        }
    }

    /// Overrides the delay before the commercial flow returns to the dashboard
    pub fn with_commercial_redirect_millis(mut self, millis: u64) -> Self {
        self.commercial_redirect_millis = millis;
        self
    }

    /// Submits a quick-upload personal claim
    pub async fn submit_quick(&self, form: QuickClaimForm) -> Result<SubmissionOutcome, ClaimError> {
        reject_invalid("quick", form.validate())?;

        let now = self.clock.now();
        let claim_number = ClaimNumber::generate(ClaimLine::Personal, now);
        let record = personal_record(
            &claim_number,
            json!({
                "claimantName": form.claimant_name.trim(),
                "policyNumber": form.policy_number,
                "phone": form.phone,
                "email": form.email,
                "notes": form.notes,
                "files": file_names(&form.files),
                "submittedAt": now.to_rfc3339(),
                "submissionType": "quick",
            }),
        );

        self.persist(Collection::PersonalClaims, claim_number, record, "quick").await
    }

    /// Submits a guided personal claim
    pub async fn submit_guided(&self, form: GuidedClaimForm) -> Result<SubmissionOutcome, ClaimError> {
        reject_invalid("guided", form.validate())?;

        let now = self.clock.now();
        let claim_number = ClaimNumber::generate(ClaimLine::Personal, now);
        let record = personal_record(
            &claim_number,
            json!({
                "claimantName": form.name.trim(),
                "phone": form.phone,
                "email": form.email,
                "policyNumber": form.policy_number.trim(),
                "incidentDate": form.incident_date,
                "incidentTime": form.incident_time,
                "location": form.location,
                "description": form.description,
                "files": file_names(&form.files),
                "submittedAt": now.to_rfc3339(),
                "submissionType": "guided",
            }),
        );

        self.persist(Collection::PersonalClaims, claim_number, record, "guided").await
    }

    /// Submits a commercial FNOL filed against `fleet`
    pub async fn submit_commercial(
        &self,
        form: CommercialFnolForm,
        fleet: &FleetSetup,
    ) -> Result<SubmissionOutcome, ClaimError> {
        fleet.ensure_ready()?;
        reject_invalid("commercial", form.validate(fleet))?;

        let now = self.clock.now();
        let claim_number = ClaimNumber::generate(ClaimLine::Commercial, now);

        let mut fields = serde_json::to_value(&form)
            .map_err(|e| PortError::transformation(e.to_string()))?;
        if let Value::Object(map) = &mut fields {
            map.insert("submittedAt".to_string(), Value::String(now.to_rfc3339()));
            map.insert("claimId".to_string(), Value::String(claim_number.to_string()));
        }
        let record = ClaimRecord::from_value(fields)
            .ok_or_else(|| PortError::transformation("FNOL form did not serialize to an object"))?;

        self.persist(Collection::CommercialClaims, claim_number, record, "commercial").await
    }

    async fn persist(
        &self,
        collection: Collection,
        claim_number: ClaimNumber,
        record: ClaimRecord,
        kind: &'static str,
    ) -> Result<SubmissionOutcome, ClaimError> {
        self.store.append(collection, record.clone()).await?;

        info!(
            claim_id = %claim_number,
            collection = %collection,
            submission = kind,
            "Claim submitted"
        );

        let claim_id = claim_number.to_string();
        let (navigation, follow_up) = match claim_number.line() {
            ClaimLine::Personal => (Navigation::Workflow { claim_id }, None),
            ClaimLine::Commercial => (
                Navigation::CommercialAgentFlow { claim_id },
                Some(DeferredNavigation {
                    target: Navigation::Dashboard,
                    after_millis: self.commercial_redirect_millis,
                }),
            ),
        };

        Ok(SubmissionOutcome {
            claim_number,
            collection,
            record,
            navigation,
            follow_up,
        })
    }
}

fn reject_invalid(kind: &str, result: ValidationResult) -> Result<(), ClaimError> {
    if !result.is_valid {
        warn!(submission = kind, errors = ?result.errors, "Submission rejected");
    }
    result.into_result()
}

fn file_names(files: &[UploadedFile]) -> Vec<&str> {
    files.iter().map(|f| f.name.as_str()).collect()
}

fn personal_record(claim_number: &ClaimNumber, fields: Value) -> ClaimRecord {
    let mut record = ClaimRecord::from_value(json!({
        "id": claim_number.as_str(),
        "status": ClaimStatus::AiProcessing.label(),
        "estimatedPayout": PERSONAL_ESTIMATED_PAYOUT,
        "damageType": PERSONAL_DAMAGE_TYPE,
        "confidenceScore": PERSONAL_CONFIDENCE,
    }))
    .unwrap_or_default();
    record.merge(&fields);
    record
}
