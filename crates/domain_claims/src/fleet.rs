//! Commercial fleet setup
//!
//! Before a commercial FNOL can be filed the fleet owner uploads a fleet
//! schedule and a policy document. Uploads are acknowledged by file name only;
//! the contents are never read and a fixed sample schedule and policy stand in
//! for whatever was uploaded.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ClaimError;
use crate::submission::CommercialFnolForm;

const FLEET_EXTENSIONS: &[&str] = &["csv", "xlsx", "xls"];
const POLICY_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];

/// A vehicle on the fleet schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub vin: String,
    pub license_plate: String,
    pub state: String,
    pub vehicle_type: String,
    pub assigned_driver: String,
}

/// Commercial auto policy summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetPolicy {
    pub policy_number: String,
    pub policy_start: String,
    pub policy_end: String,
    pub fleet_owner_name: String,
    pub dot_number: String,
    pub coverage_types: Vec<String>,
    pub limits: BTreeMap<String, String>,
    pub additional_coverages: Vec<String>,
}

/// State of one upload slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    #[default]
    Idle,
    Success,
    Error,
}

/// Fleet schedule and policy gathered in the first commercial step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSetup {
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    #[serde(default)]
    pub policy: Option<FleetPolicy>,
    #[serde(default)]
    pub fleet_upload: UploadStatus,
    #[serde(default)]
    pub policy_upload: UploadStatus,
}

impl FleetSetup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acknowledges a fleet schedule upload and loads the sample schedule
    pub fn upload_fleet_schedule(&mut self, file_name: &str) -> Result<&[Vehicle], ClaimError> {
        if !has_extension(file_name, FLEET_EXTENSIONS) {
            self.fleet_upload = UploadStatus::Error;
            return Err(ClaimError::UnsupportedUpload(format!(
                "{} (expected .csv, .xlsx or .xls)",
                file_name
            )));
        }
        self.fleet_upload = UploadStatus::Success;
        self.vehicles = sample_vehicles();
        info!(file = %file_name, vehicles = self.vehicles.len(), "Fleet schedule acknowledged");
        Ok(&self.vehicles)
    }

    /// Acknowledges a policy document upload and loads the sample policy
    pub fn upload_policy(&mut self, file_name: &str) -> Result<&FleetPolicy, ClaimError> {
        if !has_extension(file_name, POLICY_EXTENSIONS) {
            self.policy_upload = UploadStatus::Error;
            return Err(ClaimError::UnsupportedUpload(format!(
                "{} (expected .pdf, .doc or .docx)",
                file_name
            )));
        }
        self.policy_upload = UploadStatus::Success;
        info!(file = %file_name, "Policy document acknowledged");
        Ok(self.policy.insert(sample_policy()))
    }

    /// Removes the vehicle at `index` from the schedule
    pub fn remove_vehicle(&mut self, index: usize) -> Option<Vehicle> {
        (index < self.vehicles.len()).then(|| self.vehicles.remove(index))
    }

    /// Whether the FNOL intake step can be entered
    pub fn can_proceed(&self) -> bool {
        !self.vehicles.is_empty() && self.policy.is_some()
    }

    /// Fails with `FleetNotReady` unless the setup is complete
    pub fn ensure_ready(&self) -> Result<(), ClaimError> {
        if self.vehicles.is_empty() {
            return Err(ClaimError::FleetNotReady("no vehicles on the fleet schedule".to_string()));
        }
        if self.policy.is_none() {
            return Err(ClaimError::FleetNotReady("no policy document uploaded".to_string()));
        }
        Ok(())
    }

    pub fn has_vehicle(&self, vin: &str) -> bool {
        self.vehicles.iter().any(|v| v.vin == vin)
    }

    /// Starts an FNOL form prefilled from the policy
    pub fn prefilled_form(&self) -> CommercialFnolForm {
        let mut form = CommercialFnolForm::default();
        if let Some(policy) = &self.policy {
            form.policy_number = policy.policy_number.clone();
            form.fleet_owner_name = policy.fleet_owner_name.clone();
        }
        form
    }
}

fn has_extension(file_name: &str, allowed: &[&str]) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// The three-vehicle schedule every fleet upload resolves to
pub fn sample_vehicles() -> Vec<Vehicle> {
    [
        ("1HGBH41JXMN109186", "FL123ABC", "FL", "Box Truck", "John Smith"),
        ("2T1BURHE8JC123456", "TX456DEF", "TX", "Delivery Van", "Sarah Johnson"),
        ("3VWD17AJ8EM123789", "CA789GHI", "CA", "Semi-Trailer", "Mike Davis"),
    ]
    .into_iter()
    .map(|(vin, plate, state, kind, driver)| Vehicle {
        vin: vin.to_string(),
        license_plate: plate.to_string(),
        state: state.to_string(),
        vehicle_type: kind.to_string(),
        assigned_driver: driver.to_string(),
    })
    .collect()
}

/// The policy every policy upload resolves to
pub fn sample_policy() -> FleetPolicy {
    let to_strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    FleetPolicy {
        policy_number: "CAI-2024-987654".to_string(),
        policy_start: "2024-01-01".to_string(),
        policy_end: "2024-12-31".to_string(),
        fleet_owner_name: "Logistics Express Inc.".to_string(),
        dot_number: "DOT-123456".to_string(),
        coverage_types: to_strings(&["Collision", "Comprehensive", "Cargo", "General Liability"]),
        limits: [
            ("collision", "$1,000,000"),
            ("comprehensive", "$500,000"),
            ("cargo", "$100,000"),
            ("liability", "$2,000,000"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect(),
        additional_coverages: to_strings(&["Roadside Assistance", "Rental Reimbursement"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uploads_make_setup_ready() {
        let mut setup = FleetSetup::new();
        assert!(!setup.can_proceed());

        assert_eq!(setup.upload_fleet_schedule("fleet.CSV").unwrap().len(), 3);
        assert!(!setup.can_proceed());

        setup.upload_policy("policy.pdf").unwrap();
        assert!(setup.can_proceed());
        assert!(setup.ensure_ready().is_ok());
        assert_eq!(setup.fleet_upload, UploadStatus::Success);
    }

    #[test]
    fn test_unsupported_extension_marks_error() {
        let mut setup = FleetSetup::new();
        let err = setup.upload_fleet_schedule("fleet.pdf").unwrap_err();
        assert!(matches!(err, ClaimError::UnsupportedUpload(_)));
        assert_eq!(setup.fleet_upload, UploadStatus::Error);
        assert!(setup.vehicles.is_empty());

        assert!(setup.upload_policy("policy").is_err());
        assert_eq!(setup.policy_upload, UploadStatus::Error);
    }

    #[test]
    fn test_remove_vehicle() {
        let mut setup = FleetSetup::new();
        setup.upload_fleet_schedule("fleet.xlsx").unwrap();

        let removed = setup.remove_vehicle(1).unwrap();
        assert_eq!(removed.vin, "2T1BURHE8JC123456");
        assert_eq!(setup.vehicles.len(), 2);
        assert!(setup.remove_vehicle(5).is_none());
    }

    #[test]
    fn test_prefilled_form_uses_policy() {
        let mut setup = FleetSetup::new();
        setup.upload_policy("policy.docx").unwrap();
        let form = setup.prefilled_form();
        assert_eq!(form.policy_number, "CAI-2024-987654");
        assert_eq!(form.fleet_owner_name, "Logistics Express Inc.");
    }
}
