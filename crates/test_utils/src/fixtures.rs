//! Pre-built Test Fixtures
//!
//! Ready-to-use forms, records, and timestamps. Every fixture is deterministic
//! so claim numbers generated from [`TemporalFixtures::t0`] are predictable.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use serde_json::json;

use core_kernel::ManualClock;
use domain_claims::submission::{CommercialFnolForm, GuidedClaimForm, QuickClaimForm, UploadedFile};
use domain_claims::{ClaimRecord, FleetSetup};

static T0: Lazy<DateTime<Utc>> = Lazy::new(|| {
    Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0)
        .single()
        .unwrap_or_default()
        + chrono::TimeDelta::milliseconds(123)
});

/// Fixture for virtual time
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// 2024-01-15T14:30:00.123Z; claim numbers generated here end in `000123`
    pub fn t0() -> DateTime<Utc> {
        *T0
    }

    /// Manual clock starting at [`TemporalFixtures::t0`]
    pub fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(Self::t0()))
    }
}

/// Fixture for submission forms
pub struct FormFixtures;

impl FormFixtures {
    pub fn quick() -> QuickClaimForm {
        QuickClaimForm {
            claimant_name: "John Smith".to_string(),
            policy_number: Some("AS-POL-789456".to_string()),
            email: Some("john.smith@email.com".to_string()),
            files: vec![UploadedFile::named("rear-bumper.jpg")],
            ..Default::default()
        }
    }

    pub fn guided() -> GuidedClaimForm {
        GuidedClaimForm {
            name: "Sarah Johnson".to_string(),
            phone: "(555) 987-6543".to_string(),
            email: "sarah@example.com".to_string(),
            policy_number: "AS-POL-123987".to_string(),
            incident_date: "2024-01-14".to_string(),
            incident_time: "08:15".to_string(),
            location: "Oak Ave & 3rd St".to_string(),
            description: "Side-swiped while parked".to_string(),
            files: vec![UploadedFile::named("side-panel.jpg")],
        }
    }

    /// Commercial FNOL prefilled from `fleet`, naming its first vehicle
    pub fn commercial(fleet: &FleetSetup) -> CommercialFnolForm {
        let mut form = fleet.prefilled_form();
        form.contact_person = "Dana Reyes".to_string();
        form.contact_phone = "(555) 222-0101".to_string();
        form.contact_email = "dana@logistics-express.com".to_string();
        form.incident_date = "2024-01-12".to_string();
        form.incident_location = "I-95 mile 42".to_string();
        form.description = "Box truck rear-ended at a toll plaza".to_string();
        if let Some(vehicle) = fleet.vehicles.first() {
            form.vehicles_involved = vec![vehicle.vin.clone()];
        }
        form
    }
}

/// Fixture for fleet setup
pub struct FleetFixtures;

impl FleetFixtures {
    /// Fleet with both uploads acknowledged
    pub fn ready() -> FleetSetup {
        let mut fleet = FleetSetup::new();
        fleet.upload_fleet_schedule("fleet-schedule.csv").expect("csv is accepted");
        fleet.upload_policy("policy.pdf").expect("pdf is accepted");
        fleet
    }
}

/// Fixture for persisted claim records
pub struct RecordFixtures;

impl RecordFixtures {
    pub fn personal(id: &str) -> ClaimRecord {
        ClaimRecord::from_value(json!({
            "id": id,
            "claimantName": "John Smith",
            "policyNumber": "AS-POL-789456",
            "status": "AI Processing",
            "estimatedPayout": "$1,850",
            "damageType": "Rear Bumper",
            "confidenceScore": 92,
            "submittedAt": "2024-01-15T14:30:00.123+00:00"
        }))
        .expect("object literal")
    }

    pub fn commercial(claim_id: &str) -> ClaimRecord {
        ClaimRecord::from_value(json!({
            "claimId": claim_id,
            "policyNumber": "CAI-2024-987654",
            "fleetOwnerName": "Logistics Express Inc.",
            "contactPerson": "Dana Reyes",
            "incidentDate": "2024-01-12",
            "vehiclesInvolved": ["1HGBH41JXMN109186"],
            "submittedAt": "2024-01-15T14:30:00.123+00:00"
        }))
        .expect("object literal")
    }
}
