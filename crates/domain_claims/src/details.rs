//! Claim details page

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::claim::ClaimStatus;
use crate::error::ClaimError;
use crate::ports::{find_in_any, ClaimRecordPort};
use crate::record::{ClaimRecord, Collection};

/// Where the details came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailsSource {
    /// A persisted record matched the requested id
    Record,
    /// Nothing matched; the sample claim is shown instead
    Placeholder,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimantInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub policy_number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentInfo {
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

/// A completed or pending AI check shown in the side panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiCheck {
    pub step: String,
    pub status: String,
    pub confidence: u8,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimDetails {
    pub source: DetailsSource,
    pub id: String,
    pub collection: Option<Collection>,
    pub status: String,
    pub claimant: ClaimantInfo,
    pub incident: IncidentInfo,
    pub estimated_payout: Option<String>,
    pub ai_processing: Vec<AiCheck>,
    /// Agent results saved from the commercial pipeline, keyed by stage id
    pub agent_results: Option<Value>,
}

impl ClaimDetails {
    pub fn from_record(collection: Collection, record: &ClaimRecord) -> Self {
        let text = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| record.get_str(k))
                .map(str::to_string)
        };

        Self {
            source: DetailsSource::Record,
            id: record.id().unwrap_or_default().to_string(),
            collection: Some(collection),
            status: text(&["status"]).unwrap_or_else(|| ClaimStatus::AiProcessing.label().to_string()),
            claimant: ClaimantInfo {
                name: text(&["claimantName", "contactPerson", "fleetOwnerName"]),
                email: text(&["email", "contactEmail"]),
                phone: text(&["phone", "contactPhone"]),
                policy_number: text(&["policyNumber"]),
            },
            incident: IncidentInfo {
                date: text(&["incidentDate"]),
                time: text(&["incidentTime"]),
                location: text(&["location", "incidentLocation"]),
                description: text(&["description", "notes"]),
            },
            estimated_payout: text(&["estimatedPayout"]),
            ai_processing: Vec::new(),
            agent_results: record.get("agentResults").cloned(),
        }
    }

    /// The sample claim shown when a lookup misses
    pub fn placeholder() -> Self {
        let check = |step: &str, status: &str, confidence: u8, details: &str| AiCheck {
            step: step.to_string(),
            status: status.to_string(),
            confidence,
            details: details.to_string(),
        };

        Self {
            source: DetailsSource::Placeholder,
            id: "AS-2024-001234".to_string(),
            collection: None,
            status: ClaimStatus::AiProcessing.label().to_string(),
            claimant: ClaimantInfo {
                name: Some("John Smith".to_string()),
                email: Some("john.smith@email.com".to_string()),
                phone: Some("(555) 123-4567".to_string()),
                policy_number: Some("AS-POL-789456".to_string()),
            },
            incident: IncidentInfo {
                date: Some("2024-01-15".to_string()),
                time: Some("14:30".to_string()),
                location: Some("123 Main St, Springfield, IL".to_string()),
                description: Some("Rear-ended at a stop light. Minor damage to rear bumper.".to_string()),
            },
            estimated_payout: Some("$1,850".to_string()),
            ai_processing: vec![
                check("Policy Lookup", "completed", 100, "Policy found and active"),
                check("Coverage Check", "completed", 98, "Collision + Comprehensive valid"),
                check("Damage Classifier", "completed", 92, "Rear bumper crack detected"),
                check("Repair Estimate Match", "completed", 89, "Match found in local DB"),
                check("Payout Recommendation", "processing", 85, "Calculating final amount..."),
                check("Email Notification", "pending", 0, "Waiting for approval"),
            ],
            agent_results: None,
        }
    }
}

/// Looks up claim details across both collections
pub async fn claim_details(
    store: &Arc<dyn ClaimRecordPort>,
    claim_id: &str,
) -> Result<ClaimDetails, ClaimError> {
    match find_in_any(store.as_ref(), claim_id).await? {
        Some((collection, record)) => Ok(ClaimDetails::from_record(collection, &record)),
        None => {
            debug!(claim_id = %claim_id, "No stored claim, showing placeholder details");
            Ok(ClaimDetails::placeholder())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_commercial_record_details() {
        let record = ClaimRecord::from_value(json!({
            "claimId": "CAI-2024-000042",
            "contactPerson": "Dana Reyes",
            "contactEmail": "dana@example.com",
            "incidentLocation": "I-95 mile 42",
            "agentResults": { "validation": { "policyActive": true } }
        }))
        .unwrap();

        let details = ClaimDetails::from_record(Collection::CommercialClaims, &record);
        assert_eq!(details.source, DetailsSource::Record);
        assert_eq!(details.id, "CAI-2024-000042");
        assert_eq!(details.claimant.name.as_deref(), Some("Dana Reyes"));
        assert_eq!(details.claimant.email.as_deref(), Some("dana@example.com"));
        assert_eq!(details.incident.location.as_deref(), Some("I-95 mile 42"));
        assert_eq!(details.agent_results, Some(json!({ "validation": { "policyActive": true } })));
    }

    #[test]
    fn test_placeholder_has_six_checks() {
        let details = ClaimDetails::placeholder();
        assert_eq!(details.source, DetailsSource::Placeholder);
        assert_eq!(details.ai_processing.len(), 6);
        assert_eq!(details.ai_processing[4].status, "processing");
    }
}
