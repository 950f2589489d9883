//! Display statuses of claims
//!
//! Persisted records store their status as free text; these enums give the
//! known values a type while leaving unknown text representable.

use serde::{Deserialize, Serialize};

/// Status shown on the dashboard and tracking screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimStatus {
    /// Agents are still working the claim
    #[serde(rename = "AI Processing")]
    AiProcessing,
    /// Waiting on an adjuster's sign-off
    #[serde(rename = "Pending Approval")]
    PendingApproval,
    /// Approved and closed out
    #[serde(rename = "Approved")]
    Approved,
    /// Flagged for manual investigation
    #[serde(rename = "Investigation Required")]
    InvestigationRequired,
    /// Under review (tracking screen)
    #[serde(rename = "In Review")]
    InReview,
    /// Denied
    #[serde(rename = "Denied")]
    Denied,
}

impl ClaimStatus {
    const ALL: [ClaimStatus; 6] = [
        ClaimStatus::AiProcessing,
        ClaimStatus::PendingApproval,
        ClaimStatus::Approved,
        ClaimStatus::InvestigationRequired,
        ClaimStatus::InReview,
        ClaimStatus::Denied,
    ];

    /// Display label, identical to the stored text
    pub fn label(&self) -> &'static str {
        match self {
            ClaimStatus::AiProcessing => "AI Processing",
            ClaimStatus::PendingApproval => "Pending Approval",
            ClaimStatus::Approved => "Approved",
            ClaimStatus::InvestigationRequired => "Investigation Required",
            ClaimStatus::InReview => "In Review",
            ClaimStatus::Denied => "Denied",
        }
    }

    /// Parses stored status text; unknown text yields `None`
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }

    /// Badge variant a front-end renders the status with
    pub fn badge(&self) -> &'static str {
        match self {
            ClaimStatus::Approved => "success",
            ClaimStatus::PendingApproval => "warning",
            ClaimStatus::InvestigationRequired | ClaimStatus::Denied => "destructive",
            ClaimStatus::AiProcessing | ClaimStatus::InReview => "secondary",
        }
    }
}

/// Triage priority of a dashboard row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Normal,
    High,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip() {
        for status in ClaimStatus::ALL {
            assert_eq!(ClaimStatus::from_label(status.label()), Some(status));
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.label()));
        }
        assert_eq!(ClaimStatus::from_label("Reopened"), None);
    }
}
