//! Internal claims dashboard
//!
//! The dashboard shows a fixed seed table of four claims followed by every
//! persisted submission, filtered by tab and a free-text search.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::claim::{ClaimStatus, Priority};
use crate::error::ClaimError;
use crate::ports::ClaimRecordPort;
use crate::record::{ClaimRecord, Collection};

/// Dashboard tab
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DashboardTab {
    #[default]
    NewClaims,
    AiDecisions,
    Investigation,
    Closed,
    All,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 5] = [
        DashboardTab::NewClaims,
        DashboardTab::AiDecisions,
        DashboardTab::Investigation,
        DashboardTab::Closed,
        DashboardTab::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DashboardTab::NewClaims => "new-claims",
            DashboardTab::AiDecisions => "ai-decisions",
            DashboardTab::Investigation => "investigation",
            DashboardTab::Closed => "closed",
            DashboardTab::All => "all",
        }
    }

    /// Whether a row with `status` belongs on this tab
    pub fn includes(&self, status: &str) -> bool {
        let status = ClaimStatus::from_label(status);
        match self {
            DashboardTab::NewClaims => matches!(
                status,
                Some(ClaimStatus::AiProcessing | ClaimStatus::PendingApproval)
            ),
            DashboardTab::AiDecisions => status == Some(ClaimStatus::AiProcessing),
            DashboardTab::Investigation => status == Some(ClaimStatus::InvestigationRequired),
            DashboardTab::Closed => status == Some(ClaimStatus::Approved),
            DashboardTab::All => true,
        }
    }
}

impl FromStr for DashboardTab {
    type Err = String;

    /// Unknown tab names fall through to `All`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .unwrap_or(DashboardTab::All))
    }
}

/// One row of the claims table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardRow {
    pub id: String,
    pub status: String,
    pub claimant: String,
    pub estimated_payout: Option<String>,
    pub damage_type: Option<String>,
    pub ai_confidence: Option<u8>,
    pub submitted_date: Option<String>,
    #[serde(default)]
    pub priority: Priority,
}

impl DashboardRow {
    /// Maps a persisted record onto a row
    ///
    /// Records without an identifier cannot be shown and yield `None`.
    pub fn from_record(collection: Collection, record: &ClaimRecord) -> Option<Self> {
        let id = record.id()?.to_string();
        let claimant = record
            .get_str("claimantName")
            .or_else(|| record.get_str("fleetOwnerName"))
            .or_else(|| record.get_str("contactPerson"))
            .unwrap_or_default()
            .to_string();
        let status = record
            .get_str("status")
            .unwrap_or(ClaimStatus::AiProcessing.label())
            .to_string();
        let damage_type = record.get_str("damageType").map(str::to_string).or_else(|| {
            (collection == Collection::CommercialClaims).then(|| "Commercial Auto".to_string())
        });

        Some(Self {
            id,
            status,
            claimant,
            estimated_payout: record.get_str("estimatedPayout").map(str::to_string),
            damage_type,
            ai_confidence: record
                .get("confidenceScore")
                .and_then(|v| v.as_u64())
                .and_then(|v| u8::try_from(v).ok()),
            submitted_date: record.get_str("submittedAt").map(submitted_date),
            priority: Priority::Normal,
        })
    }

    /// Colour band of the AI confidence score
    pub fn confidence_band(&self) -> Option<&'static str> {
        self.ai_confidence.map(confidence_band)
    }

    pub fn status_badge(&self) -> &'static str {
        ClaimStatus::from_label(&self.status)
            .map(|s| s.badge())
            .unwrap_or("secondary")
    }

    fn matches_search(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.claimant.to_lowercase().contains(needle)
            || self.id.to_lowercase().contains(needle)
    }
}

/// `success` at 90 and above, `warning` at 70 and above, else `destructive`
pub fn confidence_band(confidence: u8) -> &'static str {
    match confidence {
        90.. => "success",
        70..=89 => "warning",
        _ => "destructive",
    }
}

fn submitted_date(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive().to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Number of rows on each tab
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabCounts {
    pub new_claims: usize,
    pub ai_decisions: usize,
    pub investigation: usize,
    pub closed: usize,
    pub all: usize,
}

impl TabCounts {
    fn tally(rows: &[DashboardRow]) -> Self {
        let count = |tab: DashboardTab| rows.iter().filter(|r| tab.includes(&r.status)).count();
        Self {
            new_claims: count(DashboardTab::NewClaims),
            ai_decisions: count(DashboardTab::AiDecisions),
            investigation: count(DashboardTab::Investigation),
            closed: count(DashboardTab::Closed),
            all: rows.len(),
        }
    }
}

/// Filtered dashboard contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub tab: DashboardTab,
    pub search: String,
    pub rows: Vec<DashboardRow>,
    pub counts: TabCounts,
}

impl DashboardView {
    /// Filters `rows` by tab, then by case-insensitive search on claimant or id
    ///
    /// Counts are computed over all rows, ignoring tab and search.
    pub fn build(rows: Vec<DashboardRow>, tab: DashboardTab, search: &str) -> Self {
        let counts = TabCounts::tally(&rows);
        let needle = search.trim().to_lowercase();
        let rows = rows
            .into_iter()
            .filter(|r| tab.includes(&r.status) && r.matches_search(&needle))
            .collect();
        Self {
            tab,
            search: search.to_string(),
            rows,
            counts,
        }
    }
}

/// Dashboard service over the claim store
pub struct Dashboard {
    store: Arc<dyn ClaimRecordPort>,
}

impl Dashboard {
    pub fn new(store: Arc<dyn ClaimRecordPort>) -> Self {
        Self { store }
    }

    /// Seed rows followed by persisted personal then commercial records,
    /// deduplicated by id keeping the first occurrence
    pub async fn rows(&self) -> Result<Vec<DashboardRow>, ClaimError> {
        let mut rows = seed_rows();
        for collection in Collection::ALL {
            let records = self.store.list(collection).await?;
            rows.extend(
                records
                    .iter()
                    .filter_map(|r| DashboardRow::from_record(collection, r)),
            );
        }

        let mut seen = HashSet::new();
        rows.retain(|r| seen.insert(r.id.clone()));
        debug!(rows = rows.len(), "Dashboard rows loaded");
        Ok(rows)
    }

    pub async fn view(&self, tab: DashboardTab, search: &str) -> Result<DashboardView, ClaimError> {
        Ok(DashboardView::build(self.rows().await?, tab, search))
    }
}

/// The four claims every dashboard starts with
pub fn seed_rows() -> Vec<DashboardRow> {
    [
        ("AS-2024-001234", ClaimStatus::AiProcessing, "John Smith", "$1,850", "Rear Bumper", 92, "2024-01-15", Priority::Normal),
        ("AS-2024-001235", ClaimStatus::PendingApproval, "Sarah Johnson", "$3,200", "Side Panel", 87, "2024-01-14", Priority::High),
        ("AS-2024-001236", ClaimStatus::Approved, "Mike Davis", "$950", "Windshield", 98, "2024-01-13", Priority::Normal),
        ("AS-2024-001237", ClaimStatus::InvestigationRequired, "Lisa Wilson", "$5,500", "Total Loss", 45, "2024-01-12", Priority::High),
    ]
    .into_iter()
    .map(|(id, status, claimant, payout, damage, confidence, date, priority)| DashboardRow {
        id: id.to_string(),
        status: status.label().to_string(),
        claimant: claimant.to_string(),
        estimated_payout: Some(payout.to_string()),
        damage_type: Some(damage.to_string()),
        ai_confidence: Some(confidence),
        submitted_date: Some(date.to_string()),
        priority,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_seed_tabs() {
        let view = DashboardView::build(seed_rows(), DashboardTab::NewClaims, "");
        let ids: Vec<_> = view.rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["AS-2024-001234", "AS-2024-001235"]);
        assert_eq!(
            view.counts,
            TabCounts { new_claims: 2, ai_decisions: 1, investigation: 1, closed: 1, all: 4 }
        );
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let view = DashboardView::build(seed_rows(), DashboardTab::All, "LISA");
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].id, "AS-2024-001237");

        let view = DashboardView::build(seed_rows(), DashboardTab::All, "001236");
        assert_eq!(view.rows[0].claimant, "Mike Davis");
    }

    #[test]
    fn test_confidence_bands() {
        assert_eq!(confidence_band(90), "success");
        assert_eq!(confidence_band(89), "warning");
        assert_eq!(confidence_band(70), "warning");
        assert_eq!(confidence_band(69), "destructive");
    }

    #[test]
    fn test_tab_parse_falls_back_to_all() {
        assert_eq!("closed".parse::<DashboardTab>(), Ok(DashboardTab::Closed));
        assert_eq!("bogus".parse::<DashboardTab>(), Ok(DashboardTab::All));
    }

    #[test]
    fn test_commercial_record_maps_to_row() {
        let record = ClaimRecord::from_value(json!({
            "claimId": "CAI-2024-000042",
            "fleetOwnerName": "Logistics Express Inc.",
            "submittedAt": "2024-03-02T10:00:00+00:00"
        }))
        .unwrap();
        let row = DashboardRow::from_record(Collection::CommercialClaims, &record).unwrap();
        assert_eq!(row.id, "CAI-2024-000042");
        assert_eq!(row.status, "AI Processing");
        assert_eq!(row.claimant, "Logistics Express Inc.");
        assert_eq!(row.submitted_date.as_deref(), Some("2024-03-02"));
        assert_eq!(row.confidence_band(), None);
    }
}
