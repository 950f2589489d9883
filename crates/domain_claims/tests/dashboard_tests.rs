//! Dashboard, details, and tracking over a seeded store

use std::sync::Arc;

use domain_claims::{
    claim_details, track_claims, ClaimRecordPort, Collection, Dashboard, DashboardTab,
    DetailsSource,
};
use test_utils::{RecordFixtures, TestStoreBuilder};

async fn store() -> Arc<dyn ClaimRecordPort> {
    let mut shadow = RecordFixtures::personal("AS-2024-001234");
    shadow.merge(&serde_json::json!({ "status": "Approved", "claimantName": "Shadow Copy" }));

    TestStoreBuilder::new()
        .with_record(Collection::PersonalClaims, RecordFixtures::personal("AS-2024-000123"))
        .with_record(Collection::PersonalClaims, shadow)
        .with_record(Collection::CommercialClaims, RecordFixtures::commercial("CAI-2024-000456"))
        .build()
        .await
}

#[tokio::test]
async fn test_dashboard_merges_seed_and_stored_claims() {
    let dashboard = Dashboard::new(store().await);
    let view = dashboard.view(DashboardTab::All, "").await.unwrap();

    let ids: Vec<_> = view.rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "AS-2024-001234",
            "AS-2024-001235",
            "AS-2024-001236",
            "AS-2024-001237",
            "AS-2024-000123",
            "CAI-2024-000456",
        ]
    );
    // the seed row wins over a stored record with the same id
    assert_eq!(view.rows[0].claimant, "John Smith");
    assert_eq!(view.rows[0].status, "AI Processing");
    assert_eq!(view.counts.all, 6);
    assert_eq!(view.counts.ai_decisions, 3);
}

#[tokio::test]
async fn test_dashboard_tab_and_search() {
    let dashboard = Dashboard::new(store().await);

    let view = dashboard.view(DashboardTab::NewClaims, "cai-2024").await.unwrap();
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.rows[0].claimant, "Logistics Express Inc.");

    let view = dashboard.view(DashboardTab::Closed, "").await.unwrap();
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.rows[0].id, "AS-2024-001236");
}

#[tokio::test]
async fn test_details_lookup_and_fallback() {
    let store = store().await;

    let details = claim_details(&store, "CAI-2024-000456").await.unwrap();
    assert_eq!(details.source, DetailsSource::Record);
    assert_eq!(details.collection, Some(Collection::CommercialClaims));
    assert_eq!(details.claimant.name.as_deref(), Some("Dana Reyes"));

    let details = claim_details(&store, "AS-2024-999999").await.unwrap();
    assert_eq!(details.source, DetailsSource::Placeholder);
    assert_eq!(details.id, "AS-2024-001234");
}

#[tokio::test]
async fn test_tracking_search() {
    let store = store().await;

    let all = track_claims(&store, "").await.unwrap();
    assert_eq!(all.len(), 4);
    assert_eq!(all[0].status, "In Review");

    let found = track_claims(&store, "001180").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].progress, 100);

    let found = track_claims(&store, "cai").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].claim_type, "Commercial Auto");

    assert!(track_claims(&store, "ZZZ").await.unwrap().is_empty());
}
