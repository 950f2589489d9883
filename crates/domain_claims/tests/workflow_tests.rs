//! Edit-save tests for workflow sessions

use std::sync::Arc;

use chrono::TimeDelta;
use serde_json::json;

use domain_claims::{
    ClaimError, ClaimRecordPort, Collection, EditPersistence, Pipeline, SimulatorConfig,
    WorkflowSession,
};
use infra_store::InMemoryClaimStore;
use test_utils::{FailingStore, RecordFixtures, TemporalFixtures, TestStoreBuilder};

const CLAIM: &str = "CAI-2024-000042";

async fn completed_session(store: Arc<dyn ClaimRecordPort>) -> WorkflowSession {
    let mut session = WorkflowSession::open(
        Pipeline::CommercialAgentFlow,
        Some(CLAIM),
        store,
        SimulatorConfig { seed: Some(1), ..Default::default() },
    )
    .await
    .unwrap();

    let t0 = TemporalFixtures::t0();
    session.run_mut().start(t0);
    session.run_mut().poll(t0 + TimeDelta::seconds(60));
    assert!(session.run().is_complete());
    session
}

async fn seeded_store() -> Arc<InMemoryClaimStore> {
    TestStoreBuilder::new()
        .with_record(Collection::CommercialClaims, RecordFixtures::commercial(CLAIM))
        .with_record(Collection::CommercialClaims, RecordFixtures::commercial("CAI-2024-000043"))
        .build()
        .await
}

#[tokio::test]
async fn test_open_loads_context_from_record() {
    let store = seeded_store().await;
    let session = WorkflowSession::open(Pipeline::CommercialAgentFlow, Some(CLAIM), store, SimulatorConfig::default())
        .await
        .unwrap();

    let context = session.run().context();
    assert_eq!(context.claim_id.as_deref(), Some(CLAIM));
    assert_eq!(context.claimant_name.as_deref(), Some("Logistics Express Inc."));
    assert_eq!(context.policy_number.as_deref(), Some("CAI-2024-987654"));
    assert_eq!(session.collection(), Collection::CommercialClaims);
    assert!(session.claim_found());
}

#[tokio::test]
async fn test_valid_edit_updates_run_and_record() {
    let store = seeded_store().await;
    let mut session = completed_session(store.clone()).await;

    let saved = session
        .save_stage_edit("coverage", r#"{ "applicable": [{ "coverage": "Cargo", "limit": "$100,000" }] }"#)
        .await
        .unwrap();
    assert_eq!(saved.persistence, EditPersistence::Persisted);

    let fields = session.run().step("coverage").unwrap().result.clone().unwrap().fields.unwrap();
    assert_eq!(fields["applicable"][0]["coverage"], "Cargo");

    let record = store.find_by_id(Collection::CommercialClaims, CLAIM).await.unwrap().unwrap();
    assert_eq!(
        record.get_path(&["agentResults", "coverage"]),
        Some(&json!({ "applicable": [{ "coverage": "Cargo", "limit": "$100,000" }] }))
    );
    assert_eq!(record.get_str("contactPerson"), Some("Dana Reyes"));

    // other stages and other records are untouched
    let validation = session.run().step("validation").unwrap().result.clone().unwrap().fields.unwrap();
    assert_eq!(validation["policyActive"], true);
    let other = store
        .find_by_id(Collection::CommercialClaims, "CAI-2024-000043")
        .await
        .unwrap()
        .unwrap();
    assert!(other.get("agentResults").is_none());
}

async fn stored_and_in_memory(
    session: &WorkflowSession,
    store: &InMemoryClaimStore,
    stage_id: &str,
) -> (Option<serde_json::Value>, Option<serde_json::Value>) {
    let in_memory = session.run().step(stage_id).unwrap().result.clone().unwrap().fields;
    let record = store.find_by_id(Collection::CommercialClaims, CLAIM).await.unwrap().unwrap();
    (in_memory, record.get_path(&["agentResults", stage_id]).cloned())
}

#[tokio::test]
async fn test_re_edit_dropping_a_key_replaces_stored_result() {
    let store = seeded_store().await;
    let mut session = completed_session(store.clone()).await;

    session.save_stage_edit("coverage", r#"{ "a": 1, "b": 2 }"#).await.unwrap();
    session.save_stage_edit("coverage", r#"{ "a": 1 }"#).await.unwrap();

    let (in_memory, stored) = stored_and_in_memory(&session, &store, "coverage").await;
    assert_eq!(in_memory, Some(json!({ "a": 1 })));
    assert_eq!(stored, in_memory);
}

#[tokio::test]
async fn test_null_edit_is_stored_as_null() {
    let store = seeded_store().await;
    let mut session = completed_session(store.clone()).await;

    session.save_stage_edit("coverage", r#"{ "a": 1 }"#).await.unwrap();
    let saved = session.save_stage_edit("coverage", "null").await.unwrap();
    assert_eq!(saved.persistence, EditPersistence::Persisted);

    let (in_memory, stored) = stored_and_in_memory(&session, &store, "coverage").await;
    assert_eq!(in_memory, Some(serde_json::Value::Null));
    assert_eq!(stored, in_memory);
}

#[tokio::test]
async fn test_malformed_edit_changes_nothing() {
    let store = seeded_store().await;
    let mut session = completed_session(store.clone()).await;
    let before = session.run().step("adjuster").unwrap().result.clone();

    let err = session
        .save_stage_edit("adjuster", r#"{ "adjuster": "Pat Lee", }"#)
        .await
        .unwrap_err();

    assert!(matches!(err, ClaimError::MalformedResult(_)));
    assert_eq!(session.run().step("adjuster").unwrap().result, before);
    let record = store.find_by_id(Collection::CommercialClaims, CLAIM).await.unwrap().unwrap();
    assert!(record.get("agentResults").is_none());
}

#[tokio::test]
async fn test_edit_requires_completed_known_stage() {
    let store = seeded_store().await;
    let mut session =
        WorkflowSession::open(Pipeline::CommercialAgentFlow, Some(CLAIM), store, SimulatorConfig::default())
            .await
            .unwrap();

    let err = session.save_stage_edit("coverage", "{}").await.unwrap_err();
    assert!(matches!(err, ClaimError::StageNotCompleted(_)));

    let err = session.save_stage_edit("underwriting", "{}").await.unwrap_err();
    assert!(matches!(err, ClaimError::StageNotFound(_)));
}

#[tokio::test]
async fn test_missing_record_still_applies_in_memory() {
    let store = Arc::new(InMemoryClaimStore::new());
    let mut session = completed_session(store.clone()).await;

    let saved = session.save_stage_edit("notification", r#"{ "emailSent": false }"#).await.unwrap();

    assert!(!session.claim_found());
    assert_eq!(saved.persistence, EditPersistence::RecordMissing);
    let fields = session.run().step("notification").unwrap().result.clone().unwrap().fields.unwrap();
    assert_eq!(fields, json!({ "emailSent": false }));
    assert!(store.list(Collection::CommercialClaims).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_store_failure_leaves_run_untouched() {
    let store = seeded_store().await;
    let session = completed_session(store).await;
    let before = session.run().step("validation").unwrap().result.clone();

    let failing = Arc::new(FailingStore::new());
    let mut session = WorkflowSession::new(session.into_run(), failing.clone());
    let err = session.save_stage_edit("validation", r#"{ "policyActive": false }"#).await.unwrap_err();

    assert!(matches!(err, ClaimError::Store(_)));
    assert_eq!(session.run().step("validation").unwrap().result, before);
    assert_eq!(failing.write_attempts(), 1);
}
