//! FNOL submission tests

use std::sync::Arc;

use domain_claims::submission::UploadedFile;
use domain_claims::{
    ClaimError, ClaimRecordPort, Collection, FleetSetup, Navigation, SubmissionService,
};
use infra_store::InMemoryClaimStore;
use test_utils::{
    assert_claim_number_format, FailingStore, FleetFixtures, FormFixtures, TemporalFixtures,
};

fn service(store: Arc<dyn ClaimRecordPort>) -> SubmissionService {
    SubmissionService::new(store, TemporalFixtures::clock())
}

#[tokio::test]
async fn test_quick_submission_appends_one_record() {
    let store = Arc::new(InMemoryClaimStore::new());
    let outcome = service(store.clone()).submit_quick(FormFixtures::quick()).await.unwrap();

    assert_eq!(outcome.claim_number.as_str(), "AS-2024-000123");
    assert_claim_number_format(outcome.claim_number.as_str(), "AS");
    assert_eq!(outcome.collection, Collection::PersonalClaims);
    assert_eq!(outcome.navigation.path(), "/workflow?claimId=AS-2024-000123");
    assert!(outcome.follow_up.is_none());

    let records = store.list(Collection::PersonalClaims).await.unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.id(), Some("AS-2024-000123"));
    assert_eq!(record.get_str("claimantName"), Some("John Smith"));
    assert_eq!(record.get_str("status"), Some("AI Processing"));
    assert_eq!(record.get_str("estimatedPayout"), Some("$1,850"));
    assert_eq!(record.get_str("damageType"), Some("Rear Bumper"));
    assert_eq!(record.get("confidenceScore"), Some(&serde_json::json!(92)));
    assert!(store.list(Collection::CommercialClaims).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_quick_submission_without_name_is_rejected() {
    let store = Arc::new(InMemoryClaimStore::new());
    let mut form = FormFixtures::quick();
    form.claimant_name = "  ".to_string();

    let err = service(store.clone()).submit_quick(form).await.unwrap_err();

    assert_eq!(err.validation_errors().map(|e| e.len()), Some(1));
    assert!(store.list(Collection::PersonalClaims).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_quick_submission_without_files_is_rejected() {
    let store = Arc::new(InMemoryClaimStore::new());
    let mut form = FormFixtures::quick();
    form.files.clear();

    let err = service(store.clone()).submit_quick(form).await.unwrap_err();
    assert!(matches!(err, ClaimError::Validation(_)));
    assert!(store.list(Collection::PersonalClaims).await.unwrap().is_empty());

    let mut form = FormFixtures::quick();
    form.files = vec![UploadedFile::named("photo.heic")];
    assert!(service(store).submit_quick(form).await.is_ok());
}

#[tokio::test]
async fn test_guided_submission_reports_every_missing_field() {
    let store = Arc::new(InMemoryClaimStore::new());
    let mut form = FormFixtures::guided();
    form.name.clear();
    form.policy_number.clear();
    form.incident_date.clear();

    let err = service(store.clone()).submit_guided(form).await.unwrap_err();
    assert_eq!(err.validation_errors().map(|e| e.len()), Some(3));
    assert!(store.list(Collection::PersonalClaims).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_guided_submission_records_incident() {
    let store = Arc::new(InMemoryClaimStore::new());
    let outcome = service(store.clone()).submit_guided(FormFixtures::guided()).await.unwrap();

    assert_eq!(
        outcome.navigation,
        Navigation::Workflow { claim_id: "AS-2024-000123".to_string() }
    );
    let record = store
        .find_by_id(Collection::PersonalClaims, "AS-2024-000123")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.get_str("claimantName"), Some("Sarah Johnson"));
    assert_eq!(record.get_str("incidentDate"), Some("2024-01-14"));
    assert_eq!(record.get_str("submissionType"), Some("guided"));
}

#[tokio::test]
async fn test_commercial_submission_redirects_to_dashboard_later() {
    let store = Arc::new(InMemoryClaimStore::new());
    let fleet = FleetFixtures::ready();
    let outcome = service(store.clone())
        .with_commercial_redirect_millis(15_000)
        .submit_commercial(FormFixtures::commercial(&fleet), &fleet)
        .await
        .unwrap();

    assert_eq!(outcome.claim_number.as_str(), "CAI-2024-000123");
    assert_eq!(outcome.collection, Collection::CommercialClaims);
    assert_eq!(
        outcome.navigation,
        Navigation::CommercialAgentFlow { claim_id: "CAI-2024-000123".to_string() }
    );
    let follow_up = outcome.follow_up.unwrap();
    assert_eq!(follow_up.target, Navigation::Dashboard);
    assert_eq!(follow_up.after_millis, 15_000);

    let records = store.list(Collection::CommercialClaims).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get_str("claimId"), Some("CAI-2024-000123"));
    assert_eq!(records[0].get_str("fleetOwnerName"), Some("Logistics Express Inc."));
    assert!(records[0].get_str("submittedAt").is_some());
    assert!(records[0].get("id").is_none());
}

#[tokio::test]
async fn test_commercial_submission_needs_fleet_setup() {
    let store = Arc::new(InMemoryClaimStore::new());
    let ready = FleetFixtures::ready();
    let form = FormFixtures::commercial(&ready);

    let err = service(store.clone())
        .submit_commercial(form, &FleetSetup::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ClaimError::FleetNotReady(_)));
    assert!(store.list(Collection::CommercialClaims).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_commercial_submission_rejects_unknown_vin() {
    let store = Arc::new(InMemoryClaimStore::new());
    let fleet = FleetFixtures::ready();
    let mut form = FormFixtures::commercial(&fleet);
    form.vehicles_involved.push("JH4KA7650MC000000".to_string());

    let err = service(store.clone()).submit_commercial(form, &fleet).await.unwrap_err();
    let errors = err.validation_errors().unwrap();
    assert!(errors[0].contains("JH4KA7650MC000000"));
    assert!(store.list(Collection::CommercialClaims).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_store_failure_surfaces_without_retry() {
    let store = Arc::new(FailingStore::new());
    let err = service(store.clone()).submit_quick(FormFixtures::quick()).await.unwrap_err();

    assert!(matches!(err, ClaimError::Store(_)));
    assert_eq!(store.write_attempts(), 1);
}
