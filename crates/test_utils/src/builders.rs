//! Test Data Builders
//!
//! Builders for catalogs, runs, and stores. Tests specify only the fields they
//! care about and take defaults for the rest.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use domain_claims::{
    CannedResult, ClaimRecord, ClaimRecordPort, Collection, Pipeline, ProgressRule, Run,
    RunContext, SimulatorConfig, Stage, StageCatalog, StageCategory, StageDuration,
};
use infra_store::InMemoryClaimStore;

/// Builder for small stage catalogs with short, fixed durations
pub struct TestCatalogBuilder {
    pipeline: Pipeline,
    stages: Vec<Stage>,
    results: HashMap<String, CannedResult>,
    progress_rule: Option<ProgressRule>,
}

impl Default for TestCatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestCatalogBuilder {
    pub fn new() -> Self {
        Self {
            pipeline: Pipeline::CommercialAgentFlow,
            stages: Vec::new(),
            results: HashMap::new(),
            progress_rule: None,
        }
    }

    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Adds a stage with a fixed duration
    pub fn with_stage(self, id: &str, millis: u64) -> Self {
        self.with_duration(id, StageDuration::fixed(millis))
    }

    pub fn with_duration(mut self, id: &str, duration: StageDuration) -> Self {
        self.stages.push(Stage::new(
            id,
            format!("Stage {}", id),
            format!("Test stage {}", id),
            StageCategory::Verification,
            duration,
        ));
        self
    }

    /// Adds a canned result with structured fields for `id`
    pub fn with_result(mut self, id: &str, text: &str, fields: Value) -> Self {
        self.results
            .insert(id.to_string(), CannedResult::with_fields(text, fields));
        self
    }

    pub fn with_progress_rule(mut self, rule: ProgressRule) -> Self {
        self.progress_rule = Some(rule);
        self
    }

    pub fn build(self) -> StageCatalog {
        let catalog = StageCatalog::new(self.pipeline, self.stages, self.results)
            .expect("test catalog must be non-empty with unique stage ids");
        match self.progress_rule {
            Some(rule) => catalog.with_progress_rule(rule),
            None => catalog,
        }
    }
}

/// Builder for simulator runs
pub struct TestRunBuilder {
    catalog: Arc<StageCatalog>,
    context: RunContext,
    config: SimulatorConfig,
}

impl TestRunBuilder {
    pub fn new(catalog: StageCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            context: RunContext::default(),
            config: SimulatorConfig {
                seed: Some(7),
                ..Default::default()
            },
        }
    }

    pub fn personal() -> Self {
        Self::new(StageCatalog::personal_workflow())
    }

    pub fn commercial() -> Self {
        Self::new(StageCatalog::commercial_agent_flow())
    }

    pub fn with_claim_id(mut self, claim_id: &str) -> Self {
        self.context.claim_id = Some(claim_id.to_string());
        self
    }

    pub fn with_context(mut self, context: RunContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_tick_increment(mut self, pct: u8) -> Self {
        self.config.tick_increment_pct = pct;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn config(&self) -> SimulatorConfig {
        self.config
    }

    pub fn build(self) -> Run {
        Run::new(self.catalog, self.context, self.config)
    }
}

/// Builder for an in-memory store seeded with records
#[derive(Default)]
pub struct TestStoreBuilder {
    records: Vec<(Collection, ClaimRecord)>,
}

impl TestStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, collection: Collection, record: ClaimRecord) -> Self {
        self.records.push((collection, record));
        self
    }

    pub async fn build(self) -> Arc<InMemoryClaimStore> {
        let store = Arc::new(InMemoryClaimStore::new());
        for (collection, record) in self.records {
            store
                .append(collection, record)
                .await
                .expect("in-memory append cannot fail");
        }
        store
    }
}
