//! Stage catalogs
//!
//! A catalog is the static, ordered list of stages a run walks through,
//! together with the canned result for each stage and the text shown around
//! the pipeline. Two catalogs ship with the portal:
//!
//! - **Personal workflow**: eight stages with fixed durations, shown on the
//!   workflow visualization screen after a personal claim is submitted.
//! - **Commercial agent flow**: six agent stages with randomized durations,
//!   shown after a commercial FNOL is submitted.
//!
//! The two disagree on stage count and naming for what is nominally the same
//! pipeline; each is kept exactly as the screen that uses it presents it.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ClaimError;
use crate::record::Collection;
use crate::result::{CannedResult, StageResult};
use crate::stage::{Stage, StageCategory, StageDuration};

/// Which built-in pipeline a catalog represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pipeline {
    /// Personal auto workflow visualization
    PersonalWorkflow,
    /// Commercial auto agent pipeline
    CommercialAgentFlow,
}

impl Pipeline {
    /// Builds the catalog for this pipeline
    pub fn catalog(&self) -> StageCatalog {
        match self {
            Pipeline::PersonalWorkflow => StageCatalog::personal_workflow(),
            Pipeline::CommercialAgentFlow => StageCatalog::commercial_agent_flow(),
        }
    }

    /// Collection holding the claim records this pipeline processes
    pub fn collection(&self) -> Collection {
        match self {
            Pipeline::PersonalWorkflow => Collection::PersonalClaims,
            Pipeline::CommercialAgentFlow => Collection::CommercialClaims,
        }
    }
}

/// How overall run progress is derived from stage statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressRule {
    /// `(completed + 0.5 while a stage is in progress) / total`
    HalfCredit,
    /// `completed / total`; in-stage progress is reported separately
    CompletedOnly,
}

/// An ordered, immutable list of stages plus their canned results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageCatalog {
    pub pipeline: Pipeline,
    pub title: String,
    pub subtitle: String,
    pub completion_title: String,
    pub completion_message: String,
    /// Claim identifier substituted into results when the run has none
    pub placeholder_claim_id: String,
    pub progress_rule: ProgressRule,
    stages: Vec<Stage>,
    results: HashMap<String, CannedResult>,
}

impl StageCatalog {
    /// Creates a catalog, rejecting empty stage lists and duplicate stage ids
    pub fn new(
        pipeline: Pipeline,
        stages: Vec<Stage>,
        results: HashMap<String, CannedResult>,
    ) -> Result<Self, ClaimError> {
        if stages.is_empty() {
            return Err(ClaimError::EmptyCatalog);
        }
        let mut seen = HashSet::new();
        for stage in &stages {
            if !seen.insert(stage.id.as_str()) {
                return Err(ClaimError::DuplicateStage(stage.id.clone()));
            }
        }

        let defaults = pipeline.catalog();
        Ok(Self {
            stages,
            results,
            ..defaults
        })
    }

    /// Overrides the progress rule
    pub fn with_progress_rule(mut self, rule: ProgressRule) -> Self {
        self.progress_rule = rule;
        self
    }

    /// Overrides the placeholder claim identifier
    pub fn with_placeholder_claim_id(mut self, claim_id: impl Into<String>) -> Self {
        self.placeholder_claim_id = claim_id.into();
        self
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stage(&self, index: usize) -> Option<&Stage> {
        self.stages.get(index)
    }

    pub fn position(&self, stage_id: &str) -> Option<usize> {
        self.stages.iter().position(|s| s.id == stage_id)
    }

    /// Resolves the result for `stage_id`, filling in `claim_id` or the placeholder
    pub fn resolve_result(&self, stage_id: &str, claim_id: Option<&str>) -> StageResult {
        let claim_id = claim_id.unwrap_or(&self.placeholder_claim_id);
        self.results
            .get(stage_id)
            .map(|canned| canned.render(claim_id))
            .unwrap_or_else(StageResult::fallback)
    }

    /// The eight-stage personal auto workflow
    pub fn personal_workflow() -> Self {
        let stages = vec![
            Stage::new("input-detection", "Input Detection", "Agent detects document type",
                StageCategory::Intake, StageDuration::fixed(2000)),
            Stage::new("claim-intake", "Claim Intake", "Extract details → populate claim object",
                StageCategory::Lookup, StageDuration::fixed(3000)),
            Stage::new("policy-matching", "Policy Matching", "Check policy knowledge base",
                StageCategory::Verification, StageDuration::fixed(1500)),
            Stage::new("damage-assessment", "Damage Assessment", "Analyze uploaded images",
                StageCategory::Imaging, StageDuration::fixed(4000)),
            Stage::new("cost-estimation", "Cost Estimation", "Query repair cost database",
                StageCategory::Estimation, StageDuration::fixed(2500)),
            Stage::new("coverage-validation", "Coverage Validation", "Cross-validate with policy terms",
                StageCategory::Verification, StageDuration::fixed(1800)),
            Stage::new("payout-calculation", "Payout Calculation", "Calculate & send recommendation",
                StageCategory::Payout, StageDuration::fixed(1200)),
            Stage::new("notification", "Notification", "Send email + update systems",
                StageCategory::Notification, StageDuration::fixed(1000)),
        ];

        let results = [
            ("input-detection", "Analyzing uploaded files: 2 images, 1 PDF police report"),
            ("claim-intake", "Extracting claimant info, incident details, and policy number"),
            ("policy-matching", "Policy AS-POL-789456 found - Active, Collision coverage confirmed"),
            ("damage-assessment", "AI detected: Rear bumper crack, minor scratches - 92% confidence"),
            ("cost-estimation", "Local repair shop rates: $1,200 parts + $650 labor = $1,850 total"),
            ("coverage-validation", "Deductible: $500, Coverage limit: $25,000 - Claim approved"),
            ("payout-calculation", "Final payout: $1,850 - $500 (deductible) = $1,350"),
            ("notification", "Email sent to claimant, SharePoint updated, dashboard refreshed"),
        ]
        .into_iter()
        .map(|(id, text)| (id.to_string(), CannedResult::text(text)))
        .collect();

        Self {
            pipeline: Pipeline::PersonalWorkflow,
            title: "AutoSure AI Workflow Visualization".to_string(),
            subtitle: "Behind-the-scenes autonomous agent pipeline".to_string(),
            completion_title: "WORKFLOW COMPLETED SUCCESSFULLY".to_string(),
            completion_message: "Claim ready for review".to_string(),
            placeholder_claim_id: "AS-2024-001234".to_string(),
            progress_rule: ProgressRule::CompletedOnly,
            stages,
            results,
        }
    }

    /// The six-agent commercial auto pipeline
    pub fn commercial_agent_flow() -> Self {
        let agent = StageDuration::range(2000, 4000);
        let stages = vec![
            Stage::new("fnol-intake", "FNOL Intake Agent",
                "Collecting and structuring loss data from submitted FNOL",
                StageCategory::Intake, agent),
            Stage::new("validation", "Claim Validation Agent",
                "Validating policy number, fleet schedule, and driver authorization",
                StageCategory::Verification, agent),
            Stage::new("coverage", "Coverage Verification Agent",
                "Matching loss type with available coverages (Collision, Comprehensive, Cargo, Liability)",
                StageCategory::Lookup, agent),
            Stage::new("adjuster", "Adjuster Assignment Agent",
                "Assigning adjuster based on state, claim type, and current workload",
                StageCategory::Assignment, agent),
            Stage::new("file-creation", "Claim File Creation Agent",
                "Generating claim record in CMS with unique claim number",
                StageCategory::Estimation, agent),
            Stage::new("notification", "Notification Agent",
                "Sending notifications and updating downstream systems",
                StageCategory::Notification, agent),
        ];

        let results = vec![
            ("fnol-intake", CannedResult::with_fields(
                "Structured loss data extracted. Policy: CAI-2024-987654, Fleet: 3 vehicles, Location: Dallas, TX",
                json!({ "policyNumber": "CAI-2024-987654", "fleetVehicles": 3, "lossLocation": "Dallas, TX" }),
            )),
            ("validation", CannedResult::with_fields(
                "✓ Policy active ✓ Driver authorized ✓ Fleet schedule verified",
                json!({ "policyActive": true, "driverAuthorized": true, "fleetScheduleVerified": true }),
            )),
            ("coverage", CannedResult::with_fields(
                "Applicable: Collision ($1M), Comprehensive ($500K), General Liability ($2M)",
                json!({ "applicable": [
                    { "coverage": "Collision", "limit": "$1,000,000" },
                    { "coverage": "Comprehensive", "limit": "$500,000" },
                    { "coverage": "General Liability", "limit": "$2,000,000" }
                ] }),
            )),
            ("adjuster", CannedResult::with_fields(
                "Assigned: Sarah Martinez (Commercial Auto Specialist, Dallas region, 12 open claims)",
                json!({ "adjuster": "Sarah Martinez", "specialty": "Commercial Auto Specialist",
                        "region": "Dallas", "openClaims": 12 }),
            )),
            ("file-creation", CannedResult::with_fields(
                "Claim {claim_id} created in CMS. File packet generated.",
                json!({ "claimNumber": "{claim_id}", "system": "CMS", "filePacketGenerated": true }),
            )),
            ("notification", CannedResult::with_fields(
                "Email sent to fleet owner. SharePoint updated. Dashboard synchronized.",
                json!({ "emailSent": true, "sharePointUpdated": true, "dashboardSynchronized": true }),
            )),
        ]
        .into_iter()
        .map(|(id, canned)| (id.to_string(), canned))
        .collect();

        Self {
            pipeline: Pipeline::CommercialAgentFlow,
            title: "Commercial Auto AI Agent Pipeline".to_string(),
            subtitle: "Processing commercial fleet claim through autonomous agent workflow".to_string(),
            completion_title: "Commercial Auto Claim Processing Complete".to_string(),
            completion_message: "Claim has been successfully processed and assigned to adjuster. \
                                 All stakeholders have been notified."
                .to_string(),
            placeholder_claim_id: "CAI-2024-123456".to_string(),
            progress_rule: ProgressRule::HalfCredit,
            stages,
            results,
        }
    }
}
