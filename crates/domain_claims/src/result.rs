//! Canned stage results
//!
//! Every stage completes with a fixed payload looked up by stage identifier.
//! Payload text (and string values inside structured fields) may contain the
//! `{claim_id}` placeholder, which is filled from the run's context.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder token substituted with the run's claim identifier
pub const CLAIM_ID_TOKEN: &str = "{claim_id}";

/// Text shown for a stage that has no entry in the result table
pub const FALLBACK_RESULT_TEXT: &str = "Processing completed successfully";

/// The resolved payload attached to a completed stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageResult {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Value>,
}

impl StageResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fields: None,
        }
    }

    /// Result used when a stage identifier has no canned entry
    pub fn fallback() -> Self {
        Self::text(FALLBACK_RESULT_TEXT)
    }
}

/// A result template stored in a stage catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CannedResult {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Value>,
}

impl CannedResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fields: None,
        }
    }

    pub fn with_fields(text: impl Into<String>, fields: Value) -> Self {
        Self {
            text: text.into(),
            fields: Some(fields),
        }
    }

    /// Fills the claim identifier into the template
    pub fn render(&self, claim_id: &str) -> StageResult {
        StageResult {
            text: self.text.replace(CLAIM_ID_TOKEN, claim_id),
            fields: self.fields.as_ref().map(|fields| interpolate(fields, claim_id)),
        }
    }
}

fn interpolate(value: &Value, claim_id: &str) -> Value {
    match value {
        Value::String(s) => Value::String(s.replace(CLAIM_ID_TOKEN, claim_id)),
        Value::Array(items) => Value::Array(items.iter().map(|v| interpolate(v, claim_id)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), interpolate(v, claim_id)))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_substitutes_text_and_nested_fields() {
        let canned = CannedResult::with_fields(
            "Claim {claim_id} created in CMS.",
            json!({ "claimNumber": "{claim_id}", "links": ["/claims/{claim_id}"], "count": 3 }),
        );

        let result = canned.render("CAI-2024-555555");
        assert_eq!(result.text, "Claim CAI-2024-555555 created in CMS.");
        assert_eq!(
            result.fields,
            Some(json!({ "claimNumber": "CAI-2024-555555", "links": ["/claims/CAI-2024-555555"], "count": 3 }))
        );
    }

    #[test]
    fn test_text_without_token_is_unchanged() {
        let canned = CannedResult::text("Policy active");
        assert_eq!(canned.render("AS-2024-000001").text, "Policy active");
    }
}
