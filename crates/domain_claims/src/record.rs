//! Persisted claim records
//!
//! Records are loosely structured JSON objects appended to a named collection
//! when a form is submitted. There is no schema: personal records are keyed by
//! `id`, commercial FNOL records by `claimId`, and the remaining fields depend
//! on which form produced them.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Named collection of claim records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Personal quick-upload and guided submissions
    PersonalClaims,
    /// Commercial FNOL submissions
    CommercialClaims,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::PersonalClaims, Collection::CommercialClaims];

    /// Storage key of the collection
    pub fn key(&self) -> &'static str {
        match self {
            Collection::PersonalClaims => "submittedClaims",
            Collection::CommercialClaims => "submittedCommercialClaims",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A loosely typed claim record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimRecord(Map<String, Value>);

impl ClaimRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Builds a record from any JSON value; non-objects yield `None`
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Claim identifier: `id`, or `claimId` for commercial records
    pub fn id(&self) -> Option<&str> {
        self.get_str("id").or_else(|| self.get_str("claimId"))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Follows a path of object keys, e.g. `["agentResults", "coverage"]`
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        rest.iter()
            .try_fold(self.0.get(*first)?, |value, key| value.get(key))
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Applies a targeted replacement to the record
    pub fn apply(&mut self, patch: &RecordPatch) {
        let mut target = Value::Object(std::mem::take(&mut self.0));
        patch.apply(&mut target);
        if let Value::Object(map) = target {
            self.0 = map;
        }
    }

    /// Applies a JSON merge patch (RFC 7386) to the record
    pub fn merge(&mut self, patch: &Value) {
        let mut target = Value::Object(std::mem::take(&mut self.0));
        merge_patch(&mut target, patch);
        if let Value::Object(map) = target {
            self.0 = map;
        }
    }
}

/// A targeted replacement inside a stored record
///
/// The value at `path` is replaced as a whole; missing or non-object parents
/// along the way become empty objects. An empty path changes nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordPatch {
    path: Vec<String>,
    value: Value,
}

impl RecordPatch {
    pub fn set(path: &[&str], value: Value) -> Self {
        Self {
            path: path.iter().map(|k| k.to_string()).collect(),
            value,
        }
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Applies the replacement to a JSON object
    pub fn apply(&self, target: &mut Value) {
        let Some((leaf, parents)) = self.path.split_last() else {
            return;
        };
        let mut cursor = target;
        for key in parents {
            if !cursor.is_object() {
                *cursor = Value::Object(Map::new());
            }
            let Value::Object(map) = cursor else {
                return;
            };
            cursor = map.entry(key.clone()).or_insert(Value::Null);
        }
        if !cursor.is_object() {
            *cursor = Value::Object(Map::new());
        }
        if let Value::Object(map) = cursor {
            map.insert(leaf.clone(), self.value.clone());
        }
    }
}

/// Applies `patch` onto `target` following JSON merge-patch semantics
///
/// Objects merge key by key, `null` removes a key, anything else replaces.
pub fn merge_patch(target: &mut Value, patch: &Value) {
    let Value::Object(patch_map) = patch else {
        *target = patch.clone();
        return;
    };
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    if let Value::Object(target_map) = target {
        for (key, value) in patch_map {
            if value.is_null() {
                target_map.remove(key);
            } else {
                merge_patch(target_map.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_falls_back_to_claim_id() {
        let personal = ClaimRecord::from_value(json!({ "id": "AS-2024-000001" })).unwrap();
        assert_eq!(personal.id(), Some("AS-2024-000001"));

        let commercial = ClaimRecord::from_value(json!({ "claimId": "CAI-2024-000002" })).unwrap();
        assert_eq!(commercial.id(), Some("CAI-2024-000002"));

        assert!(ClaimRecord::from_value(json!([1, 2])).is_none());
    }

    #[test]
    fn test_merge_keeps_sibling_keys() {
        let mut record = ClaimRecord::from_value(json!({
            "claimId": "CAI-2024-000002",
            "agentResults": { "validation": { "policyActive": true } }
        }))
        .unwrap();

        record.merge(&json!({ "agentResults": { "coverage": { "applicable": [] } } }));

        assert_eq!(record.get_path(&["agentResults", "validation", "policyActive"]), Some(&json!(true)));
        assert_eq!(record.get_path(&["agentResults", "coverage", "applicable"]), Some(&json!([])));
        assert_eq!(record.id(), Some("CAI-2024-000002"));
    }

    #[test]
    fn test_merge_null_removes_key() {
        let mut record = ClaimRecord::from_value(json!({ "id": "AS-2024-000001", "notes": "x" })).unwrap();
        record.merge(&json!({ "notes": null }));
        assert!(record.get("notes").is_none());
    }

    #[test]
    fn test_record_patch_replaces_leaf_wholesale() {
        let mut record = ClaimRecord::from_value(json!({
            "claimId": "CAI-2024-000002",
            "agentResults": {
                "validation": { "policyActive": true },
                "coverage": { "a": 1, "b": 2 }
            }
        }))
        .unwrap();

        record.apply(&RecordPatch::set(&["agentResults", "coverage"], json!({ "a": 1 })));
        assert_eq!(record.get_path(&["agentResults", "coverage"]), Some(&json!({ "a": 1 })));
        assert_eq!(record.get_path(&["agentResults", "validation", "policyActive"]), Some(&json!(true)));

        record.apply(&RecordPatch::set(&["agentResults", "coverage"], Value::Null));
        assert_eq!(record.get_path(&["agentResults", "coverage"]), Some(&Value::Null));
    }

    #[test]
    fn test_record_patch_creates_parents() {
        let mut record = ClaimRecord::from_value(json!({ "id": "AS-2024-000001", "agentResults": "stale" })).unwrap();
        record.apply(&RecordPatch::set(&["agentResults", "intake"], json!([1])));
        assert_eq!(record.get_path(&["agentResults", "intake"]), Some(&json!([1])));

        let before = record.clone();
        record.apply(&RecordPatch::set(&[], json!(1)));
        assert_eq!(record, before);
    }

    #[test]
    fn test_collection_keys() {
        assert_eq!(Collection::PersonalClaims.key(), "submittedClaims");
        assert_eq!(Collection::from_key("submittedCommercialClaims"), Some(Collection::CommercialClaims));
        assert_eq!(Collection::from_key("other"), None);
    }
}
