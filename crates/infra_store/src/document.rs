//! The collection-keyed claim document

use serde_json::{Map, Value};

use domain_claims::{ClaimRecord, Collection, RecordPatch};

use crate::error::StoreError;

/// A JSON object mapping collection keys to arrays of records
///
/// Keys the portal does not know about are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimDocument(Map<String, Value>);

impl ClaimDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a document; blank input is an empty document
    pub fn parse(text: &str) -> Result<Self, StoreError> {
        if text.trim().is_empty() {
            return Ok(Self::new());
        }
        match serde_json::from_str(text)? {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(StoreError::corrupt("<root>", "expected a JSON object")),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(&self.0)?)
    }

    fn array(&self, collection: Collection) -> Result<Option<&Vec<Value>>, StoreError> {
        match self.0.get(collection.key()) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(items)) => Ok(Some(items)),
            Some(_) => Err(StoreError::corrupt(collection.key(), "expected an array")),
        }
    }

    fn array_mut(&mut self, collection: Collection) -> Result<&mut Vec<Value>, StoreError> {
        let slot = self
            .0
            .entry(collection.key().to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if slot.is_null() {
            *slot = Value::Array(Vec::new());
        }
        slot.as_array_mut()
            .ok_or_else(|| StoreError::corrupt(collection.key(), "expected an array"))
    }

    /// Records of `collection` in insertion order; non-object entries are skipped
    pub fn records(&self, collection: Collection) -> Result<Vec<ClaimRecord>, StoreError> {
        Ok(self
            .array(collection)?
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| ClaimRecord::from_value(v.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    pub fn append(&mut self, collection: Collection, record: ClaimRecord) -> Result<(), StoreError> {
        self.array_mut(collection)?.push(record.into_value());
        Ok(())
    }

    /// First record of `collection` whose identifier equals `id`
    pub fn find(&self, collection: Collection, id: &str) -> Result<Option<ClaimRecord>, StoreError> {
        Ok(self
            .array(collection)?
            .and_then(|items| items.iter().find(|v| value_id(v) == Some(id)))
            .and_then(|v| ClaimRecord::from_value(v.clone())))
    }

    /// Applies `patch` to the first matching record in place
    ///
    /// Returns the patched record, or `None` when nothing matched.
    pub fn patch(
        &mut self,
        collection: Collection,
        id: &str,
        patch: &RecordPatch,
    ) -> Result<Option<ClaimRecord>, StoreError> {
        if self.array(collection)?.is_none() {
            return Ok(None);
        }
        let items = self.array_mut(collection)?;
        let Some(target) = items.iter_mut().find(|v| value_id(v) == Some(id)) else {
            return Ok(None);
        };
        patch.apply(target);
        Ok(ClaimRecord::from_value(target.clone()))
    }
}

fn value_id(value: &Value) -> Option<&str> {
    value
        .get("id")
        .and_then(Value::as_str)
        .or_else(|| value.get("claimId").and_then(Value::as_str))
}
