//! Claims Domain Ports
//!
//! The claims portal keeps submitted claims in a key/value store of named
//! collections. [`ClaimRecordPort`] is the seam to that store so services can
//! run against the JSON-file adapter in production and an in-memory one in
//! tests.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use domain_claims::{ClaimRecordPort, SubmissionService};
//! use infra_store::InMemoryClaimStore;
//!
//! let store: Arc<dyn ClaimRecordPort> = Arc::new(InMemoryClaimStore::new());
//! let submissions = SubmissionService::new(store.clone(), clock);
//! ```

use async_trait::async_trait;
use core_kernel::{DomainPort, PortError};

use crate::record::{ClaimRecord, Collection, RecordPatch};

/// Repository of persisted claim records
#[async_trait]
pub trait ClaimRecordPort: DomainPort {
    /// Appends a record to the end of `collection`
    async fn append(&self, collection: Collection, record: ClaimRecord) -> Result<(), PortError>;

    /// Finds the first record in `collection` whose identifier equals `id`
    async fn find_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<ClaimRecord>, PortError>;

    /// Applies `patch` to the first record in `collection` whose identifier equals `id`
    ///
    /// # Returns
    ///
    /// The patched record, or `PortError::NotFound` if no record matches
    async fn patch_by_id(
        &self,
        collection: Collection,
        id: &str,
        patch: &RecordPatch,
    ) -> Result<ClaimRecord, PortError>;

    /// Returns every record in `collection`, in insertion order
    async fn list(&self, collection: Collection) -> Result<Vec<ClaimRecord>, PortError>;
}

/// Looks `id` up in each collection in turn
pub async fn find_in_any(
    port: &dyn ClaimRecordPort,
    id: &str,
) -> Result<Option<(Collection, ClaimRecord)>, PortError> {
    for collection in Collection::ALL {
        if let Some(record) = port.find_by_id(collection, id).await? {
            return Ok(Some((collection, record)));
        }
    }
    Ok(None)
}
