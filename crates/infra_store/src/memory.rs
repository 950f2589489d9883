//! In-memory claim store

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use core_kernel::{DomainPort, PortError};
use domain_claims::{ClaimRecord, ClaimRecordPort, Collection, RecordPatch};

use crate::document::ClaimDocument;

/// Claim store held entirely in process memory
#[derive(Debug, Default)]
pub struct InMemoryClaimStore {
    document: RwLock<ClaimDocument>,
}

impl InMemoryClaimStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `document`
    pub fn with_document(document: ClaimDocument) -> Self {
        Self {
            document: RwLock::new(document),
        }
    }

    /// Copy of the current document
    pub async fn snapshot(&self) -> ClaimDocument {
        self.document.read().await.clone()
    }
}

impl DomainPort for InMemoryClaimStore {}

#[async_trait]
impl ClaimRecordPort for InMemoryClaimStore {
    async fn append(&self, collection: Collection, record: ClaimRecord) -> Result<(), PortError> {
        debug!(collection = %collection, id = ?record.id(), "Appending claim record");
        self.document.write().await.append(collection, record)?;
        Ok(())
    }

    async fn find_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<ClaimRecord>, PortError> {
        Ok(self.document.read().await.find(collection, id)?)
    }

    async fn patch_by_id(
        &self,
        collection: Collection,
        id: &str,
        patch: &RecordPatch,
    ) -> Result<ClaimRecord, PortError> {
        self.document
            .write()
            .await
            .patch(collection, id, patch)?
            .ok_or_else(|| PortError::not_found(collection.key(), id))
    }

    async fn list(&self, collection: Collection) -> Result<Vec<ClaimRecord>, PortError> {
        Ok(self.document.read().await.records(collection)?)
    }
}
