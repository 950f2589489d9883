//! Fake port implementations

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use core_kernel::{DomainPort, PortError};
use domain_claims::{ClaimRecord, ClaimRecordPort, Collection, RecordPatch};

/// A claim store whose every operation fails as unavailable
///
/// Counts attempted writes so tests can assert nothing was retried.
#[derive(Debug, Default)]
pub struct FailingStore {
    write_attempts: AtomicUsize,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_attempts(&self) -> usize {
        self.write_attempts.load(Ordering::SeqCst)
    }

    fn failure() -> PortError {
        PortError::unavailable(
            "store offline",
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "store offline"),
        )
    }
}

impl DomainPort for FailingStore {}

#[async_trait]
impl ClaimRecordPort for FailingStore {
    async fn append(&self, _collection: Collection, _record: ClaimRecord) -> Result<(), PortError> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        Err(Self::failure())
    }

    async fn find_by_id(&self, _collection: Collection, _id: &str) -> Result<Option<ClaimRecord>, PortError> {
        Err(Self::failure())
    }

    async fn patch_by_id(
        &self,
        _collection: Collection,
        _id: &str,
        _patch: &RecordPatch,
    ) -> Result<ClaimRecord, PortError> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        Err(Self::failure())
    }

    async fn list(&self, _collection: Collection) -> Result<Vec<ClaimRecord>, PortError> {
        Err(Self::failure())
    }
}
