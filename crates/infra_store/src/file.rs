//! JSON-file claim store
//!
//! The whole document is loaded once on open and rewritten after every
//! successful mutation. Writes go to a sibling temporary file which is then
//! renamed over the document, so a crash mid-write leaves the previous
//! version intact. A single async mutex serializes all access.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use core_kernel::{DomainPort, PortError};
use domain_claims::{ClaimRecord, ClaimRecordPort, Collection, RecordPatch};

use crate::document::ClaimDocument;
use crate::error::StoreError;

/// Claim store persisted as one JSON document on disk
#[derive(Debug)]
pub struct JsonFileClaimStore {
    path: PathBuf,
    document: Mutex<ClaimDocument>,
}

impl JsonFileClaimStore {
    /// Opens the document at `path`; a missing file starts empty and is
    /// created on the first write
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let document = match tokio::fs::read_to_string(&path).await {
            Ok(text) => ClaimDocument::parse(&text)?,
            Err(e) if e.kind() == ErrorKind::NotFound => ClaimDocument::new(),
            Err(e) => return Err(StoreError::io(&path, e)),
        };

        info!(
            path = %path.display(),
            personal = document.records(Collection::PersonalClaims).map(|r| r.len()).unwrap_or(0),
            commercial = document.records(Collection::CommercialClaims).map(|r| r.len()).unwrap_or(0),
            "Claim store opened"
        );

        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, document: &ClaimDocument) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        let text = document.to_json_pretty()?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, text)
            .await
            .map_err(|e| StoreError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;

        debug!(path = %self.path.display(), "Claim document written");
        Ok(())
    }
}

impl DomainPort for JsonFileClaimStore {}

#[async_trait]
impl ClaimRecordPort for JsonFileClaimStore {
    #[instrument(skip(self, record), fields(collection = %collection))]
    async fn append(&self, collection: Collection, record: ClaimRecord) -> Result<(), PortError> {
        let mut guard = self.document.lock().await;
        let mut next = guard.clone();
        next.append(collection, record)?;
        self.persist(&next).await?;
        *guard = next;
        Ok(())
    }

    async fn find_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<ClaimRecord>, PortError> {
        Ok(self.document.lock().await.find(collection, id)?)
    }

    #[instrument(skip(self, patch), fields(collection = %collection, id = %id))]
    async fn patch_by_id(
        &self,
        collection: Collection,
        id: &str,
        patch: &RecordPatch,
    ) -> Result<ClaimRecord, PortError> {
        let mut guard = self.document.lock().await;
        let mut next = guard.clone();
        let patched = next
            .patch(collection, id, patch)?
            .ok_or_else(|| PortError::not_found(collection.key(), id))?;
        self.persist(&next).await?;
        *guard = next;
        Ok(patched)
    }

    async fn list(&self, collection: Collection) -> Result<Vec<ClaimRecord>, PortError> {
        Ok(self.document.lock().await.records(collection)?)
    }
}
