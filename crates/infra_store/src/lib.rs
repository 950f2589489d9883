//! Claim Record Storage
//!
//! Adapters for [`domain_claims::ClaimRecordPort`]. The portal keeps every
//! submitted claim in a single JSON document that maps a collection key to an
//! array of loosely structured records:
//!
//! ```json
//! {
//!   "submittedClaims": [{ "id": "AS-2024-000123", "claimantName": "..." }],
//!   "submittedCommercialClaims": [{ "claimId": "CAI-2024-000456", "...": "..." }]
//! }
//! ```
//!
//! Two adapters share that layout:
//!
//! - [`InMemoryClaimStore`] keeps the document in process memory. It backs the
//!   server when no store path is configured and doubles as the test fake.
//! - [`JsonFileClaimStore`] persists the document to disk after every write.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use domain_claims::ClaimRecordPort;
//! use infra_store::JsonFileClaimStore;
//!
//! let store: Arc<dyn ClaimRecordPort> = Arc::new(JsonFileClaimStore::open("claims.json").await?);
//! ```

pub mod document;
pub mod error;
pub mod file;
pub mod memory;

pub use document::ClaimDocument;
pub use error::StoreError;
pub use file::JsonFileClaimStore;
pub use memory::InMemoryClaimStore;
