//! Core Kernel - Foundational types for the claims portal
//!
//! This crate provides the building blocks shared by every other crate:
//! - An injectable clock so timer-driven code can run on virtual time
//! - Claim numbers in the portal's `PREFIX-YEAR-DIGITS` format
//! - Strongly-typed identifiers for runs and uploads
//! - The error type every storage adapter reports through

pub mod clock;
pub mod claim_number;
pub mod identifiers;
pub mod ports;

pub use clock::{Clock, SystemClock, ManualClock};
pub use claim_number::{ClaimNumber, ClaimLine, ClaimNumberError};
pub use identifiers::{RunId, UploadId};
pub use ports::{PortError, DomainPort};
