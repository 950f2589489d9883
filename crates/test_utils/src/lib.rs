//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! claims portal test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built forms, records, and a fixed virtual clock
//! - `builders`: Builder patterns for catalogs, runs, and seeded stores
//! - `fakes`: Port implementations that fail on demand
//! - `assertions`: Custom assertion helpers for runs and claim numbers
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod fakes;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use fakes::*;
pub use assertions::*;
pub use generators::*;
