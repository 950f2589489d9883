//! Request handlers

pub mod claims;
pub mod dashboard;
pub mod fleet;
pub mod health;
pub mod runs;
