//! Request and response bodies

pub mod claims;
pub mod fleet;
pub mod runs;
