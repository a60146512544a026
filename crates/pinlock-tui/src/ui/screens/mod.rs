//! Screen implementations

pub mod dashboard;
pub mod pin_entry;
