//! Data models representing database entities.

/// Customer record model
pub mod customer;
/// Manager credential model
pub mod manager;
