//! Business logic services.
//!
//! Services own all store access. They are consumed through traits so the
//! HTTP layer can be exercised without a database.

pub mod customer_service;
pub mod security_service;
