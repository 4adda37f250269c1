//! HTTP request handlers (route handlers).
//!
//! Handlers parse path and body input, call a service and serialize the result.
//! They only branch on `AppError` variants, never on store errors.

/// Customer endpoints
pub mod customers;
/// Service health endpoint
pub mod health;
