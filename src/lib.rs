//! Customer records service.
//!
//! A REST API for customer records (lookup, listing, upsert on phone, delete,
//! block/unblock) backed by PostgreSQL and guarded by basic or bearer token
//! authentication.

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
