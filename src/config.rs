//! Application configuration management.
//!
//! Configuration is read from environment variables with the `envy` crate,
//! after an optional `.env` file has been loaded by `dotenvy`.

use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `SERVER_HOST` (optional): bind address, defaults to `0.0.0.0`
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 9999
/// - `DB_MAX_CONNECTIONS` (optional): pool size, defaults to 5
/// - `REQUEST_TIMEOUT_SECS` (optional): per-request deadline, defaults to 30
/// - `AUTH_SCHEME` (optional): `basic` or `token`, defaults to `basic`
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    #[serde(default = "default_host")]
    pub server_host: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_max_connections")]
    pub db_max_connections: u32,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub auth_scheme: AuthScheme,
}

/// Which authentication stage guards the customer routes.
///
/// Both read the `Authorization` header, so exactly one is installed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    /// `Authorization: Basic ...` checked against the `managers` table
    #[default]
    Basic,
    /// Opaque token resolved through the `manager_tokens` table
    Token,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9999
}

fn default_max_connections() -> u32 {
    5
}

fn default_request_timeout() -> u64 {
    30
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A missing `.env` file is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or a value cannot be
    /// parsed into its expected type.
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>()
    }

    /// Socket address string the listener binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
