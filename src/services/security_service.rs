//! Credential and token lookups backing the authentication stages.
//!
//! Both lookups sit behind traits so the interceptor chain does not depend on
//! where managers and tokens are stored.

use async_trait::async_trait;

use crate::{db::DbPool, error::AppError, models::manager::ManagerCredential};

/// Validates a basic-auth login/password pair.
///
/// Implementations fail closed: any lookup failure is a rejection.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, login: &str, password: &str) -> bool;
}

/// Maps an opaque bearer token to a manager identity.
///
/// Return `AppError::Unauthenticated` for unknown or expired tokens and
/// `AppError::Internal` for store failures. The token stage logs the cause and
/// answers both with 401.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<i64, AppError>;
}

/// Authenticator backed by the `managers` table.
#[derive(Debug, Clone)]
pub struct PgAuthenticator {
    pool: DbPool,
}

impl PgAuthenticator {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Authenticator for PgAuthenticator {
    async fn authenticate(&self, login: &str, password: &str) -> bool {
        let credential = sqlx::query_as::<_, ManagerCredential>(
            "SELECT login, password FROM managers WHERE login = $1",
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await;

        match credential {
            Ok(Some(credential)) => credential.verify(password),
            Ok(None) => {
                tracing::debug!(%login, "unknown manager login");
                false
            }
            Err(e) => {
                tracing::error!(error = ?e, "credential lookup failed");
                false
            }
        }
    }
}

/// Token resolver backed by the `manager_tokens` table.
///
/// Only tokens whose `expire` lies in the future resolve.
#[derive(Debug, Clone)]
pub struct PgTokenResolver {
    pool: DbPool,
}

impl PgTokenResolver {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityResolver for PgTokenResolver {
    async fn resolve(&self, token: &str) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT manager_id FROM manager_tokens WHERE token = $1 AND expire > now()",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::Unauthenticated)
    }
}
