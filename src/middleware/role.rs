//! Role check stage.
//!
//! Runs after [`TokenAuth`](super::token::TokenAuth) and admits the request
//! only when the resolved identity holds one of the required roles. The
//! service does not store roles, so `main` installs no such stage; deployments
//! that add roles plug a [`RoleChecker`] in here.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::Request;

use super::{Interceptor, token::authentication};
use crate::error::AppError;

pub const ROLE_MANAGER: &str = "MANAGER";
pub const ROLE_ADMIN: &str = "ADMIN";

/// Answers whether an identity holds any of a set of roles.
///
/// Implementations fail closed: a lookup failure is a denial.
#[async_trait]
pub trait RoleChecker: Send + Sync {
    async fn has_any_role(&self, identity: i64, roles: &[&str]) -> bool;
}

/// Interceptor rejecting identities without one of `roles`.
#[derive(Clone)]
pub struct RoleCheck {
    checker: Arc<dyn RoleChecker>,
    roles: Vec<&'static str>,
}

impl RoleCheck {
    pub fn new(checker: Arc<dyn RoleChecker>, roles: &[&'static str]) -> Self {
        Self {
            checker,
            roles: roles.to_vec(),
        }
    }
}

#[async_trait]
impl Interceptor for RoleCheck {
    async fn before(&self, request: Request) -> Result<Request, AppError> {
        let identity = authentication(request.extensions())?;

        if !self.checker.has_any_role(identity, &self.roles).await {
            tracing::debug!(identity, roles = ?self.roles, "identity lacks required role");
            return Err(AppError::Unauthorized);
        }

        Ok(request)
    }
}
