//! Bearer token identity stage.
//!
//! Reads the `Authorization` header as an opaque token (a leading `Bearer ` is
//! optional), resolves it to a manager identity through an
//! [`IdentityResolver`], and attaches the identity to the request extensions.
//! Handlers read it back with [`authentication`] or the [`Authenticated`]
//! extractor instead of resolving the token again.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request},
    http::{Extensions, header::AUTHORIZATION, request::Parts},
};

use super::Interceptor;
use crate::{error::AppError, services::security_service::IdentityResolver};

/// Extension key for the resolved identity.
///
/// Private so nothing outside this module can insert or shadow it.
#[derive(Debug, Clone, Copy)]
struct AuthenticatedIdentity(i64);

/// Interceptor resolving bearer tokens to identities.
#[derive(Clone)]
pub struct TokenAuth {
    resolver: Arc<dyn IdentityResolver>,
}

impl TokenAuth {
    pub fn new(resolver: Arc<dyn IdentityResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl Interceptor for TokenAuth {
    async fn before(&self, mut request: Request) -> Result<Request, AppError> {
        let token = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(|h| h.strip_prefix("Bearer ").unwrap_or(h).trim())
            .filter(|t| !t.is_empty())
            .ok_or(AppError::Unauthenticated)?
            .to_string();

        // Every resolution failure is an authentication failure for the caller.
        let id = self.resolver.resolve(&token).await.map_err(|e| {
            match &e {
                AppError::Internal(cause) => {
                    tracing::error!(error = ?cause, "token lookup failed")
                }
                other => tracing::warn!(error = %other, "token resolution failed"),
            }
            AppError::Unauthenticated
        })?;

        request.extensions_mut().insert(AuthenticatedIdentity(id));
        Ok(request)
    }
}

/// Identity attached by [`TokenAuth`], or `NoAuthentication` when the stage
/// did not run for this request.
pub fn authentication(extensions: &Extensions) -> Result<i64, AppError> {
    extensions
        .get::<AuthenticatedIdentity>()
        .map(|identity| identity.0)
        .ok_or(AppError::NoAuthentication)
}

/// Extractor for the authenticated manager identity.
///
/// Use `Authenticated` to require an identity and `Option<Authenticated>`
/// when the handler works either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authenticated(pub i64);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        authentication(&parts.extensions).map(Authenticated)
    }
}

impl<S> OptionalFromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(authentication(&parts.extensions).ok().map(Authenticated))
    }
}
