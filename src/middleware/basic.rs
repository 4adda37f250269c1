//! Basic authentication stage.
//!
//! Extracts `Authorization: Basic <base64(login:password)>` and validates the
//! pair with an [`Authenticator`]. A missing or malformed header, unknown
//! credentials and store failures are all rejected with 401.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::Request,
    http::{HeaderMap, header::AUTHORIZATION},
};
use base64::{Engine, engine::general_purpose::STANDARD};

use super::Interceptor;
use crate::{error::AppError, services::security_service::Authenticator};

/// Interceptor validating basic-auth credentials.
#[derive(Clone)]
pub struct BasicAuth {
    authenticator: Arc<dyn Authenticator>,
}

impl BasicAuth {
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        Self { authenticator }
    }
}

#[async_trait]
impl Interceptor for BasicAuth {
    async fn before(&self, request: Request) -> Result<Request, AppError> {
        let Some((login, password)) = basic_credentials(request.headers()) else {
            tracing::warn!("cannot parse login and password");
            return Err(AppError::Unauthenticated);
        };

        if !self.authenticator.authenticate(&login, &password).await {
            tracing::warn!(%login, "basic auth rejected");
            return Err(AppError::Unauthenticated);
        }

        Ok(request)
    }
}

/// Decode the login and password of a basic-auth header.
///
/// The scheme name is matched case-insensitively. The password may contain
/// colons; the login may not.
pub fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (login, password) = decoded.split_once(':')?;

    Some((login.to_string(), password.to_string()))
}
