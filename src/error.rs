//! Error types and HTTP error response handling.
//!
//! Every failure in the service is one of a closed set of variants. Handlers
//! and interceptors only ever branch on the variant; the store error carried by
//! `Internal` is logged and never reaches the client.

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

/// Application-wide error type.
///
/// # Status Code Mapping
///
/// - `NotFound` → 404 Not Found
/// - `BadInput` → 400 Bad Request
/// - `Unauthenticated` → 401 Unauthorized
/// - `NoAuthentication` → 401 Unauthorized
/// - `Unauthorized` → 401 Unauthorized
/// - `Internal` → 500 Internal Server Error
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Zero rows matched where exactly one was expected.
    ///
    /// This is an expected outcome, not a failure of the service.
    #[error("item not found")]
    NotFound,

    /// Store failure of any other kind: connectivity, constraint violation,
    /// malformed row.
    ///
    /// Wraps `sqlx::Error` through `#[from]`, so `?` on a query classifies the
    /// failure as internal.
    #[error("internal error: {0}")]
    Internal(#[from] sqlx::Error),

    /// Malformed identifier or request body. The caller's fault.
    #[error("bad input: {0}")]
    BadInput(String),

    /// Credentials or token were missing, malformed or rejected.
    #[error("unauthenticated")]
    Unauthenticated,

    /// No identity was attached to the request by the token stage.
    #[error("no authentication")]
    NoAuthentication,

    /// The identity is known but lacks a required role.
    #[error("unauthorized")]
    Unauthorized,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadInput(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated | AppError::NoAuthentication | AppError::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }
        }
    }
}

/// Convert AppError into a bare HTTP response.
///
/// The body is always the canonical reason phrase of the status code, e.g.
/// `Not Found`. No structured payload and no diagnostic detail is sent.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::Internal(cause) => tracing::error!(error = ?cause, "internal error"),
            AppError::BadInput(reason) => tracing::debug!(%reason, "rejected malformed input"),
            AppError::Unauthenticated | AppError::NoAuthentication | AppError::Unauthorized => {
                tracing::debug!(error = %self, "rejected unauthenticated request")
            }
            AppError::NotFound => {}
        }

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            status.canonical_reason().unwrap_or_default(),
        )
            .into_response()
    }
}
