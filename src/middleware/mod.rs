//! HTTP middleware components.
//!
//! Authentication runs as an ordered chain of interceptor stages. Each stage
//! either hands the (possibly enriched) request to the next stage or
//! short-circuits with an error. The first short-circuit ends the request: the
//! route handler is never invoked.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;

/// Basic-auth stage
pub mod basic;
/// Role check stage, run after the token stage
pub mod role;
/// Bearer token identity stage
pub mod token;

/// One stage of the interceptor chain.
///
/// `Ok(request)` continues with the returned request, `Err` short-circuits and
/// becomes the response.
#[async_trait]
pub trait Interceptor: Send + Sync {
    async fn before(&self, request: Request) -> Result<Request, AppError>;
}

/// Ordered list of interceptor stages shared by all requests.
#[derive(Clone, Default)]
pub struct InterceptorChain {
    stages: Vec<Arc<dyn Interceptor>>,
}

impl InterceptorChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage. Stages run in the order they were added.
    pub fn with(mut self, stage: impl Interceptor + 'static) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage, stopping at the first rejection.
    pub async fn run(&self, mut request: Request) -> Result<Request, AppError> {
        for stage in &self.stages {
            request = stage.before(request).await?;
        }
        Ok(request)
    }
}

/// Axum middleware function driving an [`InterceptorChain`].
///
/// Installed with `middleware::from_fn_with_state(chain, intercept)`.
pub async fn intercept(
    State(chain): State<InterceptorChain>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let request = chain.run(request).await?;
    Ok(next.run(request).await)
}
