//! Router assembly.
//!
//! Customer routes sit behind the interceptor chain; `/health` is public.

use std::time::Duration;

use axum::{
    Router,
    http::{StatusCode, header},
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    handlers,
    middleware::{InterceptorChain, intercept},
    state::AppState,
};

/// Build the customer API router.
///
/// Every customer route runs `chain` before its handler. `timeout` bounds each
/// request; when it elapses the handler future is dropped, cancelling any
/// in-flight query.
pub fn build_router(state: AppState, chain: InterceptorChain, timeout: Duration) -> Router {
    let customer_routes = Router::new()
        .route(
            "/customers",
            get(handlers::customers::list_customers).post(handlers::customers::save_customer),
        )
        .route(
            "/customers/active",
            get(handlers::customers::list_active_customers),
        )
        .route("/customers/{id}", get(handlers::customers::get_customer))
        .route(
            "/customer/{id}",
            delete(handlers::customers::remove_customer),
        )
        .route(
            "/customers/{id}/{block}",
            post(handlers::customers::block_customer).delete(handlers::customers::unblock_customer),
        )
        // Applied per route, so unmatched paths are not authenticated
        .route_layer(axum_middleware::from_fn_with_state(chain, intercept));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(customer_routes)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(axum_middleware::map_response(timeout_reason))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Give the timeout layer's empty 408 the same bare reason-phrase body as
/// every other error response.
async fn timeout_reason(response: Response) -> Response {
    if response.status() != StatusCode::REQUEST_TIMEOUT {
        return response;
    }

    let status = StatusCode::REQUEST_TIMEOUT;
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        status.canonical_reason().unwrap_or_default(),
    )
        .into_response()
}
