//! Customer HTTP handlers.
//!
//! This module implements the customer endpoints:
//! - GET /customers - List all customers
//! - GET /customers/active - List active customers
//! - GET /customers/{id} - Get customer by ID
//! - POST /customers - Create or update a customer
//! - DELETE /customer/{id} - Delete a customer
//! - POST /customers/{id}/{block} - Block a customer
//! - DELETE /customers/{id}/{block} - Unblock a customer
//!
//! Identifiers are parsed here. A segment that is not a base-10 `i64` is
//! answered with 400 and never reaches the service.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
};

use crate::{
    error::AppError,
    middleware::token::Authenticated,
    models::customer::{Customer, SaveCustomerRequest},
    state::AppState,
};

fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|e| AppError::BadInput(format!("invalid customer id {raw:?}: {e}")))
}

/// List all customers.
///
/// # Response
///
/// - **Success (200 OK)**: JSON array, possibly empty
/// - **Error (500)**: Store failure
pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Customer>>, AppError> {
    Ok(Json(state.customers.list_all().await?))
}

/// List customers that are not blocked.
pub async fn list_active_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Customer>>, AppError> {
    Ok(Json(state.customers.list_active().await?))
}

/// Get a customer by ID.
///
/// # Response
///
/// - **Success (200 OK)**: The customer
/// - **Error (400)**: ID is not an integer
/// - **Error (404)**: No such customer
/// - **Error (500)**: Store failure
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Customer>, AppError> {
    let id = parse_id(&id)?;
    Ok(Json(state.customers.lookup(id).await?))
}

/// Create or update a customer.
///
/// # Request Body
///
/// ```json
/// {
///   "id": 0,
///   "name": "Vasya",
///   "phone": "+992000000001"
/// }
/// ```
///
/// A zero, `null` or absent `id` upserts on `phone`. A non-zero `id` updates
/// that row. The body is read as JSON whatever its `Content-Type`.
///
/// # Response
///
/// - **Success (200 OK)**: The saved row with its store-assigned fields
/// - **Error (400)**: Body is not valid JSON or a field is blank
/// - **Error (404)**: Non-zero `id` does not exist
/// - **Error (500)**: Store failure, including a phone already owned by another row
pub async fn save_customer(
    State(state): State<AppState>,
    actor: Option<Authenticated>,
    body: Bytes,
) -> Result<Json<Customer>, AppError> {
    let request: SaveCustomerRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadInput(format!("invalid customer body: {e}")))?;
    let request = request.validate()?;

    let customer = state.customers.save(request).await?;
    tracing::info!(
        customer_id = customer.id,
        actor = ?actor.map(|a| a.0),
        "customer saved"
    );

    Ok(Json(customer))
}

/// Delete a customer and return the removed row.
pub async fn remove_customer(
    State(state): State<AppState>,
    actor: Option<Authenticated>,
    Path(id): Path<String>,
) -> Result<Json<Customer>, AppError> {
    let id = parse_id(&id)?;

    let customer = state.customers.delete(id).await?;
    tracing::info!(customer_id = id, actor = ?actor.map(|a| a.0), "customer removed");

    Ok(Json(customer))
}

/// Block a customer (`active = false`).
///
/// The second path segment is not interpreted.
pub async fn block_customer(
    State(state): State<AppState>,
    actor: Option<Authenticated>,
    Path((id, _)): Path<(String, String)>,
) -> Result<Json<Customer>, AppError> {
    let id = parse_id(&id)?;

    let customer = state.customers.block(id).await?;
    tracing::info!(customer_id = id, actor = ?actor.map(|a| a.0), "customer blocked");

    Ok(Json(customer))
}

/// Unblock a customer (`active = true`).
pub async fn unblock_customer(
    State(state): State<AppState>,
    actor: Option<Authenticated>,
    Path((id, _)): Path<(String, String)>,
) -> Result<Json<Customer>, AppError> {
    let id = parse_id(&id)?;

    let customer = state.customers.unblock(id).await?;
    tracing::info!(customer_id = id, actor = ?actor.map(|a| a.0), "customer unblocked");

    Ok(Json(customer))
}
