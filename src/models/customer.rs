//! Customer data models and API request types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;

/// Represents a customer record from the database.
///
/// # Database Table
///
/// Maps to the `customers` table. `phone` is unique and acts as the natural
/// key when saving a customer without an identifier.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize, Deserialize)]
pub struct Customer {
    /// Store-generated identifier, never chosen by the client for new rows
    pub id: i64,

    pub name: String,

    /// Unique across all customers
    pub phone: String,

    /// `false` means the customer is blocked
    pub active: bool,

    /// Set once when the row is inserted
    pub created: DateTime<Utc>,
}

/// Request body for `POST /customers`.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": 0,
///   "name": "Vasya",
///   "phone": "+992000000001"
/// }
/// ```
///
/// An absent, `null` or zero `id` creates the customer, or renames the existing one
/// with the same phone. A non-zero `id` updates that row.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveCustomerRequest {
    #[serde(default, deserialize_with = "null_as_zero")]
    pub id: i64,

    pub name: String,

    pub phone: String,
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or(0))
}

impl SaveCustomerRequest {
    /// Reject blank names and phones before they reach the store.
    pub fn validate(self) -> Result<Self, AppError> {
        if self.id < 0 {
            return Err(AppError::BadInput("id must not be negative".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(AppError::BadInput("name is required".to_string()));
        }
        if self.phone.trim().is_empty() {
            return Err(AppError::BadInput("phone is required".to_string()));
        }
        Ok(self)
    }

    /// Whether this save should go through the phone upsert.
    pub fn is_new(&self) -> bool {
        self.id == 0
    }
}
