//! Customer service - data access for customer records.
//!
//! Every operation is a single round trip to the store. Store failures are
//! classified here, once: zero matching rows becomes `AppError::NotFound`,
//! everything else becomes `AppError::Internal`. Handlers never look at
//! `sqlx::Error` themselves.
//!
//! # Cancellation
//!
//! Operations are plain futures. When a client disconnects or the request
//! deadline elapses the handler future is dropped, which drops the in-flight
//! query and returns its connection to the pool.

use async_trait::async_trait;

use crate::{
    db::DbPool,
    error::AppError,
    models::customer::{Customer, SaveCustomerRequest},
};

/// Data-access contract for customer records.
#[async_trait]
pub trait CustomerService: Send + Sync {
    /// Fetch exactly one customer by identifier.
    async fn lookup(&self, id: i64) -> Result<Customer, AppError>;

    /// All customers in store order. Empty is `Ok(vec![])`, never `NotFound`.
    async fn list_all(&self) -> Result<Vec<Customer>, AppError>;

    /// Customers with `active = true`.
    async fn list_active(&self) -> Result<Vec<Customer>, AppError>;

    /// Upsert a customer and return the materialized row.
    ///
    /// A zero `id` inserts, or renames the row that already owns the phone.
    /// A non-zero `id` updates that row and fails with `NotFound` if it is gone.
    async fn save(&self, customer: SaveCustomerRequest) -> Result<Customer, AppError>;

    /// Hard delete, returning the removed row.
    async fn delete(&self, id: i64) -> Result<Customer, AppError>;

    /// Set `active = false`.
    async fn block(&self, id: i64) -> Result<Customer, AppError>;

    /// Set `active = true`.
    async fn unblock(&self, id: i64) -> Result<Customer, AppError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}

/// PostgreSQL implementation of [`CustomerService`].
#[derive(Debug, Clone)]
pub struct PgCustomerService {
    pool: DbPool,
}

impl PgCustomerService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<Customer, AppError> {
        sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET active = $2
            WHERE id = $1
            RETURNING id, name, phone, active, created
            "#,
        )
        .bind(id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }
}

#[async_trait]
impl CustomerService for PgCustomerService {
    async fn lookup(&self, id: i64) -> Result<Customer, AppError> {
        sqlx::query_as::<_, Customer>(
            "SELECT id, name, phone, active, created FROM customers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }

    async fn list_all(&self) -> Result<Vec<Customer>, AppError> {
        let customers =
            sqlx::query_as::<_, Customer>("SELECT id, name, phone, active, created FROM customers")
                .fetch_all(&self.pool)
                .await?;

        Ok(customers)
    }

    async fn list_active(&self) -> Result<Vec<Customer>, AppError> {
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT id, name, phone, active, created FROM customers WHERE active",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    async fn save(&self, customer: SaveCustomerRequest) -> Result<Customer, AppError> {
        if customer.is_new() {
            // Single statement: the store resolves concurrent saves of one phone.
            let saved = sqlx::query_as::<_, Customer>(
                r#"
                INSERT INTO customers (name, phone)
                VALUES ($1, $2)
                ON CONFLICT (phone) DO UPDATE SET name = excluded.name
                RETURNING id, name, phone, active, created
                "#,
            )
            .bind(&customer.name)
            .bind(&customer.phone)
            .fetch_one(&self.pool)
            .await?;

            return Ok(saved);
        }

        sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET name = $2, phone = $3
            WHERE id = $1
            RETURNING id, name, phone, active, created
            "#,
        )
        .bind(customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }

    async fn delete(&self, id: i64) -> Result<Customer, AppError> {
        sqlx::query_as::<_, Customer>(
            "DELETE FROM customers WHERE id = $1 RETURNING id, name, phone, active, created",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }

    async fn block(&self, id: i64) -> Result<Customer, AppError> {
        self.set_active(id, false).await
    }

    async fn unblock(&self, id: i64) -> Result<Customer, AppError> {
        self.set_active(id, true).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
