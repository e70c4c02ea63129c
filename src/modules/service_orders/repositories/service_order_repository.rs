// Service order store
//
// Every query is scoped by the owning user's id, passed explicitly by the
// caller. Only `count_all` looks across owners.

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use sqlx::MySqlPool;

use crate::core::{AppError, Result};
use crate::modules::service_orders::models::{
    ServiceOrder, ServiceOrderChanges, ServiceOrderState,
};

/// Reported when a second cart would be stored for the same user
pub const CART_EXISTS: &str = "a shopping cart already exists";

#[async_trait]
pub trait ServiceOrderRepository: Send + Sync {
    /// Insert a new order owned by `owner_id`
    async fn create(
        &self,
        owner_id: i64,
        name: &str,
        state: ServiceOrderState,
    ) -> Result<ServiceOrder>;

    async fn find_by_id(&self, owner_id: i64, id: i64) -> Result<Option<ServiceOrder>>;

    /// The owner's cart-state order with the lowest id
    async fn find_cart(&self, owner_id: i64) -> Result<Option<ServiceOrder>>;

    /// The owner's orders, ordered by id
    async fn list(&self, owner_id: i64, limit: i64, offset: i64) -> Result<Vec<ServiceOrder>>;

    /// Number of orders across all owners
    async fn count_all(&self) -> Result<i64>;

    /// Apply the present fields; `None` when the owner has no such order
    async fn update(
        &self,
        owner_id: i64,
        id: i64,
        changes: &ServiceOrderChanges,
    ) -> Result<Option<ServiceOrder>>;

    /// Returns false when the owner has no such order
    async fn delete(&self, owner_id: i64, id: i64) -> Result<bool>;
}

/// Current time at the precision stored by `TIMESTAMP(6)` columns
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// MySQL-backed store
pub struct MySqlServiceOrderRepository {
    pool: MySqlPool,
}

impl MySqlServiceOrderRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ServiceOrderRow {
    id: i64,
    name: String,
    state: String,
    user_id: i64,
    placed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ServiceOrderRow {
    fn into_order(self) -> Result<ServiceOrder> {
        let state = self
            .state
            .parse()
            .map_err(|e| AppError::Internal(format!("Invalid state in database: {}", e)))?;

        Ok(ServiceOrder {
            id: self.id,
            name: self.name,
            state,
            user_id: self.user_id,
            placed_at: self.placed_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_COLUMNS: &str =
    "SELECT id, name, state, user_id, placed_at, created_at, updated_at FROM service_orders";

fn map_write_error(e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::validation(CART_EXISTS);
        }
    }
    AppError::Database(e)
}

#[async_trait]
impl ServiceOrderRepository for MySqlServiceOrderRepository {
    async fn create(
        &self,
        owner_id: i64,
        name: &str,
        state: ServiceOrderState,
    ) -> Result<ServiceOrder> {
        let created_at = now();

        let result = sqlx::query(
            r#"
            INSERT INTO service_orders (name, state, user_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(name)
        .bind(state.as_str())
        .bind(owner_id)
        .bind(created_at)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(ServiceOrder {
            id: result.last_insert_id() as i64,
            name: name.to_string(),
            state,
            user_id: owner_id,
            placed_at: None,
            created_at,
            updated_at: created_at,
        })
    }

    async fn find_by_id(&self, owner_id: i64, id: i64) -> Result<Option<ServiceOrder>> {
        sqlx::query_as::<_, ServiceOrderRow>(&format!(
            "{} WHERE id = ? AND user_id = ?",
            SELECT_COLUMNS
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?
        .map(ServiceOrderRow::into_order)
        .transpose()
    }

    async fn find_cart(&self, owner_id: i64) -> Result<Option<ServiceOrder>> {
        sqlx::query_as::<_, ServiceOrderRow>(&format!(
            "{} WHERE user_id = ? AND state = ? ORDER BY id LIMIT 1",
            SELECT_COLUMNS
        ))
        .bind(owner_id)
        .bind(ServiceOrderState::Cart.as_str())
        .fetch_optional(&self.pool)
        .await?
        .map(ServiceOrderRow::into_order)
        .transpose()
    }

    async fn list(&self, owner_id: i64, limit: i64, offset: i64) -> Result<Vec<ServiceOrder>> {
        sqlx::query_as::<_, ServiceOrderRow>(&format!(
            "{} WHERE user_id = ? ORDER BY id LIMIT ? OFFSET ?",
            SELECT_COLUMNS
        ))
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(ServiceOrderRow::into_order)
        .collect()
    }

    async fn count_all(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM service_orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn update(
        &self,
        owner_id: i64,
        id: i64,
        changes: &ServiceOrderChanges,
    ) -> Result<Option<ServiceOrder>> {
        let updated_at = now();
        let state = changes.state.map(|s| s.as_str());

        // placed_at is assigned before state so it still sees the old state
        sqlx::query(
            r#"
            UPDATE service_orders
            SET name = COALESCE(?, name),
                placed_at = CASE WHEN ? = 'ordered' AND state <> 'ordered' THEN ? ELSE placed_at END,
                state = COALESCE(?, state),
                updated_at = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(changes.name.as_deref())
        .bind(state)
        .bind(updated_at)
        .bind(state)
        .bind(updated_at)
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        self.find_by_id(owner_id, id).await
    }

    async fn delete(&self, owner_id: i64, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM service_orders WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
