//! PostgreSQL storage backend using sqlx.
//!
//! Provides `PostgresOrderStore`, an [`OrderStore`] backed by a
//! `sqlx::PgPool`. Orders live in an `orders` table and their items in
//! `order_items`, linked by a foreign key with `ON DELETE CASCADE` so that
//! deleting an order row removes its items in the same statement.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! order-desk = { version = "0.1", features = ["postgres"] }
//! ```

use crate::core::error::{StorageError, StoreResult};
use crate::core::order::{NewOrder, NewOrderItem, Order, OrderItem, OrderStatus};
use crate::core::store::OrderStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use uuid::Uuid;

const BACKEND: &str = "PostgreSQL";

const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS orders (
        id UUID PRIMARY KEY,
        client_name TEXT NOT NULL,
        total_amount NUMERIC NOT NULL CHECK (total_amount >= 0),
        status TEXT NOT NULL CHECK (status IN ('initiated', 'sent', 'delivered')),
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS order_items (
        id UUID PRIMARY KEY,
        order_id UUID NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
        description TEXT NOT NULL,
        unit_price NUMERIC NOT NULL CHECK (unit_price >= 0),
        quantity INTEGER NOT NULL CHECK (quantity >= 1),
        position INTEGER NOT NULL
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_orders_status ON orders(status)",
    "CREATE INDEX IF NOT EXISTS idx_orders_created_at ON orders(created_at)",
    "CREATE INDEX IF NOT EXISTS idx_order_items_order_id ON order_items(order_id)",
];

/// Order storage backed by PostgreSQL.
#[derive(Clone, Debug)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Create a new `PostgresOrderStore` with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url` and build a store on a fresh pool.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| StorageError::ConnectionError {
                backend: BACKEND.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self::new(pool))
    }

    /// Create the `orders` and `order_items` tables if they do not exist.
    pub async fn migrate(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(*statement)
                .execute(&self.pool)
                .await
                .map_err(query_error)?;
        }
        Ok(())
    }

    /// Access the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn load_items(&self, order_ids: &[Uuid]) -> StoreResult<HashMap<Uuid, Vec<OrderItem>>> {
        if order_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query(
            "SELECT id, order_id, description, unit_price, quantity \
             FROM order_items WHERE order_id = ANY($1) ORDER BY order_id, position",
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(query_error)?;

        let mut items: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
        for row in rows {
            let item = row_to_item(&row)?;
            items.entry(item.order_id).or_default().push(item);
        }
        Ok(items)
    }
}

fn query_error(e: sqlx::Error) -> StorageError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StorageError::ConnectionError {
                backend: BACKEND.to_string(),
                message: e.to_string(),
            }
        }
        _ => StorageError::QueryError {
            backend: BACKEND.to_string(),
            message: e.to_string(),
        },
    }
}

fn row_to_order(row: &PgRow) -> StoreResult<Order> {
    let status: String = row.try_get("status").map_err(query_error)?;
    let status = status
        .parse::<OrderStatus>()
        .map_err(|message| StorageError::IntegrityError { message })?;

    Ok(Order {
        id: row.try_get("id").map_err(query_error)?,
        client_name: row.try_get("client_name").map_err(query_error)?,
        total_amount: row.try_get::<Decimal, _>("total_amount").map_err(query_error)?,
        status,
        created_at: row.try_get("created_at").map_err(query_error)?,
        updated_at: row.try_get("updated_at").map_err(query_error)?,
        items: Vec::new(),
    })
}

fn row_to_item(row: &PgRow) -> StoreResult<OrderItem> {
    let quantity: i32 = row.try_get("quantity").map_err(query_error)?;
    let quantity = u32::try_from(quantity).map_err(|_| StorageError::IntegrityError {
        message: format!("negative item quantity {}", quantity),
    })?;

    Ok(OrderItem {
        id: row.try_get("id").map_err(query_error)?,
        description: row.try_get("description").map_err(query_error)?,
        unit_price: row.try_get("unit_price").map_err(query_error)?,
        quantity,
        order_id: row.try_get("order_id").map_err(query_error)?,
    })
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn find_active(&self) -> StoreResult<Vec<Order>> {
        let rows = sqlx::query(
            "SELECT id, client_name, total_amount, status, created_at, updated_at \
             FROM orders WHERE status IN ('initiated', 'sent') ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(query_error)?;

        let mut orders = rows
            .iter()
            .map(row_to_order)
            .collect::<StoreResult<Vec<_>>>()?;
        let ids: Vec<Uuid> = orders.iter().map(|order| order.id).collect();
        let mut items = self.load_items(&ids).await?;
        for order in &mut orders {
            order.items = items.remove(&order.id).unwrap_or_default();
        }

        Ok(orders)
    }

    async fn find_by_id(&self, id: &Uuid) -> StoreResult<Option<Order>> {
        let row = sqlx::query(
            "SELECT id, client_name, total_amount, status, created_at, updated_at \
             FROM orders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_error)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut order = row_to_order(&row)?;
        order.items = self
            .load_items(&[order.id])
            .await?
            .remove(&order.id)
            .unwrap_or_default();

        Ok(Some(order))
    }

    async fn create(&self, order: NewOrder) -> StoreResult<Order> {
        let order = Order::from_new(order);

        sqlx::query(
            "INSERT INTO orders (id, client_name, total_amount, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(order.id)
        .bind(&order.client_name)
        .bind(order.total_amount)
        .bind(order.status.as_str())
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await
        .map_err(query_error)?;

        Ok(order)
    }

    async fn create_items(
        &self,
        order_id: &Uuid,
        items: Vec<NewOrderItem>,
    ) -> StoreResult<Vec<OrderItem>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::TransactionError {
                message: e.to_string(),
            })?;

        let mut created = Vec::with_capacity(items.len());
        for (position, item) in items.into_iter().enumerate() {
            let item = OrderItem::from_new(*order_id, item);
            let quantity = i32::try_from(item.quantity).map_err(|_| StorageError::IntegrityError {
                message: format!("item quantity {} out of range", item.quantity),
            })?;

            sqlx::query(
                "INSERT INTO order_items (id, order_id, description, unit_price, quantity, position) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(item.id)
            .bind(item.order_id)
            .bind(&item.description)
            .bind(item.unit_price)
            .bind(quantity)
            .bind(position as i32)
            .execute(&mut *tx)
            .await
            .map_err(query_error)?;

            created.push(item);
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::TransactionError {
                message: e.to_string(),
            })?;

        Ok(created)
    }

    async fn update_status(&self, order: &Order, status: OrderStatus) -> StoreResult<Order> {
        let row = sqlx::query(
            "UPDATE orders SET status = $2, updated_at = $3 WHERE id = $1 \
             RETURNING id, client_name, total_amount, status, created_at, updated_at",
        )
        .bind(order.id)
        .bind(status.as_str())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(query_error)?
        .ok_or_else(|| StorageError::IntegrityError {
            message: format!("order {} does not exist", order.id),
        })?;

        let mut updated = row_to_order(&row)?;
        updated.items = self
            .load_items(&[updated.id])
            .await?
            .remove(&updated.id)
            .unwrap_or_default();

        Ok(updated)
    }

    async fn delete(&self, order: &Order) -> StoreResult<()> {
        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(order.id)
            .execute(&self.pool)
            .await
            .map_err(query_error)?;

        Ok(())
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM orders WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(query_error)?;

        Ok(result.rows_affected())
    }
}
