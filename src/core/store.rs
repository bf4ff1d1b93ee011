//! Durable storage contract for orders

use crate::core::error::StoreResult;
use crate::core::order::{NewOrder, NewOrderItem, Order, OrderItem, OrderStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Storage trait for orders and their items
///
/// Implementations are the source of truth. Per-record atomicity of
/// `update_status` and `delete` is the implementation's responsibility: the
/// catalog takes no lock of its own around an order id.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// List orders whose status is `Initiated` or `Sent`, items included
    async fn find_active(&self) -> StoreResult<Vec<Order>>;

    /// Get an order by ID, items included
    async fn find_by_id(&self, id: &Uuid) -> StoreResult<Option<Order>>;

    /// Persist a new order row (status `Initiated`, no items)
    ///
    /// The returned order carries the generated id and timestamps.
    async fn create(&self, order: NewOrder) -> StoreResult<Order>;

    /// Persist the items of an existing order
    async fn create_items(
        &self,
        order_id: &Uuid,
        items: Vec<NewOrderItem>,
    ) -> StoreResult<Vec<OrderItem>>;

    /// Store a new status for the order and return the updated record
    async fn update_status(&self, order: &Order, status: OrderStatus) -> StoreResult<Order>;

    /// Delete the order and all of its items
    async fn delete(&self, order: &Order) -> StoreResult<()>;

    /// Delete every order created strictly before `cutoff`
    ///
    /// Returns the number of orders removed.
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> StoreResult<u64>;
}
