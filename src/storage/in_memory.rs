//! In-memory implementations of OrderStore and CacheStore for testing and development

use crate::core::cache::CacheStore;
use crate::core::error::{CacheError, CacheResult, StorageError, StoreResult};
use crate::core::order::{NewOrder, NewOrderItem, Order, OrderItem, OrderStatus};
use crate::core::store::OrderStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::time::Instant;
use uuid::Uuid;

const BACKEND: &str = "in-memory";

#[derive(Default)]
struct Tables {
    /// Order rows, stored without their items
    orders: HashMap<Uuid, Order>,
    /// Item rows keyed by owning order, in insertion order
    items: HashMap<Uuid, Vec<OrderItem>>,
}

impl Tables {
    fn hydrate(&self, order: &Order) -> Order {
        let mut order = order.clone();
        order.items = self.items.get(&order.id).cloned().unwrap_or_default();
        order
    }

    fn remove(&mut self, id: &Uuid) -> bool {
        self.items.remove(id);
        self.orders.remove(id).is_some()
    }
}

/// In-memory order store
///
/// Useful for testing and development. A single RwLock guards both tables,
/// so every operation (including the cascading delete) is atomic.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryOrderStore {
    /// Create a new in-memory order store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully formed order as-is, items included
    ///
    /// Bypasses id and timestamp generation; used to seed fixtures such as
    /// orders created in the past.
    pub fn insert(&self, order: Order) -> StoreResult<()> {
        let mut tables = self.write()?;
        let mut row = order;
        let items = std::mem::take(&mut row.items);
        tables.items.insert(row.id, items);
        tables.orders.insert(row.id, row);
        Ok(())
    }

    /// Number of stored orders, whatever their status
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.orders.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Number of stored items across all orders
    pub fn item_count(&self) -> StoreResult<usize> {
        Ok(self.read()?.items.values().map(Vec::len).sum())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|e| StorageError::Unavailable {
            backend: format!("{} (failed to acquire read lock: {})", BACKEND, e),
        })
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|e| StorageError::Unavailable {
            backend: format!("{} (failed to acquire write lock: {})", BACKEND, e),
        })
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn find_active(&self) -> StoreResult<Vec<Order>> {
        let tables = self.read()?;

        let mut orders: Vec<Order> = tables
            .orders
            .values()
            .filter(|order| OrderStatus::ACTIVE.contains(&order.status))
            .map(|order| tables.hydrate(order))
            .collect();
        orders.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        Ok(orders)
    }

    async fn find_by_id(&self, id: &Uuid) -> StoreResult<Option<Order>> {
        let tables = self.read()?;

        Ok(tables.orders.get(id).map(|order| tables.hydrate(order)))
    }

    async fn create(&self, order: NewOrder) -> StoreResult<Order> {
        let mut tables = self.write()?;

        let order = Order::from_new(order);
        tables.orders.insert(order.id, order.clone());

        Ok(order)
    }

    async fn create_items(
        &self,
        order_id: &Uuid,
        items: Vec<NewOrderItem>,
    ) -> StoreResult<Vec<OrderItem>> {
        let mut tables = self.write()?;

        if !tables.orders.contains_key(order_id) {
            return Err(StorageError::IntegrityError {
                message: format!("order {} does not exist", order_id),
            });
        }

        let created: Vec<OrderItem> = items
            .into_iter()
            .map(|item| OrderItem::from_new(*order_id, item))
            .collect();
        tables
            .items
            .entry(*order_id)
            .or_default()
            .extend(created.iter().cloned());

        Ok(created)
    }

    async fn update_status(&self, order: &Order, status: OrderStatus) -> StoreResult<Order> {
        let mut tables = self.write()?;

        let row = tables
            .orders
            .get_mut(&order.id)
            .ok_or_else(|| StorageError::IntegrityError {
                message: format!("order {} does not exist", order.id),
            })?;
        row.set_status(status);
        let row = row.clone();

        Ok(tables.hydrate(&row))
    }

    async fn delete(&self, order: &Order) -> StoreResult<()> {
        let mut tables = self.write()?;

        tables.remove(&order.id);

        Ok(())
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> StoreResult<u64> {
        let mut tables = self.write()?;

        let expired: Vec<Uuid> = tables
            .orders
            .values()
            .filter(|order| order.created_at < cutoff)
            .map(|order| order.id)
            .collect();
        let removed = expired.iter().filter(|id| tables.remove(id)).count();

        Ok(removed as u64)
    }
}

struct CacheEntry {
    value: Vec<u8>,
    expires_at: Instant,
}

/// In-memory snapshot cache honoring per-entry TTL
///
/// Expiry is measured with `tokio::time::Instant`, so tests running on a
/// paused runtime clock can move past a TTL without sleeping.
#[derive(Clone, Default)]
pub struct InMemoryCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl InMemoryCache {
    /// Create a new, empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> CacheResult<usize> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| CacheError::Backend(format!("Failed to acquire write lock: {}", e)))?;

        let now = Instant::now();
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);

        Ok(before - entries.len())
    }
}

#[async_trait]
impl CacheStore for InMemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| CacheError::Backend(format!("Failed to acquire read lock: {}", e)))?;

        Ok(entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> CacheResult<()> {
        let expires_at = Instant::now()
            .checked_add(ttl)
            .ok_or_else(|| CacheError::Backend(format!("TTL out of range: {:?}", ttl)))?;

        let mut entries = self
            .entries
            .write()
            .map_err(|e| CacheError::Backend(format!("Failed to acquire write lock: {}", e)))?;

        entries.insert(key.to_string(), CacheEntry { value, expires_at });

        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| CacheError::Backend(format!("Failed to acquire write lock: {}", e)))?;

        entries.remove(key);

        Ok(())
    }
}
