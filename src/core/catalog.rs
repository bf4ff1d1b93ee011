//! Order catalog: store, cache and lifecycle put together
//!
//! The catalog is the only entry point the request layer needs. Reads of the
//! active list go through the cache (cache-aside on [`ACTIVE_ORDERS_KEY`]);
//! single-order reads always hit the store. Every mutation invalidates the
//! cached list, whichever branch it took.
//!
//! The cached list is shared state without a lock: a refill that started
//! before a concurrent invalidation may land after it and serve a stale list
//! until the entry expires or the next mutation clears it.

use crate::core::cache::{ACTIVE_ORDERS_KEY, CacheStore};
use crate::core::error::{OrderError, OrderResult, ValidationError};
use crate::core::lifecycle::{Transition, next_status};
use crate::core::order::{NewOrder, NewOrderItem, Order, total_amount};
use crate::core::store::OrderStore;
use crate::core::validation::validators::check_new_order;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Default lifetime of the cached active-orders list
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30);

/// Acknowledgement returned when advancing an order removed it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalAck {
    pub id: Uuid,
    pub message: String,
}

impl RemovalAck {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            message: format!("Order {} has been delivered and removed.", id),
        }
    }
}

/// Outcome of [`OrderCatalog::advance`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum Advanced {
    /// The order moved to its next status and is still stored
    Updated(Order),
    /// The order reached the end of its lifecycle and was deleted
    Removed(RemovalAck),
}

impl Advanced {
    pub fn order(&self) -> Option<&Order> {
        match self {
            Advanced::Updated(order) => Some(order),
            Advanced::Removed(_) => None,
        }
    }

    pub fn is_removed(&self) -> bool {
        matches!(self, Advanced::Removed(_))
    }
}

/// Orchestrates order reads and mutations over a store and a cache
#[derive(Clone)]
pub struct OrderCatalog {
    store: Arc<dyn OrderStore>,
    cache: Arc<dyn CacheStore>,
    cache_ttl: Duration,
}

impl OrderCatalog {
    /// Create a catalog using [`DEFAULT_CACHE_TTL`]
    pub fn new(store: Arc<dyn OrderStore>, cache: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            cache,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Override the lifetime of the cached active-orders list
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    pub fn store(&self) -> &Arc<dyn OrderStore> {
        &self.store
    }

    /// List every order that is not yet delivered, items included
    pub async fn list(&self) -> OrderResult<Vec<Order>> {
        if let Some(orders) = self.cached_active().await {
            tracing::debug!(count = orders.len(), "Active orders served from cache");
            return Ok(orders);
        }

        let orders = self.store.find_active().await?;
        self.fill_active(&orders).await;
        tracing::debug!(
            count = orders.len(),
            ttl_secs = self.cache_ttl.as_secs(),
            "Active orders cached"
        );
        Ok(orders)
    }

    /// Get a single order from the store
    pub async fn get(&self, id: Uuid) -> OrderResult<Order> {
        self.store
            .find_by_id(&id)
            .await?
            .ok_or(OrderError::NotFound { id })
    }

    /// Create an order and its items
    ///
    /// The total is computed here from the supplied prices. Nothing is written
    /// when validation fails.
    pub async fn create(
        &self,
        client_name: impl Into<String>,
        items: Vec<NewOrderItem>,
    ) -> OrderResult<Order> {
        let client_name = client_name.into();
        check_new_order(&client_name, &items)?;

        let total_amount = total_amount(&items)
            .ok_or_else(|| ValidationError::field("items", "amount out of range"))?;
        let order = self
            .store
            .create(NewOrder {
                client_name,
                total_amount,
            })
            .await?;
        if let Err(e) = self.store.create_items(&order.id, items).await {
            // An order without items must not survive a failed insert
            if let Err(cleanup) = self.store.delete(&order).await {
                tracing::error!(
                    order_id = %order.id,
                    error = %cleanup,
                    "Failed to remove order after item insert failure"
                );
            }
            self.invalidate_active().await;
            return Err(e.into());
        }

        self.invalidate_active().await;
        tracing::info!(order_id = %order.id, total = %total_amount, "Order created");

        self.get(order.id).await
    }

    /// Move an order one step forward
    ///
    /// Orders that reach `Delivered` are deleted and a [`RemovalAck`] is
    /// returned instead of the order.
    pub async fn advance(&self, id: Uuid) -> OrderResult<Advanced> {
        let order = self.get(id).await?;

        let transition = next_status(order.status);
        match transition {
            Transition::Advance(status) if !transition.removes() => {
                let result = self.store.update_status(&order, status).await;
                self.invalidate_active().await;
                let updated = result?;

                tracing::info!(order_id = %id, status = %status, "Order advanced");
                Ok(Advanced::Updated(updated))
            }
            _ => {
                let result = self.store.delete(&order).await;
                self.invalidate_active().await;
                result?;

                tracing::info!(order_id = %id, "Order delivered and removed");
                Ok(Advanced::Removed(RemovalAck::new(id)))
            }
        }
    }

    async fn cached_active(&self) -> Option<Vec<Order>> {
        match self.cache.get(ACTIVE_ORDERS_KEY).await {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(orders) => Some(orders),
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding undecodable active-orders snapshot");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Cache read failed, falling back to store");
                None
            }
        }
    }

    async fn fill_active(&self, orders: &[Order]) {
        let bytes = match serde_json::to_vec(orders) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to encode active-orders snapshot");
                return;
            }
        };
        if let Err(e) = self
            .cache
            .set(ACTIVE_ORDERS_KEY, bytes, self.cache_ttl)
            .await
        {
            tracing::warn!(error = %e, "Cache write failed");
        }
    }

    async fn invalidate_active(&self) {
        if let Err(e) = self.cache.delete(ACTIVE_ORDERS_KEY).await {
            tracing::warn!(error = %e, key = ACTIVE_ORDERS_KEY, "Cache invalidation failed");
        }
    }
}
