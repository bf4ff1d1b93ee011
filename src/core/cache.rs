//! Cache-aside snapshot contract

use crate::core::error::CacheResult;
use async_trait::async_trait;
use std::time::Duration;

/// Key under which the list of active orders is cached
pub const ACTIVE_ORDERS_KEY: &str = "active-orders";

/// Trait defining the interface for snapshot caches
///
/// Values are opaque bytes (JSON-encoded by the catalog). Entries expire once
/// their TTL has elapsed. There is no ordering guarantee between independent
/// callers: a cache is allowed to serve data up to one TTL old.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Retrieve the snapshot stored under `key`, if present and not expired
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// Store a snapshot under `key` for `ttl`
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> CacheResult<()>;

    /// Remove the snapshot stored under `key` (no-op when absent)
    async fn delete(&self, key: &str) -> CacheResult<()>;
}
