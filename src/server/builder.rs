//! ServiceBuilder for fluent construction of an [`OrderHost`]

use super::host::OrderHost;
use crate::config::OrdersConfig;
use crate::core::cache::CacheStore;
use crate::core::catalog::OrderCatalog;
use crate::core::clock::{Clock, SystemClock};
use crate::core::retention::RetentionSweeper;
use crate::core::store::OrderStore;
use crate::storage::{InMemoryCache, InMemoryOrderStore};
use anyhow::Result;
use std::sync::Arc;

/// Builder wiring the store, cache, clock and config into an [`OrderHost`]
///
/// Anything left unset falls back to the in-memory adapters, the system
/// clock and [`OrdersConfig::default`].
///
/// # Example
///
/// ```ignore
/// let host = ServiceBuilder::new()
///     .with_config(OrdersConfig::from_yaml_file("orders.yaml")?)
///     .with_store(InMemoryOrderStore::new())
///     .build()?;
/// ```
pub struct ServiceBuilder {
    store: Option<Arc<dyn OrderStore>>,
    cache: Option<Arc<dyn CacheStore>>,
    clock: Option<Arc<dyn Clock>>,
    config: OrdersConfig,
}

impl ServiceBuilder {
    /// Create a new ServiceBuilder
    pub fn new() -> Self {
        Self {
            store: None,
            cache: None,
            clock: None,
            config: OrdersConfig::default(),
        }
    }

    /// Set the order store
    pub fn with_store(mut self, store: impl OrderStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Set an already shared order store
    pub fn with_shared_store(mut self, store: Arc<dyn OrderStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the cache used for the active-orders list
    pub fn with_cache(mut self, cache: impl CacheStore + 'static) -> Self {
        self.cache = Some(Arc::new(cache));
        self
    }

    /// Set the clock used by the retention sweeper
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_config(mut self, config: OrdersConfig) -> Self {
        self.config = config;
        self
    }

    /// Connect to PostgreSQL using `database_url` from the config
    ///
    /// The tables are created if missing. Fails when no URL is configured.
    #[cfg(feature = "postgres")]
    pub async fn with_postgres(mut self) -> Result<Self> {
        let url = self
            .config
            .database_url
            .clone()
            .ok_or_else(|| anyhow::anyhow!("database_url is required for the postgres store"))?;

        let store = crate::storage::PostgresOrderStore::connect(&url).await?;
        store.migrate().await?;
        tracing::info!("Connected to PostgreSQL order store");

        self.store = Some(Arc::new(store));
        Ok(self)
    }

    /// Build the host
    ///
    /// The sweeper is configured but not started; see [`OrderHost::start`].
    pub fn build(self) -> Result<OrderHost> {
        self.config.validate()?;

        let store = self.store.unwrap_or_else(|| {
            tracing::debug!("No order store configured, using in-memory store");
            Arc::new(InMemoryOrderStore::new())
        });
        let cache = self.cache.unwrap_or_else(|| {
            tracing::debug!("No cache configured, using in-memory cache");
            Arc::new(InMemoryCache::new())
        });
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let catalog =
            OrderCatalog::new(store.clone(), cache).with_cache_ttl(self.config.cache_ttl());
        let sweeper = RetentionSweeper::new(store)
            .with_clock(clock)
            .with_retention(self.config.retention())
            .with_interval(self.config.sweep_interval());

        Ok(OrderHost::new(self.config, catalog, sweeper))
    }
}

impl Default for ServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
