//! # Order Desk
//!
//! Order lifecycle core for a restaurant: orders are created with their
//! items, advanced one status at a time (`initiated` → `sent` → `delivered`)
//! and removed once delivered. The active list is served through a
//! short-lived cache, and a background sweeper purges orders older than the
//! retention window.
//!
//! ## Features
//!
//! - **Pluggable storage**: any [`OrderStore`](core::OrderStore) implementation,
//!   in-memory by default, PostgreSQL behind the `postgres` feature
//! - **Cache-aside listing**: any [`CacheStore`](core::CacheStore), invalidated
//!   on every mutation
//! - **Forward-only lifecycle**: a single transition function drives status changes
//! - **Retention sweeps**: periodic tokio task with graceful shutdown
//! - **YAML configuration** with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use order_desk::prelude::*;
//!
//! let host = ServiceBuilder::new()
//!     .with_config(OrdersConfig::default().with_env_overrides()?)
//!     .build()?;
//!
//! let catalog = host.catalog();
//! let order = catalog
//!     .create("Ana", vec![NewOrderItem::new("Soup", dec!(10.50), 2)])
//!     .await?;
//!
//! match catalog.advance(order.id).await? {
//!     Advanced::Updated(order) => println!("now {}", order.status),
//!     Advanced::Removed(ack) => println!("{}", ack.message),
//! }
//!
//! host.run_until_shutdown().await?;
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Domain ===
    pub use crate::core::{
        Advanced, NewOrder, NewOrderItem, Order, OrderItem, OrderStatus, RemovalAck, Transition,
        next_status,
    };

    // === Services ===
    pub use crate::core::{
        CacheStore, Clock, OrderCatalog, OrderStore, RetentionSweeper, SweeperHandle, SystemClock,
    };

    // === Errors ===
    pub use crate::core::{
        CacheError, ConfigError, OrderError, OrderResult, StorageError, ValidationError,
    };

    // === Requests ===
    pub use crate::core::{CreateOrderItem, CreateOrderRequest};

    // === Storage ===
    pub use crate::storage::{InMemoryCache, InMemoryOrderStore};
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresOrderStore;

    // === Config ===
    pub use crate::config::OrdersConfig;

    // === Server ===
    pub use crate::server::{OrderHost, ServiceBuilder, init_tracing};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use rust_decimal::Decimal;
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
