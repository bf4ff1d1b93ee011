//! Core domain: orders, their lifecycle and the ports to storage and cache

pub mod cache;
pub mod catalog;
pub mod clock;
pub mod error;
pub mod lifecycle;
pub mod order;
pub mod retention;
pub mod store;
pub mod validation;

pub use cache::{ACTIVE_ORDERS_KEY, CacheStore};
pub use catalog::{Advanced, OrderCatalog, RemovalAck};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{
    CacheError, ConfigError, FieldValidationError, OrderError, OrderResult, StorageError,
    ValidationError,
};
pub use lifecycle::{Transition, next_status};
pub use order::{NewOrder, NewOrderItem, Order, OrderItem, OrderStatus};
pub use retention::{RetentionSweeper, SweeperHandle};
pub use store::OrderStore;
pub use validation::{CreateOrderItem, CreateOrderRequest};
