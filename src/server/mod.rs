//! Service assembly and process lifecycle
//!
//! [`ServiceBuilder`] wires the store, cache and config into an [`OrderHost`],
//! which owns the catalog and runs the retention sweeper until shutdown.

pub mod builder;
pub mod host;

pub use builder::ServiceBuilder;
pub use host::{OrderHost, init_tracing};
