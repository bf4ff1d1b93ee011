//! Host owning the catalog and the retention sweeper
//!
//! The host is transport-agnostic: a request layer borrows the catalog with
//! [`OrderHost::catalog`] and maps [`OrderError`](crate::core::OrderError)
//! onto its own responses. The host only manages the background sweeper and
//! the process lifecycle.

use crate::config::OrdersConfig;
use crate::core::catalog::OrderCatalog;
use crate::core::retention::{RetentionSweeper, SweeperHandle};
use anyhow::Result;
use std::future::Future;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Running state of the order service
pub struct OrderHost {
    config: Arc<OrdersConfig>,
    catalog: Arc<OrderCatalog>,
    sweeper: RetentionSweeper,
    sweeper_handle: Option<SweeperHandle>,
}

impl std::fmt::Debug for OrderHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderHost")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OrderHost {
    /// Build the host from its components
    ///
    /// Prefer [`ServiceBuilder`](super::ServiceBuilder), which fills in defaults.
    pub fn new(config: OrdersConfig, catalog: OrderCatalog, sweeper: RetentionSweeper) -> Self {
        Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            sweeper,
            sweeper_handle: None,
        }
    }

    pub fn config(&self) -> &Arc<OrdersConfig> {
        &self.config
    }

    /// Shared handle to the catalog, cheap to clone into request handlers
    pub fn catalog(&self) -> Arc<OrderCatalog> {
        self.catalog.clone()
    }

    pub fn sweeper(&self) -> &RetentionSweeper {
        &self.sweeper
    }

    /// Whether the background sweeper is running
    pub fn is_running(&self) -> bool {
        self.sweeper_handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Start the retention sweeper. Calling it twice is a no-op.
    pub fn start(&mut self) {
        if self.sweeper_handle.is_some() {
            tracing::debug!("Retention sweeper already running");
            return;
        }
        self.sweeper_handle = Some(self.sweeper.clone().spawn());
        tracing::info!(
            cache_ttl_secs = self.config.cache_ttl_secs,
            retention_days = self.config.retention_days,
            "Order service started"
        );
    }

    /// Stop the retention sweeper and wait for it to exit
    pub async fn stop(&mut self) {
        if let Some(handle) = self.sweeper_handle.take() {
            handle.shutdown().await;
            tracing::info!("Order service stopped");
        }
    }

    /// Start, wait for `shutdown` to resolve, then stop
    pub async fn run_until<F>(mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        self.start();
        shutdown.await;
        self.stop().await;
        Ok(())
    }

    /// Start and run until Ctrl+C or SIGTERM
    pub async fn run_until_shutdown(self) -> Result<()> {
        self.run_until(shutdown_signal()).await
    }
}

/// Install a `tracing` subscriber filtered by `RUST_LOG` (default `info`)
///
/// Returns `false` when a global subscriber was already set.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}

/// Wait for a shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
