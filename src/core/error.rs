//! Typed error handling for order operations
//!
//! Callers get a single [`OrderError`] type from the catalog and can match on
//! the failure kind instead of inspecting messages.
//!
//! # Error Categories
//!
//! - [`OrderError::NotFound`]: unknown order id on `get`/`advance`
//! - [`ValidationError`]: rejected input (empty items, bad prices, ...)
//! - [`StorageError`]: the backing store failed; fatal for the operation
//! - [`ConfigError`]: configuration could not be loaded or is invalid
//!
//! [`CacheError`] never reaches callers of the catalog: cache failures are
//! logged and the operation falls through to the store.
//!
//! # Example
//!
//! ```rust,ignore
//! match catalog.get(id).await {
//!     Ok(order) => println!("{} owes {}", order.client_name, order.total_amount),
//!     Err(OrderError::NotFound { id }) => println!("Order {} not found", id),
//!     Err(e) => eprintln!("{} ({})", e, e.error_code()),
//! }
//! ```

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// The error type returned by [`OrderCatalog`](crate::core::catalog::OrderCatalog)
#[derive(Debug, Error)]
pub enum OrderError {
    /// No order with this id exists
    #[error("Order with id '{id}' not found")]
    NotFound { id: Uuid },

    /// Input rejected before any store write
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Backing store failure (store unavailable)
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl OrderError {
    /// Stable code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            OrderError::NotFound { .. } => "ORDER_NOT_FOUND",
            OrderError::Validation(_) => "VALIDATION_ERROR",
            OrderError::Storage(_) => "STORE_UNAVAILABLE",
            OrderError::Config(_) => "CONFIG_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, OrderError::NotFound { .. })
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Single field validation error
    #[error("Validation error for field '{field}': {message}")]
    FieldError { field: String, message: String },

    /// Multiple field validation errors
    #[error("Validation errors: {}", join_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),

    /// An order needs at least one item
    #[error("An order must contain at least one item")]
    EmptyItems,
}

impl ValidationError {
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::FieldError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Flatten into a list of field errors
    pub fn field_errors(&self) -> Vec<FieldValidationError> {
        match self {
            ValidationError::FieldError { field, message } => vec![FieldValidationError {
                field: field.clone(),
                message: message.clone(),
            }],
            ValidationError::FieldErrors(errors) => errors.clone(),
            ValidationError::EmptyItems => vec![FieldValidationError {
                field: "items".to_string(),
                message: "at least one item is required".to_string(),
            }],
        }
    }
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

fn join_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    /// Connection error
    #[error("Failed to connect to {backend}: {message}")]
    ConnectionError { backend: String, message: String },

    /// Query execution error
    #[error("{backend} query error: {message}")]
    QueryError { backend: String, message: String },

    /// Transaction error
    #[error("Transaction error: {message}")]
    TransactionError { message: String },

    /// Data integrity error
    #[error("Data integrity error: {message}")]
    IntegrityError { message: String },

    /// Backend not available
    #[error("Storage backend '{backend}' is unavailable")]
    Unavailable { backend: String },
}

// =============================================================================
// Cache Errors
// =============================================================================

/// Errors raised by cache backends
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache backend error: {0}")]
    Backend(String),

    #[error("Cache serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialization(err.to_string())
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse config{}: {message}", file_suffix(.file))]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// IO error while reading configuration
    #[error("IO error: {message}")]
    IoError { message: String },
}

fn file_suffix(file: &Option<String>) -> String {
    file.as_ref()
        .map(|f| format!(" file '{}'", f))
        .unwrap_or_default()
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Result type aliases
// =============================================================================

/// Result of catalog operations
pub type OrderResult<T> = Result<T, OrderError>;

/// Result of [`OrderStore`](crate::core::store::OrderStore) operations
pub type StoreResult<T> = Result<T, StorageError>;

/// Result of [`CacheStore`](crate::core::cache::CacheStore) operations
pub type CacheResult<T> = Result<T, CacheError>;

// =============================================================================
// Tests
// =============================================================================
