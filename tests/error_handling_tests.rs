//! Integration tests for error propagation through the public surface

use order_desk::config::OrdersConfig;
use order_desk::core::error::{ConfigError, OrderError, ValidationError};
use order_desk::core::validation::{CreateOrderItem, CreateOrderRequest};
use order_desk::prelude::*;
use rust_decimal_macros::dec;

fn request(client_name: &str, items: Vec<CreateOrderItem>) -> CreateOrderRequest {
    CreateOrderRequest {
        client_name: client_name.to_string(),
        items,
    }
}

fn item(description: &str, unit_price: Decimal, quantity: u32) -> CreateOrderItem {
    CreateOrderItem {
        description: description.to_string(),
        unit_price,
        quantity,
    }
}

#[tokio::test]
async fn test_rejected_request_never_reaches_the_store() {
    let store = InMemoryOrderStore::new();
    let host = ServiceBuilder::new().with_store(store.clone()).build().unwrap();

    let request = request("  ", vec![item("Soup", dec!(3), 1)]).sanitized();
    let err: OrderError = request.validate_request().unwrap_err().into();

    assert_eq!(err.error_code(), "VALIDATION_ERROR");
    assert_eq!(host.catalog().list().await.unwrap().len(), 0);
    assert!(store.is_empty().unwrap());
}

#[tokio::test]
async fn test_catalog_errors_carry_codes() {
    let host = ServiceBuilder::new().build().unwrap();
    let catalog = host.catalog();

    let err = catalog.get(Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.error_code(), "ORDER_NOT_FOUND");

    let err = catalog
        .create("", vec![NewOrderItem::new("Soup", dec!(3), 1)])
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "VALIDATION_ERROR");
    assert!(matches!(
        err,
        OrderError::Validation(ValidationError::FieldErrors(_))
    ));
}

#[test]
fn test_config_error_reaches_anyhow_callers() {
    let err = OrdersConfig::from_yaml_str("retention_days: 0").unwrap_err();
    assert!(err.to_string().contains("retention_days"));

    let config_err = err.downcast::<ConfigError>().unwrap();
    let err: OrderError = config_err.into();
    assert_eq!(err.error_code(), "CONFIG_ERROR");
}
