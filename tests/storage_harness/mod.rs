//! Shared test harness for storage backend testing
//!
//! Provides order fixtures and assertion helpers, plus the
//! `order_store_tests!` macro validating any `OrderStore` implementation.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod order_store_tests;

use order_desk::core::order::{NewOrder, NewOrderItem, Order, total_amount};
use rust_decimal_macros::dec;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Two items totalling 23.50: 2 x 10.50 + 1 x 2.50
pub fn sample_items() -> Vec<NewOrderItem> {
    vec![
        NewOrderItem::new("Margherita", dec!(10.50), 2),
        NewOrderItem::new("Lemonade", dec!(2.50), 1),
    ]
}

/// Order header matching [`sample_items`]
pub fn new_order(client_name: &str) -> NewOrder {
    new_order_for(client_name, &sample_items())
}

/// Order header whose total is derived from `items`
pub fn new_order_for(client_name: &str, items: &[NewOrderItem]) -> NewOrder {
    NewOrder {
        client_name: client_name.to_string(),
        total_amount: total_amount(items).expect("fixture total fits in a Decimal"),
    }
}

/// `n` order headers with distinct client names
pub fn sample_batch(n: usize) -> Vec<NewOrder> {
    (0..n).map(|i| new_order(&format!("client-{}", i))).collect()
}

// ---------------------------------------------------------------------------
// Assertions
// ---------------------------------------------------------------------------

pub fn assert_count<T>(list: &[T], expected: usize) {
    assert_eq!(
        list.len(),
        expected,
        "Expected {} items, got {}",
        expected,
        list.len()
    );
}

pub fn order_ids(orders: &[Order]) -> Vec<Uuid> {
    orders.iter().map(|order| order.id).collect()
}

/// Compare the persisted fields of two orders, ignoring timestamp precision
pub fn assert_same_order(actual: &Order, expected: &Order) {
    assert_eq!(actual.id, expected.id);
    assert_eq!(actual.client_name, expected.client_name);
    assert_eq!(actual.total_amount, expected.total_amount);
    assert_eq!(actual.status, expected.status);
}

/// Item descriptions in stored order
pub fn item_descriptions(order: &Order) -> Vec<&str> {
    order
        .items
        .iter()
        .map(|item| item.description.as_str())
        .collect()
}
