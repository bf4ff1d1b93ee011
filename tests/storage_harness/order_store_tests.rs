//! Macro-generated test suite for `OrderStore` contract validation.
//!
//! The `order_store_tests!` macro generates a test module that validates any
//! `OrderStore` implementation: order and item persistence, active filtering,
//! status updates, deletion with item cascade, age-based purging and
//! concurrent access.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use order_desk::storage::InMemoryOrderStore;
//!
//! order_store_tests!(InMemoryOrderStore::new());
//! ```
//!
//! # Generated Tests
//!
//! ## Orders
//! - `test_create_and_find_by_id` — new order starts `initiated` with no items
//! - `test_find_by_id_nonexistent` — unknown id returns None
//! - `test_find_active_empty` — empty store lists nothing
//! - `test_find_active_excludes_delivered` — delivered orders are filtered out
//!
//! ## Items
//! - `test_create_items_keeps_order` — items come back in insertion order
//! - `test_find_active_includes_items` — listed orders carry their items
//! - `test_fractional_amounts_keep_scale` — sub-cent prices are stored exactly
//!
//! ## Mutations
//! - `test_update_status` — status persisted, items kept
//! - `test_update_status_nonexistent` — unknown order is an error
//! - `test_delete_removes_items` — deleted order and items are gone
//! - `test_delete_nonexistent` — deleting twice (Ok or Err, both accepted)
//! - `test_delete_older_than` — strict cutoff, idempotent
//!
//! ## Edge Cases
//! - `test_concurrent_creates` — parallel creates from spawned tasks

/// Generate a full `OrderStore` conformance test suite.
///
/// `$factory` must be an expression that evaluates to a fresh, empty store
/// implementing `OrderStore + 'static`. It is re-evaluated for each test to
/// ensure isolation.
#[macro_export]
macro_rules! order_store_tests {
    ($factory:expr) => {
        mod order_store_contract_tests {
            use super::*;
            use chrono::{Duration, Utc};
            use order_desk::core::order::{NewOrderItem, OrderStatus};
            use order_desk::core::store::OrderStore;
            use rust_decimal_macros::dec;
            use std::sync::Arc;
            use uuid::Uuid;

            // ==================================================================
            // Orders
            // ==================================================================

            #[tokio::test]
            async fn test_create_and_find_by_id() {
                let store = $factory;

                let created = store.create(new_order("Ana")).await.unwrap();
                assert_eq!(created.client_name, "Ana");
                assert_eq!(created.total_amount, dec!(23.50));
                assert_eq!(created.status, OrderStatus::Initiated);
                assert!(created.items.is_empty());

                let found = store.find_by_id(&created.id).await.unwrap();
                let found = found.expect("Order should exist after create");
                assert_same_order(&found, &created);
                assert!(found.items.is_empty());
            }

            #[tokio::test]
            async fn test_find_by_id_nonexistent() {
                let store = $factory;
                let found = store.find_by_id(&Uuid::new_v4()).await.unwrap();
                assert!(found.is_none());
            }

            #[tokio::test]
            async fn test_find_active_empty() {
                let store = $factory;
                let active = store.find_active().await.unwrap();
                assert_count(&active, 0);
            }

            #[tokio::test]
            async fn test_find_active_excludes_delivered() {
                let store = $factory;

                let initiated = store.create(new_order("Ana")).await.unwrap();
                let sent = store.create(new_order("Bruno")).await.unwrap();
                let delivered = store.create(new_order("Carla")).await.unwrap();

                store.update_status(&sent, OrderStatus::Sent).await.unwrap();
                store
                    .update_status(&delivered, OrderStatus::Delivered)
                    .await
                    .unwrap();

                let active = store.find_active().await.unwrap();
                assert_count(&active, 2);

                let ids = order_ids(&active);
                assert!(ids.contains(&initiated.id));
                assert!(ids.contains(&sent.id));
                assert!(!ids.contains(&delivered.id));
                assert!(active.iter().all(|order| order.status.is_active()));
            }

            // ==================================================================
            // Items
            // ==================================================================

            #[tokio::test]
            async fn test_create_items_keeps_order() {
                let store = $factory;
                let order = store.create(new_order("Ana")).await.unwrap();

                let items = store.create_items(&order.id, sample_items()).await.unwrap();
                assert_count(&items, 2);
                assert!(items.iter().all(|item| item.order_id == order.id));
                assert_eq!(items[0].subtotal(), Some(dec!(21.00)));

                let found = store.find_by_id(&order.id).await.unwrap().unwrap();
                assert_eq!(item_descriptions(&found), vec!["Margherita", "Lemonade"]);
                assert_eq!(found.items[0].unit_price, dec!(10.50));
                assert_eq!(found.items[0].quantity, 2);
                assert_eq!(found.items[1].quantity, 1);
            }

            #[tokio::test]
            async fn test_find_active_includes_items() {
                let store = $factory;
                let with_items = store.create(new_order("Ana")).await.unwrap();
                store
                    .create_items(&with_items.id, sample_items())
                    .await
                    .unwrap();
                let without_items = store.create(new_order("Bruno")).await.unwrap();

                let active = store.find_active().await.unwrap();
                assert_count(&active, 2);

                let listed = active.iter().find(|o| o.id == with_items.id).unwrap();
                assert_count(&listed.items, 2);
                let listed = active.iter().find(|o| o.id == without_items.id).unwrap();
                assert_count(&listed.items, 0);
            }

            #[tokio::test]
            async fn test_fractional_amounts_keep_scale() {
                let store = $factory;
                let items = vec![NewOrderItem::new("Saffron", dec!(0.005), 3)];
                let order = store
                    .create(new_order_for("Ana", &items))
                    .await
                    .unwrap();
                assert_eq!(order.total_amount, dec!(0.015));
                store.create_items(&order.id, items).await.unwrap();

                let found = store.find_by_id(&order.id).await.unwrap().unwrap();
                assert_eq!(found.total_amount, dec!(0.015));
                assert_eq!(found.items[0].unit_price, dec!(0.005));
                assert_eq!(found.items[0].subtotal(), Some(dec!(0.015)));
            }

            // ==================================================================
            // Mutations
            // ==================================================================

            #[tokio::test]
            async fn test_update_status() {
                let store = $factory;
                let order = store.create(new_order("Ana")).await.unwrap();
                store.create_items(&order.id, sample_items()).await.unwrap();

                let updated = store.update_status(&order, OrderStatus::Sent).await.unwrap();
                assert_eq!(updated.id, order.id);
                assert_eq!(updated.status, OrderStatus::Sent);
                assert!(updated.updated_at >= updated.created_at);

                let found = store.find_by_id(&order.id).await.unwrap().unwrap();
                assert_eq!(found.status, OrderStatus::Sent);
                assert_count(&found.items, 2);
            }

            #[tokio::test]
            async fn test_update_status_nonexistent() {
                let store = $factory;
                let order = store.create(new_order("Ana")).await.unwrap();
                store.delete(&order).await.unwrap();

                let result = store.update_status(&order, OrderStatus::Sent).await;
                assert!(result.is_err(), "Updating a missing order must fail");
            }

            #[tokio::test]
            async fn test_delete_removes_items() {
                let store = $factory;
                let order = store.create(new_order("Ana")).await.unwrap();
                store.create_items(&order.id, sample_items()).await.unwrap();
                let other = store.create(new_order("Bruno")).await.unwrap();

                store.delete(&order).await.unwrap();

                assert!(store.find_by_id(&order.id).await.unwrap().is_none());
                assert!(store.find_by_id(&other.id).await.unwrap().is_some());
                assert_eq!(order_ids(&store.find_active().await.unwrap()), vec![other.id]);
            }

            #[tokio::test]
            async fn test_delete_nonexistent() {
                let store = $factory;
                let order = store.create(new_order("Ana")).await.unwrap();
                store.delete(&order).await.unwrap();

                // Backends may either ignore or reject a second delete
                let _ = store.delete(&order).await;
                assert!(store.find_by_id(&order.id).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_delete_older_than() {
                let store = $factory;
                for order in sample_batch(3) {
                    let created = store.create(order).await.unwrap();
                    store.create_items(&created.id, sample_items()).await.unwrap();
                }

                let past = Utc::now() - Duration::hours(1);
                assert_eq!(store.delete_older_than(past).await.unwrap(), 0);
                assert_count(&store.find_active().await.unwrap(), 3);

                let future = Utc::now() + Duration::hours(1);
                assert_eq!(store.delete_older_than(future).await.unwrap(), 3);
                assert_count(&store.find_active().await.unwrap(), 0);

                // Idempotent
                assert_eq!(store.delete_older_than(future).await.unwrap(), 0);
            }

            // ==================================================================
            // Edge Cases
            // ==================================================================

            #[tokio::test]
            async fn test_concurrent_creates() {
                let store = Arc::new($factory);

                let handles: Vec<_> = sample_batch(10)
                    .into_iter()
                    .map(|order| {
                        let store = store.clone();
                        tokio::spawn(async move {
                            let created = store.create(order).await.unwrap();
                            store.create_items(&created.id, sample_items()).await.unwrap();
                            created.id
                        })
                    })
                    .collect();

                let mut ids = Vec::new();
                for handle in futures::future::join_all(handles).await {
                    ids.push(handle.unwrap());
                }

                let active = store.find_active().await.unwrap();
                assert_count(&active, 10);
                for id in ids {
                    let order = active.iter().find(|o| o.id == id).unwrap();
                    assert_count(&order.items, 2);
                }
            }
        }
    };
}
