//! Order and order item entities
//!
//! An [`Order`] owns its [`OrderItem`]s: they are created together, read
//! together and deleted together. The order total is derived from the items
//! once, at creation, and never recomputed afterwards.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Fulfillment status of an order
///
/// Statuses only move forward: `Initiated` → `Sent` → `Delivered`.
/// `Delivered` is terminal: the catalog removes the order instead of storing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Initiated,
    Sent,
    Delivered,
}

impl OrderStatus {
    /// Statuses an order can be observed in while it is still stored
    pub const ACTIVE: [OrderStatus; 2] = [OrderStatus::Initiated, OrderStatus::Sent];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Initiated => "initiated",
            OrderStatus::Sent => "sent",
            OrderStatus::Delivered => "delivered",
        }
    }

    /// Check whether the status has no further forward transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered)
    }

    /// Check whether orders in this status belong to the active list
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initiated" => Ok(OrderStatus::Initiated),
            "sent" => Ok(OrderStatus::Sent),
            "delivered" => Ok(OrderStatus::Delivered),
            other => Err(format!("Unknown order status: {}", other)),
        }
    }
}

/// A line of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub description: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub order_id: Uuid,
}

impl OrderItem {
    /// Build a stored item from creation attributes
    pub fn from_new(order_id: Uuid, item: NewOrderItem) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: item.description,
            unit_price: item.unit_price,
            quantity: item.quantity,
            order_id,
        }
    }

    /// Price of this line (`unit_price × quantity`), `None` on overflow
    pub fn subtotal(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

/// A restaurant order together with its items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub client_name: String,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Build a freshly created order (status `Initiated`, no items yet)
    pub fn from_new(order: NewOrder) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            client_name: order.client_name,
            total_amount: order.total_amount,
            status: OrderStatus::Initiated,
            created_at: now,
            updated_at: now,
            items: Vec::new(),
        }
    }

    /// Set a new status and refresh `updated_at`
    pub fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

/// Attributes needed to persist a new order row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    pub client_name: String,
    pub total_amount: Decimal,
}

/// Attributes of an item supplied at order creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub description: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl NewOrderItem {
    pub fn new(description: impl Into<String>, unit_price: Decimal, quantity: u32) -> Self {
        Self {
            description: description.into(),
            unit_price,
            quantity,
        }
    }

    /// `unit_price × quantity`, `None` on overflow
    pub fn subtotal(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Sum of `unit_price × quantity` over all items
///
/// Returns `None` when a line or the running sum leaves the `Decimal` range.
pub fn total_amount(items: &[NewOrderItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |total, item| total.checked_add(item.subtotal()?))
}
