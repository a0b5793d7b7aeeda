//! Order Item Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Order item ID type
pub type OrderItemId = RecordId;

/// Order item entity — one line of an order (订单行)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<OrderItemId>,
    /// Order reference
    #[serde(with = "serde_helpers::record_id")]
    pub order: RecordId,
    /// Food reference
    #[serde(with = "serde_helpers::record_id")]
    pub food: RecordId,
    pub quantity: i32,
    /// Stored rounded to 2 decimals
    pub unit_price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line of an order-item pack (before the order exists)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemLine {
    #[serde(with = "serde_helpers::record_id")]
    pub food: RecordId,
    #[validate(range(min = 1))]
    pub quantity: i32,
    #[validate(range(min = 0.0))]
    pub unit_price: f64,
}

/// Create order-items payload: a table reference plus the lines to insert.
///
/// A fresh order is created for the pack; every line is inserted against it.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemPack {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub table: Option<RecordId>,
    #[validate(length(min = 1), nested)]
    pub order_items: Vec<OrderItemLine>,
}

/// Update order-item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemUpdate {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub food: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
}
