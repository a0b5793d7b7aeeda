//! Order View Composer
//!
//! Assembles the denormalized, invoice-ready view of one order: every
//! order-item joined with its food, its order, and the order's dining table,
//! grouped per (order, table) with the payment total and line count.
//!
//! The store is read exactly once per call — a single `SELECT ... FETCH`
//! resolves all three references with left-outer semantics (a dangling
//! reference becomes `None`, never an error). Everything after that read is
//! a chain of pure stages:
//!
//! ```text
//! fetch ──► project_rows ──► group_rows
//! ```
//!
//! The view has no identity and no lifecycle: it is rebuilt on every call
//! and never cached.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use crate::db::models::{DiningTable, Food, serde_helpers};
use crate::utils::money::sum_money;
use crate::utils::{AppError, AppResult};

/// One order-item row as fetched from the store, references resolved
#[derive(Debug, Deserialize)]
pub struct JoinedOrderItem {
    pub quantity: i32,
    #[serde(default, deserialize_with = "serde_helpers::fetched::deserialize")]
    pub food: Option<Food>,
    #[serde(default, deserialize_with = "serde_helpers::fetched::deserialize")]
    pub order: Option<FetchedOrder>,
}

/// The joined order with its table resolved in the same fetch
#[derive(Debug, Deserialize)]
pub struct FetchedOrder {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Required so a dangling order reference fails to parse as a record
    /// and falls back to `None`
    pub order_date: chrono::DateTime<chrono::Utc>,
    #[serde(default, deserialize_with = "serde_helpers::fetched::deserialize")]
    pub table: Option<DiningTable>,
}

/// Projected line — the strict allow-list of fields the client receives.
///
/// `amount` and `price` both carry the food's per-unit price; `quantity` is
/// carried for display but not multiplied into the group total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderViewRow {
    pub amount: Option<f64>,
    pub food_name: Option<String>,
    pub food_image: Option<String>,
    pub table_number: Option<i64>,
    pub table_id: Option<String>,
    pub order_id: Option<String>,
    pub price: Option<f64>,
    pub quantity: i32,
}

/// One grouped view row per distinct (order, table) combination.
///
/// The grouping key itself is suppressed from the output shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderViewGroup {
    pub table_number: Option<i64>,
    pub payment_due: f64,
    pub total_count: u64,
    pub order_items: Vec<OrderViewRow>,
}

/// Composes order views from explicitly injected store handles.
///
/// Stateless and cheap to clone; safe to use from any number of concurrent
/// requests.
#[derive(Clone)]
pub struct OrderViewComposer {
    db: Surreal<Db>,
    timeout: Duration,
}

impl OrderViewComposer {
    pub fn new(db: Surreal<Db>, timeout: Duration) -> Self {
        Self { db, timeout }
    }

    /// Build the grouped view for one order.
    ///
    /// An unknown or malformed `order_id` yields `Ok(vec![])`; only a store
    /// failure (including timeout) is an error.
    pub async fn compose(&self, order_id: &str) -> AppResult<Vec<OrderViewGroup>> {
        let rows = self.fetch(order_id).await?;
        Ok(group_rows(project_rows(rows)))
    }

    /// Stage 1 — one atomic read: filter by order, resolve food, order and
    /// the order's table in the same call.
    async fn fetch(&self, order_id: &str) -> AppResult<Vec<JoinedOrderItem>> {
        // 任意字符串都接受；解析失败 = 零行，不是错误
        let order_ref: RecordId = match order_id.parse() {
            Ok(thing) => thing,
            Err(_) => return Ok(Vec::new()),
        };

        let query = self
            .db
            .query(
                "SELECT * FROM order_item WHERE order = $order \
                 ORDER BY created_at \
                 FETCH food, order, order.table",
            )
            .bind(("order", order_ref));

        let mut response = tokio::time::timeout(self.timeout, query)
            .await
            .map_err(|_| AppError::database("Order view query timed out"))?
            .map_err(|e| AppError::database(format!("Order view query failed: {e}")))?;

        response
            .take(0)
            .map_err(|e| AppError::database(format!("Failed to decode order view rows: {e}")))
    }
}

/// Stage 2 — shape each joined row to the allow-listed fields; everything
/// else is dropped.
pub fn project_rows(rows: Vec<JoinedOrderItem>) -> Vec<OrderViewRow> {
    rows.into_iter()
        .map(|row| {
            let food = row.food.as_ref();
            let order = row.order.as_ref();
            let table = order.and_then(|o| o.table.as_ref());

            OrderViewRow {
                amount: food.map(|f| f.price),
                food_name: food.map(|f| f.name.clone()),
                food_image: food.map(|f| f.food_image.clone()),
                table_number: table.map(|t| t.table_number),
                table_id: table.and_then(|t| t.id.as_ref()).map(|id| id.to_string()),
                order_id: order.and_then(|o| o.id.as_ref()).map(|id| id.to_string()),
                price: food.map(|f| f.price),
                quantity: row.quantity,
            }
        })
        .collect()
}

/// Stage 3 — group by (order_id, table_id, table_number) in first-appearance
/// order; rows inside a group keep their arrival order.
///
/// `payment_due` sums the per-line `amount` (missing amounts count as 0);
/// `total_count` counts rows.
pub fn group_rows(rows: Vec<OrderViewRow>) -> Vec<OrderViewGroup> {
    type GroupKey = (Option<String>, Option<String>, Option<i64>);

    let mut groups: Vec<(GroupKey, Vec<OrderViewRow>)> = Vec::new();

    for row in rows {
        let key: GroupKey = (
            row.order_id.clone(),
            row.table_id.clone(),
            row.table_number,
        );
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(row),
            None => groups.push((key, vec![row])),
        }
    }

    groups
        .into_iter()
        .map(|((_, _, table_number), members)| OrderViewGroup {
            table_number,
            payment_due: sum_money(members.iter().map(|r| r.amount)),
            total_count: members.len() as u64,
            order_items: members,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        order_id: &str,
        table: Option<(&str, i64)>,
        food: Option<(&str, f64)>,
        quantity: i32,
    ) -> OrderViewRow {
        OrderViewRow {
            amount: food.map(|(_, price)| price),
            food_name: food.map(|(name, _)| name.to_string()),
            food_image: food.map(|(name, _)| format!("/images/{name}.webp")),
            table_number: table.map(|(_, number)| number),
            table_id: table.map(|(id, _)| id.to_string()),
            order_id: Some(order_id.to_string()),
            price: food.map(|(_, price)| price),
            quantity,
        }
    }

    #[test]
    fn test_empty_input_yields_no_groups() {
        assert!(group_rows(Vec::new()).is_empty());
    }

    #[test]
    fn test_single_order_single_table_groups_once() {
        let rows = vec![
            row("order:o1", Some(("dining_table:t1", 12)), Some(("paella", 10.0)), 2),
            row("order:o1", Some(("dining_table:t1", 12)), Some(("sangría", 5.5)), 1),
        ];

        let groups = group_rows(rows);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].table_number, Some(12));
        assert_eq!(groups[0].total_count, 2);
        // Sum of per-line price, quantity deliberately not multiplied in
        assert_eq!(groups[0].payment_due, 15.5);
        assert_eq!(groups[0].order_items[0].food_name.as_deref(), Some("paella"));
        assert_eq!(groups[0].order_items[1].food_name.as_deref(), Some("sangría"));
    }

    #[test]
    fn test_missing_food_counts_zero_but_still_listed() {
        let rows = vec![
            row("order:o1", Some(("dining_table:t1", 12)), Some(("paella", 10.0)), 1),
            row("order:o1", Some(("dining_table:t1", 12)), None, 3),
        ];

        let groups = group_rows(rows);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].total_count, 2);
        assert_eq!(groups[0].payment_due, 10.0);
        assert_eq!(groups[0].order_items[1].food_name, None);
        assert_eq!(groups[0].order_items[1].amount, None);
    }

    #[test]
    fn test_missing_table_groups_separately() {
        let rows = vec![
            row("order:o1", Some(("dining_table:t1", 12)), Some(("paella", 10.0)), 1),
            row("order:o2", None, Some(("sangría", 5.5)), 1),
        ];

        let groups = group_rows(rows);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].table_number, Some(12));
        assert_eq!(groups[1].table_number, None);
    }

    #[test]
    fn test_distinct_orders_never_merge_on_shared_table_number() {
        // Same display number, different order ids
        let rows = vec![
            row("order:o1", Some(("dining_table:t1", 12)), Some(("paella", 10.0)), 1),
            row("order:o2", Some(("dining_table:t1", 12)), Some(("sangría", 5.5)), 1),
        ];

        let groups = group_rows(rows);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_groups_keep_first_appearance_order() {
        let rows = vec![
            row("order:o2", None, Some(("flan", 3.0)), 1),
            row("order:o1", Some(("dining_table:t1", 12)), Some(("paella", 10.0)), 1),
            row("order:o2", None, Some(("café", 1.5)), 2),
        ];

        let groups = group_rows(rows);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].table_number, None);
        assert_eq!(groups[0].total_count, 2);
        assert_eq!(groups[0].payment_due, 4.5);
        assert_eq!(groups[1].table_number, Some(12));
    }

    #[test]
    fn test_projection_drops_everything_but_the_allow_list() {
        let json = serde_json::to_value(row(
            "order:o1",
            Some(("dining_table:t1", 12)),
            Some(("paella", 10.0)),
            2,
        ))
        .expect("serialize failed");

        let keys: Vec<&str> = json
            .as_object()
            .expect("row must serialize as an object")
            .keys()
            .map(String::as_str)
            .collect();
        let mut expected = vec![
            "amount",
            "food_name",
            "food_image",
            "table_number",
            "table_id",
            "order_id",
            "price",
            "quantity",
        ];
        expected.sort_unstable();
        let mut actual = keys;
        actual.sort_unstable();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_group_shape_suppresses_the_key_id() {
        let groups = group_rows(vec![row(
            "order:o1",
            Some(("dining_table:t1", 12)),
            Some(("paella", 10.0)),
            1,
        )]);
        let json = serde_json::to_value(&groups[0]).expect("serialize failed");
        let object = json.as_object().expect("group must serialize as an object");

        assert!(!object.contains_key("id"));
        assert!(!object.contains_key("order_id"));
        assert_eq!(object.len(), 4);
    }
}
