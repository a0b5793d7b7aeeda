//! Order Item Repository

use chrono::Utc;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Food, OrderItem, OrderItemLine, OrderItemUpdate};
use crate::utils::money::round_money;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct OrderItemRepository {
    base: BaseRepository,
}

impl OrderItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all order items
    pub async fn find_all(&self) -> RepoResult<Vec<OrderItem>> {
        let items: Vec<OrderItem> = self
            .base
            .db()
            .query("SELECT * FROM order_item ORDER BY created_at")
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Find order item by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<OrderItem>> {
        let thing = self.base.parse_id(id)?;
        let item: Option<OrderItem> = self.base.db().select(thing).await?;
        Ok(item)
    }

    /// Insert every line of a pack against the given order.
    ///
    /// 每行的 unit_price 入库前四舍五入到 2 位小数。
    pub async fn create_lines(
        &self,
        order: &RecordId,
        lines: Vec<OrderItemLine>,
    ) -> RepoResult<Vec<OrderItem>> {
        let mut created = Vec::with_capacity(lines.len());
        for line in lines {
            self.require_food(&line.food).await?;

            let now = Utc::now();
            let mut result = self
                .base
                .db()
                .query(
                    r#"CREATE order_item SET
                        order = $order,
                        food = $food,
                        quantity = $quantity,
                        unit_price = $unit_price,
                        created_at = $created_at,
                        updated_at = $updated_at
                    RETURN AFTER"#,
                )
                .bind(("order", order.clone()))
                .bind(("food", line.food))
                .bind(("quantity", line.quantity))
                .bind(("unit_price", round_money(line.unit_price)))
                .bind(("created_at", now))
                .bind(("updated_at", now))
                .await?;

            let item: Option<OrderItem> = result.take(0)?;
            created.push(
                item.ok_or_else(|| RepoError::Database("Failed to create order item".to_string()))?,
            );
        }
        Ok(created)
    }

    /// Update an order item (partial; a new food reference must exist)
    pub async fn update(&self, id: &str, data: OrderItemUpdate) -> RepoResult<OrderItem> {
        let thing = self.base.parse_id(id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order item {} not found", id)))?;

        if let Some(ref food_id) = data.food {
            self.require_food(food_id).await?;
        }

        let food = data.food.unwrap_or(existing.food);
        let quantity = data.quantity.unwrap_or(existing.quantity);
        let unit_price = data
            .unit_price
            .map(round_money)
            .unwrap_or(existing.unit_price);

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    food = $food,
                    quantity = $quantity,
                    unit_price = $unit_price,
                    updated_at = $updated_at
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("food", food))
            .bind(("quantity", quantity))
            .bind(("unit_price", unit_price))
            .bind(("updated_at", Utc::now()))
            .await?;

        result
            .take::<Option<OrderItem>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Order item {} not found", id)))
    }

    async fn require_food(&self, food_id: &RecordId) -> RepoResult<()> {
        let food: Option<Food> = self.base.db().select(food_id.clone()).await?;
        if food.is_none() {
            return Err(RepoError::NotFound(format!("Food {} not found", food_id)));
        }
        Ok(())
    }
}
