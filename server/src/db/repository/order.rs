//! Order Repository

use chrono::{DateTime, Utc};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{DiningTable, Order, OrderCreate, OrderUpdate};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all orders, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY order_date DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing = self.base.parse_id(id)?;
        let order: Option<Order> = self.base.db().select(thing).await?;
        Ok(order)
    }

    /// Create a new order; the table reference, if present, must exist
    pub async fn create(&self, data: OrderCreate) -> RepoResult<Order> {
        if let Some(ref table_id) = data.table {
            self.require_table(table_id).await?;
        }
        self.insert(data.order_date, data.table).await
    }

    /// Create the carrier order for an order-item pack (dated now)
    pub async fn create_for_pack(&self, table: Option<RecordId>) -> RepoResult<Order> {
        if let Some(ref table_id) = table {
            self.require_table(table_id).await?;
        }
        self.insert(Utc::now(), table).await
    }

    /// Update an order (partial; a new table reference must exist)
    pub async fn update(&self, id: &str, data: OrderUpdate) -> RepoResult<Order> {
        let thing = self.base.parse_id(id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;

        if let Some(ref table_id) = data.table {
            self.require_table(table_id).await?;
        }

        let order_date = data.order_date.unwrap_or(existing.order_date);
        let table = data.table.or(existing.table);

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    order_date = $order_date,
                    table = $table,
                    updated_at = $updated_at
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("order_date", order_date))
            .bind(("table", table))
            .bind(("updated_at", Utc::now()))
            .await?;

        result
            .take::<Option<Order>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    async fn require_table(&self, table_id: &RecordId) -> RepoResult<()> {
        let table: Option<DiningTable> = self.base.db().select(table_id.clone()).await?;
        if table.is_none() {
            return Err(RepoError::NotFound(format!("Table {} not found", table_id)));
        }
        Ok(())
    }

    async fn insert(
        &self,
        order_date: DateTime<Utc>,
        table: Option<RecordId>,
    ) -> RepoResult<Order> {
        let now = Utc::now();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE order SET
                    order_date = $order_date,
                    table = $table,
                    created_at = $created_at,
                    updated_at = $updated_at
                RETURN AFTER"#,
            )
            .bind(("order_date", order_date))
            .bind(("table", table))
            .bind(("created_at", now))
            .bind(("updated_at", now))
            .await?;

        let created: Option<Order> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }
}
