//! Invoice Repository

use chrono::{Duration, Utc};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Invoice, InvoiceCreate, InvoiceUpdate, Order, PaymentStatus};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct InvoiceRepository {
    base: BaseRepository,
}

impl InvoiceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all invoices, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Invoice>> {
        let invoices: Vec<Invoice> = self
            .base
            .db()
            .query("SELECT * FROM invoice ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(invoices)
    }

    /// Find invoice by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Invoice>> {
        let thing = self.base.parse_id(id)?;
        let invoice: Option<Invoice> = self.base.db().select(thing).await?;
        Ok(invoice)
    }

    /// Create a new invoice; the referenced order must exist.
    ///
    /// Payment falls due one day after creation.
    pub async fn create(&self, data: InvoiceCreate) -> RepoResult<Invoice> {
        let order: Option<Order> = self.base.db().select(data.order.clone()).await?;
        if order.is_none() {
            return Err(RepoError::NotFound(format!(
                "Order {} not found",
                data.order
            )));
        }

        let now = Utc::now();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE invoice SET
                    order = $order,
                    payment_method = $payment_method,
                    payment_status = $payment_status,
                    payment_due_date = $payment_due_date,
                    created_at = $created_at,
                    updated_at = $updated_at
                RETURN AFTER"#,
            )
            .bind(("order", data.order))
            .bind(("payment_method", data.payment_method))
            .bind((
                "payment_status",
                data.payment_status.unwrap_or(PaymentStatus::Pending),
            ))
            .bind(("payment_due_date", now + Duration::days(1)))
            .bind(("created_at", now))
            .bind(("updated_at", now))
            .await?;

        let created: Option<Invoice> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create invoice".to_string()))
    }

    /// Update an invoice (partial)
    pub async fn update(&self, id: &str, data: InvoiceUpdate) -> RepoResult<Invoice> {
        let thing = self.base.parse_id(id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Invoice {} not found", id)))?;

        let payment_method = data.payment_method.or(existing.payment_method);
        let payment_status = data.payment_status.unwrap_or(existing.payment_status);

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    payment_method = $payment_method,
                    payment_status = $payment_status,
                    updated_at = $updated_at
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("payment_method", payment_method))
            .bind(("payment_status", payment_status))
            .bind(("updated_at", Utc::now()))
            .await?;

        result
            .take::<Option<Invoice>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Invoice {} not found", id)))
    }
}
