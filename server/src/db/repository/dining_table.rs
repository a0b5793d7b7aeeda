//! Dining Table Repository

use chrono::Utc;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{DiningTable, DiningTableCreate, DiningTableUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct DiningTableRepository {
    base: BaseRepository,
}

impl DiningTableRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all dining tables
    pub async fn find_all(&self) -> RepoResult<Vec<DiningTable>> {
        let tables: Vec<DiningTable> = self
            .base
            .db()
            .query("SELECT * FROM dining_table ORDER BY table_number")
            .await?
            .take(0)?;
        Ok(tables)
    }

    /// Find table by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<DiningTable>> {
        let thing = self.base.parse_id(id)?;
        let table: Option<DiningTable> = self.base.db().select(thing).await?;
        Ok(table)
    }

    /// Find table by display number
    pub async fn find_by_number(&self, table_number: i64) -> RepoResult<Option<DiningTable>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM dining_table WHERE table_number = $number LIMIT 1")
            .bind(("number", table_number))
            .await?;
        let tables: Vec<DiningTable> = result.take(0)?;
        Ok(tables.into_iter().next())
    }

    /// Create a new dining table
    pub async fn create(&self, data: DiningTableCreate) -> RepoResult<DiningTable> {
        // Check duplicate display number
        if self.find_by_number(data.table_number).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Table number {} already exists",
                data.table_number
            )));
        }

        let now = Utc::now();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE dining_table SET
                    table_number = $table_number,
                    number_of_guests = $number_of_guests,
                    created_at = $created_at,
                    updated_at = $updated_at
                RETURN AFTER"#,
            )
            .bind(("table_number", data.table_number))
            .bind(("number_of_guests", data.number_of_guests))
            .bind(("created_at", now))
            .bind(("updated_at", now))
            .await?;

        let created: Option<DiningTable> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create dining table".to_string()))
    }

    /// Update a dining table (partial)
    pub async fn update(&self, id: &str, data: DiningTableUpdate) -> RepoResult<DiningTable> {
        let thing = self.base.parse_id(id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Dining table {} not found", id)))?;

        // Check duplicate display number if changing
        if let Some(new_number) = data.table_number
            && new_number != existing.table_number
            && self.find_by_number(new_number).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Table number {} already exists",
                new_number
            )));
        }

        let table_number = data.table_number.unwrap_or(existing.table_number);
        let number_of_guests = data.number_of_guests.unwrap_or(existing.number_of_guests);

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    table_number = $table_number,
                    number_of_guests = $number_of_guests,
                    updated_at = $updated_at
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("table_number", table_number))
            .bind(("number_of_guests", number_of_guests))
            .bind(("updated_at", Utc::now()))
            .await?;

        result
            .take::<Option<DiningTable>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Dining table {} not found", id)))
    }
}
