//! Menu Repository

use chrono::Utc;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Menu, MenuCreate, MenuUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct MenuRepository {
    base: BaseRepository,
}

impl MenuRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all menus
    pub async fn find_all(&self) -> RepoResult<Vec<Menu>> {
        let menus: Vec<Menu> = self
            .base
            .db()
            .query("SELECT * FROM menu ORDER BY name")
            .await?
            .take(0)?;
        Ok(menus)
    }

    /// Find menu by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Menu>> {
        let thing = self.base.parse_id(id)?;
        let menu: Option<Menu> = self.base.db().select(thing).await?;
        Ok(menu)
    }

    /// Create a new menu
    pub async fn create(&self, data: MenuCreate) -> RepoResult<Menu> {
        let now = Utc::now();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE menu SET
                    name = $name,
                    category = $category,
                    start_date = $start_date,
                    end_date = $end_date,
                    created_at = $created_at,
                    updated_at = $updated_at
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("category", data.category))
            .bind(("start_date", data.start_date))
            .bind(("end_date", data.end_date))
            .bind(("created_at", now))
            .bind(("updated_at", now))
            .await?;

        let created: Option<Menu> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create menu".to_string()))
    }

    /// Update a menu (partial; absent fields keep their value)
    pub async fn update(&self, id: &str, data: MenuUpdate) -> RepoResult<Menu> {
        let thing = self.base.parse_id(id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu {} not found", id)))?;

        let name = data.name.unwrap_or(existing.name);
        let category = data.category.unwrap_or(existing.category);
        let start_date = data.start_date.or(existing.start_date);
        let end_date = data.end_date.or(existing.end_date);

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    name = $name,
                    category = $category,
                    start_date = $start_date,
                    end_date = $end_date,
                    updated_at = $updated_at
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("name", name))
            .bind(("category", category))
            .bind(("start_date", start_date))
            .bind(("end_date", end_date))
            .bind(("updated_at", Utc::now()))
            .await?;

        result
            .take::<Option<Menu>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Menu {} not found", id)))
    }
}
