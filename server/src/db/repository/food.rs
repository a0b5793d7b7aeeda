//! Food Repository

use chrono::Utc;

use super::{BaseRepository, Page, RepoError, RepoResult};
use crate::db::models::{Food, FoodCreate, FoodUpdate, Menu};
use crate::utils::money::round_money;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct FoodRepository {
    base: BaseRepository,
}

impl FoodRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find one page of foods with the unpaginated total
    pub async fn find_page(&self, page: u64, per_page: u64) -> RepoResult<Page<Food>> {
        let start = (page - 1) * per_page;
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM food GROUP ALL")
            .query("SELECT * FROM food ORDER BY name LIMIT $limit START $start")
            .bind(("limit", per_page))
            .bind(("start", start))
            .await?;

        #[derive(serde::Deserialize)]
        struct Count {
            count: u64,
        }
        let total: Option<Count> = result.take(0)?;
        let items: Vec<Food> = result.take(1)?;

        Ok(Page {
            total_count: total.map(|c| c.count).unwrap_or(0),
            items,
        })
    }

    /// Find food by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Food>> {
        let thing = self.base.parse_id(id)?;
        let food: Option<Food> = self.base.db().select(thing).await?;
        Ok(food)
    }

    /// Create a new food; the referenced menu must exist
    pub async fn create(&self, data: FoodCreate) -> RepoResult<Food> {
        let menu: Option<Menu> = self.base.db().select(data.menu.clone()).await?;
        if menu.is_none() {
            return Err(RepoError::NotFound(format!(
                "Menu {} not found",
                data.menu
            )));
        }

        let now = Utc::now();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE food SET
                    name = $name,
                    price = $price,
                    food_image = $food_image,
                    menu = $menu,
                    created_at = $created_at,
                    updated_at = $updated_at
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("price", round_money(data.price)))
            .bind(("food_image", data.food_image))
            .bind(("menu", data.menu))
            .bind(("created_at", now))
            .bind(("updated_at", now))
            .await?;

        let created: Option<Food> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create food".to_string()))
    }

    /// Update a food (partial; a new menu reference must exist)
    pub async fn update(&self, id: &str, data: FoodUpdate) -> RepoResult<Food> {
        let thing = self.base.parse_id(id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Food {} not found", id)))?;

        if let Some(ref menu_id) = data.menu {
            let menu: Option<Menu> = self.base.db().select(menu_id.clone()).await?;
            if menu.is_none() {
                return Err(RepoError::NotFound(format!("Menu {} not found", menu_id)));
            }
        }

        let name = data.name.unwrap_or(existing.name);
        let price = data.price.map(round_money).unwrap_or(existing.price);
        let food_image = data.food_image.unwrap_or(existing.food_image);
        let menu = data.menu.unwrap_or(existing.menu);

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    name = $name,
                    price = $price,
                    food_image = $food_image,
                    menu = $menu,
                    updated_at = $updated_at
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("name", name))
            .bind(("price", price))
            .bind(("food_image", food_image))
            .bind(("menu", menu))
            .bind(("updated_at", Utc::now()))
            .await?;

        result
            .take::<Option<Food>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Food {} not found", id)))
    }
}
