//! Food API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use validator::Validate;

use crate::api::users::PageQuery;
use crate::core::ServerState;
use crate::db::models::{Food, FoodCreate, FoodUpdate};
use crate::db::repository::{FoodRepository, Page};
use crate::utils::validation::{MAX_NAME_LEN, MAX_URL_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult};

/// GET /api/foods - 分页获取菜品列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<Food>>> {
    let (page, per_page) = query.resolve();
    let repo = FoodRepository::new(state.get_db());
    let foods = repo.find_page(page, per_page).await?;
    Ok(Json(foods))
}

/// GET /api/foods/:id - 获取单个菜品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Food>> {
    let repo = FoodRepository::new(state.get_db());
    let food = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Food {} not found", id)))?;
    Ok(Json(food))
}

/// POST /api/foods - 创建菜品 (菜单引用必须存在)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<FoodCreate>,
) -> AppResult<Json<Food>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = FoodRepository::new(state.get_db());
    let food = repo.create(payload).await?;
    Ok(Json(food))
}

/// PUT /api/foods/:id - 更新菜品
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<FoodUpdate>,
) -> AppResult<Json<Food>> {
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.food_image, "food_image", MAX_URL_LEN)?;
    if let Some(price) = payload.price
        && price < 0.0
    {
        return Err(AppError::validation("price must be non-negative"));
    }

    let repo = FoodRepository::new(state.get_db());
    let food = repo.update(&id, payload).await?;
    Ok(Json(food))
}
