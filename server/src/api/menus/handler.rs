//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Menu, MenuCreate, MenuUpdate};
use crate::db::repository::MenuRepository;
use crate::utils::validation::{MAX_NAME_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult};

/// GET /api/menus - 获取所有菜单
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Menu>>> {
    let repo = MenuRepository::new(state.get_db());
    let menus = repo.find_all().await?;
    Ok(Json(menus))
}

/// GET /api/menus/:id - 获取单个菜单
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Menu>> {
    let repo = MenuRepository::new(state.get_db());
    let menu = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu {} not found", id)))?;
    Ok(Json(menu))
}

/// POST /api/menus - 创建菜单
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MenuCreate>,
) -> AppResult<Json<Menu>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = MenuRepository::new(state.get_db());
    let menu = repo.create(payload).await?;
    Ok(Json(menu))
}

/// PUT /api/menus/:id - 更新菜单
///
/// 同时提供 start_date 和 end_date 时校验时间窗有效。
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<MenuUpdate>,
) -> AppResult<Json<Menu>> {
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.category, "category", MAX_NAME_LEN)?;
    if !payload.window_is_valid(Utc::now()) {
        return Err(AppError::validation(
            "Menu availability window is invalid (start must precede end, and the window must not be entirely in the past)",
        ));
    }

    let repo = MenuRepository::new(state.get_db());
    let menu = repo.update(&id, payload).await?;
    Ok(Json(menu))
}
