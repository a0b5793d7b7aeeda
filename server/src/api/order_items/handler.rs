//! Order Item API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Order, OrderItem, OrderItemPack, OrderItemUpdate};
use crate::db::repository::{OrderItemRepository, OrderRepository};
use crate::utils::{AppError, AppResult};

/// Result of creating an order-item pack: the carrier order plus its lines
#[derive(Debug, Serialize)]
pub struct OrderItemPackResult {
    pub order: Order,
    pub order_items: Vec<OrderItem>,
}

/// GET /api/order-items - 获取所有订单行
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<OrderItem>>> {
    let repo = OrderItemRepository::new(state.get_db());
    let items = repo.find_all().await?;
    Ok(Json(items))
}

/// GET /api/order-items/:id - 获取单个订单行
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<OrderItem>> {
    let repo = OrderItemRepository::new(state.get_db());
    let item = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order item {} not found", id)))?;
    Ok(Json(item))
}

/// POST /api/order-items - 创建订单行包
///
/// 为整包新建一个订单，再把每一行挂到这个订单下批量插入。
pub async fn create_pack(
    State(state): State<ServerState>,
    Json(payload): Json<OrderItemPack>,
) -> AppResult<Json<OrderItemPackResult>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let db = state.get_db();
    let order_repo = OrderRepository::new(db.clone());
    let item_repo = OrderItemRepository::new(db);

    let order = order_repo.create_for_pack(payload.table).await?;
    let order_id = order
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Order record has no id"))?;

    let order_items = item_repo.create_lines(&order_id, payload.order_items).await?;

    tracing::info!(
        order_id = %order_id,
        line_count = order_items.len(),
        "Order item pack created"
    );

    Ok(Json(OrderItemPackResult { order, order_items }))
}

/// PUT /api/order-items/:id - 更新订单行
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderItemUpdate>,
) -> AppResult<Json<OrderItem>> {
    let repo = OrderItemRepository::new(state.get_db());
    let item = repo.update(&id, payload).await?;
    Ok(Json(item))
}
