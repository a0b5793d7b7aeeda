//! Invoice API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Invoice, InvoiceCreate, InvoiceUpdate, PaymentStatus};
use crate::db::repository::InvoiceRepository;
use crate::utils::{AppError, AppResult};
use crate::views::OrderViewRow;

/// Accepted payment methods
const PAYMENT_METHODS: [&str; 2] = ["CARD", "CASH"];

fn validate_payment_method(method: &Option<String>) -> AppResult<()> {
    if let Some(m) = method
        && !PAYMENT_METHODS.contains(&m.as_str())
    {
        return Err(AppError::validation(format!(
            "payment_method must be one of {:?}",
            PAYMENT_METHODS
        )));
    }
    Ok(())
}

/// Billing view of one invoice: header fields plus the composed order view
/// of its order.
#[derive(Debug, Serialize)]
pub struct InvoiceView {
    pub invoice_id: String,
    pub order_id: String,
    pub payment_method: Option<String>,
    pub payment_status: PaymentStatus,
    pub payment_due: f64,
    pub payment_due_date: DateTime<Utc>,
    pub table_number: Option<i64>,
    pub order_details: Vec<OrderViewRow>,
}

/// GET /api/invoices - 获取所有账单
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Invoice>>> {
    let repo = InvoiceRepository::new(state.get_db());
    let invoices = repo.find_all().await?;
    Ok(Json(invoices))
}

/// GET /api/invoices/:id - 账单视图
///
/// 组装账单头 + 订单视图第一组。订单没有任何订单行时返回 404，
/// 绝不允许按下标取空结果。
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<InvoiceView>> {
    let repo = InvoiceRepository::new(state.get_db());
    let invoice = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Invoice {} not found", id)))?;

    let order_id = invoice.order.to_string();
    let groups = state.order_views.compose(&order_id).await?;
    let group = groups.into_iter().next().ok_or_else(|| {
        AppError::not_found(format!("No order items found for order {}", order_id))
    })?;

    let view = InvoiceView {
        invoice_id: invoice.id.map(|t| t.to_string()).unwrap_or_default(),
        order_id,
        payment_method: invoice.payment_method,
        payment_status: invoice.payment_status,
        payment_due: group.payment_due,
        payment_due_date: invoice.payment_due_date,
        table_number: group.table_number,
        order_details: group.order_items,
    };

    Ok(Json(view))
}

/// POST /api/invoices - 创建账单 (订单引用必须存在)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<InvoiceCreate>,
) -> AppResult<Json<Invoice>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    validate_payment_method(&payload.payment_method)?;

    let repo = InvoiceRepository::new(state.get_db());
    let invoice = repo.create(payload).await?;
    Ok(Json(invoice))
}

/// PUT /api/invoices/:id - 更新账单
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<InvoiceUpdate>,
) -> AppResult<Json<Invoice>> {
    validate_payment_method(&payload.payment_method)?;

    let repo = InvoiceRepository::new(state.get_db());
    let invoice = repo.update(&id, payload).await?;
    Ok(Json(invoice))
}
