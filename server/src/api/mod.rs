//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`users`] - 账号注册/登录与查询
//! - [`menus`] - 菜单管理接口
//! - [`foods`] - 菜品管理接口
//! - [`tables`] - 桌台管理接口
//! - [`orders`] - 订单管理接口 (含订单视图)
//! - [`order_items`] - 订单行管理接口
//! - [`invoices`] - 账单管理接口 (含账单视图)

pub mod health;
pub mod users;

// Data models API
pub mod foods;
pub mod invoices;
pub mod menus;
pub mod order_items;
pub mod orders;
pub mod tables;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
