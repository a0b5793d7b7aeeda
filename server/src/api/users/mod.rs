//! User API 模块

mod handler;

pub use handler::{AuthResponse, PageQuery, UserInfo};

use axum::{Router, routing::{get, post}};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/users", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        // 公开接口 (认证中间件按路径跳过)
        .route("/signup", post(handler::signup))
        .route("/login", post(handler::login))
}
