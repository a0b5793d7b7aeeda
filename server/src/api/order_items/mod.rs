//! Order Item API 模块

mod handler;

pub use handler::OrderItemPackResult;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/order-items", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create_pack))
        .route("/{id}", get(handler::get_by_id).put(handler::update))
}
