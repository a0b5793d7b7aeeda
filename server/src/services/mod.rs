//! 服务模块
//!
//! - [`HttpService`] - HTTP 路由组装与服务器

pub mod http;

pub use http::{HttpService, build_app};
