//! 认证模块 - JWT 认证体系
//!
//! - [`JwtService`] - 令牌签发与验证
//! - [`require_auth`] - 路由级认证中间件
//! - [`CurrentUser`] - 请求内的已认证用户

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;
