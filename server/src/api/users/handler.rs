//! User API Handlers
//!
//! Handles signup, login, and account queries

use std::time::Duration;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{User, UserLogin, UserSignup};
use crate::db::repository::{Page, UserRepository};
use crate::utils::{AppError, AppResult};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Public view of a user account (no credential material)
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id.map(|t| t.to_string()).unwrap_or_default(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone: user.phone,
            created_at: user.created_at,
        }
    }
}

/// Token pair + account returned by signup and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub refresh_token: String,
    pub user: UserInfo,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl PageQuery {
    /// 页码从 1 开始；每页默认 10，上限 100
    pub fn resolve(&self) -> (u64, u64) {
        let page = self.page.filter(|p| *p >= 1).unwrap_or(1);
        let per_page = self
            .per_page
            .filter(|p| *p >= 1)
            .unwrap_or(10)
            .min(100);
        (page, per_page)
    }
}

/// GET /api/users - 分页获取账号列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<UserInfo>>> {
    let (page, per_page) = query.resolve();
    let repo = UserRepository::new(state.get_db());
    let users = repo.find_page(page, per_page).await?;

    Ok(Json(Page {
        total_count: users.total_count,
        items: users.items.into_iter().map(UserInfo::from).collect(),
    }))
}

/// GET /api/users/:id - 获取单个账号
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserInfo>> {
    let repo = UserRepository::new(state.get_db());
    let user = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", id)))?;
    Ok(Json(UserInfo::from(user)))
}

/// POST /api/users/signup - 注册并签发令牌
pub async fn signup(
    State(state): State<ServerState>,
    Json(payload): Json<UserSignup>,
) -> AppResult<Json<AuthResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = UserRepository::new(state.get_db());
    let user = repo.create(payload).await?;

    let response = issue_tokens(&state, &repo, user).await?;

    tracing::info!(
        user_id = %response.user.id,
        email = %response.user.email,
        "User signed up"
    );

    Ok(Json(response))
}

/// POST /api/users/login - 验证凭据并签发令牌
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<UserLogin>,
) -> AppResult<Json<AuthResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = UserRepository::new(state.get_db());
    let user = repo.find_by_email(&payload.email).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent email enumeration
    let user = match user {
        Some(u) => {
            let password_valid = u
                .verify_password(&payload.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

            if !password_valid {
                tracing::warn!(email = %payload.email, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            u
        }
        None => {
            tracing::warn!(email = %payload.email, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let response = issue_tokens(&state, &repo, user).await?;

    tracing::info!(
        user_id = %response.user.id,
        email = %response.user.email,
        "User logged in successfully"
    );

    Ok(Json(response))
}

/// 签发访问/刷新令牌并把刷新令牌写回账号记录
async fn issue_tokens(
    state: &ServerState,
    repo: &UserRepository,
    user: User,
) -> AppResult<AuthResponse> {
    let user_id = user
        .id
        .clone()
        .ok_or_else(|| AppError::internal("User record has no id"))?;

    let jwt_service = state.get_jwt_service();
    let (token, refresh_token) = jwt_service
        .generate_token_pair(
            &user_id.to_string(),
            &user.email,
            &user.first_name,
            &user.last_name,
        )
        .map_err(|e| AppError::internal(format!("Failed to generate tokens: {}", e)))?;

    repo.set_refresh_token(&user_id, &refresh_token).await?;

    Ok(AuthResponse {
        token,
        refresh_token,
        user: UserInfo::from(user),
    })
}
