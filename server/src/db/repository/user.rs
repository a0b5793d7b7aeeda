//! User Repository

use chrono::Utc;

use super::{BaseRepository, Page, RepoError, RepoResult};
use crate::db::models::{User, UserSignup};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find one page of users with the unpaginated total
    pub async fn find_page(&self, page: u64, per_page: u64) -> RepoResult<Page<User>> {
        let start = (page - 1) * per_page;
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM user GROUP ALL")
            .query("SELECT * FROM user ORDER BY email LIMIT $limit START $start")
            .bind(("limit", per_page))
            .bind(("start", start))
            .await?;

        #[derive(serde::Deserialize)]
        struct Count {
            count: u64,
        }
        let total: Option<Count> = result.take(0)?;
        let items: Vec<User> = result.take(1)?;

        Ok(Page {
            total_count: total.map(|c| c.count).unwrap_or(0),
            items,
        })
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let thing = self.base.parse_id(id)?;
        let user: Option<User> = self.base.db().select(thing).await?;
        Ok(user)
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email_owned = email.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email_owned))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Find user by phone
    pub async fn find_by_phone(&self, phone: &str) -> RepoResult<Option<User>> {
        let phone_owned = phone.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE phone = $phone LIMIT 1")
            .bind(("phone", phone_owned))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new user account
    ///
    /// 邮箱和手机号必须唯一；密码以 argon2 哈希入库。
    pub async fn create(&self, data: UserSignup) -> RepoResult<User> {
        if self.find_by_email(&data.email).await?.is_some()
            || self.find_by_phone(&data.phone).await?.is_some()
        {
            return Err(RepoError::Duplicate(
                "This email or phone number already exists".to_string(),
            ));
        }

        let hash_pass = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let now = Utc::now();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE user SET
                    first_name = $first_name,
                    last_name = $last_name,
                    email = $email,
                    phone = $phone,
                    hash_pass = $hash_pass,
                    refresh_token = NONE,
                    created_at = $created_at,
                    updated_at = $updated_at
                RETURN AFTER"#,
            )
            .bind(("first_name", data.first_name))
            .bind(("last_name", data.last_name))
            .bind(("email", data.email))
            .bind(("phone", data.phone))
            .bind(("hash_pass", hash_pass))
            .bind(("created_at", now))
            .bind(("updated_at", now))
            .await?;

        let created: Option<User> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Replace the stored refresh token after a successful login/signup
    pub async fn set_refresh_token(
        &self,
        user_id: &RecordId,
        refresh_token: &str,
    ) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET refresh_token = $refresh_token, updated_at = $updated_at")
            .bind(("thing", user_id.clone()))
            .bind(("refresh_token", refresh_token.to_string()))
            .bind(("updated_at", Utc::now()))
            .await?
            .check()?;
        Ok(())
    }
}
