//! Food Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Food ID type
pub type FoodId = RecordId;

/// Food entity (菜品)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Food {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<FoodId>,
    pub name: String,
    /// Per-unit amount used for billing, rounded to 2 decimals
    pub price: f64,
    pub food_image: String,
    /// Menu reference
    #[serde(with = "serde_helpers::record_id")]
    pub menu: RecordId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create food payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FoodCreate {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(length(max = 2048))]
    pub food_image: String,
    #[serde(with = "serde_helpers::record_id")]
    pub menu: RecordId,
}

/// Update food payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_image: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub menu: Option<RecordId>,
}
