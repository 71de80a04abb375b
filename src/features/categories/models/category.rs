use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Row of `product_categories`
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
