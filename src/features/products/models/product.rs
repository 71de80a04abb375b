use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// Row of `products`
#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub sku: String,
    pub price: Decimal,
    pub stock: i32,
    pub product_category_id: Option<i64>,
    /// Storage path of an uploaded file, or an absolute URL
    pub image: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable columns of a product
#[derive(Debug, Clone, PartialEq)]
pub struct ProductData {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub sku: String,
    pub price: Decimal,
    pub stock: i32,
    pub product_category_id: Option<i64>,
    pub image: Option<String>,
    pub is_active: bool,
}

impl From<Product> for ProductData {
    fn from(p: Product) -> Self {
        Self {
            name: p.name,
            slug: p.slug,
            description: p.description,
            sku: p.sku,
            price: p.price,
            stock: p.stock,
            product_category_id: p.product_category_id,
            image: p.image,
            is_active: p.is_active,
        }
    }
}

/// Product joined with the name of its category
#[derive(Debug, Clone, FromRow)]
pub struct ProductWithCategory {
    #[sqlx(flatten)]
    pub product: Product,
    pub category_name: Option<String>,
}
