use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::products::models::Product;
use crate::shared::types::{Page, PageRequest};

/// Query of the dashboard product list. Both values are taken leniently.
#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    pub q: Option<String>,
    pub page: Option<String>,
}

impl ProductListQuery {
    /// Trimmed search term; `None` when blank
    pub fn search(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    /// Requested page; anything unparsable or below 1 is page 1
    pub fn page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1)
    }
}

/// Search filter of the JSON product list
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ProductSearchQuery {
    /// Substring of the product name or SKU
    pub q: Option<String>,
}

impl ProductSearchQuery {
    pub fn search(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

/// Response DTO for product
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductResponseDto {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub sku: String,
    pub price: Decimal,
    pub stock: i32,
    pub product_category_id: Option<i64>,
    /// Stored value: a storage path or an absolute URL
    pub image: Option<String>,
    /// Public URL of the image
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductResponseDto {
    pub fn new(p: Product, image_url: Option<String>) -> Self {
        Self {
            id: p.id,
            name: p.name,
            slug: p.slug,
            description: p.description,
            sku: p.sku,
            price: p.price,
            stock: p.stock,
            product_category_id: p.product_category_id,
            image: p.image,
            image_url,
            is_active: p.is_active,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Product with its category name
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductDetailDto {
    #[serde(flatten)]
    pub product: ProductResponseDto,
    pub category_name: Option<String>,
}

/// Pagination block of the list view
#[derive(Debug, Clone, Serialize)]
pub struct PaginationView {
    pub page: i64,
    pub last_page: i64,
    pub total: i64,
    /// 1-based position of the first item on this page (0 when empty)
    pub from: i64,
    pub to: i64,
    pub previous_url: Option<String>,
    pub next_url: Option<String>,
}

impl PaginationView {
    pub fn new<T>(page: &Page<T>, base_path: &str, search: Option<&str>) -> Self {
        let link = |target: i64| match search {
            Some(q) => format!(
                "{}?q={}&page={}",
                base_path,
                urlencoding::encode(q),
                target
            ),
            None => format!("{}?page={}", base_path, target),
        };

        let count = page.items.len() as i64;
        let from = if count == 0 {
            0
        } else {
            PageRequest::new(page.page, page.per_page)
                .offset()
                .saturating_add(1)
        };

        Self {
            page: page.page,
            last_page: page.last_page(),
            total: page.total,
            from,
            to: if count == 0 { 0 } else { from.saturating_add(count - 1) },
            previous_url: page.has_previous().then(|| link(page.page - 1)),
            next_url: page.has_next().then(|| link(page.page + 1)),
        }
    }
}
