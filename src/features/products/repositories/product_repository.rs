use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::database::unique_violation;
use crate::core::error::{AppError, Result};
use crate::features::products::models::{Product, ProductData, ProductWithCategory};
use crate::shared::types::{Page, PageRequest};

/// Persistence for products.
///
/// A write rejected by a unique index fails with `AppError::Conflict` carrying
/// the index name (`products_slug_key` or `products_sku_key`).
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find(&self, id: i64) -> Result<Option<Product>>;

    async fn find_with_category(&self, id: i64) -> Result<Option<ProductWithCategory>>;

    /// Products ordered by id; `search` matches a literal substring of name or SKU
    async fn query(&self, search: Option<&str>, request: PageRequest) -> Result<Page<Product>>;

    /// Insert when `id` is `None`, otherwise overwrite the row (NotFound if gone)
    async fn save(&self, id: Option<i64>, data: &ProductData) -> Result<Product>;

    /// Returns false when no row had this id
    async fn delete(&self, id: i64) -> Result<bool>;

    async fn slug_taken(&self, slug: &str, except: Option<i64>) -> Result<bool>;

    async fn sku_taken(&self, sku: &str, except: Option<i64>) -> Result<bool>;
}

/// Escape `%`, `_` and `\` so `value` matches literally inside a LIKE pattern
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

const PRODUCT_COLUMNS: &str = "id, name, slug, description, sku, price, stock, \
    product_category_id, image, is_active, created_at, updated_at";

pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn write_error(e: sqlx::Error) -> AppError {
        match unique_violation(&e) {
            Some(constraint) => AppError::Conflict(constraint),
            None => {
                tracing::error!("Failed to save product: {:?}", e);
                AppError::Database(e)
            }
        }
    }

    async fn column_taken(
        &self,
        column: &'static str,
        value: &str,
        except: Option<i64>,
    ) -> Result<bool> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM products WHERE {} = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
            column
        );

        sqlx::query_scalar::<_, bool>(&sql)
            .bind(value)
            .bind(except)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to check product {}: {:?}", column, e);
                AppError::Database(e)
            })
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find(&self, id: i64) -> Result<Option<Product>> {
        let sql = format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS);

        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch product {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    async fn find_with_category(&self, id: i64) -> Result<Option<ProductWithCategory>> {
        sqlx::query_as::<_, ProductWithCategory>(
            r#"
            SELECT p.id, p.name, p.slug, p.description, p.sku, p.price, p.stock,
                   p.product_category_id, p.image, p.is_active, p.created_at, p.updated_at,
                   c.name AS category_name
            FROM products p
            LEFT JOIN product_categories c ON c.id = p.product_category_id
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch product {} with category: {:?}", id, e);
            AppError::Database(e)
        })
    }

    async fn query(&self, search: Option<&str>, request: PageRequest) -> Result<Page<Product>> {
        let pattern = search.map(|q| format!("%{}%", escape_like(q)));

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM products
            WHERE ($1::TEXT IS NULL OR (name LIKE $1 ESCAPE '\' OR sku LIKE $1 ESCAPE '\'))
            "#,
        )
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count products: {:?}", e);
            AppError::Database(e)
        })?;

        let sql = format!(
            r#"
            SELECT {}
            FROM products
            WHERE ($1::TEXT IS NULL OR (name LIKE $1 ESCAPE '\' OR sku LIKE $1 ESCAPE '\'))
            ORDER BY id ASC
            LIMIT $2 OFFSET $3
            "#,
            PRODUCT_COLUMNS
        );

        let items = sqlx::query_as::<_, Product>(&sql)
            .bind(pattern.as_deref())
            .bind(request.per_page)
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list products: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(Page::new(items, total, request))
    }

    async fn save(&self, id: Option<i64>, data: &ProductData) -> Result<Product> {
        let Some(id) = id else {
            let sql = format!(
                r#"
                INSERT INTO products
                    (name, slug, description, sku, price, stock, product_category_id, image, is_active)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                RETURNING {}
                "#,
                PRODUCT_COLUMNS
            );

            return sqlx::query_as::<_, Product>(&sql)
                .bind(&data.name)
                .bind(&data.slug)
                .bind(&data.description)
                .bind(&data.sku)
                .bind(data.price)
                .bind(data.stock)
                .bind(data.product_category_id)
                .bind(&data.image)
                .bind(data.is_active)
                .fetch_one(&self.pool)
                .await
                .map_err(Self::write_error);
        };

        let sql = format!(
            r#"
            UPDATE products
            SET name = $2, slug = $3, description = $4, sku = $5, price = $6, stock = $7,
                product_category_id = $8, image = $9, is_active = $10, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        );

        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(&data.name)
            .bind(&data.slug)
            .bind(&data.description)
            .bind(&data.sku)
            .bind(data.price)
            .bind(data.stock)
            .bind(data.product_category_id)
            .bind(&data.image)
            .bind(data.is_active)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::write_error)?
            .ok_or_else(|| AppError::NotFound("Produk tidak ditemukan".to_string()))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete product {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn slug_taken(&self, slug: &str, except: Option<i64>) -> Result<bool> {
        self.column_taken("slug", slug, except).await
    }

    async fn sku_taken(&self, sku: &str, except: Option<i64>) -> Result<bool> {
        self.column_taken("sku", sku, except).await
    }
}
