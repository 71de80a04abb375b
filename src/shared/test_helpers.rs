//! In-memory repositories and storage for driving the real router in tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum_test::TestServer;
use chrono::Utc;
use fake::faker::lorem::en::Word;
use fake::Fake;
use rust_decimal::Decimal;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::Category;
use crate::features::categories::{routes as categories_routes, CategoryRepository, CategoryService};
use crate::features::products::models::{Product, ProductData, ProductWithCategory};
use crate::features::products::{routes as products_routes, ProductRepository, ProductService};
use crate::modules::storage::BlobStorage;
use crate::shared::flash::FlashStore;
use crate::shared::types::{Page, PageRequest};

// =============================================================================
// CATEGORIES
// =============================================================================

pub struct MemoryCategories {
    rows: Mutex<Vec<Category>>,
}

impl MemoryCategories {
    pub fn with_names(names: &[&str]) -> Self {
        let now = Utc::now();
        let rows = names
            .iter()
            .enumerate()
            .map(|(i, name)| Category {
                id: i as i64 + 1,
                name: name.to_string(),
                created_at: now,
                updated_at: now,
            })
            .collect();

        Self {
            rows: Mutex::new(rows),
        }
    }

    fn name_of(&self, id: i64) -> Option<String> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.clone())
    }
}

#[async_trait]
impl CategoryRepository for MemoryCategories {
    async fn all(&self) -> Result<Vec<Category>> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn exists(&self, id: i64) -> Result<bool> {
        Ok(self.rows.lock().unwrap().iter().any(|c| c.id == id))
    }
}

// =============================================================================
// PRODUCTS
// =============================================================================

/// Products kept in a vector; unique slug/sku are enforced like the real indexes
pub struct MemoryProducts {
    rows: Mutex<Vec<Product>>,
    next_id: AtomicI64,
    writes: AtomicUsize,
    categories: Arc<MemoryCategories>,
}

impl MemoryProducts {
    pub fn new(categories: Arc<MemoryCategories>) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            writes: AtomicUsize::new(0),
            categories,
        }
    }

    /// Insert directly, bypassing the write counter
    pub fn seed(&self, data: ProductData) -> Product {
        let product = self.build(self.next_id.fetch_add(1, Ordering::SeqCst), data);
        self.rows.lock().unwrap().push(product.clone());
        product
    }

    /// Number of `save` and `delete` calls that changed something
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn all(&self) -> Vec<Product> {
        self.rows.lock().unwrap().clone()
    }

    pub fn by_slug(&self, slug: &str) -> Option<Product> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.slug == slug)
            .cloned()
    }

    fn build(&self, id: i64, data: ProductData) -> Product {
        let now = Utc::now();
        Product {
            id,
            name: data.name,
            slug: data.slug,
            description: data.description,
            sku: data.sku,
            price: data.price.round_dp(2),
            stock: data.stock,
            product_category_id: data.product_category_id,
            image: data.image,
            is_active: data.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

#[async_trait]
impl ProductRepository for MemoryProducts {
    async fn find(&self, id: i64) -> Result<Option<Product>> {
        Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn find_with_category(&self, id: i64) -> Result<Option<ProductWithCategory>> {
        let Some(product) = self.find(id).await? else {
            return Ok(None);
        };
        let category_name = product
            .product_category_id
            .and_then(|category_id| self.categories.name_of(category_id));

        Ok(Some(ProductWithCategory {
            product,
            category_name,
        }))
    }

    async fn query(&self, search: Option<&str>, request: PageRequest) -> Result<Page<Product>> {
        let mut matched: Vec<Product> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| search.is_none_or(|q| p.name.contains(q) || p.sku.contains(q)))
            .cloned()
            .collect();
        matched.sort_by_key(|p| p.id);

        let total = matched.len() as i64;
        let items = matched
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.per_page as usize)
            .collect();

        Ok(Page::new(items, total, request))
    }

    async fn save(&self, id: Option<i64>, data: &ProductData) -> Result<Product> {
        let mut rows = self.rows.lock().unwrap();
        let others = rows.iter().filter(|p| Some(p.id) != id);
        for other in others {
            if other.slug == data.slug {
                return Err(AppError::Conflict("products_slug_key".to_string()));
            }
            if other.sku == data.sku {
                return Err(AppError::Conflict("products_sku_key".to_string()));
            }
        }

        let product = match id {
            None => {
                let product = self.build(self.next_id.fetch_add(1, Ordering::SeqCst), data.clone());
                rows.push(product.clone());
                product
            }
            Some(id) => {
                let row = rows
                    .iter_mut()
                    .find(|p| p.id == id)
                    .ok_or_else(|| AppError::NotFound("Produk tidak ditemukan".to_string()))?;
                let created_at = row.created_at;
                *row = Product {
                    created_at,
                    ..self.build(id, data.clone())
                };
                row.clone()
            }
        };

        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(product)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| p.id != id);

        let deleted = rows.len() < before;
        if deleted {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(deleted)
    }

    async fn slug_taken(&self, slug: &str, except: Option<i64>) -> Result<bool> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|p| p.slug == slug && Some(p.id) != except))
    }

    async fn sku_taken(&self, sku: &str, except: Option<i64>) -> Result<bool> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|p| p.sku == sku && Some(p.id) != except))
    }
}

// =============================================================================
// STORAGE
// =============================================================================

#[derive(Default)]
pub struct MemoryStorage {
    files: Mutex<HashMap<String, (Vec<u8>, String)>>,
}

impl MemoryStorage {
    pub fn paths(&self) -> Vec<String> {
        self.files.lock().unwrap().keys().cloned().collect()
    }

    pub fn content_type(&self, path: &str) -> Option<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .map(|(_, content_type)| content_type.clone())
    }
}

#[async_trait]
impl BlobStorage for MemoryStorage {
    async fn put(&self, path: &str, data: Vec<u8>, content_type: &str) -> Result<String> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), (data, content_type.to_string()));
        Ok(path.to_string())
    }

    fn url(&self, stored_path: &str) -> String {
        format!("/storage/{}", stored_path)
    }
}

// =============================================================================
// FIXTURES
// =============================================================================

/// Valid product data with a random name
pub fn product_data(slug: &str, sku: &str) -> ProductData {
    let word: String = Word().fake();

    ProductData {
        name: format!("{} {}", word, slug),
        slug: slug.to_string(),
        description: None,
        sku: sku.to_string(),
        price: Decimal::new(999, 2),
        stock: 5,
        product_category_id: None,
        image: None,
        is_active: true,
    }
}

pub struct TestCatalog {
    pub products: Arc<MemoryProducts>,
    pub categories: Arc<MemoryCategories>,
    pub storage: Arc<MemoryStorage>,
    pub service: Arc<ProductService>,
}

impl TestCatalog {
    /// Empty catalog with the categories "Elektronik" (id 1) and "Pakaian" (id 2)
    pub fn new() -> Self {
        let categories = Arc::new(MemoryCategories::with_names(&["Elektronik", "Pakaian"]));
        let products = Arc::new(MemoryProducts::new(categories.clone()));
        let storage = Arc::new(MemoryStorage::default());
        let service = Arc::new(ProductService::new(
            products.clone(),
            categories.clone(),
            storage.clone(),
        ));

        Self {
            products,
            categories,
            storage,
            service,
        }
    }

    /// Dashboard pages plus the JSON API, wired the way `main` wires them
    pub fn router(&self) -> Router {
        let flash_store = Arc::new(FlashStore::new(Duration::from_secs(60)));
        let category_service = Arc::new(CategoryService::new(self.categories.clone()));

        Router::new()
            .merge(products_routes::dashboard_routes(
                self.service.clone(),
                flash_store,
            ))
            .merge(products_routes::api_routes(self.service.clone()))
            .merge(categories_routes::routes(category_service))
    }

    /// Test server that keeps the session cookie between requests
    pub fn server(&self) -> TestServer {
        TestServer::builder()
            .save_cookies()
            .build(self.router())
            .unwrap()
    }
}
