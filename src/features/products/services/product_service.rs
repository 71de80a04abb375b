use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::Category;
use crate::features::categories::CategoryRepository;
use crate::features::products::dtos::{
    ProductDetailDto, ProductInput, ProductResponseDto, UploadedImage,
};
use crate::features::products::models::{Product, ProductData};
use crate::features::products::repositories::ProductRepository;
use crate::modules::storage::BlobStorage;
use crate::shared::constants::{
    ALLOWED_IMAGE_TYPES, MAX_IMAGE_SIZE, MAX_PRICE_CENTS, PRODUCT_IMAGE_DIR,
};
use crate::shared::types::{Page, PageRequest};
use crate::shared::validation::{
    parse_decimal, parse_integer, parse_permissive_bool, parse_strict_bool, sanitize_filename,
    FieldErrors, FormValidator,
};

const SLUG_TAKEN: &str = "Slug sudah digunakan.";
const SKU_TAKEN: &str = "SKU sudah digunakan.";

/// Result of a create or update submission
#[derive(Debug)]
pub enum SubmitOutcome {
    Saved(Product),
    /// Nothing was written
    Rejected(FieldErrors),
}

/// Repository lookups the rule set depends on
struct Lookups {
    slug_taken: bool,
    sku_taken: bool,
    category_exists: bool,
}

pub struct ProductService {
    products: Arc<dyn ProductRepository>,
    categories: Arc<dyn CategoryRepository>,
    storage: Arc<dyn BlobStorage>,
}

impl ProductService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        categories: Arc<dyn CategoryRepository>,
        storage: Arc<dyn BlobStorage>,
    ) -> Self {
        Self {
            products,
            categories,
            storage,
        }
    }

    /// One page of products, optionally filtered by a name/SKU substring
    pub async fn list(
        &self,
        search: Option<&str>,
        request: PageRequest,
    ) -> Result<Page<ProductResponseDto>> {
        let page = self.products.query(search, request).await?;
        Ok(page.map(|p| self.to_dto(p)))
    }

    pub async fn categories(&self) -> Result<Vec<Category>> {
        self.categories.all().await
    }

    /// Product with its category name
    pub async fn get(&self, id: i64) -> Result<ProductDetailDto> {
        let found = self
            .products
            .find_with_category(id)
            .await?
            .ok_or_else(not_found)?;

        Ok(ProductDetailDto {
            product: self.to_dto(found.product),
            category_name: found.category_name,
        })
    }

    /// Validate and store a new product, uploading its image if one was sent
    pub async fn create(&self, input: &ProductInput) -> Result<SubmitOutcome> {
        let lookups = self.lookups(input, None).await?;
        let image = input.image.as_ref();

        let validation = product_rules(input, &lookups)
            .field("is_active", input.text("is_active"))
            .boolean("Status aktif harus bernilai true atau false.")
            .field("image", image.map(|i| i.content_type.as_str()))
            .check(
                |content_type| ALLOWED_IMAGE_TYPES.contains(&content_type),
                "Gambar harus berformat jpeg, png, gif, atau webp.",
            )
            .holds(
                image.is_none_or(|i| i.data.len() <= MAX_IMAGE_SIZE),
                "Ukuran gambar maksimal 5 MB.",
            )
            .validate();

        if let Err(errors) = validation {
            tracing::debug!(
                "Product create rejected: {:?}",
                errors.fields().collect::<Vec<_>>()
            );
            return Ok(SubmitOutcome::Rejected(errors));
        }

        let mut data = ProductData {
            name: required_text(input, "name")?,
            slug: required_text(input, "slug")?,
            description: optional_text(input, "description"),
            sku: required_text(input, "sku")?,
            price: required_price(input)?,
            stock: required_stock(input)?,
            product_category_id: category_id(input),
            image: None,
            is_active: parse_permissive_bool(input.text("is_active")),
        };

        if let Some(image) = image {
            data.image = Some(self.store_image(image).await?);
        }

        self.persist(None, &data).await
    }

    /// Validate and overwrite the submitted fields of an existing product.
    ///
    /// Validation runs before the record is looked up, so an invalid
    /// submission for a missing id is rejected rather than reported missing.
    pub async fn update(&self, id: i64, input: &ProductInput) -> Result<SubmitOutcome> {
        let lookups = self.lookups(input, Some(id)).await?;

        let validation = product_rules(input, &lookups)
            .field("image_url", input.text("image_url"))
            .url("URL gambar tidak valid.")
            .field("is_active", input.text("is_active"))
            .boolean("Status aktif harus bernilai true atau false.")
            .validate();

        if let Err(errors) = validation {
            tracing::debug!(
                "Product {} update rejected: {:?}",
                id,
                errors.fields().collect::<Vec<_>>()
            );
            return Ok(SubmitOutcome::Rejected(errors));
        }

        let existing = self.products.find(id).await?.ok_or_else(not_found)?;
        let mut data = ProductData::from(existing);

        data.name = required_text(input, "name")?;
        data.slug = required_text(input, "slug")?;
        data.sku = required_text(input, "sku")?;
        data.price = required_price(input)?;
        data.stock = required_stock(input)?;

        if input.is_present("description") {
            data.description = optional_text(input, "description");
        }
        if input.is_present("product_category_id") {
            data.product_category_id = category_id(input);
        }
        if input.is_present("is_active") {
            data.is_active = input
                .text("is_active")
                .and_then(parse_strict_bool)
                .unwrap_or(false);
        }
        if let Some(url) = input.text("image_url") {
            data.image = Some(url.to_string());
        }

        self.persist(Some(id), &data).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if self.products.delete(id).await? {
            tracing::info!("Deleted product {}", id);
            Ok(())
        } else {
            Err(not_found())
        }
    }

    async fn lookups(&self, input: &ProductInput, except: Option<i64>) -> Result<Lookups> {
        let slug_taken = match input.text("slug") {
            Some(slug) => self.products.slug_taken(slug, except).await?,
            None => false,
        };
        let sku_taken = match input.text("sku") {
            Some(sku) => self.products.sku_taken(sku, except).await?,
            None => false,
        };
        let category_exists = match input.text("product_category_id") {
            Some(raw) => match raw.parse::<i64>() {
                Ok(category_id) => self.categories.exists(category_id).await?,
                Err(_) => false,
            },
            None => true,
        };

        Ok(Lookups {
            slug_taken,
            sku_taken,
            category_exists,
        })
    }

    /// Save, turning a unique index violation into a slug/sku field error
    async fn persist(&self, id: Option<i64>, data: &ProductData) -> Result<SubmitOutcome> {
        match self.products.save(id, data).await {
            Ok(product) => {
                tracing::info!("Saved product {} ({})", product.id, product.sku);
                Ok(SubmitOutcome::Saved(product))
            }
            Err(AppError::Conflict(constraint)) => {
                let mut errors = FieldErrors::new();
                match constraint.as_str() {
                    "products_slug_key" => errors.add("slug", SLUG_TAKEN),
                    "products_sku_key" => errors.add("sku", SKU_TAKEN),
                    _ => return Err(AppError::Conflict(constraint)),
                }
                tracing::warn!("Concurrent write rejected by {}", constraint);
                Ok(SubmitOutcome::Rejected(errors))
            }
            Err(e) => Err(e),
        }
    }

    async fn store_image(&self, image: &UploadedImage) -> Result<String> {
        let path = format!(
            "{}/{}",
            PRODUCT_IMAGE_DIR,
            upload_file_name(&image.file_name)
        );

        self.storage
            .put(&path, image.data.clone(), &image.content_type)
            .await
    }

    fn to_dto(&self, product: Product) -> ProductResponseDto {
        let image_url = product.image.as_deref().map(|image| self.image_url(image));
        ProductResponseDto::new(product, image_url)
    }

    /// Absolute URLs are used as-is, anything else is a storage path
    fn image_url(&self, image: &str) -> String {
        if image.starts_with("http://") || image.starts_with("https://") {
            image.to_string()
        } else {
            self.storage.url(image)
        }
    }
}

/// Rules shared by create and update
fn product_rules<'a>(input: &'a ProductInput, lookups: &Lookups) -> FormValidator<'a> {
    FormValidator::new()
        .field("name", input.text("name"))
        .required("Nama produk wajib diisi.")
        .max_chars(255, "Nama produk maksimal 255 karakter.")
        .field("slug", input.text("slug"))
        .required("Slug wajib diisi.")
        .max_chars(255, "Slug maksimal 255 karakter.")
        .holds(!lookups.slug_taken, SLUG_TAKEN)
        .field("description", input.text("description"))
        .field("sku", input.text("sku"))
        .required("SKU wajib diisi.")
        .max_chars(50, "SKU maksimal 50 karakter.")
        .holds(!lookups.sku_taken, SKU_TAKEN)
        .field("price", input.text("price"))
        .required("Harga wajib diisi.")
        .numeric("Harga harus berupa angka.")
        .non_negative("Harga tidak boleh negatif.")
        .max_decimal(
            Decimal::new(MAX_PRICE_CENTS, 2),
            "Harga maksimal 9999999999999.99.",
        )
        .field("stock", input.text("stock"))
        .required("Stok wajib diisi.")
        .integer("Stok harus berupa bilangan bulat.")
        .non_negative("Stok tidak boleh negatif.")
        .field("product_category_id", input.text("product_category_id"))
        .holds(lookups.category_exists, "Kategori yang dipilih tidak valid.")
}

/// `<unix-timestamp>_<8 hex>_<sanitized original name>`
fn upload_file_name(original: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}_{}_{}",
        Utc::now().timestamp(),
        &suffix[..8],
        sanitize_filename(original)
    )
}

fn not_found() -> AppError {
    AppError::NotFound("Produk tidak ditemukan".to_string())
}

// Accessors below run after validation passed; a failure here is a bug.

fn required_text(input: &ProductInput, name: &str) -> Result<String> {
    input
        .text(name)
        .map(str::to_string)
        .ok_or_else(|| AppError::Internal(format!("validated field '{}' is missing", name)))
}

fn optional_text(input: &ProductInput, name: &str) -> Option<String> {
    input.text(name).map(str::to_string)
}

fn required_price(input: &ProductInput) -> Result<Decimal> {
    input
        .text("price")
        .and_then(parse_decimal)
        .ok_or_else(|| AppError::Internal("validated price does not parse".to_string()))
}

fn required_stock(input: &ProductInput) -> Result<i32> {
    input
        .text("stock")
        .and_then(parse_integer)
        .ok_or_else(|| AppError::Internal("validated stock does not parse".to_string()))
}

fn category_id(input: &ProductInput) -> Option<i64> {
    input
        .text("product_category_id")
        .and_then(|raw| raw.parse().ok())
}
