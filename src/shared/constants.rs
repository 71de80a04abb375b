/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Fixed page size of the dashboard product list
pub const PRODUCT_LIST_PAGE_SIZE: i64 = 10;

// =============================================================================
// UPLOADS
// =============================================================================

/// Storage directory for product images
pub const PRODUCT_IMAGE_DIR: &str = "uploads/product";

/// Maximum product image size in bytes (5MB)
pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

/// Allowed MIME types for product images
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Largest price a NUMERIC(15, 2) column holds: 9999999999999.99
pub const MAX_PRICE_CENTS: i64 = 999_999_999_999_999;

// =============================================================================
// FLASH MESSAGES
// =============================================================================

pub const MSG_VALIDATION_FAILED: &str = "Validasi Error, silakan periksa kembali.";
pub const MSG_PRODUCT_CREATED: &str = "Produk berhasil disimpan";
pub const MSG_PRODUCT_UPDATED: &str = "Produk berhasil diperbarui";
pub const MSG_PRODUCT_DELETED: &str = "Produk berhasil dihapus";

// =============================================================================
// SESSION
// =============================================================================

/// Cookie carrying the dashboard session id
pub const SESSION_COOKIE: &str = "catalog_session";

/// Unread flash messages older than this are dropped
pub const FLASH_TTL_SECS: u64 = 600;
