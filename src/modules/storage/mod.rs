//! Blob storage for uploaded files
//!
//! `BlobStorage` is the seam between features and where bytes actually live:
//! `LocalDiskStorage` writes below a directory served by this process, and
//! `MinioStorage` writes to a MinIO/S3-compatible bucket.

mod local_disk;
mod minio_storage;

use async_trait::async_trait;

use crate::core::error::Result;

pub use local_disk::LocalDiskStorage;
pub use minio_storage::MinioStorage;

#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Write `data` under `path` and return the stored path to persist.
    async fn put(&self, path: &str, data: Vec<u8>, content_type: &str) -> Result<String>;

    /// Publicly reachable URL of a stored path
    fn url(&self, stored_path: &str) -> String;
}
