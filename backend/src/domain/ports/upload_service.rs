//! Driving port for image uploads.

use async_trait::async_trait;

use crate::domain::{Error, ImageType, StoredUpload};

/// Accepts image bytes and serves them back by generated name.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UploadService: Send + Sync {
    /// Largest accepted upload in bytes.
    fn max_bytes(&self) -> u64;

    /// Validate and store an image, returning its public URL.
    async fn store(&self, content_type: &str, bytes: Vec<u8>) -> Result<StoredUpload, Error>;

    /// Load a stored image by its generated file name.
    async fn fetch(&self, name: &str) -> Result<(ImageType, Vec<u8>), Error>;
}
