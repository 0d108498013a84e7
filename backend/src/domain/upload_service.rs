//! Image upload service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{UploadService, UploadStore};
use crate::domain::{
    Error, FieldError, ImageType, StoredName, StoredUpload, file_too_large,
};

/// Upload service implementing [`UploadService`].
#[derive(Clone)]
pub struct UploadServiceImpl<S: ?Sized> {
    store: Arc<S>,
    max_bytes: u64,
}

impl<S: ?Sized> UploadServiceImpl<S> {
    /// Create a new service accepting files up to `max_bytes`.
    pub fn new(store: Arc<S>, max_bytes: u64) -> Self {
        Self { store, max_bytes }
    }
}

/// Error raised when the multipart body carries no file.
#[must_use]
pub fn missing_file() -> FieldError {
    FieldError::new("file", "missing_file", "a file part is required")
}

#[async_trait]
impl<S> UploadService for UploadServiceImpl<S>
where
    S: UploadStore + ?Sized,
{
    fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    async fn store(&self, content_type: &str, bytes: Vec<u8>) -> Result<StoredUpload, Error> {
        let image_type = ImageType::from_content_type(content_type)?;
        if bytes.is_empty() {
            return Err(missing_file().into());
        }
        let size = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        if size > self.max_bytes {
            return Err(file_too_large(self.max_bytes).into());
        }
        let name = StoredName::generate(image_type);
        self.store.save(&name, &bytes).await?;
        info!(file = name.as_str(), size, "upload stored");
        Ok(StoredUpload {
            url: name.url(),
            content_type: image_type.content_type().to_owned(),
            size,
        })
    }

    async fn fetch(&self, name: &str) -> Result<(ImageType, Vec<u8>), Error> {
        let not_found = || Error::not_found("upload not found");
        let name = StoredName::parse(name).ok_or_else(not_found)?;
        let bytes = self.store.load(&name).await?.ok_or_else(not_found)?;
        Ok((name.image_type(), bytes))
    }
}
