//! Port for storing uploaded image bytes.

use async_trait::async_trait;

use crate::domain::StoredName;

use super::define_port_error;

define_port_error! {
    /// Errors raised by upload storage adapters.
    pub enum UploadStoreError {
        /// The backing store failed to read or write.
        Io { message: String } => "upload storage failed: {message}",
    }
}

/// Byte storage keyed by generated upload names.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Persist `bytes` under a freshly generated `name`.
    async fn save(&self, name: &StoredName, bytes: &[u8]) -> Result<(), UploadStoreError>;

    /// Read the bytes stored under `name`, if any.
    async fn load(&self, name: &StoredName) -> Result<Option<Vec<u8>>, UploadStoreError>;
}
