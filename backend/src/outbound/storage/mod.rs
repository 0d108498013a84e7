//! Upload storage rooted at a capability directory handle.
//!
//! The adapter never touches paths outside the directory it was opened with.
//! Files are written to a hidden temporary name and renamed into place, so a
//! reader never sees a partial image.

use std::io::{self, ErrorKind};
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::error;

use crate::domain::StoredName;
use crate::domain::ports::{UploadStore, UploadStoreError};

/// [`UploadStore`] writing into one directory through `cap-std`.
#[derive(Clone)]
pub struct CapStdUploadStore {
    root: Arc<Dir>,
}

impl CapStdUploadStore {
    /// Open (creating if needed) the upload root.
    ///
    /// # Errors
    ///
    /// Returns the I/O error when the directory cannot be created or opened.
    pub fn open(root: &Path) -> io::Result<Self> {
        Dir::create_ambient_dir_all(root, ambient_authority())?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())?;
        Ok(Self::from_dir(dir))
    }

    /// Wrap an already opened directory.
    #[must_use]
    pub fn from_dir(dir: Dir) -> Self {
        Self {
            root: Arc::new(dir),
        }
    }

    async fn blocking<T, F>(&self, op: F) -> Result<T, UploadStoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Dir) -> io::Result<T> + Send + 'static,
    {
        let root = Arc::clone(&self.root);
        tokio::task::spawn_blocking(move || op(&root))
            .await
            .map_err(|err| UploadStoreError::io(format!("upload task failed: {err}")))?
            .map_err(|err| {
                error!(error = %err, "upload storage I/O failed");
                UploadStoreError::io(err.to_string())
            })
    }
}

fn write_atomic(dir: &Dir, name: &str, bytes: &[u8]) -> io::Result<()> {
    let tmp_name = format!(".{name}.tmp");
    dir.write(&tmp_name, bytes)?;
    dir.rename(&tmp_name, dir, name).inspect_err(|_| {
        let _ = dir.remove_file(&tmp_name);
    })
}

#[async_trait]
impl UploadStore for CapStdUploadStore {
    async fn save(&self, name: &StoredName, bytes: &[u8]) -> Result<(), UploadStoreError> {
        let name = name.as_str().to_owned();
        let bytes = bytes.to_vec();
        self.blocking(move |dir| write_atomic(dir, &name, &bytes))
            .await
    }

    async fn load(&self, name: &StoredName) -> Result<Option<Vec<u8>>, UploadStoreError> {
        let name = name.as_str().to_owned();
        self.blocking(move |dir| match dir.read(&name) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        })
        .await
    }
}
