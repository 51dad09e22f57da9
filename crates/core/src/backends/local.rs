//! Local filesystem files backend
//!
//! Lays blobs out under a configurable root directory using the storage key
//! as a relative path. The content type is kept in a `.meta` sidecar next to
//! each blob, since it is not recoverable from the blob alone.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chatvault_common::Result;

use super::FilesBackend;

/// Local filesystem files backend.
///
/// Intended for development and testing. `get_signed_url` returns a plain
/// `file://` path, NOT an access-controlled signed URL; production
/// deployments should serve files through a fronting layer instead.
pub struct LocalFiles {
    base_path: PathBuf,
}

impl LocalFiles {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn full_path(&self, key: &str) -> PathBuf {
        self.base_path.join(key)
    }

    fn meta_path(path: &Path) -> PathBuf {
        let mut os = path.as_os_str().to_owned();
        os.push(".meta");
        PathBuf::from(os)
    }

    /// Content type recorded for a stored blob, from its sidecar
    pub async fn get_content_type(&self, key: &str) -> Result<Option<String>> {
        let meta_path = Self::meta_path(&self.full_path(key));
        match tokio::fs::read_to_string(&meta_path).await {
            Ok(content_type) => Ok(Some(content_type)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait::async_trait]
impl FilesBackend for LocalFiles {
    async fn upload(&self, key: &str, data: &[u8], content_type: &str) -> Result<()> {
        let full_path = self.full_path(key);
        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full_path, data).await?;
        tokio::fs::write(Self::meta_path(&full_path), content_type).await?;
        Ok(())
    }

    async fn download(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.full_path(key)).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let full_path = self.full_path(key);

        let deleted = match tokio::fs::remove_file(&full_path).await {
            Ok(()) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };
        match tokio::fs::remove_file(Self::meta_path(&full_path)).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        Ok(deleted)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(tokio::fs::try_exists(self.full_path(key)).await?)
    }

    async fn get_signed_url(
        &self,
        key: &str,
        _expires_in: u64,
        _download_filename: Option<&str>,
    ) -> Result<Option<String>> {
        let full_path = self.full_path(key);
        if !tokio::fs::try_exists(&full_path).await? {
            return Ok(None);
        }
        let absolute = std::path::absolute(&full_path)?;
        Ok(Some(format!("file://{}", absolute.display())))
    }
}
