//! Product photo storage
//!
//! Photos live on the local filesystem under a `products` namespace, named
//! by the SHA-256 of their content plus the original extension. Only the
//! filename is persisted; the public URL is derived at read time. File
//! writes are not transactional with the database row write: a crash
//! between the two can orphan a file or leave a row pointing at a missing
//! one.

use anyhow::Result;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::info;

/// Storage namespace for product photos
const PRODUCTS_NAMESPACE: &str = "products";

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory for stored files
    pub root: PathBuf,
    /// Public base URL the stored files are served under
    pub base_url: String,
}

impl StorageConfig {
    /// Create a new StorageConfig from environment variables
    ///
    /// # Environment Variables
    /// - `STORAGE_ROOT`: root directory (default: "storage")
    /// - `STORAGE_BASE_URL`: public base URL (default: "http://localhost:3000/storage")
    pub fn from_env() -> Result<Self> {
        let root = std::env::var("STORAGE_ROOT").unwrap_or_else(|_| "storage".to_string());
        let base_url = std::env::var("STORAGE_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000/storage".to_string());

        Ok(StorageConfig {
            root: PathBuf::from(root),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// File store for product photos
#[derive(Debug, Clone)]
pub struct PhotoStorage {
    root: PathBuf,
    base_url: String,
}

impl PhotoStorage {
    pub fn new(config: &StorageConfig) -> Self {
        PhotoStorage {
            root: config.root.clone(),
            base_url: config.base_url.clone(),
        }
    }

    /// Content-hashed filename for the given bytes and extension
    pub fn hashed_filename(bytes: &[u8], extension: &str) -> String {
        let digest = Sha256::digest(bytes);
        format!("{:x}.{}", digest, extension.to_ascii_lowercase())
    }

    /// Store photo bytes under their content hash, returning the filename
    pub async fn store(&self, bytes: &[u8], extension: &str) -> Result<String> {
        let filename = Self::hashed_filename(bytes, extension);
        let dir = self.root.join(PRODUCTS_NAMESPACE);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&filename), bytes).await?;

        info!("Stored product photo {}", filename);
        Ok(filename)
    }

    /// Delete a stored photo. A missing file is not an error.
    pub async fn delete(&self, filename: &str) -> Result<()> {
        // Strip any path components; the column only ever holds a filename
        let basename = Path::new(filename)
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("Invalid photo filename: {}", filename))?;

        let path = self.root.join(PRODUCTS_NAMESPACE).join(basename);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!("Deleted product photo {}", filename);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Public URL for a stored photo filename
    pub fn url(&self, filename: &str) -> String {
        format!("{}/{}/{}", self.base_url, PRODUCTS_NAMESPACE, filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_storage() -> PhotoStorage {
        let root = std::env::temp_dir().join(format!(
            "pos_storage_test_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        PhotoStorage::new(&StorageConfig {
            root,
            base_url: "http://localhost:3000/storage".to_string(),
        })
    }

    #[test]
    fn test_hashed_filename_is_deterministic() {
        let a = PhotoStorage::hashed_filename(b"photo-bytes", "jpg");
        let b = PhotoStorage::hashed_filename(b"photo-bytes", "JPG");
        let c = PhotoStorage::hashed_filename(b"other-bytes", "jpg");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.ends_with(".jpg"));
        // sha256 hex digest + dot + extension
        assert_eq!(a.len(), 64 + 4);
    }

    #[tokio::test]
    async fn test_store_and_delete() -> Result<()> {
        let storage = test_storage();

        let filename = storage.store(b"photo-bytes", "png").await?;
        let path = storage.root.join(PRODUCTS_NAMESPACE).join(&filename);
        assert!(path.exists());

        storage.delete(&filename).await?;
        assert!(!path.exists());

        // Deleting again is not an error
        storage.delete(&filename).await?;

        tokio::fs::remove_dir_all(&storage.root).await.ok();
        Ok(())
    }

    #[test]
    fn test_url_joins_namespace_and_filename() {
        let storage = test_storage();
        assert_eq!(
            storage.url("abc.jpg"),
            "http://localhost:3000/storage/products/abc.jpg"
        );
    }
}
