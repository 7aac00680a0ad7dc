//! Book cover image storage.
//!
//! Covers are written once at book creation under `books/<uuid>.<ext>` and
//!  served back read-only through `GET /images/*key`.

use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const BOOKS_PREFIX: &str = "books";

/// Configuration for the image storage backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageStoreConfig {
    /// Images vanish with the process
    Memory,

    /// Local filesystem storage (defaults to `<config dir>/images`)
    Local {
        path: Option<PathBuf>,
    },

    /// S3-compatible storage (AWS S3, MinIO, etc.)
    S3 {
        /// S3 endpoint URL (e.g., "http://localhost:9000" for MinIO)
        endpoint: String,
        access_key: String,
        secret_key: String,
        bucket: String,
        /// Optional region (defaults to "us-east-1")
        region: Option<String>,
    },
}

impl Default for ImageStoreConfig {
    fn default() -> Self {
        ImageStoreConfig::Local { path: None }
    }
}

/// An image as read back from the store
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub content_type: String,
    pub data: Bytes,
}

#[derive(Debug, Clone)]
pub struct ImageStore {
    inner: Arc<dyn ObjectStore>,
}

impl ImageStore {
    /// Create the backend described by `config`. `default_dir` is used by
    ///  the local backend when no explicit path is configured.
    pub async fn new(config: &ImageStoreConfig, default_dir: PathBuf) -> Result<Self, ImageStoreError> {
        let inner: Arc<dyn ObjectStore> = match config {
            ImageStoreConfig::Memory => Arc::new(InMemory::new()),

            ImageStoreConfig::Local { path } => {
                let path = path.clone().unwrap_or(default_dir);
                tokio::fs::create_dir_all(&path).await?;
                Arc::new(
                    LocalFileSystem::new_with_prefix(&path)
                        .map_err(|e| ImageStoreError::InvalidConfig(e.to_string()))?,
                )
            }

            ImageStoreConfig::S3 {
                endpoint,
                access_key,
                secret_key,
                bucket,
                region,
            } => {
                let store = AmazonS3Builder::new()
                    .with_endpoint(endpoint)
                    .with_access_key_id(access_key)
                    .with_secret_access_key(secret_key)
                    .with_bucket_name(bucket)
                    .with_region(region.as_deref().unwrap_or("us-east-1"))
                    .with_allow_http(endpoint.starts_with("http://"))
                    .build()
                    .map_err(|e| ImageStoreError::InvalidConfig(e.to_string()))?;
                Arc::new(store)
            }
        };

        Ok(Self { inner })
    }

    pub fn memory() -> Self {
        Self {
            inner: Arc::new(InMemory::new()),
        }
    }

    /// Store a book cover and return its key.
    ///
    /// Only `image/*` content types are accepted. The extension is taken
    ///  from the upload's file name when it has one, otherwise from the
    ///  content type.
    pub async fn put_cover(
        &self,
        file_name: Option<&str>,
        content_type: &str,
        data: Bytes,
    ) -> Result<String, ImageStoreError> {
        if !content_type.starts_with("image/") {
            return Err(ImageStoreError::NotAnImage(content_type.to_string()));
        }
        if data.is_empty() {
            return Err(ImageStoreError::Empty);
        }

        let ext = cover_extension(file_name, content_type);
        let key = format!("{}/{}.{}", BOOKS_PREFIX, Uuid::new_v4(), ext);

        self.inner
            .put(&ObjectPath::from(key.as_str()), data.into())
            .await?;

        tracing::debug!(key = %key, "stored book cover");
        Ok(key)
    }

    pub async fn get(&self, key: &str) -> Result<Option<StoredImage>, ImageStoreError> {
        let path = ObjectPath::parse(key).map_err(|_| ImageStoreError::InvalidKey(key.to_string()))?;
        if !path.prefix_matches(&ObjectPath::from(BOOKS_PREFIX)) {
            return Ok(None);
        }

        match self.inner.get(&path).await {
            Ok(result) => {
                let data = result.bytes().await?;
                let content_type = mime_guess::from_path(key)
                    .first_or_octet_stream()
                    .to_string();
                Ok(Some(StoredImage { content_type, data }))
            }
            Err(object_store::Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete(&self, key: &str) -> Result<(), ImageStoreError> {
        let path = ObjectPath::parse(key).map_err(|_| ImageStoreError::InvalidKey(key.to_string()))?;
        match self.inner.delete(&path).await {
            Ok(()) | Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Public URL at which a stored image is served
pub fn image_url(public_url: &str, key: &str) -> String {
    format!("{}/images/{}", public_url.trim_end_matches('/'), key)
}

fn cover_extension(file_name: Option<&str>, content_type: &str) -> String {
    let from_name = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    if let Some(ext) = from_name {
        return ext;
    }

    mime_guess::get_mime_extensions_str(content_type)
        .and_then(|exts| exts.first())
        .map(|ext| ext.to_string())
        .unwrap_or_else(|| "bin".to_string())
}

#[derive(Debug, thiserror::Error)]
pub enum ImageStoreError {
    #[error("object storage error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid image key: {0}")]
    InvalidKey(String),

    #[error("Only image uploads are allowed, got {0}")]
    NotAnImage(String),

    #[error("Uploaded image is empty")]
    Empty,
}
