//! Object storage for rendered assets (Cloudflare R2 / S3 compatible).

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use object_store::{aws::AmazonS3Builder, memory::InMemory, path::Path, ObjectStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};

use motorsport_common::{MotorsportError, MotorsportResult};

/// Configuration for object storage connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectStorageConfig {
    /// S3 endpoint URL
    pub endpoint: String,
    /// Bucket name
    pub bucket: String,
    /// Access key ID
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
    /// Region ("auto" for R2)
    pub region: String,
    /// Allow HTTP (for local MinIO)
    pub allow_http: bool,
    /// Base URL of links returned for uploaded objects
    pub public_base: String,
}

impl ObjectStorageConfig {
    /// Configuration for a Cloudflare R2 bucket.
    pub fn r2(account_id: &str, bucket: &str, access_key_id: &str, secret_access_key: &str) -> Self {
        let endpoint = format!("https://{}.r2.cloudflarestorage.com", account_id);
        Self {
            public_base: format!("{}/{}", endpoint, bucket),
            endpoint,
            bucket: bucket.to_string(),
            access_key_id: access_key_id.to_string(),
            secret_access_key: secret_access_key.to_string(),
            region: "auto".to_string(),
            allow_http: false,
        }
    }
}

/// A streamed object body together with its size.
pub struct ObjectStream {
    pub size: usize,
    pub body: BoxStream<'static, Result<Bytes, object_store::Error>>,
}

/// Object storage client for generated images.
pub struct ObjectStorage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    public_base: String,
}

impl ObjectStorage {
    /// Create a new object storage client from config.
    pub fn new(config: &ObjectStorageConfig) -> MotorsportResult<Self> {
        let mut builder = AmazonS3Builder::new()
            .with_endpoint(&config.endpoint)
            .with_bucket_name(&config.bucket)
            .with_access_key_id(&config.access_key_id)
            .with_secret_access_key(&config.secret_access_key)
            .with_region(&config.region);

        if config.allow_http {
            builder = builder.with_allow_http(true);
        }

        let store = builder.build().map_err(|e| {
            MotorsportError::StorageError(format!("Failed to create S3 client: {}", e))
        })?;

        Ok(Self {
            store: Arc::new(store),
            bucket: config.bucket.clone(),
            public_base: config.public_base.trim_end_matches('/').to_string(),
        })
    }

    /// Volatile in-process store, for local development and tests.
    pub fn in_memory(bucket: &str, public_base: &str) -> Self {
        Self {
            store: Arc::new(InMemory::new()),
            bucket: bucket.to_string(),
            public_base: public_base.trim_end_matches('/').to_string(),
        }
    }

    /// Public link for an object key.
    pub fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_base, path.trim_start_matches('/'))
    }

    /// Write bytes to a path in the bucket.
    #[instrument(skip(self, data), fields(bucket = %self.bucket, path = %path))]
    pub async fn put(&self, path: &str, data: Bytes) -> MotorsportResult<()> {
        let location = Path::from(path);
        debug!(size = data.len(), "Writing object");

        self.store
            .put(&location, data.into())
            .await
            .map_err(|e| MotorsportError::StorageError(format!("Failed to write {}: {}", path, e)))?;

        Ok(())
    }

    /// Read a whole object.
    #[instrument(skip(self), fields(bucket = %self.bucket, path = %path))]
    pub async fn get(&self, path: &str) -> MotorsportResult<Bytes> {
        let result = self
            .store
            .get(&Path::from(path))
            .await
            .map_err(|e| map_read_error(path, e))?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| MotorsportError::StorageError(format!("Failed to read bytes: {}", e)))?;

        debug!(size = bytes.len(), "Read object");
        Ok(bytes)
    }

    /// Open an object for streaming.
    #[instrument(skip(self), fields(bucket = %self.bucket, path = %path))]
    pub async fn get_stream(&self, path: &str) -> MotorsportResult<ObjectStream> {
        let result = self
            .store
            .get(&Path::from(path))
            .await
            .map_err(|e| map_read_error(path, e))?;

        Ok(ObjectStream {
            size: result.meta.size,
            body: result.into_stream().boxed(),
        })
    }

    /// Check if an object exists.
    pub async fn exists(&self, path: &str) -> MotorsportResult<bool> {
        match self.store.head(&Path::from(path)).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(MotorsportError::StorageError(format!(
                "Failed to check {}: {}",
                path, e
            ))),
        }
    }
}

fn map_read_error(path: &str, err: object_store::Error) -> MotorsportError {
    match err {
        object_store::Error::NotFound { .. } => MotorsportError::ObjectNotFound(path.to_string()),
        e => MotorsportError::StorageError(format!("Failed to read {}: {}", path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_r2_config() {
        let config = ObjectStorageConfig::r2("abc123", "assets", "key", "secret");
        assert_eq!(config.endpoint, "https://abc123.r2.cloudflarestorage.com");
        assert_eq!(config.public_base, "https://abc123.r2.cloudflarestorage.com/assets");
        assert_eq!(config.region, "auto");
    }

    #[test]
    fn test_public_url() {
        let storage = ObjectStorage::in_memory("assets", "https://cdn.example.com/");
        assert_eq!(
            storage.public_url("/2024/Monza/qualifying.png"),
            "https://cdn.example.com/2024/Monza/qualifying.png"
        );
    }

    #[tokio::test]
    async fn test_put_get_exists() {
        let storage = ObjectStorage::in_memory("assets", "http://localhost");
        assert!(!storage.exists("a/b.png").await.unwrap());

        storage.put("a/b.png", Bytes::from_static(b"png")).await.unwrap();
        assert!(storage.exists("a/b.png").await.unwrap());
        assert_eq!(storage.get("a/b.png").await.unwrap(), Bytes::from_static(b"png"));
    }

    #[tokio::test]
    async fn test_missing_object() {
        let storage = ObjectStorage::in_memory("assets", "http://localhost");
        let err = storage.get("missing.png").await.unwrap_err();
        assert!(matches!(err, MotorsportError::ObjectNotFound(p) if p == "missing.png"));
        assert!(storage.get_stream("missing.png").await.is_err());
    }

    #[tokio::test]
    async fn test_stream_reports_size() {
        let storage = ObjectStorage::in_memory("assets", "http://localhost");
        storage.put("x.bin", Bytes::from_static(b"12345")).await.unwrap();

        let mut stream = storage.get_stream("x.bin").await.unwrap();
        assert_eq!(stream.size, 5);

        let mut collected = Vec::new();
        while let Some(chunk) = stream.body.next().await {
            collected.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(collected, b"12345");
    }
}
