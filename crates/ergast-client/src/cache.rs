//! On-disk cache of upstream API responses.
//!
//! Each response body is stored as one file under the cache directory, keyed
//! by the request path and query. Entries older than the TTL are treated as
//! misses and overwritten on the next fetch.

use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use bytes::Bytes;
use tempfile::NamedTempFile;
use tokio::fs;
use tracing::{debug, warn};

use motorsport_common::{MotorsportError, MotorsportResult};

/// Disk-backed response cache.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
    ttl: Duration,
}

impl ResponseCache {
    /// Create the cache, making sure the directory exists.
    pub async fn open(dir: impl Into<PathBuf>, ttl: Duration) -> MotorsportResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await.map_err(|e| {
            MotorsportError::CacheError(format!(
                "Failed to create cache dir {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(Self { dir, ttl })
    }

    /// Return the cached body for `key` if present and fresh.
    pub async fn get(&self, key: &str) -> Option<Bytes> {
        let path = self.entry_path(key);

        let metadata = fs::metadata(&path).await.ok()?;
        let age = metadata
            .modified()
            .ok()
            .and_then(|m| SystemTime::now().duration_since(m).ok())
            .unwrap_or(Duration::MAX);

        if age > self.ttl {
            debug!(key = %key, age_secs = age.as_secs(), "Cache entry stale");
            return None;
        }

        match fs::read(&path).await {
            Ok(body) => {
                debug!(key = %key, size = body.len(), "Cache hit");
                Some(Bytes::from(body))
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to read cache entry");
                None
            }
        }
    }

    /// Store a response body. Failures are logged and otherwise ignored.
    ///
    /// Each write goes to its own temporary file which is then renamed over
    /// the entry, so concurrent writers never publish a torn file.
    pub async fn put(&self, key: &str, body: &[u8]) {
        let dir = self.dir.clone();
        let path = self.entry_path(key);
        let body = body.to_vec();

        let written = tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut tmp = NamedTempFile::new_in(&dir)?;
            tmp.write_all(&body)?;
            tmp.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await;

        match written {
            Ok(Ok(())) => debug!(key = %key, "Cached response"),
            Ok(Err(e)) => warn!(key = %key, error = %e, "Failed to write cache entry"),
            Err(e) => warn!(key = %key, error = %e, "Cache write task failed"),
        }
    }

    /// Drop the entry for `key`, if any.
    pub async fn remove(&self, key: &str) {
        match fs::remove_file(self.entry_path(key)).await {
            Ok(()) => debug!(key = %key, "Removed cache entry"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(key = %key, error = %e, "Failed to remove cache entry"),
        }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", cache_file_stem(key)))
    }
}

/// Map a request path to a flat, filesystem-safe file name.
fn cache_file_stem(key: &str) -> String {
    let stem: String = key
        .trim_matches('/')
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "root".to_string()
    } else {
        stem
    }
}
