//! Service configuration, read from the environment (and `.env`).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::warn;

use ergast_client::{ErgastConfig, DEFAULT_BASE_URL};
use storage::ObjectStorageConfig;

pub const APP_TITLE: &str = "Yarumotors API";
pub const APP_DESCRIPTION: &str = "API for the Yarumotors project";

const DEFAULT_API_TOKEN: &str = "local-dev-token";
const DEFAULT_CDN_URL: &str = "http://localhost:8000/";
const DEFAULT_BOT_DOMAIN: &str = "https://yarumotors.subdomain.workers.dev/";
const DEFAULT_CACHE_DIR: &str = "./cache";

/// Runtime configuration of the API service.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Static bearer token protecting the generation routes
    pub api_token: String,
    /// Base URL probed by the manifest check
    pub cdn_url: String,
    /// Base URL of the bot worker notified on updates
    pub bot_domain: String,
    /// Object storage; `None` selects the in-memory store
    pub storage: Option<ObjectStorageConfig>,
    /// Bucket name reported when running in-memory
    pub bucket: String,
    /// Base of links returned for uploaded objects (in-memory store)
    pub public_asset_base: String,
    /// Upstream results API
    pub ergast: ErgastConfig,
    /// Timeout for CDN probes and webhook calls
    pub outbound_timeout: Duration,
}

impl ApiConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let timeout_secs: u64 = parse_var(&get, "UPSTREAM_TIMEOUT_SECS", 30)?;
        let cache_ttl_secs: u64 = parse_var(&get, "CACHE_TTL_SECS", 3600)?;

        let cache_dir = match get_or("CACHE_DIR", DEFAULT_CACHE_DIR).as_str() {
            "off" | "none" => None,
            dir => Some(PathBuf::from(dir)),
        };

        let bucket = get_or("R2_BUCKET", "yarumotors");
        let storage = match (
            get("R2_ACCOUNT_ID"),
            get("R2_ACCESS_KEY_ID"),
            get("R2_SECRET_ACCESS_KEY"),
        ) {
            (Some(account), Some(key_id), Some(secret)) => {
                let mut config = ObjectStorageConfig::r2(&account, &bucket, &key_id, &secret);
                if let Some(endpoint) = get("R2_ENDPOINT") {
                    config.endpoint = endpoint;
                    config.allow_http = config.endpoint.starts_with("http://");
                }
                if let Some(base) = get("PUBLIC_ASSET_BASE") {
                    config.public_base = base;
                }
                Some(config)
            }
            (None, None, None) => None,
            _ => {
                warn!("Incomplete R2 credentials; falling back to in-memory storage");
                None
            }
        };

        Ok(Self {
            api_token: get_or("API_TOKEN", DEFAULT_API_TOKEN),
            cdn_url: get_or("CDN_URL", DEFAULT_CDN_URL),
            bot_domain: get_or("BOT_DOMAIN", DEFAULT_BOT_DOMAIN),
            storage,
            public_asset_base: get("PUBLIC_ASSET_BASE")
                .unwrap_or_else(|| format!("memory://{}", bucket)),
            bucket,
            ergast: ErgastConfig {
                base_url: get_or("ERGAST_BASE_URL", DEFAULT_BASE_URL),
                request_timeout: Duration::from_secs(timeout_secs),
                cache_dir,
                cache_ttl: Duration::from_secs(cache_ttl_secs),
            },
            outbound_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_var<G>(get: &G, key: &str, default: u64) -> Result<u64>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {}", key, raw)),
        None => Ok(default),
    }
}
