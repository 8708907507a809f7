//! Application state shared by all handlers.

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusHandle;
use reqwest::Client;
use tracing::{info, warn};

use ergast_client::ErgastClient;
use storage::ObjectStorage;

use crate::config::ApiConfig;

/// Shared application state.
pub struct AppState {
    pub config: ApiConfig,

    /// Upstream results API client.
    pub ergast: ErgastClient,

    /// Sink for generated images.
    pub storage: ObjectStorage,

    /// Client for CDN probes and webhook calls.
    pub http: Client,

    /// Prometheus exporter, when a recorder was installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Build the state from configuration.
    pub async fn new(config: ApiConfig, prometheus: Option<PrometheusHandle>) -> Result<Self> {
        let ergast = ErgastClient::new(config.ergast.clone())
            .await
            .context("Failed to create results API client")?;

        let storage = match &config.storage {
            Some(storage_config) => {
                info!(
                    endpoint = %storage_config.endpoint,
                    bucket = %storage_config.bucket,
                    "Using object storage"
                );
                ObjectStorage::new(storage_config)?
            }
            None => {
                warn!(
                    bucket = %config.bucket,
                    "No object storage configured; generated images are kept in memory"
                );
                ObjectStorage::in_memory(&config.bucket, &config.public_asset_base)
            }
        };

        let http = Client::builder()
            .timeout(config.outbound_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            config,
            ergast,
            storage,
            http,
            prometheus,
        })
    }
}
