//! Webhook notification of the bot worker.

use reqwest::Client;
use tracing::{info, instrument};

use motorsport_common::{MotorsportError, MotorsportResult};

/// URL of the worker's update hook.
pub fn update_url(bot_domain: &str) -> String {
    format!("{}/update", bot_domain.trim_end_matches('/'))
}

/// POST to the worker's update hook. One attempt, no retry.
#[instrument(skip(http))]
pub async fn notify_bot(http: &Client, bot_domain: &str) -> MotorsportResult<()> {
    let url = update_url(bot_domain);

    let response = http
        .post(&url)
        .send()
        .await
        .map_err(|e| MotorsportError::NotifyError(format!("{}: {}", url, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(MotorsportError::NotifyError(format!(
            "{} returned HTTP {}",
            url,
            status.as_u16()
        )));
    }

    info!(url = %url, "Bot notified");
    Ok(())
}
