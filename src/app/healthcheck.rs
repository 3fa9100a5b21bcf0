use crate::config::BoardConfig;
use crate::utils::error::Result;
use std::time::Duration;

/// Requests `/healthz` on the loopback interface. Used by the container HEALTHCHECK.
pub async fn check(config: &BoardConfig) -> Result<()> {
    let url = format!("http://127.0.0.1:{}/healthz", config.server.http_port);
    tracing::debug!("Health check: {}", url);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()?;
    client.get(&url).send().await?.error_for_status()?;
    Ok(())
}
