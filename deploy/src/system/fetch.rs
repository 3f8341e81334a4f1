//! Remote downloads (env template, docker install script)

use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

use crate::error::Result;

/// Downloads text resources
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

/// HTTP fetcher backed by reqwest
pub struct HttpFetcher {
    client: reqwest::Client,
}

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
/// Whole request, body included; the docker script and env template are small
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeouts(CONNECT_TIMEOUT, REQUEST_TIMEOUT)
    }

    pub fn with_timeouts(connect: Duration, request: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect)
            .timeout(request)
            .user_agent(concat!("easy-install/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        info!("Downloading {}", url);
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InstallError;
    use std::net::TcpListener;

    #[tokio::test]
    async fn test_stalled_download_times_out() {
        // Connections complete in the backlog but nothing ever answers
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/env-production", listener.local_addr().unwrap());

        let fetcher =
            HttpFetcher::with_timeouts(Duration::from_secs(2), Duration::from_millis(300)).unwrap();
        let started = std::time::Instant::now();
        let err = fetcher.fetch_text(&url).await.unwrap_err();

        match err {
            InstallError::Fetch(e) => assert!(e.is_timeout()),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(started.elapsed() < Duration::from_secs(10));
        drop(listener);
    }
}
