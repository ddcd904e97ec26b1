use crate::domain::{FetchSession, PageFetcher};
use crate::error::{Result, ScrapeError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Passive fetcher: plain GET requests, no client-side rendering.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| ScrapeError::Config(format!("cannot build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn open_session(&self) -> Result<Box<dyn FetchSession>> {
        debug!("Opening HTTP fetch session");
        Ok(Box::new(HttpSession {
            client: self.client.clone(),
            fetched: 0,
        }))
    }
}

struct HttpSession {
    client: Client,
    fetched: usize,
}

#[async_trait]
impl FetchSession for HttpSession {
    async fn fetch(&mut self, url: &Url) -> Result<String> {
        info!("Fetching {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ScrapeError::fetch(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::fetch(url.as_str(), format!("HTTP status {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ScrapeError::fetch(url.as_str(), e))?;
        self.fetched += 1;

        Ok(body)
    }
}

impl Drop for HttpSession {
    fn drop(&mut self) {
        debug!(pages = self.fetched, "HTTP fetch session released");
    }
}
