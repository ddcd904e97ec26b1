use crate::error::Result;
use async_trait::async_trait;
use url::Url;

/// Source of rendered HTML pages.
///
/// Whether pages come from a plain HTTP client or a browser session is up to
/// the implementation; callers only rely on the returned text being the
/// fully rendered document.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Acquires a fetch session. The session is released when dropped.
    async fn open_session(&self) -> Result<Box<dyn FetchSession>>;
}

#[async_trait]
pub trait FetchSession: Send {
    async fn fetch(&mut self, url: &Url) -> Result<String>;
}
