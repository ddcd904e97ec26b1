use crate::config::ScraperSettings;
use crate::domain::{FetchSession, Game, PageFetcher, PlatformMeta, RankedGame};
use crate::error::{Result, ScrapeError};
use crate::infrastructure::{
    CatalogScraper, ListingScraper, PlatformPageScraper, TopRankedScraper,
};
use crate::services::pacing::Pacer;
use crate::services::pagination::{PageRange, PageSource, PaginationWalker};
use async_trait::async_trait;
use indicatif::ProgressBar;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use url::Url;

/// Scrapes one platform. Every query is fetched at most once per instance;
/// later calls return the cached records.
pub struct PlatformScraper {
    settings: ScraperSettings,
    fetcher: Arc<dyn PageFetcher>,
    platform_page: PlatformPageScraper,
    top_ranked_page: TopRankedScraper,
    catalog_page: CatalogScraper,
    pacer: Pacer,
    progress: Option<ProgressBar>,
    metadata: Option<PlatformMeta>,
    top_ranked: Option<Vec<RankedGame>>,
    catalogs: FxHashMap<PageRange, Vec<Game>>,
}

impl PlatformScraper {
    pub fn new(settings: ScraperSettings, fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        info!("Created new scraper for platform {}", settings.platform);
        let pacer = Pacer::new(settings.page_delay, CancellationToken::new());

        Ok(Self {
            settings,
            fetcher,
            platform_page: PlatformPageScraper::new()?,
            top_ranked_page: TopRankedScraper::new()?,
            catalog_page: CatalogScraper::new()?,
            pacer,
            progress: None,
            metadata: None,
            top_ranked: None,
            catalogs: FxHashMap::default(),
        })
    }

    /// Shows catalog walks on the given progress bar.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn settings(&self) -> &ScraperSettings {
        &self.settings
    }

    /// Cancelling this token interrupts pacing waits and stops catalog walks
    /// at the next page boundary.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.pacer.token().clone()
    }

    pub async fn metadata(&mut self) -> Result<&PlatformMeta> {
        let meta = match self.metadata.take() {
            Some(meta) => {
                info!("Using cached metadata for {}", self.settings.platform);
                meta
            }
            None => {
                let url = self.settings.metadata_url()?;
                let html = self.fetch_once(&url).await?;
                let meta = self.platform_page.parse(&html, &url)?;
                info!(
                    "Scraped metadata for {} ({} versions)",
                    meta.name,
                    meta.other_versions.len()
                );
                meta
            }
        };

        let meta: &PlatformMeta = self.metadata.insert(meta);
        Ok(meta)
    }

    pub async fn top_ranked(&mut self) -> Result<&[RankedGame]> {
        let games = match self.top_ranked.take() {
            Some(games) => {
                info!("Using cached top-ranked games for {}", self.settings.platform);
                games
            }
            None => {
                let url = self.settings.top_ranked_url()?;
                let html = self.fetch_once(&url).await?;
                let games = self.top_ranked_page.parse(&html, &url);
                info!("Scraped {} top-ranked games", games.len());
                games
            }
        };

        let games = self.top_ranked.insert(games);
        Ok(games.as_slice())
    }

    /// Games listed on pages `start..=end` (or `start..end`), in page order.
    pub async fn catalog(
        &mut self,
        start: u32,
        end: u32,
        end_inclusive: bool,
    ) -> Result<&[Game]> {
        let range = PageRange::new(start, end, end_inclusive)?;

        if self.catalogs.contains_key(&range) {
            info!("Using cached catalog pages {}", range);
        } else {
            let games = self.walk_catalog(range).await?;
            self.catalogs.insert(range, games);
        }

        let games = self.catalogs.entry(range).or_default();
        Ok(games.as_slice())
    }

    /// One session per fetch, released before pacing starts.
    async fn fetch_once(&self, url: &Url) -> Result<String> {
        if self.pacer.is_cancelled() {
            return Err(ScrapeError::Cancelled);
        }

        let html = {
            let mut session = self.fetcher.open_session().await?;
            session.fetch(url).await?
        };

        self.pacer.wait().await?;
        Ok(html)
    }

    /// One session shared by every page of the walk.
    async fn walk_catalog(&self, range: PageRange) -> Result<Vec<Game>> {
        if self.pacer.is_cancelled() && !range.is_empty() {
            return Err(ScrapeError::WalkCancelled {
                next_page: range.start(),
            });
        }

        let mut walker = PaginationWalker::new(self.pacer.clone());
        if let Some(progress) = &self.progress {
            walker = walker.with_progress(progress.clone());
        }

        let mut pages = CatalogPages {
            session: self.fetcher.open_session().await?,
            settings: &self.settings,
            scraper: &self.catalog_page,
        };

        walker.walk(range, &mut pages).await
    }
}

struct CatalogPages<'a> {
    session: Box<dyn FetchSession>,
    settings: &'a ScraperSettings,
    scraper: &'a CatalogScraper,
}

#[async_trait]
impl<'a> PageSource for CatalogPages<'a> {
    type Row = Game;

    async fn fetch_page(&mut self, page: u32) -> Result<Vec<Game>> {
        let url = self.settings.catalog_url(page)?;
        let html = self.session.fetch(&url).await?;
        Ok(self.scraper.parse(&html, &url))
    }
}
