use crate::error::{Result, ScrapeError};
use crate::services::pacing::Pacer;
use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::ops::Range;
use tracing::{debug, info, warn};

/// 1-based page numbers, stored with an exclusive end so that the inclusive
/// and exclusive spellings of one range compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRange {
    start: u32,
    end: u32,
}

impl PageRange {
    pub fn new(start: u32, end: u32, end_inclusive: bool) -> Result<Self> {
        if start == 0 {
            return Err(ScrapeError::Config("page numbers start at 1".to_string()));
        }

        let end = if end_inclusive {
            end.checked_add(1)
                .ok_or_else(|| ScrapeError::Config(format!("page {end} is out of range")))?
        } else {
            end
        };

        if end < start {
            return Err(ScrapeError::Config(format!(
                "page range {start}..{end} ends before it starts"
            )));
        }

        Ok(Self { start, end })
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end_exclusive(&self) -> u32 {
        self.end
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn pages(&self) -> Range<u32> {
        self.start..self.end
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Fetches and parses one numbered listing page.
#[async_trait]
pub trait PageSource: Send {
    type Row: Send;

    async fn fetch_page(&mut self, page: u32) -> Result<Vec<Self::Row>>;
}

pub struct PaginationWalker {
    pacer: Pacer,
    progress: Option<ProgressBar>,
}

impl PaginationWalker {
    pub fn new(pacer: Pacer) -> Self {
        Self {
            pacer,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Visits `range` in increasing order and concatenates the rows of every
    /// page. The first failing page aborts the walk; cancellation is checked
    /// between pages.
    pub async fn walk<S: PageSource>(
        &self,
        range: PageRange,
        source: &mut S,
    ) -> Result<Vec<S::Row>> {
        info!("Walking pages {}", range);

        if let Some(progress) = &self.progress {
            progress.set_length(u64::from(range.len()));
            progress.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                    .map_err(|e| ScrapeError::Config(e.to_string()))?,
            );
        }

        let mut rows = Vec::new();

        for page in range.pages() {
            if self.pacer.is_cancelled() {
                warn!(page, "Page walk cancelled");
                return Err(ScrapeError::WalkCancelled { next_page: page });
            }

            let page_rows = source
                .fetch_page(page)
                .await
                .map_err(|e| ScrapeError::page(page, e))?;

            debug!(page, rows = page_rows.len(), "Page scraped");
            rows.extend(page_rows);

            if let Some(progress) = &self.progress {
                progress.set_message(format!("page {page}"));
                progress.inc(1);
            }

            if page + 1 < range.end_exclusive() {
                self.pacer
                    .wait()
                    .await
                    .map_err(|_| ScrapeError::WalkCancelled { next_page: page + 1 })?;
            }
        }

        if let Some(progress) = &self.progress {
            progress.finish_and_clear();
        }

        info!("Collected {} rows from {} pages", rows.len(), range.len());
        Ok(rows)
    }
}
