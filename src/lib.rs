//! Extracts platform metadata and game listings from IGDB-style platform
//! pages.
//!
//! [`PlatformScraper`] is the entry point: it owns a [`PageFetcher`], builds
//! typed records from the fetched HTML through declarative field schemas and
//! caches every result for its own lifetime.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod services;

pub use config::ScraperSettings;
pub use domain::{
    FetchSession, Game, PageFetcher, PlatformHardware, PlatformMeta, PlatformVersion, RankedGame,
    ScrapeReport,
};
pub use error::{Result, ScrapeError};
pub use infrastructure::HttpFetcher;
pub use services::{PageRange, PlatformScraper};
