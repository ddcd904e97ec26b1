pub(crate) mod fetcher;
mod game;
mod platform;
mod report;

pub use fetcher::{FetchSession, PageFetcher};
pub use game::{Game, RankedGame};
pub use platform::{PlatformHardware, PlatformMeta, PlatformVersion};
pub use report::ScrapeReport;
