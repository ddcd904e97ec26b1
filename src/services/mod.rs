pub(crate) mod output;
pub(crate) mod pacing;
pub(crate) mod pagination;
pub(crate) mod platform_service;

pub use output::write_report;
pub use pacing::Pacer;
pub use pagination::{PageRange, PageSource, PaginationWalker};
pub use platform_service::PlatformScraper;
