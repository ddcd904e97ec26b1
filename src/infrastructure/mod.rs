mod clients;
mod scrapers;

pub use clients::http::{HttpFetcher, DEFAULT_USER_AGENT};
pub use scrapers::{
    listing::{CatalogScraper, TopRankedScraper},
    path::{normalize_text, Step, StructuralPath},
    platform::PlatformPageScraper,
    schema::{Coercion, FieldSpec, Record, Schema},
    ListingScraper,
};
