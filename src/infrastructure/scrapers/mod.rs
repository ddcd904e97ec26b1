use scraper::Html;
use url::Url;

pub(crate) mod listing;
pub(crate) mod path;
pub(crate) mod platform;
pub(crate) mod schema;

/// A listing page whose rows map to one record type.
pub trait ListingScraper {
    type Row;

    /// Rows that fail a required field are skipped, never fatal.
    fn extract_rows(&self, document: &Html, page: &Url) -> Vec<Self::Row>;

    fn parse(&self, html: &str, page: &Url) -> Vec<Self::Row> {
        let document = Html::parse_document(html);
        self.extract_rows(&document, page)
    }
}
