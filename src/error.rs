use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("Schema mismatch: required field `{field}` not found")]
    SchemaMismatch { field: String },
    #[error("Cannot parse field `{field}` from {value:?}")]
    FieldParse { field: String, value: String },
    #[error("Page {page} failed: {source}")]
    Page {
        page: u32,
        #[source]
        source: Box<ScrapeError>,
    },
    #[error("Page walk cancelled before page {next_page}")]
    WalkCancelled { next_page: u32 },
    #[error("Operation cancelled")]
    Cancelled,
    #[error("Selector error: {0}")]
    Selector(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScrapeError {
    pub fn schema_mismatch(field: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            field: field.into(),
        }
    }

    pub fn field_parse(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::FieldParse {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn page(page: u32, source: ScrapeError) -> Self {
        Self::Page {
            page,
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
