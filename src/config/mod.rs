use crate::config::cli::Args;
use crate::error::{Result, ScrapeError};
use crate::infrastructure::HttpFetcher;
use clap::Parser;
use std::time::Duration;
use tracing::Level;
use url::Url;

pub mod cli;

pub const DEFAULT_BASE_URL: &str = "https://www.igdb.com";
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_secs(1);

/// Everything one `PlatformScraper` needs to know about its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScraperSettings {
    pub platform: String,
    pub base_url: Url,
    pub page_delay: Duration,
}

impl ScraperSettings {
    pub fn new(platform: &str) -> Result<Self> {
        let valid = !platform.is_empty()
            && platform
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(ScrapeError::Config(format!(
                "invalid platform identifier {platform:?}"
            )));
        }

        Ok(Self {
            platform: platform.to_string(),
            base_url: Url::parse(DEFAULT_BASE_URL)?,
            page_delay: DEFAULT_PAGE_DELAY,
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = Url::parse(base_url)?;
        Ok(self)
    }

    pub fn with_page_delay(mut self, page_delay: Duration) -> Self {
        self.page_delay = page_delay;
        self
    }

    pub fn metadata_url(&self) -> Result<Url> {
        Ok(self.base_url.join(&format!("/platforms/{}", self.platform))?)
    }

    pub fn top_ranked_url(&self) -> Result<Url> {
        Ok(self
            .base_url
            .join(&format!("/top-100/games/platform/{}", self.platform))?)
    }

    pub fn catalog_url(&self, page: u32) -> Result<Url> {
        let mut url = self
            .base_url
            .join(&format!("/platforms/{}/games", self.platform))?;
        url.query_pairs_mut().append_pair("page", &page.to_string());
        Ok(url)
    }
}

pub struct Config {
    pub args: Args,
    pub settings: ScraperSettings,
    pub fetcher: HttpFetcher,
}

impl Config {
    pub fn new() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    pub fn from_args(args: Args) -> Result<Self> {
        let settings = ScraperSettings::new(&args.platform)?
            .with_base_url(&args.base_url)?
            .with_page_delay(Duration::from_millis(args.page_delay_ms));

        let fetcher = HttpFetcher::new(Duration::from_secs(args.timeout_secs), &args.user_agent)?;

        Ok(Self {
            args,
            settings,
            fetcher,
        })
    }

    pub fn log_level(&self) -> Result<Level> {
        self.args
            .log_level
            .parse()
            .map_err(|_| {
                ScrapeError::Config(format!("unknown log level {:?}", self.args.log_level))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::cli::Command;
    use super::*;

    #[test]
    fn builds_url_templates() {
        let settings = ScraperSettings::new("ps2").unwrap();

        assert_eq!(
            settings.metadata_url().unwrap().as_str(),
            "https://www.igdb.com/platforms/ps2"
        );
        assert_eq!(
            settings.top_ranked_url().unwrap().as_str(),
            "https://www.igdb.com/top-100/games/platform/ps2"
        );
        assert_eq!(
            settings.catalog_url(250).unwrap().as_str(),
            "https://www.igdb.com/platforms/ps2/games?page=250"
        );
    }

    #[test]
    fn custom_base_url_is_used() {
        let settings = ScraperSettings::new("n64")
            .unwrap()
            .with_base_url("http://localhost:8080/")
            .unwrap();
        assert_eq!(
            settings.metadata_url().unwrap().as_str(),
            "http://localhost:8080/platforms/n64"
        );
    }

    #[test]
    fn rejects_platform_ids_that_escape_the_path() {
        for bad in ["", "ps2/../admin", "ps 2", "ps2?page=1"] {
            assert!(
                matches!(ScraperSettings::new(bad), Err(ScrapeError::Config(_))),
                "{bad:?} accepted"
            );
        }
    }

    #[test]
    fn parses_cli_arguments() {
        let args = Args::try_parse_from([
            "platform-scraper",
            "--platform",
            "ps2",
            "--page-delay-ms",
            "0",
            "--log-level",
            "debug",
            "catalog",
            "--start",
            "249",
            "--end",
            "251",
        ])
        .unwrap();

        assert_eq!(
            args.command,
            Command::Catalog {
                start: 249,
                end: 251,
                exclusive: false
            }
        );

        let config = Config::from_args(args).unwrap();
        assert_eq!(config.settings.page_delay, Duration::ZERO);
        assert_eq!(config.settings.base_url.as_str(), "https://www.igdb.com/");
        assert_eq!(config.log_level().unwrap(), Level::DEBUG);
    }

    #[test]
    fn unknown_log_level_is_a_config_error() {
        let args = Args::try_parse_from([
            "platform-scraper",
            "--platform",
            "ps2",
            "--log-level",
            "chatty",
            "metadata",
        ])
        .unwrap();

        let config = Config::from_args(args).unwrap();
        assert!(matches!(config.log_level(), Err(ScrapeError::Config(_))));
    }
}
