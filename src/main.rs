use indicatif::ProgressBar;
use platform_scraper::config::cli::Command;
use platform_scraper::config::Config;
use platform_scraper::services::write_report;
use platform_scraper::{PlatformScraper, Result, ScrapeReport};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::new()?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level()?)
        .with_writer(std::io::stderr)
        .init();

    let fetcher = Arc::new(config.fetcher.clone());
    let mut scraper =
        PlatformScraper::new(config.settings.clone(), fetcher)?.with_progress(ProgressBar::new(0));
    let platform = scraper.settings().platform.clone();

    let cancel = scraper.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping after the current page");
            cancel.cancel();
        }
    });

    let output = config.args.output.as_deref();

    match config.args.command {
        Command::Metadata => {
            let meta = scraper.metadata().await?;
            write_report(&ScrapeReport::new(&platform, "metadata", 1, meta), output)?;
        }
        Command::TopRanked => {
            let games = scraper.top_ranked().await?;
            write_report(
                &ScrapeReport::new(&platform, "top_ranked", games.len(), games),
                output,
            )?;
        }
        Command::Catalog {
            start,
            end,
            exclusive,
        } => {
            let games = scraper.catalog(start, end, !exclusive).await?;
            write_report(
                &ScrapeReport::new(&platform, "catalog", games.len(), games),
                output,
            )?;
        }
    }

    info!("Scraping completed successfully!");
    Ok(())
}
