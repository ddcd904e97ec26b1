use crate::config::DEFAULT_BASE_URL;
use crate::infrastructure::DEFAULT_USER_AGENT;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Platform identifier as it appears in the site's URLs (e.g. "ps2")
    #[arg(long, env = "SCRAPER_PLATFORM")]
    pub platform: String,

    /// Site root the platform and listing paths are resolved against
    #[arg(long, env = "SCRAPER_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Pause after each page fetch, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub page_delay_ms: u64,

    /// HTTP request timeout, in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Write the JSON report here instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Platform metadata, hardware and versions
    Metadata,
    /// The platform's top-100 games
    TopRanked,
    /// A range of the platform's paginated game catalog
    Catalog {
        #[arg(long)]
        start: u32,
        #[arg(long)]
        end: u32,
        /// Treat `end` as exclusive
        #[arg(long)]
        exclusive: bool,
    },
}
