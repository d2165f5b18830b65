use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use crate::cache::Cache;
use crate::scrape::{DEFAULT_BASE_URL, Scraper};

/// Fixed filename of the cache-operations side-channel log.
pub const CACHE_OPS_LOG: &str = "cache.log";

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Index(IndexArgs),
    Details(DetailsArgs),
    Harvest(HarvestArgs),
}

#[derive(Debug, Args)]
pub struct CommonArgs {
    /// Catalog endpoint root.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Directory for the durable result cache.
    #[arg(long, default_value = ".ascl-cache")]
    pub cache_dir: String,
}

impl CommonArgs {
    /// Wire a scraper the way every command runs it: durable cache in
    /// `cache_dir`, operations logged to `cache.log` in the working
    /// directory.
    pub fn open_scraper(&self) -> anyhow::Result<Scraper> {
        let cache = Cache::open(&self.cache_dir)
            .with_context(|| format!("open result cache: {}", self.cache_dir))?
            .with_ops_log(CACHE_OPS_LOG)
            .with_context(|| format!("open cache ops log: {CACHE_OPS_LOG}"))?;
        Scraper::new(&self.base_url, cache).context("build scraper")
    }
}

#[derive(Debug, Args)]
pub struct IndexArgs {
    /// Maximum number of entries to scrape.
    #[arg(long, default_value_t = 10)]
    pub count: usize,

    /// Scrape the whole catalog (ignores --count).
    #[arg(long, default_value_t = false)]
    pub all: bool,

    /// Output path for records (JSONL). Prints to stdout when omitted.
    #[arg(long)]
    pub out: Option<String>,

    /// Disable the progress bar.
    #[arg(long, default_value_t = false)]
    pub quiet: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct DetailsArgs {
    /// Detail page URL, e.g. <https://ascl.net/1101.010>.
    #[arg(long)]
    pub url: String,

    /// Also resolve a GitHub link for the record.
    #[arg(long, default_value_t = false)]
    pub github: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct HarvestArgs {
    /// Number of index entries to harvest.
    #[arg(long, default_value_t = 10)]
    pub count: usize,

    /// Output path for detailed records (JSONL). Prints to stdout when omitted.
    #[arg(long)]
    pub out: Option<String>,

    /// Disable the progress bars.
    #[arg(long, default_value_t = false)]
    pub quiet: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}
