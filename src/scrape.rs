//! Scraper context: the HTTP client and result cache behind the memoized
//! index and detail operations.

use indicatif::ProgressBar;
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use scraper::Html;
use url::Url;

use crate::cache::Cache;
use crate::error::ScrapeError;
use crate::github;
use crate::parse;
use crate::records::{CodeRecord, DetailedCodeRecord};

/// Production catalog endpoint.
pub const DEFAULT_BASE_URL: &str = "https://ascl.net/";

/// Requested when the caller asks for all entries; well above the catalog size.
const INDEX_CEILING: usize = 300_000;

const USER_AGENT: &str = concat!("ascl-scraper/", env!("CARGO_PKG_VERSION"));

/// One scraping session: owns the blocking HTTP client and the shared
/// durable cache. All memoized operations of a process go through the one
/// cache instance injected here.
pub struct Scraper {
    client: Client,
    base_url: Url,
    cache: Cache,
}

impl Scraper {
    /// `base_url` is the catalog root; tests point it at a local fixture.
    pub fn new(base_url: &str, cache: Cache) -> Result<Self, ScrapeError> {
        let base_url = Url::parse(base_url).map_err(|source| ScrapeError::Url {
            url: base_url.to_owned(),
            source,
        })?;
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(Policy::limited(10))
            .build()?;

        Ok(Self {
            client,
            base_url,
            cache,
        })
    }

    /// Scrape up to `max_count` entries from the index page, in page order.
    /// `None` scrapes the whole catalog. The result is memoized by
    /// `max_count`; the progress bar is an observer only and changes neither
    /// the records nor their order.
    pub fn scrape_index(
        &mut self,
        max_count: Option<usize>,
        verbose: bool,
    ) -> Result<Vec<CodeRecord>, ScrapeError> {
        let limit = max_count.unwrap_or(INDEX_CEILING);
        let index_url = self
            .base_url
            .join(&format!("code/all/limit/{limit}"))
            .map_err(|source| ScrapeError::Url {
                url: format!("code/all/limit/{limit}"),
                source,
            })?;

        let client = &self.client;
        let base_url = &self.base_url;
        self.cache.memoize("scrape_index", &max_count, || {
            let body = fetch_text(client, index_url.clone())?;
            let document = Html::parse_document(&body);
            let items = parse::index_items(&document);
            tracing::debug!(count = items.len(), url = %index_url, "fetched index page");

            let total = items.len().min(limit);
            let progress = if verbose {
                ProgressBar::new(total as u64)
            } else {
                ProgressBar::hidden()
            };

            let mut records = Vec::with_capacity(total);
            for item in items.into_iter().take(limit) {
                records.push(parse::index_item(item, base_url)?);
                progress.inc(1);
            }
            progress.finish_and_clear();

            Ok(records)
        })
    }

    /// Scrape one detail page into a [`DetailedCodeRecord`], memoized by URL.
    pub fn scrape_details(&mut self, url: &str) -> Result<DetailedCodeRecord, ScrapeError> {
        let target = Url::parse(url).map_err(|source| ScrapeError::Url {
            url: url.to_owned(),
            source,
        })?;

        let client = &self.client;
        self.cache.memoize("scrape_details", &url, || {
            let body = fetch_text(client, target)?;
            tracing::debug!(url = %url, "fetched detail page");
            parse::detail_record(&body, url)
        })
    }

    /// Best-effort GitHub association for `record`, memoized by the record.
    /// Only the cache layer can fail here; the resolver itself never does.
    pub fn github_for(
        &mut self,
        record: &DetailedCodeRecord,
    ) -> Result<Option<String>, ScrapeError> {
        let client = &self.client;
        self.cache
            .memoize("github_for", record, || Ok(github::resolve(client, record)))
    }
}

fn fetch_text(client: &Client, url: Url) -> Result<String, ScrapeError> {
    let response = client.get(url).send()?.error_for_status()?;
    Ok(response.text()?)
}
