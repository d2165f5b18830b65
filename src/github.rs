//! Best-effort discovery of a GitHub home for a scraped code entry.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::blocking::Client;
use scraper::{Html, Selector};

use crate::records::DetailedCodeRecord;

/// Old hosting sites can be dead or glacial; bound each probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(4);

static GITHUB_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://github\.com/[A-Za-z0-9._/\-]+").unwrap());
static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

/// Resolve a GitHub URL for `record`, first match wins: a `code_sites`
/// entry that already points at GitHub, then the first GitHub link found on
/// any fetched code site. Probe failures are expected for decades-old
/// hosting pages and are absorbed, never surfaced.
pub fn resolve(client: &Client, record: &DetailedCodeRecord) -> Option<String> {
    for site in &record.code_sites {
        if GITHUB_URL.is_match(site) {
            return Some(site.clone());
        }
    }

    for site in &record.code_sites {
        let body = match fetch_probe(client, site) {
            Ok(body) => body,
            Err(err) => {
                tracing::debug!(site = %site, error = %err, "code site probe failed; skipping");
                continue;
            }
        };

        let document = Html::parse_document(&body);
        for link in document.select(&LINK) {
            if let Some(href) = link.value().attr("href") {
                if GITHUB_URL.is_match(href) {
                    return Some(href.to_owned());
                }
            }
        }
    }

    None
}

fn fetch_probe(client: &Client, site: &str) -> Result<String, reqwest::Error> {
    client
        .get(site)
        .timeout(PROBE_TIMEOUT)
        .send()?
        .error_for_status()?
        .text()
}
