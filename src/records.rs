use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static ASCL_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[ascl:(\d+)\.(\d+)\]").unwrap());

/// Catalog identifier, e.g. the `[ascl:1703.012]` tag renders as `AsclId(1703, 12)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AsclId(pub u32, pub u32);

impl AsclId {
    /// Parse a bracketed identifier tag. Anything that is not exactly
    /// `[ascl:<digits>.<digits>]` yields `None`, never an error.
    pub fn parse(text: &str) -> Option<Self> {
        let captures = ASCL_ID.captures(text)?;
        let major = captures[1].parse().ok()?;
        let minor = captures[2].parse().ok()?;
        Some(Self(major, minor))
    }
}

/// Summary of one entry on the index page (<https://ascl.net/code/all>).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeRecord {
    pub ascl_id: Option<AsclId>,
    pub title: String,
    pub credit: Vec<String>,
    /// Raw HTML of the first paragraph.
    #[serde(rename = "abstract")]
    pub abstract_html: String,
    /// Absolute URL of the entry's detail page.
    pub details_url: String,
}

/// Full entry from a detail page, e.g. <https://ascl.net/1101.010>.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedCodeRecord {
    pub ascl_id: Option<AsclId>,
    pub title: String,
    pub credit: Vec<String>,
    #[serde(rename = "abstract")]
    pub abstract_html: String,
    /// The detail page URL this record was scraped from.
    pub url: String,
    pub code_sites: Vec<String>,
    pub used_in: Vec<String>,
    pub described_in: Vec<String>,
    pub bibcode: Option<String>,
    /// Raw HTML of the preferred-citation paragraph, when present.
    pub preferred_citation_method: Option<String>,
    pub discuss_url: String,
    pub views: u64,
}
