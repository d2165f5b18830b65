//! DOM field extraction for catalog index and detail pages.
//!
//! These functions are pure: HTML in, records out. Required nodes missing
//! from the page abort the whole record with [`ScrapeError::MissingNode`];
//! optional sections degrade to empty or absent values.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::ScrapeError;
use crate::records::{AsclId, CodeRecord, DetailedCodeRecord};

static ITEM: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.codelist div.item").unwrap());
static ASCL_ID_SPAN: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.ascl_id").unwrap());
static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span.title").unwrap());
static TITLE_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.title a").unwrap());
static CREDIT_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.credit a").unwrap());
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());
static SITES: LazyLock<Selector> = LazyLock::new(|| Selector::parse("dl.sites").unwrap());
static BIBCODE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("dl.sites.bibcode > dd").unwrap());
static CITE_METHOD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.cite_method").unwrap());
static DISCUSS_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.discuss > a").unwrap());
static VIEWS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.views").unwrap());
static LABEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("dt").unwrap());
static VALUE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("dd").unwrap());
static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

/// Length of the `"Views: "` label stripped from the view counter.
const VIEWS_PREFIX_LEN: usize = 7;

/// All entry containers on an index page, in page order.
pub fn index_items(document: &Html) -> Vec<ElementRef<'_>> {
    document.select(&ITEM).collect()
}

/// Extract one index entry. `base_url` resolves the relative detail href.
pub fn index_item(item: ElementRef<'_>, base_url: &Url) -> Result<CodeRecord, ScrapeError> {
    let fields = common_fields(item)?;

    let href = require(item, &TITLE_LINK, "span.title a")?
        .value()
        .attr("href")
        .ok_or(ScrapeError::MissingNode("span.title a[href]"))?;
    let details_url = base_url.join(href).map_err(|source| ScrapeError::Url {
        url: href.to_owned(),
        source,
    })?;

    Ok(CodeRecord {
        ascl_id: fields.ascl_id,
        title: fields.title,
        credit: fields.credit,
        abstract_html: fields.abstract_html,
        details_url: details_url.to_string(),
    })
}

/// Extract the single entry on a detail page. `url` is recorded verbatim.
pub fn detail_record(html: &str, url: &str) -> Result<DetailedCodeRecord, ScrapeError> {
    let document = Html::parse_document(html);
    let item = document
        .select(&ITEM)
        .next()
        .ok_or(ScrapeError::MissingNode("div.codelist div.item"))?;

    let fields = common_fields(item)?;
    let sections = item
        .select(&SITES)
        .next()
        .map(site_sections)
        .unwrap_or_default();

    let discuss_url = require(item, &DISCUSS_LINK, "div.discuss > a")?
        .value()
        .attr("href")
        .ok_or(ScrapeError::MissingNode("div.discuss > a[href]"))?
        .to_owned();
    let views = views_count(&text_of(require(item, &VIEWS, "div.views")?))?;

    Ok(DetailedCodeRecord {
        ascl_id: fields.ascl_id,
        title: fields.title,
        credit: fields.credit,
        abstract_html: fields.abstract_html,
        url: url.to_owned(),
        code_sites: section_links(&sections, "Code site:"),
        used_in: section_links(&sections, "Used in:"),
        described_in: section_links(&sections, "Described in:"),
        bibcode: item.select(&BIBCODE).next().map(text_of),
        preferred_citation_method: item
            .select(&CITE_METHOD)
            .next()
            .and_then(|div| div.select(&PARAGRAPH).next())
            .map(|p| p.html()),
        discuss_url,
        views,
    })
}

struct CommonFields {
    ascl_id: Option<AsclId>,
    title: String,
    credit: Vec<String>,
    abstract_html: String,
}

/// The four fields shared by index entries and detail pages. The identifier
/// span itself is required; a tag that fails to parse is not an error.
fn common_fields(item: ElementRef<'_>) -> Result<CommonFields, ScrapeError> {
    let ascl_id = AsclId::parse(&text_of(require(item, &ASCL_ID_SPAN, "span.ascl_id")?));
    let title = text_of(require(item, &TITLE, "span.title")?)
        .trim()
        .to_owned();

    let credit: Vec<String> = item.select(&CREDIT_LINK).map(text_of).collect();
    if credit.is_empty() {
        return Err(ScrapeError::MissingNode("div.credit a"));
    }

    let abstract_html = require(item, &PARAGRAPH, "p")?.html();

    Ok(CommonFields {
        ascl_id,
        title,
        credit,
        abstract_html,
    })
}

/// Pair each `dt` label with the `dd` at the same position and collect the
/// value's anchor hrefs. The page is assumed to alternate label/value
/// strictly; an unpaired or multi-valued label misaligns the later pairs.
fn site_sections(dl: ElementRef<'_>) -> Vec<(String, Vec<String>)> {
    dl.select(&LABEL)
        .zip(dl.select(&VALUE))
        .map(|(label, value)| {
            let links = value
                .select(&LINK)
                .filter_map(|a| a.value().attr("href"))
                .map(str::to_owned)
                .collect();
            (text_of(label), links)
        })
        .collect()
}

fn require<'a>(
    scope: ElementRef<'a>,
    selector: &Selector,
    what: &'static str,
) -> Result<ElementRef<'a>, ScrapeError> {
    scope
        .select(selector)
        .next()
        .ok_or(ScrapeError::MissingNode(what))
}

fn section_links(sections: &[(String, Vec<String>)], label: &str) -> Vec<String> {
    sections
        .iter()
        .find(|(name, _)| name == label)
        .map(|(_, links)| links.clone())
        .unwrap_or_default()
}

fn views_count(text: &str) -> Result<u64, ScrapeError> {
    let digits = text.get(VIEWS_PREFIX_LEN..).unwrap_or_default();
    digits.trim().parse().map_err(|source| ScrapeError::Views {
        text: text.to_owned(),
        source,
    })
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}
