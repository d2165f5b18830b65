use thiserror::Error;

/// Failure modes of the scraping core.
///
/// Structural and numeric failures are fatal for the record or page being
/// parsed; nothing partial is ever returned. Network failures on the
/// mandatory index/detail fetches surface here too. Best-effort GitHub
/// probing never produces one of these.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// A required node was missing from the page.
    #[error("page structure missing `{0}`")]
    MissingNode(&'static str),

    #[error("invalid view count {text:?}: {source}")]
    Views {
        text: String,
        source: std::num::ParseIntError,
    },

    #[error("invalid url {url:?}: {source}")]
    Url {
        url: String,
        source: url::ParseError,
    },

    #[error("cache error: {0}")]
    Cache(#[from] crate::cache::CacheError),
}
