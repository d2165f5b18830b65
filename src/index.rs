use std::io::Write as _;

use anyhow::Context as _;

use crate::cli::IndexArgs;
use crate::jsonl;

pub fn run(args: IndexArgs) -> anyhow::Result<()> {
    let mut scraper = args.common.open_scraper()?;

    let max_count = (!args.all).then_some(args.count);
    let records = scraper
        .scrape_index(max_count, !args.quiet)
        .context("scrape index")?;
    tracing::info!(count = records.len(), "scraped index");

    let mut out = jsonl::writer(args.out.as_deref())?;
    for record in &records {
        jsonl::write_line(&mut *out, record)?;
    }
    out.flush().context("flush index output")?;

    Ok(())
}
