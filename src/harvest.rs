//! The end-to-end driver: one index scrape, then a sequential detail scrape
//! (plus GitHub resolution) per record, in page order.

use std::fs::OpenOptions;
use std::io::Write as _;

use anyhow::Context as _;
use indicatif::ProgressBar;

use crate::cli::HarvestArgs;
use crate::jsonl;

/// Fixed filename of the provenance side-channel log.
pub const HARVEST_LOG: &str = "harvest.log";

pub fn run(args: HarvestArgs) -> anyhow::Result<()> {
    let mut scraper = args.common.open_scraper()?;

    let records = scraper
        .scrape_index(Some(args.count), !args.quiet)
        .context("scrape index")?;
    tracing::info!(count = records.len(), "harvesting detail pages");

    let mut provenance = OpenOptions::new()
        .create(true)
        .append(true)
        .open(HARVEST_LOG)
        .with_context(|| format!("open provenance log: {HARVEST_LOG}"))?;

    let mut out = jsonl::writer(args.out.as_deref())?;
    let progress = if args.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(records.len() as u64)
    };

    for record in &records {
        let detailed = scraper
            .scrape_details(&record.details_url)
            .with_context(|| format!("scrape details: {}", record.details_url))?;
        let github = scraper
            .github_for(&detailed)
            .context("resolve github link")?;

        let mut value = serde_json::to_value(&detailed).context("serialize detailed record")?;
        value["github"] = serde_json::to_value(&github).context("serialize github link")?;
        jsonl::write_line(&mut *out, &value)?;

        let line = format!(
            "{} {} views={}\n",
            chrono::Utc::now().to_rfc3339(),
            detailed.url,
            detailed.views
        );
        provenance
            .write_all(line.as_bytes())
            .context("write provenance log")?;

        progress.inc(1);
    }

    progress.finish_and_clear();
    out.flush().context("flush harvest output")?;

    Ok(())
}
