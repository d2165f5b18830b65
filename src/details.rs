use std::io::Write as _;

use anyhow::Context as _;

use crate::cli::DetailsArgs;

pub fn run(args: DetailsArgs) -> anyhow::Result<()> {
    let mut scraper = args.common.open_scraper()?;

    let record = scraper
        .scrape_details(&args.url)
        .with_context(|| format!("scrape details: {}", args.url))?;

    let mut value = serde_json::to_value(&record).context("serialize record")?;
    if args.github {
        let github = scraper
            .github_for(&record)
            .context("resolve github link")?;
        value["github"] = serde_json::to_value(&github).context("serialize github link")?;
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &value).context("write record")?;
    out.write_all(b"\n").context("write record newline")?;

    Ok(())
}
