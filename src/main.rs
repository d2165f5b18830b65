use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

use ascl_scraper::cli::{Cli, Command};

fn main() -> ExitCode {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn try_main() -> anyhow::Result<()> {
    ascl_scraper::logging::init().context("init logging")?;

    let cli = Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        Command::Index(args) => ascl_scraper::index::run(args).context("index")?,
        Command::Details(args) => ascl_scraper::details::run(args).context("details")?,
        Command::Harvest(args) => ascl_scraper::harvest::run(args).context("harvest")?,
    }

    Ok(())
}
