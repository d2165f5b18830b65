//! JSONL output sink shared by the CLI commands.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};

use anyhow::Context as _;
use serde::Serialize;

/// Open `path` for exclusive creation, or fall back to stdout.
pub fn writer(path: Option<&str>) -> anyhow::Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(path)
                .with_context(|| format!("create output: {path}"))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(std::io::stdout())),
    }
}

pub fn write_line<T: Serialize>(out: &mut dyn Write, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *out, value).context("serialize record")?;
    out.write_all(b"\n").context("write record newline")?;
    Ok(())
}
