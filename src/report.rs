// src/report.rs
// =============================================================================
// The collector: drains the output channel and prints each match the moment
// it arrives.
//
// Output formats:
// - Plain: just the URL, one per line (easy to pipe into other tools)
// - Json:  one JSON object per line, e.g. {"url":"https://a","status":200}
// =============================================================================

use crate::probe::Match;
use anyhow::Result;
use std::io::Write;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Plain,
    Json,
}

/// Writes every match to `out` until the channel is closed and empty.
///
/// Returns how many lines were written. Each line is flushed right away so
/// matches show up while the run is still going.
pub async fn collect<W: Write>(
    results: &mut mpsc::Receiver<Match>,
    format: OutputFormat,
    out: &mut W,
) -> Result<usize> {
    let mut written = 0;

    while let Some(found) = results.recv().await {
        write_match(out, &found, format)?;
        out.flush()?;
        written += 1;
    }

    Ok(written)
}

fn write_match<W: Write>(out: &mut W, found: &Match, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Plain => writeln!(out, "{}", found.url)?,
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, found)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
