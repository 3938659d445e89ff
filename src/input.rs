// src/input.rs
// =============================================================================
// Reads the target list: one URL per line, from a file or from stdin ("-").
//
// - Line order is the order targets get queued in
// - Empty lines are skipped; nothing else is trimmed
// - Invalid UTF-8 is replaced, not fatal; the line still gets probed
// - Any real I/O error is fatal, so no URL is probed from a half-read file
// =============================================================================

use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, BufReader};

/// Reads targets from `path`, or from stdin when `path` is "-".
pub async fn read_targets(path: &Path) -> Result<Vec<String>> {
    if path.as_os_str() == "-" {
        return read_targets_from(BufReader::new(io::stdin()))
            .await
            .context("Failed to read targets from stdin");
    }

    let file = File::open(path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))?;

    read_targets_from(BufReader::new(file))
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Collects every non-empty line of `reader`.
///
/// A line that isn't valid UTF-8 is kept with its bad bytes replaced by
/// U+FFFD; the request for it fails later like any other bad URL.
pub async fn read_targets_from<R>(mut reader: R) -> io::Result<Vec<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut targets = Vec::new();
    let mut buf = Vec::new();
    let mut line_no: usize = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        line_no += 1;

        // Strip "\n" or "\r\n"; nothing else
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }

        if buf.is_empty() {
            continue;
        }

        match std::str::from_utf8(&buf) {
            Ok(line) => targets.push(line.to_string()),
            Err(_) => {
                log::warn!("Line {} is not valid UTF-8", line_no);
                targets.push(String::from_utf8_lossy(&buf).into_owned());
            }
        }
    }

    Ok(targets)
}
