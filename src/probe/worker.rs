// src/probe/worker.rs
// =============================================================================
// One worker: pull a URL, wait the configured delay, GET it, and forward it
// to the output channel if the status matches.
//
// Failure handling:
// - Transport errors (DNS, refused, TLS, timeout) are logged and skipped
// - Non-matching statuses are simply not reported
// - Nothing is retried
// =============================================================================

use super::{Match, RunSummary};
use crate::config::ProbeConfig;
use crate::error::ProbeError;
use crate::status::StatusSet;
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Runs until the intake queue is closed and empty, then returns this
/// worker's counters.
pub(super) async fn worker_loop(
    worker_id: usize,
    client: Client,
    matcher: Arc<StatusSet>,
    config: ProbeConfig,
    intake: async_channel::Receiver<String>,
    output: mpsc::Sender<Match>,
) -> RunSummary {
    log::debug!("Worker {} started", worker_id);

    let mut stats = RunSummary::default();

    // recv() only fails once the queue is closed AND drained
    while let Ok(url) = intake.recv().await {
        if !config.delay.is_zero() {
            tokio::time::sleep(config.delay).await;
        }

        stats.attempted += 1;

        let status = match probe_url(&client, &url).await {
            Ok(status) => status,
            Err(e) => {
                stats.failed += 1;
                log::warn!("Error: {}", e);
                continue;
            }
        };

        if !matcher.matches(status) {
            continue;
        }

        stats.matched += 1;
        if output.send(Match { url, status }).await.is_err() {
            // Nobody is reading results anymore
            log::debug!("Worker {}: output channel closed, stopping", worker_id);
            break;
        }
    }

    log::debug!(
        "Worker {} finished ({} probed, {} matched)",
        worker_id,
        stats.attempted,
        stats.matched
    );

    stats
}

/// Issues one GET and returns the response status code.
///
/// The response (and its body) is dropped before returning, so the
/// connection goes back to the pool without reading the body.
pub async fn probe_url(client: &Client, url: &str) -> Result<u16, ProbeError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| ProbeError::Transport {
            url: url.to_string(),
            source,
        })?;

    let status = response.status().as_u16();
    drop(response);

    Ok(status)
}
