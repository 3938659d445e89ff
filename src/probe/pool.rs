// src/probe/pool.rs
// =============================================================================
// This module wires the workers together.
//
// How a run works:
// 1. Spawn `concurrency` workers, all sharing one intake queue
// 2. Push every target onto the intake queue in input order, then close it
// 3. Spawn a coordinator that waits for every worker and then drops the last
//    output sender, which closes the output channel
// 4. Hand the output receiver back to the caller, who drains it until closed
//
// Results come out in completion order, not input order.
//
// Rust concepts:
// - Arc: Shares the read-only StatusSet between tasks without copying it
// - async_channel: A queue many workers can receive from (tokio's mpsc only
//   allows one receiver)
// - Drop: Dropping the last Sender is what closes a channel
// =============================================================================

use super::worker::worker_loop;
use super::{Match, RunSummary};
use crate::config::ProbeConfig;
use crate::status::StatusSet;
use futures::future::join_all;
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};

/// Everything a run needs, fixed before the first worker starts.
#[derive(Debug, Clone)]
pub struct ProbePool {
    client: Client,
    matcher: Arc<StatusSet>,
    config: ProbeConfig,
}

/// A run in progress.
///
/// Drain `results` until it returns None, then call `finish` for the totals.
#[derive(Debug)]
pub struct ProbeRun {
    pub results: mpsc::Receiver<Match>,
    coordinator: JoinHandle<RunSummary>,
}

impl ProbeRun {
    /// Waits for the coordinator and returns the summed worker counters.
    pub async fn finish(self) -> Result<RunSummary, JoinError> {
        self.coordinator.await
    }
}

impl ProbePool {
    /// Builds the shared HTTP client from `config`.
    pub fn new(config: ProbeConfig, matcher: StatusSet) -> reqwest::Result<Self> {
        let client = config.build_client()?;
        Ok(Self::with_client(client, config, matcher))
    }

    pub fn with_client(client: Client, config: ProbeConfig, matcher: StatusSet) -> Self {
        Self {
            client,
            matcher: Arc::new(matcher),
            config,
        }
    }

    /// Starts a run over `targets`.
    ///
    /// Returns once every target is queued; the probing itself continues in
    /// the background. Must be called inside a tokio runtime.
    pub async fn start(&self, targets: Vec<String>) -> ProbeRun {
        // Both queues can hold the whole batch, so queueing never waits
        // and workers never wait on a slow collector
        let capacity = targets.len().max(1);
        let (intake_tx, intake_rx) = async_channel::bounded::<String>(capacity);
        let (output_tx, output_rx) = mpsc::channel::<Match>(capacity);

        let concurrency = self.config.concurrency.get();
        log::debug!(
            "Starting {} worker(s) for {} target(s)",
            concurrency,
            targets.len()
        );

        let mut workers = Vec::with_capacity(concurrency);
        for worker_id in 0..concurrency {
            workers.push(tokio::spawn(worker_loop(
                worker_id,
                self.client.clone(),
                Arc::clone(&self.matcher),
                self.config,
                intake_rx.clone(),
                output_tx.clone(),
            )));
        }

        // Workers hold their own clones; ours would keep the queue open
        drop(intake_rx);

        distribute(targets, intake_tx).await;

        ProbeRun {
            results: output_rx,
            coordinator: spawn_coordinator(workers, output_tx),
        }
    }
}

/// Pushes every target onto the intake queue in order, then closes it.
async fn distribute(targets: Vec<String>, intake: async_channel::Sender<String>) {
    for url in targets {
        if intake.send(url).await.is_err() {
            // Every worker is gone; the coordinator will report why
            log::error!("Intake queue closed before all targets were queued");
            break;
        }
    }

    // Closed + drained is the workers' signal to exit
    intake.close();
}

/// Waits for every worker, sums their counters, and closes the output
/// channel exactly once.
///
/// Each worker drops its own sender when it returns, so `output` is the
/// last one alive by the time join_all resolves.
fn spawn_coordinator(
    workers: Vec<JoinHandle<RunSummary>>,
    output: mpsc::Sender<Match>,
) -> JoinHandle<RunSummary> {
    tokio::spawn(async move {
        let mut summary = RunSummary::default();

        for (worker_id, joined) in join_all(workers).await.into_iter().enumerate() {
            match joined {
                Ok(stats) => summary.absorb(stats),
                Err(e) => {
                    summary.crashed_workers += 1;
                    log::error!("Worker {} stopped unexpectedly: {}", worker_id, e);
                }
            }
        }

        drop(output);
        summary
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::time::{Duration, Instant};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // Mounts one GET route per (path, status) that must be hit exactly once.
    async fn server_with(routes: &[(&str, u16)]) -> MockServer {
        let server = MockServer::start().await;
        for (route, status) in routes {
            Mock::given(method("GET"))
                .and(path(*route))
                .respond_with(ResponseTemplate::new(*status))
                .expect(1)
                .mount(&server)
                .await;
        }
        server
    }

    fn pool(concurrency: usize, spec: &str) -> ProbePool {
        let config = ProbeConfig::new(concurrency, Duration::ZERO, Some(Duration::from_secs(5)))
            .unwrap();
        ProbePool::new(config, StatusSet::parse_lenient(spec)).unwrap()
    }

    async fn run_to_end(pool: &ProbePool, targets: Vec<String>) -> (Vec<Match>, RunSummary) {
        let mut run = pool.start(targets).await;
        let mut matches = Vec::new();
        while let Some(m) = run.results.recv().await {
            matches.push(m);
        }
        let summary = run.finish().await.unwrap();
        (matches, summary)
    }

    fn urls(matches: &[Match]) -> HashSet<String> {
        matches.iter().map(|m| m.url.clone()).collect()
    }

    #[tokio::test]
    async fn test_reports_matching_urls() {
        let server = server_with(&[("/a", 200), ("/b", 404), ("/c", 200)]).await;
        let a = format!("{}/a", server.uri());
        let b = format!("{}/b", server.uri());
        let c = format!("{}/c", server.uri());

        let (matches, summary) = run_to_end(&pool(3, "200"), vec![a.clone(), b, c.clone()]).await;

        assert_eq!(urls(&matches), HashSet::from([a, c]));
        assert!(matches.iter().all(|m| m.status == 200));
        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.matched, 2);
        assert_eq!(summary.failed, 0);
    }

    #[tokio::test]
    async fn test_unreachable_url_is_skipped() {
        let server = server_with(&[("/a", 200), ("/b", 200)]).await;
        let a = format!("{}/a", server.uri());
        let b = format!("{}/b", server.uri());
        let dead = "http://127.0.0.1:1/".to_string();

        let (matches, summary) =
            run_to_end(&pool(2, "200-299"), vec![a.clone(), dead.clone(), b.clone()]).await;

        assert_eq!(urls(&matches), HashSet::from([a, b]));
        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.failed, 1);
    }

    #[tokio::test]
    async fn test_every_url_is_requested_once() {
        let routes: Vec<(String, u16)> = (0..40)
            .map(|i| (format!("/item/{}", i), if i % 2 == 0 { 200 } else { 500 }))
            .collect();
        let route_refs: Vec<(&str, u16)> =
            routes.iter().map(|(p, s)| (p.as_str(), *s)).collect();
        let server = server_with(&route_refs).await;

        let targets: Vec<String> = routes
            .iter()
            .map(|(p, _)| format!("{}{}", server.uri(), p))
            .collect();

        let (matches, summary) = run_to_end(&pool(7, "200"), targets).await;

        assert_eq!(matches.len(), 20);
        assert_eq!(urls(&matches).len(), 20);
        assert_eq!(summary.attempted, 40);
        // every route was mounted with expect(1)
        server.verify().await;
    }

    #[tokio::test]
    async fn test_single_worker_keeps_input_order() {
        let server = server_with(&[("/1", 200), ("/2", 200), ("/3", 301), ("/4", 200)]).await;
        let targets: Vec<String> = ["/1", "/2", "/3", "/4"]
            .iter()
            .map(|p| format!("{}{}", server.uri(), p))
            .collect();

        let (matches, _) = run_to_end(&pool(1, "200"), targets.clone()).await;

        let got: Vec<String> = matches.into_iter().map(|m| m.url).collect();
        assert_eq!(got, vec![targets[0].clone(), targets[1].clone(), targets[3].clone()]);
    }

    #[tokio::test]
    async fn test_more_workers_than_targets() {
        let server = server_with(&[("/only", 204)]).await;
        let only = format!("{}/only", server.uri());

        let (matches, summary) = run_to_end(&pool(16, "204"), vec![only.clone()]).await;

        assert_eq!(matches, vec![Match { url: only, status: 204 }]);
        assert_eq!(summary.attempted, 1);
        assert_eq!(summary.crashed_workers, 0);
    }

    #[tokio::test]
    async fn test_empty_input_finishes_cleanly() {
        let (matches, summary) = run_to_end(&pool(4, "200"), Vec::new()).await;
        assert!(matches.is_empty());
        assert_eq!(summary, RunSummary::default());
    }

    #[tokio::test]
    async fn test_empty_status_set_matches_nothing() {
        let server = server_with(&[("/a", 200)]).await;
        let (matches, summary) =
            run_to_end(&pool(2, "200-199"), vec![format!("{}/a", server.uri())]).await;
        assert!(matches.is_empty());
        assert_eq!(summary.attempted, 1);
    }

    #[tokio::test]
    async fn test_repeated_runs_give_same_set() {
        let server = MockServer::start().await;
        Mock::given(path("/up"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(path("/down"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let targets: Vec<String> = ["/up", "/down", "/up?x=1", "/down?x=1"]
            .iter()
            .map(|p| format!("{}{}", server.uri(), p))
            .collect();
        let pool = pool(3, "200");

        let (first, _) = run_to_end(&pool, targets.clone()).await;
        let (second, _) = run_to_end(&pool, targets).await;

        assert_eq!(urls(&first), urls(&second));
        assert_eq!(urls(&first).len(), 2);
    }

    #[tokio::test]
    async fn test_delay_applies_per_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let config = ProbeConfig::new(1, Duration::from_millis(50), None).unwrap();
        let pool = ProbePool::new(config, StatusSet::parse_lenient("200")).unwrap();
        let targets: Vec<String> = (0..3).map(|i| format!("{}/{}", server.uri(), i)).collect();

        let started = Instant::now();
        let (matches, _) = run_to_end(&pool, targets).await;

        assert_eq!(matches.len(), 3);
        assert!(started.elapsed() >= Duration::from_millis(150));
    }
}
