// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Build the config and status set (bad values stop us here)
// 3. Read the target list (an unreadable file stops us here)
// 4. Start the worker pool and print matches as they arrive
// 5. Exit with proper code (0 = run finished, 2 = startup error)
//
// Nothing touches the network before steps 2 and 3 have succeeded.
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli;       // src/cli.rs - command-line parsing
mod config;    // src/config.rs - pool configuration
mod error;     // src/error.rs - typed errors
mod input;     // src/input.rs - reading the URL list
mod logging;   // src/logging.rs - stderr diagnostics
mod probe;     // src/probe/ - worker pool
mod report;    // src/report.rs - printing matches
mod status;    // src/status/ - status code matching

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use probe::ProbePool;

#[tokio::main]
async fn main() {
    // --help, --version and missing required flags exit inside parse()
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = every target was processed (matches or not)
//   Err   = the run couldn't start, or stdout went away
async fn run(cli: Cli) -> Result<i32> {
    let config = cli.probe_config()?;
    let matcher = cli.status_set()?;

    if matcher.is_empty() {
        log::warn!("Status spec '{}' matches no status codes", cli.status);
    } else {
        log::debug!("Matching {} status code(s): {:?}", matcher.len(), matcher);
    }

    let targets = input::read_targets(&cli.file).await?;
    log::debug!("Read {} target(s) from {}", targets.len(), cli.file.display());

    let pool = ProbePool::new(config, matcher).context("Failed to create HTTP client")?;
    let mut run = pool.start(targets).await;

    // Drains until the coordinator closes the output channel
    let mut stdout = std::io::stdout();
    report::collect(&mut run.results, cli.output_format(), &mut stdout)
        .await
        .context("Failed to write results")?;

    let summary = run.finish().await.context("Coordinator task failed")?;
    log::debug!("Done: {}", summary);

    Ok(0)
}
