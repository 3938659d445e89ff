// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// The flags keep the short names people already use with this tool:
//   http-status-filter -f urls.txt -s 200,300-399 [-d 100] [-c 10]
//
// The parsed Cli is turned into a ProbeConfig and a StatusSet exactly once in
// main.rs; nothing downstream ever looks at the raw flags again.
// =============================================================================

use crate::config::{ProbeConfig, DEFAULT_CONCURRENCY};
use crate::error::ConfigError;
use crate::report::OutputFormat;
use crate::status::StatusSet;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;

// #[derive(Parser)] generates the parsing code from the struct below.
// -v is taken for --version (clap would use -V), and -h stays help.
#[derive(Parser, Debug)]
#[command(
    name = "http-status-filter",
    version,
    disable_version_flag = true,
    about = "Probe a list of URLs and print the ones that return an expected status code",
    long_about = "http-status-filter sends one GET request to every URL in a file and prints \
                  the URLs whose response status is in the given set. Transport errors are \
                  reported on stderr and never stop the run."
)]
pub struct Cli {
    /// File containing URLs, one per line ("-" reads stdin)
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: PathBuf,

    /// Expected status codes, comma-separated, or ranges (e.g. 200,201,300-399)
    #[arg(short = 's', long = "status", value_name = "SPEC")]
    pub status: String,

    /// Delay before each request, per worker, in milliseconds
    #[arg(short = 'd', long = "delay", value_name = "MS", default_value_t = 0)]
    pub delay: u64,

    /// Number of concurrent workers
    #[arg(short = 'c', long = "concurrency", value_name = "N", default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Per-request timeout in seconds (default: no timeout)
    #[arg(short = 't', long = "timeout", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Reject malformed status tokens instead of skipping them
    #[arg(long)]
    pub strict: bool,

    /// Print each match as a JSON object with its status code
    #[arg(long)]
    pub json: bool,

    /// Log debug details (worker lifecycle, run summary) to stderr
    #[arg(long)]
    pub verbose: bool,

    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,
}

impl Cli {
    pub fn probe_config(&self) -> Result<ProbeConfig, ConfigError> {
        ProbeConfig::new(
            self.concurrency,
            Duration::from_millis(self.delay),
            self.timeout.map(Duration::from_secs),
        )
    }

    pub fn status_set(&self) -> Result<StatusSet, ConfigError> {
        if self.strict {
            Ok(StatusSet::parse_strict(&self.status)?)
        } else {
            Ok(StatusSet::parse_lenient(&self.status))
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Plain
        }
    }
}
