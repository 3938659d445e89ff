// src/config.rs
// =============================================================================
// The pool configuration: how many workers, how long each one waits before
// a request, and an optional per-request timeout.
//
// It is built once from the CLI and never changed afterwards. Workers get a
// copy (it's Copy), so nothing about it needs locking.
// =============================================================================

use crate::error::ConfigError;
use std::num::NonZeroUsize;
use std::time::Duration;

/// Default worker count when -c isn't given.
pub const DEFAULT_CONCURRENCY: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Number of workers pulling from the intake queue
    pub concurrency: NonZeroUsize,
    /// Sleep before every request, per worker (zero = no sleep)
    pub delay: Duration,
    /// Per-request timeout. None leaves it to the HTTP stack's defaults.
    pub timeout: Option<Duration>,
}

impl ProbeConfig {
    /// Validates raw values into a config.
    ///
    /// A concurrency of 0 is rejected here, before any network activity.
    pub fn new(
        concurrency: usize,
        delay: Duration,
        timeout: Option<Duration>,
    ) -> Result<Self, ConfigError> {
        let concurrency = NonZeroUsize::new(concurrency).ok_or(ConfigError::ZeroConcurrency)?;

        Ok(Self {
            concurrency,
            delay,
            timeout,
        })
    }

    /// Builds the HTTP client every worker shares.
    ///
    /// Redirects use reqwest's default policy; no timeout is set unless one
    /// was configured.
    pub fn build_client(&self) -> reqwest::Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            concurrency: NonZeroUsize::new(DEFAULT_CONCURRENCY).unwrap_or(NonZeroUsize::MIN),
            delay: Duration::ZERO,
            timeout: None,
        }
    }
}
