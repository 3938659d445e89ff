// src/error.rs
// =============================================================================
// Typed errors for the parts of the program that can fail.
//
// - ConfigError:     the run can't start (bad concurrency, bad status spec)
// - StatusSpecError: one token of the status spec is malformed (strict mode)
// - ProbeError:      one URL failed at the network layer; the run continues
//
// main.rs wraps these in anyhow::Error, so they only need a good Display.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("invalid status spec: {0}")]
    StatusSpec(#[from] StatusSpecError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatusSpecError {
    #[error("'{token}' is not a status code")]
    InvalidCode { token: String },

    #[error("'{token}' is not a valid range (expected START-END)")]
    InvalidRange { token: String },

    #[error("'{token}' is an empty range (start is greater than end)")]
    InvertedRange { token: String },
}

#[derive(Debug, Error)]
pub enum ProbeError {
    /// DNS, connection refused, TLS, timeout, invalid URL...
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
