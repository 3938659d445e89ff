// src/status/mod.rs
// =============================================================================
// This module decides which HTTP status codes count as a "match".
//
// Submodules:
// - matcher: Parses a status spec like "200,201,300-399" into a StatusSet
//
// The StatusSet is built once before any worker starts and is only ever read
// afterwards, so every worker can share it through an Arc.
// =============================================================================

mod matcher;

pub use matcher::StatusSet;
