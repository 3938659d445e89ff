// src/status/matcher.rs
// =============================================================================
// This module turns a status spec string into a set of status codes.
//
// Spec format: comma-separated tokens, each token is either
// - a single code:            "200"
// - an inclusive range:       "300-399"
//
// Two parsing modes:
// - lenient (default): a token that doesn't parse is skipped silently
// - strict (--strict): the first bad token is reported as an error
//
// Rust concepts:
// - Bitsets: A fixed array of u64 where each bit is one status code
// - Result<T, E>: Strict parsing returns an error instead of skipping
// - impl FromStr: Lets callers write "200".parse::<StatusSet>()
// =============================================================================

use crate::error::StatusSpecError;
use std::fmt;
use std::str::FromStr;

/// Highest status code the set can hold. Anything above can't come back
/// from an HTTP server, so range bounds are clamped to it.
pub const MAX_STATUS_CODE: u16 = 999;

const WORDS: usize = (MAX_STATUS_CODE as usize / 64) + 1;

/// A set of HTTP status codes that count as a match.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct StatusSet {
    bits: [u64; WORDS],
}

impl StatusSet {
    /// Creates an empty set (nothing matches).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a spec, skipping tokens that don't parse.
    ///
    /// An inverted range like "200-199" adds nothing. Empty or garbage input
    /// gives an empty set.
    pub fn parse_lenient(spec: &str) -> Self {
        let mut set = Self::new();

        for token in spec.split(',') {
            match parse_token(token) {
                Ok(Some((start, end))) => set.insert_range(start, end),
                Ok(None) => {}
                Err(e) => log::debug!("Skipping status token: {}", e),
            }
        }

        set
    }

    /// Parses a spec, failing on the first token that doesn't parse.
    ///
    /// Inverted ranges and tokens with more than one '-' are errors here,
    /// whereas lenient mode ignores them.
    pub fn parse_strict(spec: &str) -> Result<Self, StatusSpecError> {
        let mut set = Self::new();

        for token in spec.split(',') {
            if token.matches('-').count() > 1 {
                return Err(StatusSpecError::InvalidRange {
                    token: token.to_string(),
                });
            }

            let (start, end) = parse_token(token)?.ok_or_else(|| StatusSpecError::InvertedRange {
                token: token.to_string(),
            })?;

            set.insert_range(start, end);
        }

        Ok(set)
    }

    /// Adds a single code. Codes above MAX_STATUS_CODE are ignored.
    pub fn insert(&mut self, code: u16) {
        if code <= MAX_STATUS_CODE {
            let code = code as usize;
            self.bits[code / 64] |= 1 << (code % 64);
        }
    }

    /// Returns true if `code` is in the set.
    pub fn matches(&self, code: u16) -> bool {
        if code > MAX_STATUS_CODE {
            return false;
        }
        let code = code as usize;
        self.bits[code / 64] & (1 << (code % 64)) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|word| *word == 0)
    }

    pub fn len(&self) -> usize {
        self.bits.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Iterates over the codes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        (0..=MAX_STATUS_CODE).filter(move |code| self.matches(*code))
    }

    // Inclusive on both ends. Bounds past the representable range are
    // clamped; start > end adds nothing.
    fn insert_range(&mut self, start: i64, end: i64) {
        let start = start.max(0);
        let end = end.min(MAX_STATUS_CODE as i64);

        for code in start..=end {
            self.insert(code as u16);
        }
    }
}

impl FromStr for StatusSet {
    type Err = StatusSpecError;

    /// `str::parse` uses strict parsing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_strict(s)
    }
}

impl fmt::Debug for StatusSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

// Parses one token into an inclusive (start, end) pair.
//
// Returns:
//   Ok(Some(..)) = a code or a non-empty range
//   Ok(None)     = a well-formed but inverted range
//   Err(..)      = the token (or one of its bounds) isn't an integer
fn parse_token(token: &str) -> Result<Option<(i64, i64)>, StatusSpecError> {
    if token.contains('-') {
        // "300-399-500" only looks at the first two parts
        let mut parts = token.split('-');
        let start = parts.next().and_then(|s| s.parse::<i64>().ok());
        let end = parts.next().and_then(|s| s.parse::<i64>().ok());

        match (start, end) {
            (Some(start), Some(end)) if start <= end => Ok(Some((start, end))),
            (Some(_), Some(_)) => Ok(None),
            _ => Err(StatusSpecError::InvalidRange {
                token: token.to_string(),
            }),
        }
    } else {
        let code = token
            .parse::<i64>()
            .map_err(|_| StatusSpecError::InvalidCode {
                token: token.to_string(),
            })?;
        Ok(Some((code, code)))
    }
}
