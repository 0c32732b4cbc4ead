// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Crate-level error type

/// Errors surfaced by the library layer.
///
/// Nothing in the ledger itself is fatal; these come from decoding, I/O and
/// the outbound HTTP collaborators.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Filesystem failure while reading or writing the cache
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload or document was not valid JSON
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Outbound request failed or returned an error status
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsed but did not have the expected shape
    #[error("malformed event: {0}")]
    Decode(String),

    /// Configuration could not be assembled
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Cold start with no usable valuation data
    #[error("no price data available from {0}")]
    NoPriceData(String),

    /// The session actor has shut down
    #[error("session actor is no longer running")]
    ActorGone,
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;
