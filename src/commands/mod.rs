// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod completions;
pub mod config;
pub mod export;
pub mod serve;
pub mod show;

use crate::cache;
use crate::config::Settings;
use crate::feed::FeedSource;
use crate::session::Session;
use anyhow::{Context, Result};
use tracing::warn;

/// Shared HTTP client for every outbound call
pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("hexapi/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")
}

/// Local price file when configured, otherwise the remote document
#[must_use]
pub fn feed_source(settings: &Settings, client: &reqwest::Client) -> FeedSource {
    match &settings.local_price_file {
        Some(path) => FeedSource::Local(path.clone()),
        None => FeedSource::Remote {
            client: client.clone(),
            url: settings.price_url.clone(),
        },
    }
}

/// Build a session from valuations and the warm-start cache.
///
/// With `require_prices` a missing or empty feed is fatal; otherwise it is
/// logged and the cache is loaded on its own.
pub async fn load_session(settings: &Settings, source: &FeedSource, require_prices: bool) -> Result<Session> {
    let mut session = Session::new(settings.ledger_options(), settings.name_lookup_url.is_some());

    if require_prices {
        let feed = source
            .fetch_required(settings.gold_per_platinum)
            .await
            .context("No usable price data available")?;
        session.apply_feed(&feed);
    } else {
        match source.fetch(settings.gold_per_platinum).await {
            Ok(feed) => {
                session.apply_feed(&feed);
            }
            Err(e) => warn!(error = %e, "Continuing without price data"),
        }
    }

    cache::load_file(session.ledger_mut(), &settings.collection_file)
        .await
        .with_context(|| format!("Failed to read {}", settings.collection_file.display()))?;

    Ok(session)
}
