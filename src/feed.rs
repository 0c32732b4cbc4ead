// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Valuation feed
//!
//! A bulk JSON document mapping identity to two currency prices, a rarity tag
//! and a namespace. It only ever touches valuations and names, never
//! quantities.

use crate::ledger::CollectionLedger;
use crate::types::{CardEntry, Namespace, Valuation, DRAFT_PACK_IDENTITY};
use crate::{Error, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[derive(Deserialize)]
struct FeedDocument {
    #[serde(default)]
    cards: Vec<Value>,
}

#[derive(Deserialize)]
struct FeedLine {
    #[serde(default)]
    identity: String,
    #[serde(default)]
    name: String,
    rarity: Option<String>,
    platinum: Option<u32>,
    gold: Option<u32>,
    #[serde(default)]
    kind: Namespace,
}

/// One priced identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    /// Identity being priced
    pub identity: String,
    /// Name as published by the feed (may be empty)
    pub name: String,
    /// Rarity tag
    pub rarity: Option<String>,
    /// Both prices, with a missing side synthesized
    pub valuation: Valuation,
    /// Card or item
    pub namespace: Namespace,
}

/// Counts from applying a feed to a ledger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    /// Existing entries repriced
    pub updated: usize,
    /// Entries created with zero quantity
    pub created: usize,
}

/// A parsed valuation document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValuationFeed {
    /// Every entry that carried an identity
    pub entries: Vec<FeedEntry>,
}

impl ValuationFeed {
    /// Parse the document; entries that do not decode are skipped
    pub fn parse(text: &str, gold_per_platinum: u32) -> Result<Self> {
        let document: FeedDocument = serde_json::from_str(text)?;
        let entries = document
            .cards
            .into_iter()
            .filter_map(|raw| match serde_json::from_value::<FeedLine>(raw) {
                Ok(line) if !line.identity.trim().is_empty() => Some(FeedEntry {
                    identity: line.identity.trim().to_string(),
                    name: line.name.trim().to_string(),
                    rarity: line.rarity,
                    valuation: Valuation::synthesize(line.platinum, line.gold, gold_per_platinum),
                    namespace: line.kind,
                }),
                Ok(_) => {
                    debug!("skipping valuation entry without identity");
                    None
                }
                Err(e) => {
                    debug!(error = %e, "skipping malformed valuation entry");
                    None
                }
            })
            .collect();
        Ok(Self { entries })
    }

    /// Platinum price of a draft booster, when the feed lists one
    #[must_use]
    pub fn pack_cost(&self) -> Option<u32> {
        self.entries
            .iter()
            .find(|e| e.identity == DRAFT_PACK_IDENTITY)
            .map(|e| e.valuation.platinum)
    }

    /// Reprice the ledger, creating unknown identities with zero copies
    pub fn apply(&self, ledger: &mut CollectionLedger) -> ApplySummary {
        let mut summary = ApplySummary::default();

        ledger.begin_bulk_load();
        for item in &self.entries {
            if let Some(entry) = ledger.get_mut(&item.identity) {
                if !item.name.is_empty() {
                    entry.display_name.clone_from(&item.name);
                }
                entry.valuation = item.valuation;
                entry.rarity.clone_from(&item.rarity);
                entry.namespace = item.namespace;
                summary.updated += 1;
            } else {
                let mut entry = CardEntry::new(&item.identity, item.namespace)
                    .with_name(item.name.clone())
                    .with_valuation(item.valuation);
                entry.rarity.clone_from(&item.rarity);
                ledger.insert(entry);
                summary.created += 1;
            }
        }
        ledger.end_bulk_load();

        summary
    }
}

/// Where valuation data comes from
#[derive(Debug, Clone)]
pub enum FeedSource {
    /// Fetched over HTTP
    Remote {
        /// Shared HTTP client
        client: reqwest::Client,
        /// Document URL
        url: String,
    },
    /// Read from disk
    Local(PathBuf),
}

impl FeedSource {
    /// Human-readable origin for log lines
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Remote { url, .. } => url.clone(),
            Self::Local(path) => path.display().to_string(),
        }
    }

    /// Fetch and parse the document
    pub async fn fetch(&self, gold_per_platinum: u32) -> Result<ValuationFeed> {
        info!("Retrieving prices from {}", self.describe());
        let text = match self {
            Self::Remote { client, url } => {
                client.get(url).send().await?.error_for_status()?.text().await?
            }
            Self::Local(path) => tokio::fs::read_to_string(path).await?,
        };
        let feed = ValuationFeed::parse(&text, gold_per_platinum)?;
        info!(entries = feed.entries.len(), "Price data processed");
        Ok(feed)
    }

    /// Cold-start fetch: with no earlier data a failure is fatal
    pub async fn fetch_required(&self, gold_per_platinum: u32) -> Result<ValuationFeed> {
        match self.fetch(gold_per_platinum).await {
            Ok(feed) if !feed.entries.is_empty() => Ok(feed),
            Ok(_) => Err(Error::NoPriceData(self.describe())),
            Err(e) => {
                warn!(error = %e, "Could not retrieve price data");
                Err(Error::NoPriceData(self.describe()))
            }
        }
    }
}
