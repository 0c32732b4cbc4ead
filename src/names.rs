// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Deferred display-name resolution
//!
//! Quantity changes for identities with no known name never wait on the
//! network. The identity is queued, and the whole queue is looked up once the
//! request stream goes quiet. Failed lookups go back on the queue for the
//! next window.

use crate::ledger::CollectionLedger;
use crate::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// Remote identity -> name lookup
#[async_trait]
pub trait NameLookup: Send + Sync {
    /// Resolve one identity to its display name
    async fn lookup(&self, identity: &str) -> Result<String>;
}

/// Outcome of one lookup, sent back to the session
#[derive(Debug)]
pub struct NameResolution {
    /// Identity that was looked up
    pub identity: String,
    /// Resolved name, or the failure
    pub name: Result<String>,
}

/// Pending identities awaiting a lookup
#[derive(Debug, Clone, Default)]
pub struct NameQueue {
    pending: Vec<String>,
}

impl NameQueue {
    /// Best currently-known name; always queues the identity for lookup.
    ///
    /// The queue does not deduplicate.
    pub fn resolve_or_defer(&mut self, ledger: &CollectionLedger, identity: &str) -> String {
        self.pending.push(identity.to_string());
        ledger
            .get(identity)
            .map(|e| e.label().to_string())
            .unwrap_or_else(|| identity.to_string())
    }

    /// Number of queued requests
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True when nothing is queued
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drain the queue for a lookup round
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending)
    }

    /// Apply a finished lookup round. Returns how many were re-queued.
    pub fn apply(&mut self, ledger: &mut CollectionLedger, results: Vec<NameResolution>) -> usize {
        let mut requeued = 0;
        for result in results {
            match result.name {
                Ok(name) => {
                    if !ledger.set_display_name(&result.identity, &name) {
                        debug!(identity = %result.identity, "resolved name for untracked identity");
                    }
                }
                Err(e) => {
                    debug!(identity = %result.identity, error = %e, "name lookup failed, re-queued");
                    self.pending.push(result.identity);
                    requeued += 1;
                }
            }
        }
        requeued
    }
}

/// Run every lookup in a round, one after another
pub async fn resolve_all(lookup: &dyn NameLookup, identities: Vec<String>) -> Vec<NameResolution> {
    let mut results = Vec::with_capacity(identities.len());
    for identity in identities {
        let name = lookup.lookup(&identity).await;
        results.push(NameResolution { identity, name });
    }
    results
}

#[derive(Deserialize)]
struct NameResponse {
    name: String,
}

/// Looks names up at `<base_url>/<identity>`, expecting `{"name": ".."}`
#[derive(Debug, Clone)]
pub struct HttpNameLookup {
    client: reqwest::Client,
    base_url: String,
}

impl HttpNameLookup {
    /// Create a lookup against `base_url`
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl NameLookup for HttpNameLookup {
    async fn lookup(&self, identity: &str) -> Result<String> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), identity);
        let response: NameResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::LedgerOptions;
    use crate::types::{CardEntry, Namespace};
    use crate::Error;

    #[test]
    fn test_resolve_or_defer_falls_back_and_always_queues() {
        let mut ledger = CollectionLedger::new(LedgerOptions::default());
        ledger.insert(CardEntry::new("known", Namespace::Card).with_name("Lixil"));
        let mut queue = NameQueue::default();

        assert_eq!(queue.resolve_or_defer(&ledger, "raw-id"), "raw-id");
        assert_eq!(queue.resolve_or_defer(&ledger, "known"), "Lixil");
        assert_eq!(queue.resolve_or_defer(&ledger, "raw-id"), "raw-id");
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn test_apply_updates_names_and_requeues_failures() {
        let mut ledger = CollectionLedger::new(LedgerOptions::default());
        ledger.insert(CardEntry::new("a", Namespace::Card));
        ledger.insert(CardEntry::new("b", Namespace::Card));
        let mut queue = NameQueue::default();

        let requeued = queue.apply(
            &mut ledger,
            vec![
                NameResolution { identity: "a".into(), name: Ok("Alpha".into()) },
                NameResolution { identity: "b".into(), name: Err(Error::Decode("timeout".into())) },
            ],
        );

        assert_eq!(requeued, 1);
        assert_eq!(ledger.get("a").unwrap().display_name, "Alpha");
        assert_eq!(queue.take(), vec!["b".to_string()]);
        assert!(queue.is_empty());
    }
}
