// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! hexapi library - collection and draft companion for the Hex client API
//!
//! This crate keeps an in-memory ledger of owned cards and inventory items,
//! reconciles it against the event notifications the game client posts, and
//! persists a warm-start cache with a trailing debounce.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod actor;
pub mod cache;
pub mod commands;
pub mod config;
pub mod debounce;
pub mod draft;
pub mod error;
pub mod events;
pub mod feed;
pub mod ledger;
pub mod names;
pub mod server;
pub mod session;
pub mod version;

pub use error::{Error, Result};

/// Core data types shared by the ledger, the feed and the cache
pub mod types {
    use serde::{Deserialize, Serialize};

    /// Identity of the draft booster; its platinum valuation is the pack cost
    pub const DRAFT_PACK_IDENTITY: &str = "draftpak-0000-0000-0000-000000000000";

    /// Default exchange ratio between the two currencies
    pub const DEFAULT_GOLD_PER_PLATINUM: u32 = 100;

    // =========================================================================
    // Namespace
    // =========================================================================

    /// Which half of the identity space an entry belongs to
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Namespace {
        /// Tradeable card
        #[default]
        Card,
        /// Non-card inventory item (packs, chests, equipment)
        Item,
    }

    impl Namespace {
        /// Short label used in log lines
        #[must_use]
        pub fn label(&self) -> &'static str {
            match self {
                Self::Card => "card",
                Self::Item => "item",
            }
        }
    }

    // =========================================================================
    // Valuation
    // =========================================================================

    /// Market value of one copy in both in-game currencies
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Valuation {
        /// Platinum price
        pub platinum: u32,
        /// Gold price
        pub gold: u32,
    }

    impl Default for Valuation {
        fn default() -> Self {
            Self { platinum: 1, gold: 1 }
        }
    }

    impl Valuation {
        /// Zero in both currencies, used for running totals
        pub const ZERO: Self = Self { platinum: 0, gold: 0 };

        /// Build a valuation from possibly-missing prices.
        ///
        /// A missing side is derived from the other through `gold_per_platinum`.
        /// With neither side known the default 1/1 valuation is used.
        #[must_use]
        pub fn synthesize(platinum: Option<u32>, gold: Option<u32>, gold_per_platinum: u32) -> Self {
            let ratio = gold_per_platinum.max(1);
            match (platinum, gold) {
                (Some(platinum), Some(gold)) => Self { platinum, gold },
                (Some(platinum), None) => Self {
                    platinum,
                    gold: platinum.saturating_mul(ratio),
                },
                (None, Some(gold)) => Self {
                    platinum: gold / ratio,
                    gold,
                },
                (None, None) => Self::default(),
            }
        }

        /// Add another valuation, saturating at `u32::MAX`
        #[must_use]
        pub fn saturating_add(self, other: Self) -> Self {
            Self {
                platinum: self.platinum.saturating_add(other.platinum),
                gold: self.gold.saturating_add(other.gold),
            }
        }
    }

    // =========================================================================
    // CardEntry
    // =========================================================================

    /// One tracked identity in the collection
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CardEntry {
        /// Stable identifier (a UUID in practice)
        pub identity: String,
        /// Human-readable name, empty until known
        #[serde(default)]
        pub display_name: String,
        /// Normal-art copies owned
        pub regular_quantity: u32,
        /// Extended-art copies owned
        pub extended_quantity: u32,
        /// Card or inventory item
        pub namespace: Namespace,
        /// Per-copy market value
        pub valuation: Valuation,
        /// Rarity tag from the valuation feed
        #[serde(default)]
        pub rarity: Option<String>,
    }

    impl CardEntry {
        /// Create an entry with no copies and the default valuation
        #[must_use]
        pub fn new(identity: impl Into<String>, namespace: Namespace) -> Self {
            Self {
                identity: identity.into(),
                display_name: String::new(),
                regular_quantity: 0,
                extended_quantity: 0,
                namespace,
                valuation: Valuation::default(),
                rarity: None,
            }
        }

        /// Builder-style name setter
        #[must_use]
        pub fn with_name(mut self, name: impl Into<String>) -> Self {
            self.display_name = name.into();
            self
        }

        /// Builder-style valuation setter
        #[must_use]
        pub fn with_valuation(mut self, valuation: Valuation) -> Self {
            self.valuation = valuation;
            self
        }

        /// Name for display, falling back to the raw identity
        #[must_use]
        pub fn label(&self) -> &str {
            if self.display_name.is_empty() {
                &self.identity
            } else {
                &self.display_name
            }
        }

        /// True when at least one copy of either art is owned
        #[must_use]
        pub fn is_owned(&self) -> bool {
            self.regular_quantity > 0 || self.extended_quantity > 0
        }

        /// One-line summary used in draft reports and the `show` command
        #[must_use]
        pub fn summary(&self) -> String {
            format!(
                "'{}' [Qty: {}] - {}p and {}g",
                self.label(),
                self.regular_quantity,
                self.valuation.platinum,
                self.valuation.gold
            )
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_synthesize_fills_missing_side() {
            assert_eq!(
                Valuation::synthesize(Some(4), None, 100),
                Valuation { platinum: 4, gold: 400 }
            );
            assert_eq!(
                Valuation::synthesize(None, Some(250), 100),
                Valuation { platinum: 2, gold: 250 }
            );
            assert_eq!(Valuation::synthesize(None, None, 100), Valuation::default());
        }

        #[test]
        fn test_synthesize_zero_ratio_does_not_divide_by_zero() {
            assert_eq!(
                Valuation::synthesize(None, Some(7), 0),
                Valuation { platinum: 7, gold: 7 }
            );
        }

        #[test]
        fn test_label_falls_back_to_identity() {
            let entry = CardEntry::new("abc-123", Namespace::Card);
            assert_eq!(entry.label(), "abc-123");
            assert_eq!(entry.with_name("Lixil").label(), "Lixil");
        }
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::types::*;
    pub use anyhow::{Context, Result};
}
