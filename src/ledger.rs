// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Collection ledger - quantity reconciliation across event sources
//!
//! Three sources claim authority over the same identity and arrive in any
//! order, sometimes twice:
//!
//! 1. incremental resyncs (`CardsAdded` / `CardsRemoved`),
//! 2. draft picks, applied immediately so pick recommendations stay current,
//! 3. full overwrite resyncs of one namespace.
//!
//! A draft pick is later restated by an incremental resync. The ledger keeps a
//! per-identity credit for every pick it applied early and spends that credit
//! instead of counting the restated copy a second time.

use crate::types::{CardEntry, Namespace, Valuation};
use std::collections::HashMap;
use tracing::{debug, info};

/// Behaviour switches the ledger consults but does not own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerOptions {
    /// Emit an info line for every quantity change outside bulk loads
    pub verbose_changes: bool,
}

impl Default for LedgerOptions {
    fn default() -> Self {
        Self { verbose_changes: true }
    }
}

/// What a single quantity change did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaOutcome {
    /// The delta was applied (clamped at zero)
    Applied {
        /// Quantity before the change
        before: u32,
        /// Quantity after the change
        after: u32,
    },
    /// A pending-pick credit absorbed the change
    Suppressed {
        /// Credit left for the identity after this call
        remaining: i64,
    },
    /// The ledger has no entry for the identity
    Unknown,
}

/// One line of a resync batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Holding {
    /// Identity the line refers to
    pub identity: String,
    /// Number of copies (occurrences, for removals)
    pub count: u32,
    /// Targets the extended-art quantity
    pub extended: bool,
}

impl Holding {
    /// A regular-art holding
    #[must_use]
    pub fn regular(identity: impl Into<String>, count: u32) -> Self {
        Self {
            identity: identity.into(),
            count,
            extended: false,
        }
    }

    /// An extended-art holding
    #[must_use]
    pub fn extended(identity: impl Into<String>, count: u32) -> Self {
        Self {
            identity: identity.into(),
            count,
            extended: true,
        }
    }
}

/// Counts of what a resync batch did, plus the identities it touched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResyncSummary {
    /// Quantity changes applied
    pub applied: usize,
    /// Changes absorbed by pending-pick credits
    pub suppressed: usize,
    /// Identities created by this batch
    pub created: usize,
    /// Lines naming an identity the ledger does not know
    pub unknown: usize,
    /// Every identity the batch changed or created, in batch order
    pub touched: Vec<String>,
}

impl ResyncSummary {
    fn record(&mut self, identity: &str, outcome: DeltaOutcome) {
        match outcome {
            DeltaOutcome::Applied { .. } => {
                self.applied += 1;
                self.touch(identity);
            }
            DeltaOutcome::Suppressed { .. } => self.suppressed += 1,
            DeltaOutcome::Unknown => self.unknown += 1,
        }
    }

    fn touch(&mut self, identity: &str) {
        if self.touched.last().map(String::as_str) != Some(identity) {
            self.touched.push(identity.to_string());
        }
    }
}

/// Per-identity credits for draft picks applied ahead of their resync
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingPicks {
    credits: HashMap<String, i64>,
}

impl PendingPicks {
    /// Current credit for an identity (zero when absent)
    #[must_use]
    pub fn credit(&self, identity: &str) -> i64 {
        self.credits.get(identity).copied().unwrap_or(0)
    }

    /// Adjust a credit by `amount`, clamping at zero. Returns the new credit.
    pub fn adjust(&mut self, identity: &str, amount: i64) -> i64 {
        let credit = self.credits.entry(identity.to_string()).or_insert(0);
        *credit = (*credit + amount).max(0);
        *credit
    }

    /// Drop the credit for an identity
    pub fn clear(&mut self, identity: &str) {
        self.credits.remove(identity);
    }

    /// Sum of all outstanding credits
    #[must_use]
    pub fn total(&self) -> i64 {
        self.credits.values().sum()
    }
}

/// Running valuation of drafted cards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickTotals {
    /// Picks from the pack currently being drafted
    pub pack: Valuation,
    /// Picks since the process started
    pub session: Valuation,
    /// Number of picks since the process started
    pub picks: u32,
}

impl Default for PickTotals {
    fn default() -> Self {
        Self {
            pack: Valuation::ZERO,
            session: Valuation::ZERO,
            picks: 0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Art {
    Regular,
    Extended,
}

/// Identity -> entry map plus the reconciliation state around it
#[derive(Debug, Clone, Default)]
pub struct CollectionLedger {
    entries: HashMap<String, CardEntry>,
    pending: PendingPicks,
    bulk_loading: bool,
    drafting: bool,
    options: LedgerOptions,
    totals: PickTotals,
}

impl CollectionLedger {
    /// Create an empty ledger
    #[must_use]
    pub fn new(options: LedgerOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Insert or replace an entry
    pub fn insert(&mut self, entry: CardEntry) {
        self.entries.insert(entry.identity.clone(), entry);
    }

    /// Look up an entry
    #[must_use]
    pub fn get(&self, identity: &str) -> Option<&CardEntry> {
        self.entries.get(identity)
    }

    /// Mutable lookup, for collaborators that refresh names and valuations
    pub fn get_mut(&mut self, identity: &str) -> Option<&mut CardEntry> {
        self.entries.get_mut(identity)
    }

    /// Whether the identity is tracked
    #[must_use]
    pub fn contains(&self, identity: &str) -> bool {
        self.entries.contains_key(identity)
    }

    /// Number of tracked identities
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is tracked
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate all entries in arbitrary order
    pub fn entries(&self) -> impl Iterator<Item = &CardEntry> {
        self.entries.values()
    }

    /// Entries with at least one copy, sorted by display name then identity
    #[must_use]
    pub fn owned_by_name(&self) -> Vec<&CardEntry> {
        let mut owned: Vec<&CardEntry> = self.entries.values().filter(|e| e.is_owned()).collect();
        owned.sort_by(|a, b| a.label().cmp(b.label()).then_with(|| a.identity.cmp(&b.identity)));
        owned
    }

    /// Outstanding pending-pick credits
    #[must_use]
    pub fn pending(&self) -> &PendingPicks {
        &self.pending
    }

    /// Running pick valuation
    #[must_use]
    pub fn pick_totals(&self) -> PickTotals {
        self.totals
    }

    /// Reset the per-pack pick total when a fresh pack is opened
    pub fn start_new_pack(&mut self) {
        self.totals.pack = Valuation::ZERO;
    }

    /// Behaviour switches in effect
    #[must_use]
    pub fn options(&self) -> LedgerOptions {
        self.options
    }

    /// Whether change notifications are currently silenced
    #[must_use]
    pub fn is_bulk_loading(&self) -> bool {
        self.bulk_loading
    }

    /// Silence change notifications until [`Self::end_bulk_load`]
    pub fn begin_bulk_load(&mut self) {
        self.bulk_loading = true;
    }

    /// Re-enable change notifications
    pub fn end_bulk_load(&mut self) {
        self.bulk_loading = false;
    }

    /// Replace the name of a tracked identity. Returns false when unknown.
    pub fn set_display_name(&mut self, identity: &str, name: &str) -> bool {
        match self.entries.get_mut(identity) {
            Some(entry) => {
                entry.display_name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Set absolute quantities, creating a card entry when the identity is new.
    ///
    /// Used by the cache loader; bypasses pending-pick credits.
    pub fn set_quantities(&mut self, identity: &str, regular: u32, extended: u32) {
        let entry = self
            .entries
            .entry(identity.to_string())
            .or_insert_with(|| CardEntry::new(identity, Namespace::Card));
        entry.regular_quantity = regular;
        entry.extended_quantity = extended;
    }

    // =========================================================================
    // Quantity changes
    // =========================================================================

    /// Apply a signed change to the regular-art quantity.
    ///
    /// Outside an active draft pick, a positive pending-pick credit for the
    /// identity absorbs the call: the credit drops by one and the quantity is
    /// left alone.
    pub fn apply_delta(&mut self, identity: &str, delta: i64) -> DeltaOutcome {
        if !self.entries.contains_key(identity) {
            debug!(identity, delta, "quantity change for unknown identity ignored");
            return DeltaOutcome::Unknown;
        }

        if !self.drafting && self.pending.credit(identity) > 0 {
            let remaining = self.pending.adjust(identity, -1);
            debug!(identity, remaining, "change absorbed by pending draft pick");
            return DeltaOutcome::Suppressed { remaining };
        }

        self.change_quantity(identity, delta, Art::Regular)
    }

    /// Apply a signed change to the extended-art quantity.
    ///
    /// Extended-art copies never come from draft picks, so no credit applies.
    pub fn apply_extended_delta(&mut self, identity: &str, delta: i64) -> DeltaOutcome {
        if !self.entries.contains_key(identity) {
            debug!(identity, delta, "extended-art change for unknown identity ignored");
            return DeltaOutcome::Unknown;
        }
        self.change_quantity(identity, delta, Art::Extended)
    }

    fn change_quantity(&mut self, identity: &str, delta: i64, art: Art) -> DeltaOutcome {
        let Some(entry) = self.entries.get_mut(identity) else {
            return DeltaOutcome::Unknown;
        };

        let slot = match art {
            Art::Regular => &mut entry.regular_quantity,
            Art::Extended => &mut entry.extended_quantity,
        };
        let before = *slot;
        let after = u32::try_from(i64::from(before).saturating_add(delta).max(0)).unwrap_or(u32::MAX);
        *slot = after;

        if !self.bulk_loading && self.options.verbose_changes {
            match art {
                Art::Regular => info!(
                    "New collection qty for '{}' is {} (modified by {})",
                    entry.label(),
                    after,
                    delta
                ),
                Art::Extended => info!(
                    "New extended-art qty for '{}' is {} (modified by {})",
                    entry.label(),
                    after,
                    delta
                ),
            }
        }

        DeltaOutcome::Applied { before, after }
    }

    /// Add `count` regular copies one credit at a time.
    ///
    /// Each outstanding credit absorbs exactly one copy; whatever is left is
    /// applied in a single change.
    fn add_copies(&mut self, identity: &str, count: u32, summary: &mut ResyncSummary) {
        let mut remaining = count;
        while remaining > 0 && !self.drafting && self.pending.credit(identity) > 0 {
            let outcome = self.apply_delta(identity, 1);
            summary.record(identity, outcome);
            remaining -= 1;
        }
        if remaining > 0 {
            let outcome = self.apply_delta(identity, i64::from(remaining));
            summary.record(identity, outcome);
        }
    }

    // =========================================================================
    // Draft picks
    // =========================================================================

    /// Apply a draft pick immediately and remember it as a pending credit.
    pub fn record_draft_pick(&mut self, identity: &str) -> DeltaOutcome {
        if !self.entries.contains_key(identity) {
            debug!(identity, "draft pick for unknown identity ignored");
            return DeltaOutcome::Unknown;
        }

        self.drafting = true;
        let outcome = self.apply_delta(identity, 1);
        self.pending.adjust(identity, 1);
        self.drafting = false;

        if let Some(entry) = self.entries.get(identity) {
            self.totals.pack = self.totals.pack.saturating_add(entry.valuation);
            self.totals.session = self.totals.session.saturating_add(entry.valuation);
            self.totals.picks += 1;
        }

        outcome
    }

    // =========================================================================
    // Resyncs
    // =========================================================================

    /// Replace every holding in `namespace` with `holdings`.
    ///
    /// All entries of the namespace drop to zero first; identities missing
    /// from `holdings` stay at zero. Zeroing also voids pending-pick credits,
    /// since the copies they stood for are gone. A holding that names an
    /// entry filed under the other namespace moves it into this one, starting
    /// from zero.
    pub fn resync_overwrite(&mut self, namespace: Namespace, holdings: &[Holding]) -> ResyncSummary {
        let mut summary = ResyncSummary::default();

        for entry in self.entries.values_mut().filter(|e| e.namespace == namespace) {
            entry.regular_quantity = 0;
            entry.extended_quantity = 0;
            self.pending.clear(&entry.identity);
        }

        self.begin_bulk_load();
        for holding in holdings {
            if let Some(entry) = self.entries.get_mut(&holding.identity) {
                if entry.namespace != namespace {
                    debug!(
                        identity = %holding.identity,
                        from = entry.namespace.label(),
                        to = namespace.label(),
                        "re-filing entry under overwrite namespace"
                    );
                    entry.namespace = namespace;
                    entry.regular_quantity = 0;
                    entry.extended_quantity = 0;
                    self.pending.clear(&holding.identity);
                }
            } else {
                self.insert(CardEntry::new(&holding.identity, namespace));
                summary.created += 1;
            }
            if holding.extended {
                let outcome = self.apply_extended_delta(&holding.identity, i64::from(holding.count));
                summary.record(&holding.identity, outcome);
            } else {
                self.add_copies(&holding.identity, holding.count, &mut summary);
            }
        }
        self.end_bulk_load();

        info!(
            namespace = namespace.label(),
            lines = holdings.len(),
            suppressed = summary.suppressed,
            "overwrite resync applied"
        );
        summary
    }

    /// Apply an additive/subtractive resync batch.
    ///
    /// New identities are created with the default valuation and their count
    /// taken as-is; a brand-new identity cannot hold a pending credit.
    pub fn resync_incremental(
        &mut self,
        namespace: Namespace,
        added: &[Holding],
        removed: &[Holding],
    ) -> ResyncSummary {
        let mut summary = ResyncSummary::default();

        for holding in added {
            if self.entries.contains_key(&holding.identity) {
                if holding.extended {
                    let outcome = self.apply_extended_delta(&holding.identity, i64::from(holding.count));
                    summary.record(&holding.identity, outcome);
                } else {
                    self.add_copies(&holding.identity, holding.count, &mut summary);
                }
            } else {
                let mut entry = CardEntry::new(&holding.identity, namespace);
                if holding.extended {
                    entry.extended_quantity = holding.count;
                } else {
                    entry.regular_quantity = holding.count;
                }
                if !self.bulk_loading && self.options.verbose_changes {
                    info!(
                        "New {} '{}' added with qty {}",
                        namespace.label(),
                        holding.identity,
                        holding.count
                    );
                }
                self.insert(entry);
                summary.created += 1;
                summary.touch(&holding.identity);
            }
        }

        for holding in removed {
            for _ in 0..holding.count {
                let outcome = if holding.extended {
                    self.apply_extended_delta(&holding.identity, -1)
                } else {
                    self.apply_delta(&holding.identity, -1)
                };
                summary.record(&holding.identity, outcome);
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_with(cards: &[(&str, u32)]) -> CollectionLedger {
        let mut ledger = CollectionLedger::new(LedgerOptions::default());
        for (id, qty) in cards {
            let mut entry = CardEntry::new(*id, Namespace::Card).with_name(format!("Card {id}"));
            entry.regular_quantity = *qty;
            ledger.insert(entry);
        }
        ledger
    }

    fn qty(ledger: &CollectionLedger, id: &str) -> u32 {
        ledger.get(id).map_or(0, |e| e.regular_quantity)
    }

    #[test]
    fn test_apply_delta_clamps_at_zero() {
        let mut ledger = ledger_with(&[("x", 2)]);
        let outcome = ledger.apply_delta("x", -5);
        assert_eq!(outcome, DeltaOutcome::Applied { before: 2, after: 0 });
        assert_eq!(qty(&ledger, "x"), 0);
    }

    #[test]
    fn test_apply_delta_unknown_identity_is_noop() {
        let mut ledger = ledger_with(&[]);
        assert_eq!(ledger.apply_delta("ghost", 3), DeltaOutcome::Unknown);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_draft_pick_then_resync_consumes_one_credit() {
        let mut ledger = ledger_with(&[("a", 1)]);
        ledger.record_draft_pick("a");
        assert_eq!(qty(&ledger, "a"), 2);
        assert_eq!(ledger.pending().credit("a"), 1);

        let summary = ledger.resync_incremental(Namespace::Card, &[Holding::regular("a", 1)], &[]);
        assert_eq!(qty(&ledger, "a"), 2);
        assert_eq!(summary.suppressed, 1);
        assert_eq!(ledger.pending().credit("a"), 0);

        // A second, genuine copy is counted.
        ledger.resync_incremental(Namespace::Card, &[Holding::regular("a", 1)], &[]);
        assert_eq!(qty(&ledger, "a"), 3);
    }

    #[test]
    fn test_multi_copy_add_spends_each_credit_once() {
        let mut ledger = ledger_with(&[("a", 0)]);
        ledger.record_draft_pick("a");
        ledger.record_draft_pick("a");
        assert_eq!(qty(&ledger, "a"), 2);

        let summary = ledger.resync_incremental(Namespace::Card, &[Holding::regular("a", 3)], &[]);
        assert_eq!(summary.suppressed, 2);
        assert_eq!(qty(&ledger, "a"), 3);
    }

    #[test]
    fn test_repeated_picks_are_not_swallowed_by_their_own_credit() {
        let mut ledger = ledger_with(&[("a", 0)]);
        ledger.record_draft_pick("a");
        ledger.record_draft_pick("a");
        ledger.record_draft_pick("a");
        assert_eq!(qty(&ledger, "a"), 3);
        assert_eq!(ledger.pending().credit("a"), 3);
    }

    #[test]
    fn test_extended_delta_ignores_credits() {
        let mut ledger = ledger_with(&[("a", 0)]);
        ledger.record_draft_pick("a");
        let outcome = ledger.apply_extended_delta("a", 1);
        assert_eq!(outcome, DeltaOutcome::Applied { before: 0, after: 1 });
        assert_eq!(ledger.pending().credit("a"), 1);
    }

    #[test]
    fn test_overwrite_only_touches_its_namespace() {
        let mut ledger = ledger_with(&[("card", 4)]);
        let mut item = CardEntry::new("chest", Namespace::Item);
        item.regular_quantity = 7;
        ledger.insert(item);

        ledger.resync_overwrite(Namespace::Card, &[]);
        assert_eq!(qty(&ledger, "card"), 0);
        assert_eq!(qty(&ledger, "chest"), 7);
        assert!(!ledger.is_bulk_loading());
    }

    #[test]
    fn test_overwrite_replaces_rather_than_merges() {
        let mut ledger = ledger_with(&[("a", 5), ("b", 2)]);
        if let Some(entry) = ledger.get_mut("a") {
            entry.extended_quantity = 1;
        }

        let summary = ledger.resync_overwrite(
            Namespace::Card,
            &[Holding::regular("a", 3), Holding::regular("new", 1)],
        );
        assert_eq!(qty(&ledger, "a"), 3);
        assert_eq!(ledger.get("a").map(|e| e.extended_quantity), Some(0));
        assert_eq!(qty(&ledger, "b"), 0);
        assert_eq!(qty(&ledger, "new"), 1);
        assert_eq!(summary.created, 1);
    }

    #[test]
    fn test_incremental_creates_unknown_with_default_valuation() {
        let mut ledger = ledger_with(&[]);
        let summary = ledger.resync_incremental(
            Namespace::Item,
            &[Holding::regular("pack", 4), Holding::extended("alt", 2)],
            &[],
        );
        assert_eq!(summary.created, 2);
        let pack = ledger.get("pack").unwrap();
        assert_eq!(pack.regular_quantity, 4);
        assert_eq!(pack.namespace, Namespace::Item);
        assert_eq!(pack.valuation, Valuation::default());
        assert_eq!(ledger.get("alt").unwrap().extended_quantity, 2);
        assert_eq!(summary.touched, vec!["pack".to_string(), "alt".to_string()]);
    }

    #[test]
    fn test_incremental_removes_once_per_occurrence() {
        let mut ledger = ledger_with(&[("abc", 3)]);
        ledger.resync_incremental(
            Namespace::Card,
            &[Holding::regular("abc", 2)],
            &[Holding::regular("abc", 1)],
        );
        assert_eq!(qty(&ledger, "abc"), 4);

        ledger.resync_incremental(
            Namespace::Card,
            &[],
            &[Holding::regular("abc", 1), Holding::regular("abc", 2)],
        );
        assert_eq!(qty(&ledger, "abc"), 1);
    }

    #[test]
    fn test_pick_totals_accumulate_and_reset_per_pack() {
        let mut ledger = ledger_with(&[]);
        ledger.insert(
            CardEntry::new("rare", Namespace::Card).with_valuation(Valuation { platinum: 40, gold: 900 }),
        );
        ledger.record_draft_pick("rare");
        ledger.record_draft_pick("rare");

        let totals = ledger.pick_totals();
        assert_eq!(totals.pack, Valuation { platinum: 80, gold: 1800 });
        assert_eq!(totals.picks, 2);

        ledger.start_new_pack();
        let totals = ledger.pick_totals();
        assert_eq!(totals.pack, Valuation::ZERO);
        assert_eq!(totals.session.platinum, 80);
    }

    #[test]
    fn test_pick_of_unknown_identity_records_no_credit() {
        let mut ledger = ledger_with(&[]);
        assert_eq!(ledger.record_draft_pick("ghost"), DeltaOutcome::Unknown);
        assert_eq!(ledger.pending().total(), 0);
        assert_eq!(ledger.pick_totals().picks, 0);
    }

    #[test]
    fn test_extreme_deltas_saturate() {
        let mut ledger = ledger_with(&[("x", 2)]);
        assert_eq!(
            ledger.apply_delta("x", i64::MAX),
            DeltaOutcome::Applied { before: 2, after: u32::MAX }
        );
        assert_eq!(
            ledger.apply_delta("x", i64::MIN),
            DeltaOutcome::Applied { before: u32::MAX, after: 0 }
        );
        assert_eq!(
            ledger.apply_extended_delta("x", i64::MAX),
            DeltaOutcome::Applied { before: 0, after: u32::MAX }
        );
    }

    #[test]
    fn test_removal_is_absorbed_by_outstanding_credit() {
        let mut ledger = ledger_with(&[("a", 1)]);
        ledger.record_draft_pick("a");
        assert_eq!(qty(&ledger, "a"), 2);

        let summary = ledger.resync_incremental(Namespace::Card, &[], &[Holding::regular("a", 1)]);
        assert_eq!(summary.suppressed, 1);
        assert_eq!(qty(&ledger, "a"), 2);
        assert_eq!(ledger.pending().credit("a"), 0);

        // With the credit spent the next removal is real.
        ledger.resync_incremental(Namespace::Card, &[], &[Holding::regular("a", 1)]);
        assert_eq!(qty(&ledger, "a"), 1);
    }

    #[test]
    fn test_overwrite_after_pick_restates_absolute_count() {
        let mut ledger = ledger_with(&[("p", 0)]);
        ledger.record_draft_pick("p");
        assert_eq!(ledger.pending().credit("p"), 1);

        let summary = ledger.resync_overwrite(Namespace::Card, &[Holding::regular("p", 1)]);
        assert_eq!(summary.suppressed, 0);
        assert_eq!(qty(&ledger, "p"), 1);
        assert_eq!(ledger.pending().credit("p"), 0);
    }

    #[test]
    fn test_overwrite_refiles_entry_from_other_namespace() {
        let mut ledger = ledger_with(&[]);
        // Cache lines carry no namespace, so a chest loads as a card.
        ledger.set_quantities("chest", 3, 0);

        let summary = ledger.resync_overwrite(Namespace::Item, &[Holding::regular("chest", 3)]);
        assert_eq!(summary.created, 0);
        assert_eq!(qty(&ledger, "chest"), 3);
        assert_eq!(ledger.get("chest").unwrap().namespace, Namespace::Item);

        ledger.resync_overwrite(Namespace::Card, &[]);
        assert_eq!(qty(&ledger, "chest"), 3);
    }

    #[test]
    fn test_pending_credit_never_negative() {
        let mut picks = PendingPicks::default();
        assert_eq!(picks.adjust("a", -3), 0);
        assert_eq!(picks.adjust("a", 2), 2);
        assert_eq!(picks.adjust("a", -5), 0);
    }

    #[test]
    fn test_owned_by_name_sorts_and_filters() {
        let mut ledger = ledger_with(&[("2", 1), ("1", 0), ("3", 2)]);
        ledger.set_display_name("3", "Aaa");
        let names: Vec<&str> = ledger.owned_by_name().iter().map(|e| e.label()).collect();
        assert_eq!(names, vec!["Aaa", "Card 2"]);
    }
}
