// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Invariant tests for the collection ledger
//!
//! These tests verify critical invariants:
//! 1. Quantities never go negative under any delta sequence
//! 2. Draft picks are never double counted by the resync that follows
//! 3. Overwrite resyncs are namespace-scoped full replacements
//! 4. The warm-start cache preserves every nonzero quantity

use hexapi::cache;
use hexapi::ledger::{CollectionLedger, DeltaOutcome, Holding, LedgerOptions};
use hexapi::types::{CardEntry, Namespace};
use proptest::prelude::*;

// =============================================================================
// Test Helpers
// =============================================================================

fn quiet() -> LedgerOptions {
    LedgerOptions {
        verbose_changes: false,
    }
}

fn ledger_with(entries: &[(&str, Namespace, u32, u32)]) -> CollectionLedger {
    let mut ledger = CollectionLedger::new(quiet());
    for (id, ns, regular, extended) in entries {
        let mut entry = CardEntry::new(*id, *ns);
        entry.regular_quantity = *regular;
        entry.extended_quantity = *extended;
        ledger.insert(entry);
    }
    ledger
}

fn regular(ledger: &CollectionLedger, id: &str) -> u32 {
    ledger.get(id).map_or(0, |e| e.regular_quantity)
}

// =============================================================================
// Invariant 1: Clamping
// =============================================================================

#[test]
fn test_remove_more_than_owned_clamps_to_zero() {
    let mut ledger = ledger_with(&[("x", Namespace::Card, 2, 0)]);
    let outcome = ledger.apply_delta("x", -5);
    assert_eq!(outcome, DeltaOutcome::Applied { before: 2, after: 0 });
    assert_eq!(regular(&ledger, "x"), 0);
}

#[test]
fn test_unknown_identity_is_a_no_op() {
    let mut ledger = ledger_with(&[("x", Namespace::Card, 2, 0)]);
    assert_eq!(ledger.apply_delta("nobody", 3), DeltaOutcome::Unknown);
    assert_eq!(ledger.len(), 1);
}

proptest! {
    #[test]
    fn prop_single_net_delta_matches_clamped_sum(
        initial in 0u32..50,
        deltas in prop::collection::vec(-20i64..20, 0..30),
    ) {
        let mut ledger = ledger_with(&[("x", Namespace::Card, initial, 0)]);
        let net: i64 = deltas.iter().sum();
        ledger.apply_delta("x", net);
        let expected = (i64::from(initial) + net).max(0);
        prop_assert_eq!(i64::from(regular(&ledger, "x")), expected);
    }

    #[test]
    fn prop_step_by_step_walk_never_goes_negative(
        initial in 0u32..50,
        deltas in prop::collection::vec(-20i64..20, 0..30),
    ) {
        let mut ledger = ledger_with(&[("x", Namespace::Card, initial, 0)]);
        let mut expected = i64::from(initial);
        for delta in &deltas {
            ledger.apply_delta("x", *delta);
            expected = (expected + delta).max(0);
            prop_assert_eq!(i64::from(regular(&ledger, "x")), expected);
        }
    }

    #[test]
    fn prop_pending_credits_never_negative(
        ops in prop::collection::vec((any::<bool>(), 1u32..4), 0..40),
    ) {
        let mut ledger = ledger_with(&[("x", Namespace::Card, 0, 0)]);
        for (pick, count) in ops {
            if pick {
                ledger.record_draft_pick("x");
            } else {
                ledger.resync_incremental(Namespace::Card, &[Holding::regular("x", count)], &[]);
            }
            prop_assert!(ledger.pending().credit("x") >= 0);
        }
    }
}

// =============================================================================
// Invariant 2: Pick suppression
// =============================================================================

#[test]
fn test_draft_pick_then_resync_is_counted_once() {
    let mut ledger = ledger_with(&[("p", Namespace::Card, 1, 0)]);

    ledger.record_draft_pick("p");
    let after_pick = regular(&ledger, "p");
    assert_eq!(after_pick, 2);

    ledger.resync_incremental(Namespace::Card, &[Holding::regular("p", 1)], &[]);
    assert_eq!(regular(&ledger, "p"), after_pick);
    assert_eq!(ledger.pending().credit("p"), 0);

    // A second copy from a later resync is real.
    ledger.resync_incremental(Namespace::Card, &[Holding::regular("p", 1)], &[]);
    assert_eq!(regular(&ledger, "p"), after_pick + 1);
}

#[test]
fn test_extended_copies_ignore_credits() {
    let mut ledger = ledger_with(&[("p", Namespace::Card, 0, 0)]);
    ledger.record_draft_pick("p");
    ledger.resync_incremental(Namespace::Card, &[Holding::extended("p", 1)], &[]);
    assert_eq!(ledger.get("p").unwrap().extended_quantity, 1);
    assert_eq!(ledger.pending().credit("p"), 1);
}

#[test]
fn test_removal_with_outstanding_credit_is_absorbed() {
    let mut ledger = ledger_with(&[("p", Namespace::Card, 1, 0)]);
    ledger.record_draft_pick("p");

    let outcome = ledger.apply_delta("p", -1);
    assert_eq!(outcome, DeltaOutcome::Suppressed { remaining: 0 });
    assert_eq!(regular(&ledger, "p"), 2);
}

#[test]
fn test_overwrite_after_pick_is_not_swallowed() {
    let mut ledger = ledger_with(&[("p", Namespace::Card, 0, 0)]);
    ledger.record_draft_pick("p");

    ledger.resync_overwrite(Namespace::Card, &[Holding::regular("p", 1)]);
    assert_eq!(regular(&ledger, "p"), 1);
    assert_eq!(ledger.pending().credit("p"), 0);
}

// =============================================================================
// Invariant 3: Overwrite scope
// =============================================================================

#[test]
fn test_cached_item_is_refiled_by_inventory_overwrite() {
    let mut ledger = CollectionLedger::new(quiet());
    cache::load_into(&mut ledger, "chest : 3 : 0\n");
    assert_eq!(ledger.get("chest").unwrap().namespace, Namespace::Card);

    ledger.resync_overwrite(Namespace::Item, &[Holding::regular("chest", 3)]);
    assert_eq!(regular(&ledger, "chest"), 3);
    assert_eq!(ledger.get("chest").unwrap().namespace, Namespace::Item);

    ledger.resync_overwrite(Namespace::Card, &[]);
    assert_eq!(regular(&ledger, "chest"), 3);
}

#[test]
fn test_empty_card_overwrite_leaves_items_alone() {
    let mut ledger = ledger_with(&[
        ("c1", Namespace::Card, 3, 1),
        ("c2", Namespace::Card, 1, 0),
        ("i1", Namespace::Item, 7, 0),
    ]);

    ledger.resync_overwrite(Namespace::Card, &[]);

    for id in ["c1", "c2"] {
        let entry = ledger.get(id).unwrap();
        assert_eq!((entry.regular_quantity, entry.extended_quantity), (0, 0));
    }
    assert_eq!(regular(&ledger, "i1"), 7);
}

#[test]
fn test_overwrite_is_replacement_not_merge() {
    let mut ledger = ledger_with(&[("c1", Namespace::Card, 3, 0), ("c2", Namespace::Card, 4, 0)]);
    ledger.resync_overwrite(Namespace::Card, &[Holding::regular("c1", 2)]);
    assert_eq!(regular(&ledger, "c1"), 2);
    assert_eq!(regular(&ledger, "c2"), 0);
    assert!(!ledger.is_bulk_loading());
}

// =============================================================================
// Invariant 4: Cache round-trip
// =============================================================================

proptest! {
    #[test]
    fn prop_cache_round_trip_keeps_nonzero_entries(
        quantities in prop::collection::btree_map("[a-z0-9-]{1,12}", (0u32..5, 0u32..3), 0..20),
    ) {
        let mut ledger = CollectionLedger::new(quiet());
        for (id, (regular, extended)) in &quantities {
            ledger.set_quantities(id, *regular, *extended);
        }

        let mut reloaded = CollectionLedger::new(quiet());
        cache::load_into(&mut reloaded, &cache::serialize(&ledger));

        for (id, (regular, extended)) in &quantities {
            if *regular == 0 && *extended == 0 {
                prop_assert!(!reloaded.contains(id));
            } else {
                let entry = reloaded.get(id).unwrap();
                prop_assert_eq!((entry.regular_quantity, entry.extended_quantity), (*regular, *extended));
            }
        }
    }
}

#[test]
fn test_cache_then_incremental_example() {
    let mut seed = CollectionLedger::new(quiet());
    seed.set_quantities("abc", 3, 0);
    seed.set_quantities("def", 0, 0);

    let text = cache::serialize(&seed);
    assert_eq!(text, "abc : 3 : 0\n");

    let mut ledger = CollectionLedger::new(quiet());
    cache::load_into(&mut ledger, &text);
    assert!(!ledger.contains("def"));

    ledger.resync_incremental(
        Namespace::Card,
        &[Holding::regular("abc", 2)],
        &[Holding::regular("abc", 1)],
    );
    assert_eq!(regular(&ledger, "abc"), 4);
}
