// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Draft pack tracking, pick recommendations and pack profit

use crate::ledger::{CollectionLedger, DeltaOutcome};
use crate::types::{CardEntry, Namespace};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Cards in a freshly opened booster
pub const FULL_PACK: usize = 15;

/// A pack of this size or smaller has come back around the table
const WHEEL_OFFSET: usize = 8;

/// Best picks from one pack under three goals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendations {
    /// Highest platinum value
    pub most_platinum: CardEntry,
    /// Highest gold value
    pub most_gold: CardEntry,
    /// Fewest copies already owned
    pub least_owned: CardEntry,
}

/// What the tracker learned from a `DraftPack` message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackReport {
    /// Cards left in the pack
    pub pack_size: usize,
    /// Display labels of the pack contents
    pub contents: Vec<String>,
    /// Cards taken by others since this pack was last seen
    pub missing: Option<Vec<String>>,
    /// Recommendations, absent for an empty pack
    pub picks: Option<Recommendations>,
}

/// Profit accounting for a finished pack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackSettlement {
    /// Platinum value of everything drafted from the pack
    pub pack_value: u32,
    /// Platinum price of the booster
    pub pack_cost: u32,
    /// `pack_value - pack_cost`
    pub profit: i64,
    /// Running profit for the session
    pub session_profit: i64,
}

/// What the tracker did with a `DraftCardPicked` message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickReport {
    /// Ledger outcome of the pick
    pub outcome: DeltaOutcome,
    /// Pack size the pick was made from
    pub pack_size: usize,
    /// The drafted card after the pick, when known
    pub card: Option<CardEntry>,
    /// Present when the pick finished the pack
    pub settlement: Option<PackSettlement>,
}

/// Per-session draft state that lives next to the ledger
#[derive(Debug, Clone, Default)]
pub struct DraftTracker {
    pack_size: usize,
    contents: HashMap<usize, Vec<String>>,
    own_picks: HashMap<usize, String>,
    pack_cost: u32,
    session_profit: i64,
}

impl DraftTracker {
    /// Update the booster price after a valuation refresh
    pub fn set_pack_cost(&mut self, pack_cost: u32) {
        self.pack_cost = pack_cost;
    }

    /// Booster price in platinum
    #[must_use]
    pub fn pack_cost(&self) -> u32 {
        self.pack_cost
    }

    /// Record a pack and compute recommendations against the ledger
    pub fn observe_pack(&mut self, cards: &[String], ledger: &mut CollectionLedger) -> PackReport {
        let size = cards.len();
        if size == FULL_PACK || size > self.pack_size {
            self.contents.clear();
            self.own_picks.clear();
            ledger.start_new_pack();
        }
        self.pack_size = size;
        self.contents.insert(size, cards.to_vec());

        let entries: Vec<CardEntry> = cards.iter().map(|id| lookup(ledger, id)).collect();

        let missing = (size < WHEEL_OFFSET)
            .then(|| self.missing_since_last_seen(size, cards, ledger))
            .flatten();

        let picks = recommend(&entries);

        PackReport {
            pack_size: size,
            contents: entries.iter().map(|e| e.label().to_string()).collect(),
            missing,
            picks,
        }
    }

    fn missing_since_last_seen(
        &self,
        size: usize,
        cards: &[String],
        ledger: &CollectionLedger,
    ) -> Option<Vec<String>> {
        let mut earlier = self.contents.get(&(size + WHEEL_OFFSET))?.clone();
        if let Some(own) = self.own_picks.get(&(size + WHEEL_OFFSET)) {
            remove_one(&mut earlier, own);
        }
        for card in cards {
            remove_one(&mut earlier, card);
        }
        Some(earlier.iter().map(|id| lookup(ledger, id).label().to_string()).collect())
    }

    /// Apply a pick to the ledger; settles the pack when it was the last card
    pub fn record_pick(&mut self, identity: &str, ledger: &mut CollectionLedger) -> PickReport {
        let outcome = ledger.record_draft_pick(identity);
        if outcome != DeltaOutcome::Unknown {
            self.own_picks.insert(self.pack_size, identity.to_string());
        }

        let settlement = (self.pack_size == 1).then(|| {
            let pack_value = ledger.pick_totals().pack.platinum;
            let profit = i64::from(pack_value) - i64::from(self.pack_cost);
            self.session_profit += profit;
            PackSettlement {
                pack_value,
                pack_cost: self.pack_cost,
                profit,
                session_profit: self.session_profit,
            }
        });

        PickReport {
            outcome,
            pack_size: self.pack_size,
            card: ledger.get(identity).cloned(),
            settlement,
        }
    }
}

fn lookup(ledger: &CollectionLedger, identity: &str) -> CardEntry {
    ledger
        .get(identity)
        .cloned()
        .unwrap_or_else(|| CardEntry::new(identity, Namespace::Card))
}

fn remove_one(cards: &mut Vec<String>, identity: &str) {
    if let Some(pos) = cards.iter().position(|c| c == identity) {
        cards.remove(pos);
    }
}

/// Fold each goal over the pack in client order
#[must_use]
pub fn recommend(entries: &[CardEntry]) -> Option<Recommendations> {
    let first = entries.first()?;
    let rest = &entries[1..];
    Some(Recommendations {
        most_platinum: rest.iter().fold(first, most_platinum).clone(),
        most_gold: rest.iter().fold(first, most_gold).clone(),
        least_owned: rest.iter().fold(first, least_owned).clone(),
    })
}

// Gold is the final tie-breaker; a tie goes to the later card, which tends to
// be the rarer one in client pack order.
fn most_gold<'a>(a: &'a CardEntry, b: &'a CardEntry) -> &'a CardEntry {
    if a.valuation.gold > b.valuation.gold {
        a
    } else {
        b
    }
}

fn most_platinum<'a>(a: &'a CardEntry, b: &'a CardEntry) -> &'a CardEntry {
    match a.valuation.platinum.cmp(&b.valuation.platinum) {
        Ordering::Greater => a,
        Ordering::Less => b,
        Ordering::Equal => most_gold(a, b),
    }
}

fn least_owned<'a>(a: &'a CardEntry, b: &'a CardEntry) -> &'a CardEntry {
    match a.regular_quantity.cmp(&b.regular_quantity) {
        Ordering::Less => a,
        Ordering::Greater => b,
        Ordering::Equal => most_platinum(a, b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::LedgerOptions;
    use crate::types::Valuation;

    fn card(id: &str, qty: u32, platinum: u32, gold: u32) -> CardEntry {
        let mut entry = CardEntry::new(id, Namespace::Card)
            .with_name(id.to_uppercase())
            .with_valuation(Valuation { platinum, gold });
        entry.regular_quantity = qty;
        entry
    }

    fn ledger(cards: Vec<CardEntry>) -> CollectionLedger {
        let mut ledger = CollectionLedger::new(LedgerOptions { verbose_changes: false });
        for c in cards {
            ledger.insert(c);
        }
        ledger
    }

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_tie_breaks() {
        let a = card("a", 2, 5, 100);
        let b = card("b", 2, 5, 100);
        let c = card("c", 1, 5, 300);

        // Equal on everything: later card wins.
        assert_eq!(most_platinum(&a, &b).identity, "b");
        // Equal platinum falls through to gold.
        assert_eq!(most_platinum(&a, &c).identity, "c");
        // Strictly more gold keeps the earlier card.
        assert_eq!(most_gold(&c, &a).identity, "c");
        // Equal quantity falls through to platinum, then gold.
        assert_eq!(least_owned(&a, &b).identity, "b");
        assert_eq!(least_owned(&a, &c).identity, "c");
    }

    #[test]
    fn test_recommendations_over_a_pack() {
        let entries = vec![
            card("cheap", 0, 1, 10),
            card("pricey", 4, 50, 900),
            card("goldish", 3, 10, 2000),
        ];
        let picks = recommend(&entries).unwrap();
        assert_eq!(picks.most_platinum.identity, "pricey");
        assert_eq!(picks.most_gold.identity, "goldish");
        assert_eq!(picks.least_owned.identity, "cheap");
        assert!(recommend(&[]).is_none());
    }

    #[test]
    fn test_wheel_reports_cards_taken_by_others() {
        let mut ledger = ledger(vec![
            card("a", 0, 1, 1),
            card("b", 0, 1, 1),
            card("c", 0, 1, 1),
            card("d", 0, 1, 1),
        ]);
        let mut tracker = DraftTracker::default();

        // Seen at size 9 (a, b, c, d plus five fillers); we take "a".
        let mut nine = ids(&["a", "b", "c", "d"]);
        nine.extend((0..5).map(|i| format!("f{i}")));
        tracker.observe_pack(&nine, &mut ledger);
        tracker.record_pick("a", &mut ledger);

        // Back at size 1 with only "d" left.
        let report = tracker.observe_pack(&ids(&["d"]), &mut ledger);
        let mut missing = report.missing.unwrap();
        missing.sort();
        assert_eq!(missing, vec!["B", "C", "f0", "f1", "f2", "f3", "f4"]);
    }

    #[test]
    fn test_last_pick_settles_pack_profit() {
        let mut ledger = ledger(vec![card("x", 0, 30, 1), card("y", 0, 5, 1)]);
        let mut tracker = DraftTracker::default();
        tracker.set_pack_cost(20);

        tracker.observe_pack(&ids(&["x", "y"]), &mut ledger);
        let first = tracker.record_pick("x", &mut ledger);
        assert!(first.settlement.is_none());
        assert_eq!(first.card.unwrap().regular_quantity, 1);

        tracker.observe_pack(&ids(&["y"]), &mut ledger);
        let last = tracker.record_pick("y", &mut ledger);
        let settlement = last.settlement.unwrap();
        assert_eq!(settlement.pack_value, 35);
        assert_eq!(settlement.profit, 15);
        assert_eq!(settlement.session_profit, 15);

        // A new pack restarts the pack total but keeps the session profit.
        tracker.observe_pack(&vec!["y".to_string(); FULL_PACK], &mut ledger);
        assert_eq!(ledger.pick_totals().pack, Valuation::ZERO);
        tracker.observe_pack(&ids(&["y"]), &mut ledger);
        let next = tracker.record_pick("y", &mut ledger).settlement.unwrap();
        assert_eq!(next.session_profit, 15 + next.profit);
    }
}
