// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Event dispatch onto the collection state
//!
//! A [`Session`] is everything one listener process knows: the ledger, the
//! draft tracker, the name queue and the game clock. [`Session::handle`]
//! routes each event variant to its own handler and reports which follow-up
//! work (cache flush, name lookup) the caller should schedule.

use crate::draft::{DraftTracker, PackReport, PickReport};
use crate::events::{CardUpdate, CollectionUpdate, Event, SyncAction};
use crate::feed::{ApplySummary, ValuationFeed};
use crate::ledger::{CollectionLedger, DeltaOutcome, LedgerOptions, ResyncSummary};
use crate::names::{NameQueue, NameResolution};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// Follow-up work requested by a handled event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Effects {
    /// The ledger settled and the cache should be flushed
    pub persist: bool,
    /// Identities were queued for a name lookup
    pub resolve_names: bool,
}

impl Effects {
    const NONE: Self = Self {
        persist: false,
        resolve_names: false,
    };

    fn merge(self, other: Self) -> Self {
        Self {
            persist: self.persist || other.persist,
            resolve_names: self.resolve_names || other.resolve_names,
        }
    }
}

/// State owned by the session actor
#[derive(Debug, Clone, Default)]
pub struct Session {
    ledger: CollectionLedger,
    draft: DraftTracker,
    names: NameQueue,
    game_started_at: Option<DateTime<Utc>>,
    defer_names: bool,
}

impl Session {
    /// Fresh session; `defer_names` enables the name lookup queue
    #[must_use]
    pub fn new(options: LedgerOptions, defer_names: bool) -> Self {
        Self {
            ledger: CollectionLedger::new(options),
            defer_names,
            ..Self::default()
        }
    }

    /// Read access to the ledger
    #[must_use]
    pub fn ledger(&self) -> &CollectionLedger {
        &self.ledger
    }

    /// Mutable access to the ledger, for startup loading
    pub fn ledger_mut(&mut self) -> &mut CollectionLedger {
        &mut self.ledger
    }

    /// Draft state
    #[must_use]
    pub fn draft(&self) -> &DraftTracker {
        &self.draft
    }

    /// Identities waiting for a name lookup
    pub fn names_mut(&mut self) -> &mut NameQueue {
        &mut self.names
    }

    /// Reprice from a valuation feed and pick up the booster price
    pub fn apply_feed(&mut self, feed: &ValuationFeed) -> ApplySummary {
        let summary = feed.apply(&mut self.ledger);
        if let Some(cost) = feed.pack_cost() {
            self.draft.set_pack_cost(cost);
        }
        info!(
            updated = summary.updated,
            created = summary.created,
            pack_cost = self.draft.pack_cost(),
            "valuations applied"
        );
        summary
    }

    /// Apply a finished lookup round; true when anything was re-queued
    pub fn apply_names(&mut self, results: Vec<NameResolution>) -> bool {
        self.names.apply(&mut self.ledger, results) > 0
    }

    /// Dispatch one event
    pub fn handle(&mut self, event: Event) -> Effects {
        debug!(kind = event.kind(), "handling event");
        match event {
            Event::Collection(update) => self.on_collection(&update),
            Event::DraftCardPicked { identity } => self.on_draft_pick(&identity),
            Event::DraftPack { cards } => self.on_draft_pack(&cards),
            Event::CardUpdated(update) => {
                on_card_updated(&update);
                Effects::NONE
            }
            Event::GameStarted => self.on_game_started(Utc::now()),
            Event::GameEnded { winner, loser } => self.on_game_ended(&winner, &loser, Utc::now()),
            Event::Login { user } => {
                info!("Welcome {}", user.as_deref().unwrap_or("back"));
                Effects::NONE
            }
            Event::Logout { user } => {
                info!("Goodbye {}", user.as_deref().unwrap_or("for now"));
                Effects::NONE
            }
            Event::PlayerUpdated | Event::SaveDeck => Effects::NONE,
            Event::Unknown(kind) => {
                debug!(kind = %kind, "ignoring unhandled message kind");
                Effects::NONE
            }
        }
    }

    fn on_collection(&mut self, update: &CollectionUpdate) -> Effects {
        let summary = match update.action {
            SyncAction::Overwrite => self.ledger.resync_overwrite(update.namespace, &update.added),
            SyncAction::Update => {
                self.ledger
                    .resync_incremental(update.namespace, &update.added, &update.removed)
            }
        };
        debug!(
            applied = summary.applied,
            suppressed = summary.suppressed,
            created = summary.created,
            unknown = summary.unknown,
            pending_picks = self.ledger.pending().total(),
            "collection message applied"
        );
        Effects {
            persist: true,
            resolve_names: false,
        }
        .merge(self.defer_unnamed(&summary))
    }

    fn defer_unnamed(&mut self, summary: &ResyncSummary) -> Effects {
        if !self.defer_names {
            return Effects::NONE;
        }
        let mut queued = false;
        for identity in &summary.touched {
            queued |= self.defer_if_unnamed(identity);
        }
        Effects {
            persist: false,
            resolve_names: queued,
        }
    }

    /// Queue a lookup for a tracked entry that has no name yet
    fn defer_if_unnamed(&mut self, identity: &str) -> bool {
        let unnamed = self
            .ledger
            .get(identity)
            .is_some_and(|entry| entry.display_name.is_empty());
        if unnamed {
            let shown_as = self.names.resolve_or_defer(&self.ledger, identity);
            debug!(card = %shown_as, queued = self.names.len(), "name lookup deferred");
        }
        unnamed
    }

    fn on_draft_pick(&mut self, identity: &str) -> Effects {
        let report = self.draft.record_pick(identity, &mut self.ledger);
        log_pick(&report, self.ledger.pick_totals().picks);
        let known = report.outcome != DeltaOutcome::Unknown;
        Effects {
            persist: known,
            resolve_names: known && self.defer_names && self.defer_if_unnamed(identity),
        }
    }

    fn on_draft_pack(&mut self, cards: &[String]) -> Effects {
        let report = self.draft.observe_pack(cards, &mut self.ledger);
        log_pack(&report);
        Effects::NONE
    }

    fn on_game_started(&mut self, now: DateTime<Utc>) -> Effects {
        self.game_started_at = Some(now);
        info!("Game started");
        Effects::NONE
    }

    fn on_game_ended(&mut self, winner: &str, loser: &str, now: DateTime<Utc>) -> Effects {
        match self.game_started_at.take() {
            Some(start) => {
                let secs = (now - start).num_seconds().max(0);
                info!(
                    "Game between '{}' and '{}' won by '{}' after {}m {}s",
                    winner,
                    loser,
                    winner,
                    secs / 60,
                    secs % 60
                );
            }
            None => info!("Game between '{}' and '{}' won by '{}'", winner, loser, winner),
        }
        Effects::NONE
    }
}

fn on_card_updated(update: &CardUpdate) {
    let Some(zone) = update.zone else {
        debug!(card = %update.name, "card update without a known zone");
        return;
    };
    if zone.is_quiet() {
        return;
    }
    let stat = |v: Option<i64>| v.map_or_else(|| "-".to_string(), |n| n.to_string());
    info!(
        "'{}' [{}/{} cost {}] moved to {}",
        update.name,
        stat(update.attack),
        stat(update.defense),
        stat(update.cost),
        zone
    );
}

fn log_pack(report: &PackReport) {
    info!("Draft pack with {} cards: {}", report.pack_size, report.contents.join(", "));
    if let Some(missing) = &report.missing {
        info!("Taken since this pack was last seen: {}", missing.join(", "));
    }
    if let Some(picks) = &report.picks {
        info!("Most platinum: {}", picks.most_platinum.summary());
        info!("Most gold: {}", picks.most_gold.summary());
        info!("Least owned: {}", picks.least_owned.summary());
    }
}

fn log_pick(report: &PickReport, picks: u32) {
    match (&report.outcome, &report.card) {
        (DeltaOutcome::Unknown, _) | (_, None) => debug!("draft pick for an unknown card"),
        (_, Some(card)) => info!("Pick {}: {}", picks, card.summary()),
    }
    if let Some(settled) = &report.settlement {
        info!(
            "Pack finished: drafted {}p against a cost of {}p, profit {}p (session {}p)",
            settled.pack_value, settled.pack_cost, settled.profit, settled.session_profit
        );
    }
}
