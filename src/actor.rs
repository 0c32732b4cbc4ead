// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Single-writer session actor
//!
//! One tokio task owns the [`Session`]. The HTTP listener, the debounce
//! timers and the outbound fetch tasks reach it only through
//! [`SessionMessage`]s, so no mutation of the ledger ever runs concurrently
//! with another. Network calls are spawned and report back as messages; the
//! actor itself only awaits the local disk when flushing the cache.
//!
//! Public API: [`SessionHandle`] (cloneable async handle) and
//! [`spawn_session`].

use crate::cache::CacheWriter;
use crate::debounce::Debouncer;
use crate::events::Event;
use crate::feed::{FeedSource, ValuationFeed};
use crate::ledger::CollectionLedger;
use crate::names::{self, NameLookup, NameResolution};
use crate::session::Session;
use crate::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const CHANNEL_CAPACITY: usize = 256;

/// Messages handled by the session actor
#[derive(Debug)]
pub enum SessionMessage {
    /// A decoded client event
    Event(Event),
    /// Copy of the current ledger
    Snapshot {
        /// Reply channel
        reply: oneshot::Sender<CollectionLedger>,
    },
    /// Persistence debounce fired
    FlushCache,
    /// Name debounce fired
    ResolveNames,
    /// A lookup round finished
    NamesResolved(Vec<NameResolution>),
    /// Price refresh timer fired
    RefreshPrices,
    /// A price fetch finished
    PricesLoaded(Result<ValuationFeed>),
    /// Flush now and stop
    Shutdown {
        /// Result of the final flush
        reply: oneshot::Sender<Result<()>>,
    },
}

/// Collaborators and timings for the actor
pub struct SessionServices {
    /// Periodic valuation source; no refresh when absent
    pub feed: Option<FeedSource>,
    /// Name lookup; queued names are dropped when absent
    pub names: Option<Arc<dyn NameLookup>>,
    /// Cache flush targets
    pub cache: CacheWriter,
    /// Exchange ratio for refreshed valuations
    pub gold_per_platinum: u32,
    /// Quiet period before a cache flush
    pub cache_debounce: Duration,
    /// Quiet period before a lookup round
    pub name_debounce: Duration,
    /// Interval between price refreshes
    pub price_refresh: Duration,
}

/// Cloneable handle to a running session actor
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<SessionMessage>,
}

impl SessionHandle {
    /// Queue an event for the actor
    pub async fn submit(&self, event: Event) -> Result<()> {
        self.tx
            .send(SessionMessage::Event(event))
            .await
            .map_err(|_| Error::ActorGone)
    }

    /// Clone of the ledger as of every earlier message
    pub async fn snapshot(&self) -> Result<CollectionLedger> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(SessionMessage::Snapshot { reply })
            .await
            .map_err(|_| Error::ActorGone)?;
        rx.await.map_err(|_| Error::ActorGone)
    }

    /// Flush the cache immediately and stop the actor
    pub async fn shutdown(&self) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(SessionMessage::Shutdown { reply })
            .await
            .map_err(|_| Error::ActorGone)?;
        rx.await.map_err(|_| Error::ActorGone)?
    }
}

/// Start the actor; it stops on [`SessionHandle::shutdown`] or when every
/// handle has been dropped.
pub fn spawn_session(session: Session, services: SessionServices) -> (SessionHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let weak = tx.downgrade();

    let mut actor = SessionActor {
        persist: Debouncer::new(services.cache_debounce, weak.clone(), || SessionMessage::FlushCache),
        names: Debouncer::new(services.name_debounce, weak.clone(), || SessionMessage::ResolveNames),
        prices: Debouncer::new(services.price_refresh, weak.clone(), || SessionMessage::RefreshPrices),
        tx: weak,
        session,
        services,
        lookup_in_flight: false,
    };
    if actor.services.feed.is_some() {
        actor.prices.reset();
    }

    let task = tokio::spawn(actor.run(rx));
    (SessionHandle { tx }, task)
}

struct SessionActor {
    session: Session,
    services: SessionServices,
    tx: mpsc::WeakSender<SessionMessage>,
    persist: Debouncer<SessionMessage>,
    names: Debouncer<SessionMessage>,
    prices: Debouncer<SessionMessage>,
    lookup_in_flight: bool,
}

impl SessionActor {
    async fn run(mut self, mut rx: mpsc::Receiver<SessionMessage>) {
        while let Some(msg) = rx.recv().await {
            match msg {
                SessionMessage::Event(event) => {
                    let effects = self.session.handle(event);
                    if effects.persist {
                        self.persist.reset();
                    }
                    if effects.resolve_names {
                        self.names.reset();
                    }
                }
                SessionMessage::Snapshot { reply } => {
                    // The caller may have given up waiting.
                    let _ = reply.send(self.session.ledger().clone());
                }
                SessionMessage::FlushCache => {
                    if let Err(e) = self.flush().await {
                        warn!(error = %e, "Could not write collection cache, retrying after the next quiet period");
                        self.persist.reset();
                    }
                }
                SessionMessage::ResolveNames => self.start_lookup_round(),
                SessionMessage::NamesResolved(results) => {
                    self.lookup_in_flight = false;
                    if self.session.apply_names(results) {
                        self.names.reset();
                    }
                }
                SessionMessage::RefreshPrices => self.start_price_refresh(),
                SessionMessage::PricesLoaded(result) => {
                    self.finish_price_refresh(result);
                    self.prices.reset();
                }
                SessionMessage::Shutdown { reply } => {
                    self.persist.cancel();
                    self.names.cancel();
                    self.prices.cancel();
                    let _ = reply.send(self.flush().await);
                    break;
                }
            }
        }
        debug!("session actor stopped");
    }

    async fn flush(&self) -> Result<()> {
        self.services.cache.render(self.session.ledger()).commit().await
    }

    fn start_lookup_round(&mut self) {
        if self.session.names_mut().is_empty() {
            return;
        }
        let Some(lookup) = self.services.names.clone() else {
            let dropped = self.session.names_mut().take();
            debug!(count = dropped.len(), "no name lookup configured, dropping queue");
            return;
        };
        if self.lookup_in_flight {
            self.names.reset();
            return;
        }
        let Some(tx) = self.tx.upgrade() else {
            return;
        };

        let identities = self.session.names_mut().take();
        debug!(count = identities.len(), "looking up card names");
        self.lookup_in_flight = true;
        tokio::spawn(async move {
            let results = names::resolve_all(lookup.as_ref(), identities).await;
            let _ = tx.send(SessionMessage::NamesResolved(results)).await;
        });
    }

    fn start_price_refresh(&mut self) {
        let Some(source) = self.services.feed.clone() else {
            return;
        };
        let Some(tx) = self.tx.upgrade() else {
            return;
        };
        let ratio = self.services.gold_per_platinum;
        tokio::spawn(async move {
            let result = source.fetch(ratio).await;
            let _ = tx.send(SessionMessage::PricesLoaded(result)).await;
        });
    }

    fn finish_price_refresh(&mut self, result: Result<ValuationFeed>) {
        match result {
            Ok(feed) if feed.entries.is_empty() => {
                warn!("Price refresh returned no entries, keeping previous prices");
            }
            Ok(feed) => {
                self.session.apply_feed(&feed);
                info!("Prices refreshed");
            }
            Err(e) => warn!(error = %e, "Price refresh failed, keeping previous prices"),
        }
    }
}
