// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Trailing debounce timers that report back as channel messages
//!
//! Each [`Debouncer::reset`] cancels the pending sleeper and starts a new one,
//! so the message is only delivered after a full quiet period. Nothing
//! touches shared state from the timer; the owner handles the message on its
//! own task.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// One resettable one-shot timer
pub struct Debouncer<M> {
    delay: Duration,
    tx: mpsc::WeakSender<M>,
    message: fn() -> M,
    pending: Option<JoinHandle<()>>,
}

impl<M: Send + 'static> Debouncer<M> {
    /// Create an idle timer that will send `message()` on `tx` when it fires.
    ///
    /// The timer holds only a weak sender, so it never keeps the owner's
    /// channel open on its own.
    pub fn new(delay: Duration, tx: mpsc::WeakSender<M>, message: fn() -> M) -> Self {
        Self {
            delay,
            tx,
            message,
            pending: None,
        }
    }

    /// Stop any pending firing and schedule a fresh one
    pub fn reset(&mut self) {
        self.cancel();
        let delay = self.delay;
        let tx = self.tx.clone();
        let message = self.message;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // A closed channel means the owner is gone; nothing to deliver.
            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(message()).await;
            }
        }));
    }

    /// Drop any pending firing
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<M> Drop for Debouncer<M> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
