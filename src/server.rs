// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! HTTP listener for client event notifications
//!
//! The game client POSTs one JSON object per request to any path. The
//! listener decodes it, drops an exact repeat of the previous body and hands
//! everything else to the session actor.

use crate::actor::SessionHandle;
use crate::events::Event;
use crate::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::any;
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

/// Shared listener state
#[derive(Clone)]
pub struct AppState {
    handle: SessionHandle,
    last_body: Arc<Mutex<String>>,
}

impl AppState {
    /// State for a router feeding `handle`
    #[must_use]
    pub fn new(handle: SessionHandle) -> Self {
        Self {
            handle,
            last_body: Arc::new(Mutex::new(String::new())),
        }
    }
}

/// Router accepting events on every path and method
pub fn router(handle: SessionHandle) -> Router {
    Router::new()
        .route("/", any(receive))
        .fallback(receive)
        .with_state(AppState::new(handle))
        .layer(TraceLayer::new_for_http())
}

// The lock is held until the event is queued, so events reach the session in
// the same order they were checked for duplicates.
async fn receive(State(state): State<AppState>, body: String) -> StatusCode {
    let mut last = state.last_body.lock().await;
    if *last == body {
        debug!("dropping duplicate delivery");
        return StatusCode::OK;
    }
    last.clone_from(&body);

    let event = match Event::decode(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "could not decode event body");
            return StatusCode::BAD_REQUEST;
        }
    };

    match state.handle.submit(event).await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            warn!(error = %e, "session is not accepting events");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Serve until `shutdown` resolves
pub async fn serve(
    listener: TcpListener,
    handle: SessionHandle,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Listening for client events on http://{}", addr);
    }
    axum::serve(listener, router(handle))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Resolves on Ctrl-C
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "could not install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
