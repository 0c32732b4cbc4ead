// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Serve command - runs the event listener

use crate::actor::{spawn_session, SessionServices};
use crate::config::Settings;
use crate::names::{HttpNameLookup, NameLookup};
use crate::{server, version};
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Run the serve command
pub async fn run(settings: &Settings, listen: Option<String>, skip_version_check: bool) -> Result<()> {
    let client = super::http_client()?;

    if settings.check_version && !skip_version_check {
        version::spawn_check(client.clone(), settings.version_url.clone());
    }

    let source = super::feed_source(settings, &client);
    let session = super::load_session(settings, &source, true).await?;

    let names = settings.name_lookup_url.as_ref().map(|url| {
        Arc::new(HttpNameLookup::new(client.clone(), url.clone())) as Arc<dyn NameLookup>
    });
    let services = SessionServices {
        feed: Some(source),
        names,
        cache: settings.cache_writer(),
        gold_per_platinum: settings.gold_per_platinum,
        cache_debounce: settings.cache_debounce(),
        name_debounce: settings.name_debounce(),
        price_refresh: settings.price_refresh(),
    };
    let (handle, task) = spawn_session(session, services);

    let addr = listen.unwrap_or_else(|| settings.listen_addr.clone());
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    server::serve(listener, handle.clone(), server::ctrl_c()).await?;

    handle.shutdown().await.context("Final cache flush failed")?;
    task.await.context("Session task panicked")?;
    info!("Collection saved, bye");
    Ok(())
}
