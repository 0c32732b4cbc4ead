// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Export command - writes the collection as CSV

use crate::cache;
use crate::config::Settings;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Run the export command
pub async fn run(settings: &Settings, output: Option<PathBuf>) -> Result<()> {
    let client = super::http_client()?;
    let source = super::feed_source(settings, &client);
    let session = super::load_session(settings, &source, false).await?;

    if session.ledger().entries().all(|e| !e.is_owned()) {
        eprintln!(
            "Warning: collection is empty. Run 'hexapi serve' and log in to the client first."
        );
    }

    let content = cache::to_csv(session.ledger());

    match output {
        Some(path) => {
            fs::write(&path, &content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
            info!("Exported to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
        }
    }

    Ok(())
}
