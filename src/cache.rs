// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Warm-start collection cache and CSV export
//!
//! The cache file holds one line per identity with a nonzero quantity:
//!
//! ```text
//! <identity> : <regular> : <extended>
//! ```
//!
//! Older two-field lines (`<identity> : <regular>`) are still accepted.

use crate::ledger::CollectionLedger;
use crate::Result;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Separator between cache fields
pub const FIELD_SEPARATOR: &str = " : ";

/// One parsed cache line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedHolding {
    /// Identity of the entry
    pub identity: String,
    /// Regular-art copies
    pub regular: u32,
    /// Extended-art copies
    pub extended: u32,
}

/// Result of loading a cache into a ledger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Lines applied to the ledger
    pub loaded: usize,
    /// Lines that did not match the cache shape
    pub skipped: usize,
}

/// Render every owned entry as cache lines, sorted by identity
#[must_use]
pub fn serialize(ledger: &CollectionLedger) -> String {
    let mut owned: Vec<_> = ledger.entries().filter(|e| e.is_owned()).collect();
    owned.sort_by(|a, b| a.identity.cmp(&b.identity));

    let mut out = String::new();
    for entry in owned {
        out.push_str(&entry.identity);
        out.push_str(FIELD_SEPARATOR);
        out.push_str(&entry.regular_quantity.to_string());
        out.push_str(FIELD_SEPARATOR);
        out.push_str(&entry.extended_quantity.to_string());
        out.push('\n');
    }
    out
}

/// Parse a single cache line; `None` for anything that is not a cache line
#[must_use]
pub fn parse_line(line: &str) -> Option<CachedHolding> {
    let fields: Vec<&str> = line.trim_end().split(FIELD_SEPARATOR).collect();
    let (identity, regular, extended) = match fields.as_slice() {
        [identity, regular] => (*identity, regular.trim().parse().ok()?, 0),
        [identity, regular, extended] => (
            *identity,
            regular.trim().parse().ok()?,
            extended.trim().parse().ok()?,
        ),
        _ => return None,
    };

    let identity = identity.trim();
    if identity.is_empty() {
        return None;
    }

    Some(CachedHolding {
        identity: identity.to_string(),
        regular,
        extended,
    })
}

/// Apply cache text to a ledger with change notifications silenced.
///
/// Zero-quantity lines are dropped, matching what [`serialize`] writes.
pub fn load_into(ledger: &mut CollectionLedger, text: &str) -> LoadSummary {
    let mut summary = LoadSummary::default();

    ledger.begin_bulk_load();
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        match parse_line(line) {
            Some(holding) if holding.regular == 0 && holding.extended == 0 => {}
            Some(holding) => {
                ledger.set_quantities(&holding.identity, holding.regular, holding.extended);
                summary.loaded += 1;
            }
            None => {
                debug!(line, "skipping malformed cache line");
                summary.skipped += 1;
            }
        }
    }
    ledger.end_bulk_load();

    summary
}

/// Read and apply the cache file; a missing file is an empty cache
pub async fn load_file(ledger: &mut CollectionLedger, path: &Path) -> Result<LoadSummary> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => {
            let summary = load_into(ledger, &text);
            info!(
                loaded = summary.loaded,
                skipped = summary.skipped,
                "Loaded collection cache from '{}'",
                path.display()
            );
            Ok(summary)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("No collection cache at '{}', starting empty", path.display());
            Ok(LoadSummary::default())
        }
        Err(e) => Err(e.into()),
    }
}

/// Render owned entries as CSV rows: `"name",regular,extended`, sorted by name
#[must_use]
pub fn to_csv(ledger: &CollectionLedger) -> String {
    let mut out = String::new();
    for entry in ledger.owned_by_name() {
        out.push('"');
        out.push_str(&entry.label().replace('"', "\"\""));
        out.push_str("\",");
        out.push_str(&entry.regular_quantity.to_string());
        out.push(',');
        out.push_str(&entry.extended_quantity.to_string());
        out.push('\n');
    }
    out
}

/// Where the debounced flush writes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheWriter {
    /// Key/value cache file
    pub collection_file: PathBuf,
    /// CSV export, when enabled
    pub csv_file: Option<PathBuf>,
}

impl CacheWriter {
    /// Render the ledger now; the returned write can run off the actor
    #[must_use]
    pub fn render(&self, ledger: &CollectionLedger) -> PendingWrite {
        PendingWrite {
            files: std::iter::once((self.collection_file.clone(), serialize(ledger)))
                .chain(self.csv_file.clone().map(|path| (path, to_csv(ledger))))
                .collect(),
        }
    }
}

/// Rendered cache contents waiting to hit the disk
#[derive(Debug, Clone)]
pub struct PendingWrite {
    files: Vec<(PathBuf, String)>,
}

impl PendingWrite {
    /// Write each file through a temporary sibling and rename it into place
    pub async fn commit(self) -> Result<()> {
        for (path, contents) in self.files {
            let tmp = temp_path(&path);
            tokio::fs::write(&tmp, contents.as_bytes()).await?;
            tokio::fs::rename(&tmp, &path).await?;
            info!("Cached collection info to file '{}'", path.display());
        }
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
