// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Settings are layered: built-in defaults, then a `key=value` INI (or TOML)
//! file, then `HEXAPI_*` environment variables.

use crate::cache::CacheWriter;
use crate::ledger::LedgerOptions;
use crate::types::DEFAULT_GOLD_PER_PLATINUM;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the config file looked for in the working directory
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "HEXAPI";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Address the event listener binds to
    pub listen_addr: String,
    /// Remote valuation document
    pub price_url: String,
    /// Local valuation document, read instead of `price_url` when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_price_file: Option<PathBuf>,
    /// Warm-start cache file
    pub collection_file: PathBuf,
    /// Also write a CSV export on every cache flush
    pub export_csv: bool,
    /// CSV export file
    pub csv_filename: PathBuf,
    /// Plain-text latest version number
    pub version_url: String,
    /// Check `version_url` on startup
    pub check_version: bool,
    /// Name lookup endpoint; deferral is off when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_lookup_url: Option<String>,
    /// Log every quantity change
    pub verbose_changes: bool,
    /// Debug tracing
    pub debug: bool,
    /// Exchange ratio used to synthesize a missing valuation
    pub gold_per_platinum: u32,
    /// Quiet period before the cache is flushed
    pub cache_debounce_secs: u64,
    /// Quiet period before queued names are looked up
    pub name_debounce_secs: u64,
    /// Interval between valuation refreshes
    pub price_refresh_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:5000".to_string(),
            price_url: "http://doc-x.net/hex/all_prices.json".to_string(),
            local_price_file: None,
            collection_file: PathBuf::from("collection.out"),
            export_csv: false,
            csv_filename: PathBuf::from("collection.csv"),
            version_url: "http://doc-x.net/hex/downloads/hexapi_version.txt".to_string(),
            check_version: true,
            name_lookup_url: None,
            verbose_changes: true,
            debug: false,
            gold_per_platinum: DEFAULT_GOLD_PER_PLATINUM,
            cache_debounce_secs: 20,
            name_debounce_secs: 5,
            price_refresh_secs: 2 * 60 * 60,
        }
    }
}

impl Settings {
    /// Ledger switches derived from the settings
    #[must_use]
    pub fn ledger_options(&self) -> LedgerOptions {
        LedgerOptions {
            verbose_changes: self.verbose_changes,
        }
    }

    /// Cache flush targets
    #[must_use]
    pub fn cache_writer(&self) -> CacheWriter {
        CacheWriter {
            collection_file: self.collection_file.clone(),
            csv_file: self.export_csv.then(|| self.csv_filename.clone()),
        }
    }

    /// Cache debounce as a duration
    #[must_use]
    pub fn cache_debounce(&self) -> Duration {
        Duration::from_secs(self.cache_debounce_secs)
    }

    /// Name debounce as a duration
    #[must_use]
    pub fn name_debounce(&self) -> Duration {
        Duration::from_secs(self.name_debounce_secs)
    }

    /// Price refresh interval as a duration
    #[must_use]
    pub fn price_refresh(&self) -> Duration {
        Duration::from_secs(self.price_refresh_secs)
    }

    /// Render as TOML for the `config` command
    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Single key rendered as text, `None` when unknown or unset
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let table = toml::Value::try_from(self).ok()?;
        match table.get(key)? {
            toml::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Config file used when none is given explicitly.
///
/// `./config.ini` wins; otherwise the per-user config directory.
#[must_use]
pub fn default_path() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    directories::ProjectDirs::from("net", "doc-x", "hexapi")
        .map(|d| d.config_dir().join(CONFIG_FILE_NAME))
        .unwrap_or(local)
}

/// Load configuration from disk and environment, or use defaults.
///
/// An explicitly named file must exist; the default location is optional.
pub fn load(path: Option<&Path>) -> Result<Settings> {
    let (path, required) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (default_path(), false),
    };

    let settings = config::Config::builder()
        .add_source(config::File::from(path.as_path()).required(required))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .build()?
        .try_deserialize()?;
    Ok(settings)
}
