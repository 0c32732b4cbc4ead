// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Startup check against the published version number

use crate::Result;
use tracing::{info, warn};

/// Version of this build
pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result of comparing against the published version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionStatus {
    /// Running the published version
    UpToDate,
    /// A different version is published
    Outdated {
        /// Published version string
        latest: String,
        /// Where to download it for this platform
        download_url: String,
    },
}

/// Download location for the running platform
#[must_use]
pub fn download_url() -> String {
    let os = std::env::consts::OS;
    let arch = std::env::consts::ARCH;
    let suffix = if os == "windows" { ".exe" } else { "" };
    format!("http://doc-x.net/hex/downloads/hexapi_{os}_{arch}{suffix}")
}

/// Compare a published version body against `current`
#[must_use]
pub fn compare(published: &str, current: &str) -> VersionStatus {
    let latest = published.trim();
    if latest == current {
        VersionStatus::UpToDate
    } else {
        VersionStatus::Outdated {
            latest: latest.to_string(),
            download_url: download_url(),
        }
    }
}

/// Fetch the published version and compare it with this build
pub async fn check(client: &reqwest::Client, url: &str) -> Result<VersionStatus> {
    let body = client.get(url).send().await?.error_for_status()?.text().await?;
    Ok(compare(&body, CURRENT_VERSION))
}

/// Fire-and-forget startup check; failures are only logged
pub fn spawn_check(client: reqwest::Client, url: String) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        match check(&client, &url).await {
            Ok(VersionStatus::UpToDate) => info!("Running up to date version '{}'", CURRENT_VERSION),
            Ok(VersionStatus::Outdated { latest, download_url }) => warn!(
                "Current version is '{}'. You are running version '{}'. Please download a new copy from {}",
                latest, CURRENT_VERSION, download_url
            ),
            Err(e) => warn!("Could not retrieve version information from '{}': {}", url, e),
        }
    })
}
