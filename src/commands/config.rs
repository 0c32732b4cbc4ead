// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell

use crate::config::Settings;
use anyhow::Result;

/// Print the effective configuration, or a single key
pub fn run(settings: &Settings, key: Option<&str>) -> Result<()> {
    match key {
        Some(key) => match settings.get(key) {
            Some(value) => println!("{value}"),
            None => anyhow::bail!("Unknown or unset configuration key: {key}"),
        },
        None => print!("{}", settings.to_toml()?),
    }
    Ok(())
}
