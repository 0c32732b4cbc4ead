// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Show command - prints the collection

use crate::config::Settings;
use crate::prelude::*;
use owo_colors::OwoColorize;

/// Run the show command
pub async fn run(settings: &Settings, all: bool, color: bool) -> Result<()> {
    let client = super::http_client()?;
    let source = super::feed_source(settings, &client);
    let session = super::load_session(settings, &source, false).await?;

    let mut entries: Vec<&CardEntry> = session
        .ledger()
        .entries()
        .filter(|e| all || e.is_owned())
        .collect();
    entries.sort_by(|a, b| a.label().cmp(b.label()).then_with(|| a.identity.cmp(&b.identity)));

    let mut total = Valuation::ZERO;
    for entry in &entries {
        println!("{}", render_line(entry, color));
        let copies = entry.regular_quantity.saturating_add(entry.extended_quantity);
        total = total.saturating_add(Valuation {
            platinum: entry.valuation.platinum.saturating_mul(copies),
            gold: entry.valuation.gold.saturating_mul(copies),
        });
    }

    let footer = format!(
        "{} entries, worth {}p and {}g",
        entries.len(),
        total.platinum,
        total.gold
    );
    if color {
        println!("{}", footer.bold());
    } else {
        println!("{footer}");
    }
    Ok(())
}

fn render_line(entry: &CardEntry, color: bool) -> String {
    let rarity = entry.rarity.as_deref().unwrap_or("-");
    let extended = if entry.extended_quantity > 0 {
        format!(" (+{} EA)", entry.extended_quantity)
    } else {
        String::new()
    };
    if color {
        format!(
            "{:>3}{} {} [{}] {} {}",
            entry.regular_quantity.bold(),
            extended.magenta(),
            entry.label().cyan(),
            rarity.dimmed(),
            format!("{}p", entry.valuation.platinum).yellow(),
            format!("{}g", entry.valuation.gold).green()
        )
    } else {
        format!(
            "{:>3}{} {} [{}] {}p {}g",
            entry.regular_quantity,
            extended,
            entry.label(),
            rarity,
            entry.valuation.platinum,
            entry.valuation.gold
        )
    }
}
