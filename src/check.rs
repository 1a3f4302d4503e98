//! Diagnostic report of card images missing on disk.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::images::ImageLocator;
use crate::records;

/// Outcome of a missing-image scan.
#[derive(Debug, PartialEq)]
pub struct CheckReport {
    pub total: usize,
    pub missing: Vec<String>,
    /// Missing counts grouped by the set code segment of the path.
    pub by_set: BTreeMap<String, usize>,
}

/// Scans every card's file name against the image roots. A card is missing
/// when neither the literal path nor any heuristic rewrite within its own
/// set directory exists. Writes the missing file names to `report_path`
/// (one per line) when there are any. Card data is never modified.
pub fn run(cards_path: &Path, roots: &[PathBuf], report_path: &Path) -> Result<CheckReport> {
    let cards = records::load_cards(cards_path)?;
    let locator = ImageLocator::new(roots);

    let mut missing = Vec::new();
    let mut by_set: BTreeMap<String, usize> = BTreeMap::new();
    for card in &cards {
        let Some(name) = card.file_name() else {
            continue;
        };
        if locator.exists(name) || locator.has_known_candidate(name) {
            continue;
        }
        let set_code = name.split('/').nth(1).unwrap_or("UNKNOWN").to_string();
        *by_set.entry(set_code).or_insert(0) += 1;
        missing.push(name.to_string());
    }

    log::info!("Total cards: {}", cards.len());
    log::info!("Missing images: {}", missing.len());
    for (set_code, count) in &by_set {
        log::info!("  {}: {}", set_code, count);
    }

    if missing.is_empty() {
        log::info!("No missing images detected");
    } else {
        fs::write(report_path, missing.join("\n") + "\n")?;
        log::info!("Wrote list to {}", report_path.display());
    }

    Ok(CheckReport {
        total: cards.len(),
        missing,
        by_set,
    })
}
