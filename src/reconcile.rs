//! Rewrite card file names to existing images using naming heuristics.
//!
//! For every card whose referenced image is missing, the heuristic chain in
//! [`crate::images`] is tried; on a match the card row is rewritten in
//! place. When anything changed the original JSON is backed up once (an
//! existing backup is never overwritten) before the corrected file is
//! written, so re-running after a successful fix is a no-op.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::images::ImageLocator;
use crate::records;

/// Outcome of a reconciliation run.
#[derive(Debug, PartialEq)]
pub struct FixSummary {
    pub total: usize,
    pub fixed: usize,
    /// Backup created by this run, if any.
    pub backup: Option<PathBuf>,
}

pub fn run(cards_path: &Path, roots: &[PathBuf]) -> Result<FixSummary> {
    let mut cards = records::load_cards(cards_path)?;
    let locator = ImageLocator::new(roots);

    let mut fixed = 0;
    for card in &mut cards {
        let name = match card.file_name() {
            Some(name) => name.to_string(),
            None => continue,
        };
        if locator.exists(&name) {
            continue;
        }
        if let Some(candidate) = locator.find_candidate(&name) {
            log::debug!("Rewrote {} -> {}", name, candidate);
            card.set_file_name(candidate);
            fixed += 1;
        }
    }

    if fixed == 0 {
        log::info!("No changes made; no fixable missing entries found");
        return Ok(FixSummary {
            total: cards.len(),
            fixed,
            backup: None,
        });
    }

    let backup_path = cards_path.with_extension("json.bak");
    let mut backup = None;
    if backup_path.exists() {
        log::info!("Backup already exists at {}", backup_path.display());
    } else {
        fs::copy(cards_path, &backup_path)?;
        log::info!("Backup at {}", backup_path.display());
        backup = Some(backup_path);
    }
    records::save_cards(cards_path, &cards)?;
    log::info!("Updated {}: {} entries fixed", cards_path.display(), fixed);

    Ok(FixSummary {
        total: cards.len(),
        fixed,
        backup,
    })
}
