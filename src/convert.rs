//! Convert cards/sets/images CSV files into the JSON consumed by the site.
//!
//! Cards are required; sets and images are optional. When an images CSV is
//! present, its `ID -> File Name` mapping fills card rows whose file name is
//! missing. Input paths fall back to a few common locations when not given
//! explicitly.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CatalogError, Result};
use crate::records::{self, CardRecord};

/// Input/output selection for a conversion run.
#[derive(Debug, Default)]
pub struct ConvertOptions {
    pub cards: Option<PathBuf>,
    pub sets: Option<PathBuf>,
    pub images: Option<PathBuf>,
    /// Keep only card rows whose set code equals this value.
    pub set_filter: Option<String>,
    pub out_dir: PathBuf,
}

/// Row counts from a conversion run.
#[derive(Debug, PartialEq)]
pub struct ConvertSummary {
    pub cards: usize,
    pub sets: usize,
    pub images: usize,
    pub filled: usize,
}

/// Runs the conversion. Fails before writing anything if no cards CSV can
/// be located.
pub fn run(opts: &ConvertOptions) -> Result<ConvertSummary> {
    let cards_path = locate_input(opts.cards.as_deref(), "cards").ok_or_else(|| {
        CatalogError::MissingInput(
            "no cards CSV found in the usual locations; pass --cards".to_string(),
        )
    })?;

    log::info!("Reading cards from {}", cards_path.display());
    let mut cards = records::read_csv_records(&cards_path)?;
    log::info!("Loaded {} card rows", cards.len());

    if let Some(code) = &opts.set_filter {
        cards.retain(|card| card.set_code() == Some(code.as_str()));
        log::info!("Filtered to {} rows for set {}", cards.len(), code);
    }

    let mut images = Vec::new();
    if let Some(images_path) = locate_input(opts.images.as_deref(), "images") {
        log::info!("Reading images from {}", images_path.display());
        images = records::read_csv_records(&images_path)?;
        log::info!("Loaded {} image rows", images.len());
    }

    let mut sets = Vec::new();
    if let Some(sets_path) = locate_input(opts.sets.as_deref(), "sets") {
        log::info!("Reading sets from {}", sets_path.display());
        sets = records::read_csv_records(&sets_path)?;
        log::info!("Loaded {} set rows", sets.len());
    }

    // Merge image file names into cards that are missing one.
    let mut images_map = HashMap::new();
    for image in &images {
        if let (Some(id), Some(file_name)) = (image.id(), image.file_name()) {
            images_map.insert(id.to_string(), file_name.to_string());
        }
    }
    let mut filled = 0;
    for card in &mut cards {
        if card.file_name().is_some() {
            continue;
        }
        let Some(id) = card.id().map(str::to_string) else {
            continue;
        };
        if let Some(file_name) = images_map.get(&id) {
            card.set_file_name(file_name.clone());
            filled += 1;
        }
    }
    log::info!("Filled File Name for {} cards from the images CSV", filled);

    fs::create_dir_all(&opts.out_dir)?;
    write_json(&opts.out_dir.join("cards.json"), &cards)?;
    write_json(&opts.out_dir.join("sets.json"), &sets)?;
    if !images.is_empty() {
        write_json(&opts.out_dir.join("images.json"), &images)?;
    }

    Ok(ConvertSummary {
        cards: cards.len(),
        sets: sets.len(),
        images: images.len(),
        filled,
    })
}

/// Picks the first existing path among the explicit option and the fallback
/// locations: `./<name>.csv`, `./metadata/<name>.csv`, and the legacy
/// desktop checkout.
fn locate_input(explicit: Option<&Path>, name: &str) -> Option<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(path) = explicit {
        candidates.push(path.to_path_buf());
    }
    candidates.push(PathBuf::from(format!("{name}.csv")));
    candidates.push(PathBuf::from("metadata").join(format!("{name}.csv")));
    if let Some(home) = dirs::home_dir() {
        candidates.push(
            home.join("Desktop")
                .join("star-trek-ccg")
                .join("metadata")
                .join(format!("{name}.csv")),
        );
    }
    candidates.into_iter().find(|path| path.exists())
}

fn write_json(path: &Path, rows: &[CardRecord]) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(rows)?)?;
    log::info!("Wrote {}", path.display());
    Ok(())
}
