//! Fill empty `pack_art` fields in the merged set CSV from the pack-art
//! directory.

use std::path::Path;

use crate::error::{CatalogError, Result};
use crate::records;

/// Extensions probed for pack art, in preference order.
pub const PACK_ART_EXTS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// For each row with an empty `pack_art`, probes
/// `<art_dir>/<short_code>.<ext>` and records the first hit. The CSV is
/// rewritten in place only when something changed. Returns the number of
/// rows updated.
pub fn run(sets_csv: &Path, art_dir: &Path) -> Result<usize> {
    if !sets_csv.exists() {
        return Err(CatalogError::MissingInput(format!(
            "missing {}",
            sets_csv.display()
        )));
    }

    let (headers, mut rows) = records::read_csv_table(sets_csv)?;
    let short_idx = headers
        .iter()
        .position(|header| header == "short_code")
        .ok_or_else(|| CatalogError::MissingColumn {
            column: "short_code".to_string(),
            path: sets_csv.to_path_buf(),
        })?;
    let art_idx = headers
        .iter()
        .position(|header| header == "pack_art")
        .ok_or_else(|| CatalogError::MissingColumn {
            column: "pack_art".to_string(),
            path: sets_csv.to_path_buf(),
        })?;

    let mut changed = 0;
    for row in &mut rows {
        let short_code = row[short_idx].trim().to_string();
        if short_code.is_empty() || !row[art_idx].trim().is_empty() {
            continue;
        }
        for ext in PACK_ART_EXTS {
            if art_dir.join(format!("{short_code}.{ext}")).exists() {
                row[art_idx] = format!("{}/{}.{}", art_dir.display(), short_code, ext);
                changed += 1;
                break;
            }
        }
    }

    if changed > 0 {
        records::write_csv_table(sets_csv, &headers, &rows)?;
    }
    log::info!(
        "Updated {} pack_art entries in {}",
        changed,
        sets_csv.display()
    );
    Ok(changed)
}
