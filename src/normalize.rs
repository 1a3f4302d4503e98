//! Normalize card file names to `images/<set-code>/` prefixed paths.

use std::path::Path;

use crate::error::{CatalogError, Result};
use crate::records;

/// Row counts from a normalization run.
#[derive(Debug, PartialEq)]
pub struct NormalizeSummary {
    pub rows: usize,
    pub changed: usize,
}

/// Prefixes a bare file name with `images/<set-code>/`. Names that already
/// contain a directory, start with `images`, or lack a set code pass through
/// unchanged (modulo trimming). Idempotent.
pub fn normalized_file_name(file_name: &str, set_code: &str) -> String {
    let name = file_name.trim();
    if !name.is_empty()
        && !name.contains('/')
        && !name.to_lowercase().starts_with("images")
        && !set_code.is_empty()
    {
        format!("images/{set_code}/{name}")
    } else {
        name.to_string()
    }
}

/// Rewrites the `File Name` column of the input CSV and writes the result to
/// the output path. Aborts if the input is missing or lacks the column.
pub fn run(input: &Path, output: &Path) -> Result<NormalizeSummary> {
    if !input.exists() {
        return Err(CatalogError::MissingInput(format!(
            "input not found: {}",
            input.display()
        )));
    }

    let (headers, mut rows) = records::read_csv_table(input)?;
    let file_idx = headers
        .iter()
        .position(|header| header == "File Name")
        .ok_or_else(|| CatalogError::MissingColumn {
            column: "File Name".to_string(),
            path: input.to_path_buf(),
        })?;
    let set_idx = headers
        .iter()
        .position(|header| header == "Set Code" || header == "SetCode");

    let mut changed = 0;
    for row in &mut rows {
        let set_code = set_idx
            .and_then(|i| row.get(i))
            .map(|value| value.trim().to_string())
            .unwrap_or_default();
        let normalized = normalized_file_name(&row[file_idx], &set_code);
        if normalized != row[file_idx] {
            changed += 1;
        }
        row[file_idx] = normalized;
    }

    records::write_csv_table(output, &headers, &rows)?;
    log::info!(
        "Wrote {} ({} of {} rows normalized)",
        output.display(),
        changed,
        rows.len()
    );
    Ok(NormalizeSummary {
        rows: rows.len(),
        changed,
    })
}
