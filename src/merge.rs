//! Merge set metadata from the site JSON and the authoring CSV.
//!
//! JSON rows load first, CSV rows override them on short-code collision.
//! Output is a deterministic, short-code-sorted CSV with the fixed
//! seven-column schema.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::Result;
use crate::records::{self, SetRecord};

/// Merges the two set sources into `out_path`. Returns `None` without
/// writing anything when both sources are absent.
pub fn run(json_path: &Path, csv_path: &Path, out_path: &Path) -> Result<Option<usize>> {
    if !json_path.exists() && !csv_path.exists() {
        log::info!(
            "Neither {} nor {} exists; nothing to merge",
            json_path.display(),
            csv_path.display()
        );
        return Ok(None);
    }

    let mut merged: BTreeMap<String, SetRecord> = BTreeMap::new();

    if json_path.exists() {
        let text = fs::read_to_string(json_path)?;
        let entries: Vec<Map<String, Value>> = serde_json::from_str(&text)?;
        log::info!("Loaded {} set entries from {}", entries.len(), json_path.display());
        for entry in &entries {
            if let Some(set) = SetRecord::from_json(entry) {
                merged.insert(set.short_code.clone(), set);
            }
        }
    }

    // The CSV is the authoritative source; its rows always win.
    if csv_path.exists() {
        let (headers, rows) = records::read_csv_table(csv_path)?;
        log::info!("Loaded {} set rows from {}", rows.len(), csv_path.display());
        for row in &rows {
            if let Some(set) = SetRecord::from_csv_row(&headers, row) {
                merged.insert(set.short_code.clone(), set);
            }
        }
    }

    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut writer = csv::Writer::from_path(out_path)?;
    for set in merged.values() {
        writer.serialize(set)?;
    }
    writer.flush()?;
    log::info!("Wrote {} set rows to {}", merged.len(), out_path.display());
    Ok(Some(merged.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn read_sets(path: &Path) -> Vec<SetRecord> {
        let (headers, rows) = records::read_csv_table(path).unwrap();
        rows.iter()
            .filter_map(|row| SetRecord::from_csv_row(&headers, row))
            .collect()
    }

    #[test]
    fn test_both_sources_absent_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("sets_merged.csv");
        let result = run(
            &dir.path().join("sets.json"),
            &dir.path().join("sets.csv"),
            &out,
        )
        .unwrap();
        assert_eq!(result, None);
        assert!(!out.exists());
    }

    #[test]
    fn test_csv_rows_override_json_rows() {
        let dir = TempDir::new().unwrap();
        let json = dir.path().join("sets.json");
        let csv = dir.path().join("sets.csv");
        let out = dir.path().join("sets_merged.csv");
        fs::write(
            &json,
            r#"[
                {"shortCode": "AGT", "setName": "Old Name", "has_foils": true},
                {"short_code": "HAD", "set_name": "Holodeck Adventures"}
            ]"#,
        )
        .unwrap();
        fs::write(
            &csv,
            "short_code,set_code,set_name,pack_art,has_alt_images,has_foils,has_tribbles\n\
             AGT,AGT01,A Good Trade,pack-art/AGT.png,true,false,false\n",
        )
        .unwrap();

        let count = run(&json, &csv, &out).unwrap();
        assert_eq!(count, Some(2));

        let sets = read_sets(&out);
        // Sorted by short code, CSV wins for AGT.
        assert_eq!(sets[0].short_code, "AGT");
        assert_eq!(sets[0].set_name, "A Good Trade");
        assert_eq!(sets[0].has_alt_images, "true");
        assert_eq!(sets[0].has_foils, "false");
        // JSON-only row passes through with defaults filled.
        assert_eq!(sets[1].short_code, "HAD");
        assert_eq!(sets[1].set_name, "Holodeck Adventures");
        assert_eq!(sets[1].has_foils, "false");
        assert_eq!(sets[1].pack_art, "");
    }

    #[test]
    fn test_rows_without_short_code_are_skipped() {
        let dir = TempDir::new().unwrap();
        let json = dir.path().join("sets.json");
        let out = dir.path().join("sets_merged.csv");
        fs::write(
            &json,
            r#"[{"set_name": "Nameless"}, {"short_code": "VOY", "set_name": "Voyages"}]"#,
        )
        .unwrap();

        let count = run(&json, &dir.path().join("missing.csv"), &out).unwrap();
        assert_eq!(count, Some(1));
        let sets = read_sets(&out);
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].short_code, "VOY");
    }

    #[test]
    fn test_output_is_sorted_by_short_code() {
        let dir = TempDir::new().unwrap();
        let csv = dir.path().join("sets.csv");
        let out = dir.path().join("sets_merged.csv");
        fs::write(
            &csv,
            "short_code,set_name\nVOY,Voyages\nAGT,A Good Trade\nHAD,Holodeck\n",
        )
        .unwrap();

        run(&dir.path().join("missing.json"), &csv, &out).unwrap();
        let codes: Vec<String> = read_sets(&out).into_iter().map(|s| s.short_code).collect();
        assert_eq!(codes, vec!["AGT", "HAD", "VOY"]);
    }
}
