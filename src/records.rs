//! Card and set record types plus the CSV/JSON readers shared by the tools.
//!
//! Card rows come from spreadsheet exports with a free-form column set, so a
//! card is an ordered name -> value mapping rather than a fixed struct. Only
//! three columns carry semantics (identifier, set code, file name) and the
//! sources spell their headers inconsistently, so the accessors tolerate the
//! known variants.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CatalogError, Result};

/// Header spellings seen for the card identifier column
const ID_KEYS: [&str; 3] = ["ID", "Id", "id"];
/// Header spellings seen for the image file name column
const FILE_NAME_KEYS: [&str; 4] = ["File Name", "FileName", "file_name", "File"];
/// Header spellings seen for the set code column
const SET_CODE_KEYS: [&str; 2] = ["Set Code", "SetCode"];

/// A single card row: an ordered mapping of column name to value.
///
/// Serializes as a plain JSON object, preserving source column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardRecord {
    pub fields: Map<String, Value>,
}

impl CardRecord {
    /// The card identifier, if present and non-empty.
    pub fn id(&self) -> Option<&str> {
        self.first_of(&ID_KEYS)
    }

    /// The set code, if present and non-empty.
    pub fn set_code(&self) -> Option<&str> {
        self.first_of(&SET_CODE_KEYS)
    }

    /// The image file name, if present and non-empty.
    pub fn file_name(&self) -> Option<&str> {
        self.first_of(&FILE_NAME_KEYS)
    }

    /// Sets the image file name under the canonical column name.
    pub fn set_file_name(&mut self, value: String) {
        self.fields
            .insert(FILE_NAME_KEYS[0].to_string(), Value::String(value));
    }

    /// First non-empty string value among the given column name variants.
    fn first_of(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .filter_map(|key| self.fields.get(*key).and_then(Value::as_str))
            .find(|value| !value.is_empty())
    }
}

/// Set metadata row with the fixed merged-CSV schema.
///
/// The feature flags are textual booleans, defaulting to "false".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRecord {
    pub short_code: String,
    pub set_code: String,
    pub set_name: String,
    pub pack_art: String,
    pub has_alt_images: String,
    pub has_foils: String,
    pub has_tribbles: String,
}

impl SetRecord {
    /// Builds a set record from a JSON object, tolerating camelCase key
    /// spellings. Returns `None` when no short code is present.
    pub fn from_json(entry: &Map<String, Value>) -> Option<SetRecord> {
        let short_code = json_string(entry, &["short_code", "shortCode", "short"])?;
        Some(SetRecord {
            short_code,
            set_code: json_string(entry, &["set_code", "setCode"]).unwrap_or_default(),
            set_name: json_string(entry, &["set_name", "setName"]).unwrap_or_default(),
            pack_art: json_string(entry, &["pack_art", "packArt"]).unwrap_or_default(),
            has_alt_images: json_flag(entry, "has_alt_images"),
            has_foils: json_flag(entry, "has_foils"),
            has_tribbles: json_flag(entry, "has_tribbles"),
        })
    }

    /// Builds a set record from a CSV row. Returns `None` when no short code
    /// is present; missing optional columns default to "" / "false".
    pub fn from_csv_row(headers: &[String], row: &[String]) -> Option<SetRecord> {
        let get = |name: &str| -> String {
            headers
                .iter()
                .position(|header| header == name)
                .and_then(|i| row.get(i))
                .map(|value| value.trim().to_string())
                .unwrap_or_default()
        };
        let short_code = ["short_code", "shortCode", "short"]
            .iter()
            .map(|name| get(name))
            .find(|value| !value.is_empty())?;
        let flag = |name: &str| -> String {
            let value = get(name);
            if value.is_empty() {
                "false".to_string()
            } else {
                value
            }
        };
        Some(SetRecord {
            short_code,
            set_code: get("set_code"),
            set_name: get("set_name"),
            pack_art: get("pack_art"),
            has_alt_images: flag("has_alt_images"),
            has_foils: flag("has_foils"),
            has_tribbles: flag("has_tribbles"),
        })
    }
}

/// First non-empty string value among the given JSON keys.
fn json_string(entry: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| entry.get(*key).and_then(Value::as_str))
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// Feature flag as text: JSON booleans become "true"/"false", strings pass
/// through, anything else defaults to "false".
fn json_flag(entry: &Map<String, Value>, key: &str) -> String {
    match entry.get(key) {
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(Value::String(text)) if !text.is_empty() => text.clone(),
        _ => "false".to_string(),
    }
}

/// Reads a CSV file with headers into card records, trimming header names and
/// cell values. Short rows are tolerated; missing cells become empty strings.
pub fn read_csv_records(path: &Path) -> Result<Vec<CardRecord>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|header| header.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut fields = Map::new();
        for (i, header) in headers.iter().enumerate() {
            let value = record.get(i).unwrap_or("").trim();
            fields.insert(header.clone(), Value::String(value.to_string()));
        }
        rows.push(CardRecord { fields });
    }
    Ok(rows)
}

/// Reads a CSV file as raw headers plus rows, padding short rows to the
/// header width. Values are not trimmed.
pub fn read_csv_table(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|header| header.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut row: Vec<String> = record.iter().map(|value| value.to_string()).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }
    Ok((headers, rows))
}

/// Writes headers plus rows as CSV, creating parent directories if needed.
pub fn write_csv_table(path: &Path, headers: &[String], rows: &[Vec<String>]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Loads a card list from a JSON file.
pub fn load_cards(path: &Path) -> Result<Vec<CardRecord>> {
    if !path.exists() {
        return Err(CatalogError::MissingInput(format!(
            "cards JSON not found: {}",
            path.display()
        )));
    }
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Writes a card list as pretty-printed JSON.
pub fn save_cards(path: &Path, cards: &[CardRecord]) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(cards)?)?;
    Ok(())
}
