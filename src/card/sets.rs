//! Set abbreviation table.
//!
//! Maps printed set abbreviations to canonical set names and back. The table
//! ships as `data/tcg_sets.json`; each value is either a plain name or an
//! object with the canonical name plus names used on other-language prints:
//!
//! ```json
//! { "BS": "Base Set", "SV1": { "name": "Scarlet & Violet", "names": ["スカーレット&バイオレット"] } }
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use crate::log;
use crate::paths;

static GLOBAL: OnceLock<SetTable> = OnceLock::new();

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSetEntry {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        names: Vec<String>,
    },
}

/// One known set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetEntry {
    /// Abbreviation as written in the table
    pub abbreviation: String,
    /// Canonical (English) name
    pub name: String,
    /// Display names in other languages
    pub names: Vec<String>,
}

impl SetEntry {
    fn display_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.names.iter().map(String::as_str))
    }
}

/// Read-only abbreviation ↔ name mapping.
#[derive(Debug, Clone, Default)]
pub struct SetTable {
    // Keyed by uppercased abbreviation
    entries: BTreeMap<String, SetEntry>,
}

impl SetTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses a table from its JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, RawSetEntry> =
            serde_json::from_str(json).context("Invalid set table JSON")?;

        let entries = raw
            .into_iter()
            .map(|(abbreviation, entry)| {
                let (name, names) = match entry {
                    RawSetEntry::Name(name) => (name, Vec::new()),
                    RawSetEntry::Detailed { name, names } => (name, names),
                };
                (
                    abbreviation.to_uppercase(),
                    SetEntry {
                        abbreviation,
                        name,
                        names,
                    },
                )
            })
            .collect();

        Ok(Self { entries })
    }

    /// Loads a table from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read set table {}", path.display()))?;
        Self::from_json(&contents)
    }

    /// Loads a table, falling back to an empty one on any failure.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(table) => {
                log(&format!(
                    "Loaded {} set abbreviations from {}",
                    table.len(),
                    path.display()
                ));
                table
            }
            Err(e) => {
                log(&format!("Set table unavailable ({:#}). Using empty mapping.", e));
                Self::empty()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up an abbreviation (case-insensitive).
    pub fn get(&self, abbreviation: &str) -> Option<&SetEntry> {
        self.entries.get(&abbreviation.trim().to_uppercase())
    }

    /// Canonical name for `raw`, or `raw` itself when it is not an abbreviation.
    pub fn canonical(&self, raw: &str) -> String {
        match self.get(raw) {
            Some(entry) => entry.name.clone(),
            None => raw.to_string(),
        }
    }

    /// Abbreviation whose canonical or other-language name equals `name`.
    pub fn abbreviation_for(&self, name: &str) -> Option<String> {
        let wanted = name.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        self.entries
            .values()
            .find(|entry| entry.display_names().any(|n| n.to_lowercase() == wanted))
            .map(|entry| entry.abbreviation.clone())
    }
}

/// The process-wide table, loaded once from `data/tcg_sets.json`.
pub fn global() -> &'static SetTable {
    GLOBAL.get_or_init(|| SetTable::load_or_empty(&paths::get_set_table_path()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const TABLE: &str = r#"{
        "BS": "Base Set",
        "ju": "Jungle",
        "SV1": { "name": "Scarlet & Violet", "names": ["スカーレット&バイオレット", "朱&紫"] }
    }"#;

    #[test]
    fn test_canonical() {
        let table = SetTable::from_json(TABLE).unwrap();
        assert_eq!(table.canonical("BS"), "Base Set");
        assert_eq!(table.canonical("bs"), "Base Set");
        assert_eq!(table.canonical("JU"), "Jungle");
        assert_eq!(table.canonical("Fossil"), "Fossil");
    }

    #[test]
    fn test_abbreviation_for_any_language() {
        let table = SetTable::from_json(TABLE).unwrap();
        assert_eq!(table.abbreviation_for("base set"), Some("BS".to_string()));
        assert_eq!(table.abbreviation_for("Jungle"), Some("ju".to_string()));
        assert_eq!(table.abbreviation_for("朱&紫"), Some("SV1".to_string()));
        assert_eq!(table.abbreviation_for("Fossil"), None);
        assert_eq!(table.abbreviation_for(""), None);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tcg_sets.json");
        std::fs::write(&path, TABLE).unwrap();

        let table = SetTable::load(&path).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("sv1").map(|e| e.name.as_str()), Some("Scarlet & Violet"));
    }

    #[test]
    fn test_load_failure_is_empty() {
        let dir = tempdir().unwrap();
        let table = SetTable::load_or_empty(&dir.path().join("missing.json"));
        assert!(table.is_empty());
        assert_eq!(table.canonical("BS"), "BS");

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "[1, 2, 3]").unwrap();
        assert!(SetTable::load_or_empty(&bad).is_empty());
    }
}
