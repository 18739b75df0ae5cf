//! Collection aggregation and CSV export.
//!
//! Scan records can be written one row per image, or grouped into
//! `(Name, Number)` piles with a quantity.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::scanner::ScanRecord;

/// A row type that can be written by `export_to_csv`.
pub trait CsvRow {
    const HEADER: &'static [&'static str];

    fn fields(&self) -> Vec<String>;
}

impl CsvRow for ScanRecord {
    const HEADER: &'static [&'static str] = &[
        "Name",
        "Number",
        "Set",
        "CardID",
        "Type",
        "Confidence",
        "Strategy",
        "Image",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.identity.name.clone(),
            self.identity.number.clone(),
            self.identity.set.clone(),
            self.card_id.clone().unwrap_or_default(),
            self.card_type.clone(),
            self.confidence.map(|c| c.to_string()).unwrap_or_default(),
            self.strategy.map(|s| s.to_string()).unwrap_or_default(),
            self.image_path.display().to_string(),
        ]
    }
}

/// Copies of one card in a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedCard {
    pub name: String,
    pub number: String,
    /// Set of the first scan in the group
    pub set: String,
    pub quantity: usize,
}

impl CsvRow for AggregatedCard {
    const HEADER: &'static [&'static str] = &["Name", "Number", "Set", "Quantity"];

    fn fields(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.number.clone(),
            self.set.clone(),
            self.quantity.to_string(),
        ]
    }
}

/// Groups records by `(Name, Number)` in first-seen order.
pub fn aggregate_cards(records: &[ScanRecord]) -> Vec<AggregatedCard> {
    let mut cards: Vec<AggregatedCard> = Vec::new();
    for record in records {
        let identity = &record.identity;
        match cards
            .iter_mut()
            .find(|c| c.name == identity.name && c.number == identity.number)
        {
            Some(card) => card.quantity += 1,
            None => cards.push(AggregatedCard {
                name: identity.name.clone(),
                number: identity.number.clone(),
                set: identity.set.clone(),
                quantity: 1,
            }),
        }
    }
    cards
}

/// Quotes a field when it holds a comma, quote or line break.
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Writes `rows` with a header line, replacing any existing file.
///
/// Parent directories are created. No rows gives an empty file.
pub fn export_to_csv<R: CsvRow>(rows: &[R], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).context("Failed to create output directory")?;
        }
    }

    let file = File::create(path).context("Failed to create CSV file")?;
    let mut writer = BufWriter::new(file);

    if rows.is_empty() {
        writer.flush().context("Failed to write CSV file")?;
        return Ok(());
    }

    writeln!(writer, "{}", R::HEADER.join(",")).context("Failed to write CSV header")?;
    for row in rows {
        let line: Vec<String> = row.fields().iter().map(|f| escape_field(f)).collect();
        writeln!(writer, "{}", line.join(",")).context("Failed to write CSV row")?;
    }
    writer.flush().context("Failed to write CSV file")?;
    Ok(())
}
