//! Card Scanner
//!
//! Turns scanned trading-card images into catalog records. OCR text from the
//! name and number regions is cleaned, mined for numbers, set hints and promo
//! codes, then resolved against the TCGdex catalog through an ordered cascade
//! of lookup strategies.

pub mod card;
pub mod catalog;
pub mod classifier;
pub mod config;
pub mod error;
pub mod export;
pub mod ocr;
pub mod paths;
pub mod resolve;
pub mod scanner;

pub use card::{CardIdentity, CatalogCandidate, Confidence, Language};
pub use error::ScanError;
pub use resolve::{Resolution, Resolver, Strategy};
pub use scanner::{CardScanner, ScanRecord};

use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Logs a message to stderr and the log file with timestamp.
///
/// Stdout is left to command output such as `parse` JSON.
pub fn log(msg: &str) {
    let log_path = paths::get_logs_dir().join("card_scanner.log");
    write_log_line(&mut std::io::stderr(), &log_path, msg);
}

fn write_log_line(console: &mut impl Write, log_path: &Path, msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    let _ = console.write_all(line.as_bytes());
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
    {
        let _ = file.write_all(line.as_bytes());
    }
}
