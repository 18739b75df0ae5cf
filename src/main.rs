//! card-scanner CLI
//!
//! Scans card images into a collection CSV, or resolves OCR text passed on
//! the command line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use card_scanner::card::sets;
use card_scanner::catalog::TcgdexClient;
use card_scanner::classifier::ClassifierHandle;
use card_scanner::config::load_config;
use card_scanner::export::{aggregate_cards, export_to_csv};
use card_scanner::ocr::TesseractEngine;
use card_scanner::scanner::list_images;
use card_scanner::{log, paths, CardScanner, Resolver};

#[derive(Parser)]
#[command(name = "card-scanner")]
#[command(about = "Identify trading cards from scanned images", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan image files or directories of images
    Scan {
        /// Image files or directories (*.jpg, *.png)
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output CSV file [default: <exe_dir>/data/cards_scanned.csv]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write one row per distinct card with a quantity
        #[arg(short, long)]
        aggregate: bool,
    },

    /// Resolve already extracted OCR text
    Parse {
        /// Text read from the card name region
        #[arg(long, default_value = "")]
        name: String,

        /// Text read from the card number region
        #[arg(long, default_value = "")]
        number: String,
    },
}

fn main() -> Result<()> {
    // Set up panic hook to log panics
    std::panic::set_hook(Box::new(|panic_info| {
        let msg = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();
        log(&format!("PANIC at {}: {}", location, msg));
    }));

    let cli = Cli::parse();

    paths::ensure_directories().context("Failed to create output directories")?;
    let config = load_config();
    let catalog = TcgdexClient::new(&config.catalog)?;
    let resolver = Resolver::new(&catalog, sets::global())
        .with_similarity_threshold(config.scan.similarity_threshold);

    match cli.command {
        Commands::Scan {
            paths: inputs,
            output,
            aggregate,
        } => {
            let mut files = Vec::new();
            for input in &inputs {
                if input.is_dir() {
                    files.extend(list_images(input)?);
                } else {
                    files.push(input.clone());
                }
            }
            log(&format!("Scanning {} images", files.len()));

            let engine = TesseractEngine::discover(&config.ocr)?;
            log(&format!("Using Tesseract at {}", engine.executable().display()));
            let classifier = ClassifierHandle::unavailable();
            let scanner = CardScanner::new(resolver, &engine, config.scan.clone())
                .with_classifier(&classifier);

            let mut report = |done: usize, total: usize| {
                log(&format!("Progress: {}/{}", done, total));
            };
            let records = scanner.scan_files(&files, Some(&mut report as &mut dyn FnMut(usize, usize)))?;

            let output = output.unwrap_or_else(|| paths::get_data_dir().join("cards_scanned.csv"));
            if aggregate {
                let cards = aggregate_cards(&records);
                export_to_csv(&cards, &output)?;
                log(&format!(
                    "Wrote {} distinct cards ({} scans) to {}",
                    cards.len(),
                    records.len(),
                    output.display()
                ));
            } else {
                export_to_csv(&records, &output)?;
                log(&format!("Wrote {} cards to {}", records.len(), output.display()));
            }
        }
        Commands::Parse { name, number } => {
            let identity = resolver.parse_card_text(&name, &number);
            println!("{}", serde_json::to_string_pretty(&identity)?);
        }
    }

    Ok(())
}
