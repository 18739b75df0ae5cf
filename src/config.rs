//! Scanner configuration.
//!
//! Loads settings from config.json next to the executable. Missing files or
//! parse errors fall back to defaults so a scan can always run.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::log;
use crate::paths;

/// A rectangle in relative coordinates (0.0 to 1.0).
/// Used for card regions that scale with the scanned image size.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelativeRect {
    /// X position of top-left corner (0.0 = left edge, 1.0 = right edge)
    pub x: f32,
    /// Y position of top-left corner (0.0 = top edge, 1.0 = bottom edge)
    pub y: f32,
    /// Width as fraction of image width
    pub width: f32,
    /// Height as fraction of image height
    pub height: f32,
}

impl Default for RelativeRect {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
        }
    }
}

/// Remote catalog settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// API root, without a trailing language segment
    pub base_url: String,
    /// Timeout for card searches and id lookups
    pub timeout_secs: u64,
    /// Timeout for the (larger) set listing
    pub set_list_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.tcgdex.net/v2".to_string(),
            timeout_secs: 5,
            set_list_timeout_secs: 10,
            user_agent: "card-scanner".to_string(),
        }
    }
}

/// Region layout and resolution tuning.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Images with fewer pixels than this are treated as pre-cropped fragments
    pub small_image_max_area: u64,
    /// Card name strip along the top of the card
    pub name_region: RelativeRect,
    /// Collector number strip along the bottom of the card
    pub number_region: RelativeRect,
    /// Minimum similarity ratio for fuzzy name matches (0.0-1.0)
    pub similarity_threshold: f64,
    /// Type label used when no classifier answers
    pub default_card_type: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            small_image_max_area: 160_000,
            name_region: RelativeRect {
                x: 0.05,
                y: 0.02,
                width: 0.70,
                height: 0.08,
            },
            number_region: RelativeRect {
                x: 0.0,
                y: 0.88,
                width: 0.45,
                height: 0.10,
            },
            similarity_threshold: 0.7,
            default_card_type: "common".to_string(),
        }
    }
}

/// OCR engine settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    /// Explicit path to the tesseract executable
    pub tesseract_cmd: Option<String>,
    /// Tesseract language code
    pub language: String,
}

/// Complete scanner configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    pub catalog: CatalogConfig,
    pub scan: ScanConfig,
    pub ocr: OcrSettings,
}

impl OcrSettings {
    /// Language code to hand to tesseract, `eng` when unset.
    pub fn language_or_default(&self) -> &str {
        if self.language.trim().is_empty() {
            "eng"
        } else {
            self.language.trim()
        }
    }
}

/// Loads configuration from config.json next to the executable, or defaults.
pub fn load_config() -> ScannerConfig {
    load_config_from(&paths::get_config_path())
}

/// Loads configuration from `config_path`, falling back to defaults.
pub fn load_config_from(config_path: &Path) -> ScannerConfig {
    log(&format!("Looking for config at: {}", config_path.display()));

    if config_path.exists() {
        match fs::read_to_string(config_path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log("Config loaded from config.json");
                    return config;
                }
                Err(e) => {
                    log(&format!(
                        "Failed to parse config.json: {}. Using defaults.",
                        e
                    ));
                }
            },
            Err(e) => {
                log(&format!(
                    "Failed to read config.json: {}. Using defaults.",
                    e
                ));
            }
        }
    } else {
        log("config.json not found. Using default config.");
    }

    ScannerConfig::default()
}
