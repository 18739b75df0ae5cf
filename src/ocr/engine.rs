use image::GrayImage;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Command;
use tempfile::NamedTempFile;

use super::setup::{find_tessdata_dir, find_tesseract_executable};
use crate::config::OcrSettings;
use crate::error::ScanError;

const LETTERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const DIGITS: &str = "0123456789";

/// Tesseract settings for one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrConfig {
    /// Page segmentation mode
    pub psm: u8,
    /// Characters tesseract may emit; everything when `None`
    pub whitelist: Option<String>,
}

impl OcrConfig {
    /// Single text line of letters, apostrophes and digits.
    pub fn name_region() -> Self {
        Self {
            psm: 7,
            whitelist: Some(format!("{}'{}", LETTERS, DIGITS)),
        }
    }

    /// Uniform block of digits and slashes.
    pub fn number_region() -> Self {
        Self {
            psm: 6,
            whitelist: Some(format!("/{}", DIGITS)),
        }
    }

    /// Unrestricted block, for pre-cropped fragments holding name and number.
    pub fn full_fragment() -> Self {
        Self {
            psm: 6,
            whitelist: None,
        }
    }

    /// Command-line arguments for this configuration.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["--psm".to_string(), self.psm.to_string()];
        if let Some(whitelist) = &self.whitelist {
            args.push("-c".to_string());
            args.push(format!("tessedit_char_whitelist={}", whitelist));
        }
        args
    }
}

/// Image region → raw multi-line text.
///
/// Cropping is the caller's job; the engine reads whatever it is given.
pub trait OcrEngine {
    fn extract_text(&self, region: &GrayImage, config: &OcrConfig) -> Result<String, ScanError>;
}

/// Runs the tesseract executable on a temporary PNG.
pub struct TesseractEngine {
    executable: PathBuf,
    tessdata: Option<PathBuf>,
    language: String,
}

impl TesseractEngine {
    pub fn new(executable: PathBuf, tessdata: Option<PathBuf>, language: &str) -> Self {
        Self {
            executable,
            tessdata,
            language: language.to_string(),
        }
    }

    /// Locates tesseract. A missing binary is fatal for scanning.
    pub fn discover(settings: &OcrSettings) -> Result<Self, ScanError> {
        let executable = find_tesseract_executable(settings)
            .map_err(|e| ScanError::OcrUnavailable(format!("{:#}", e)))?;
        Ok(Self::new(
            executable,
            find_tessdata_dir(),
            settings.language_or_default(),
        ))
    }

    pub fn executable(&self) -> &PathBuf {
        &self.executable
    }
}

impl OcrEngine for TesseractEngine {
    fn extract_text(&self, region: &GrayImage, config: &OcrConfig) -> Result<String, ScanError> {
        // Save image to temporary file
        let temp_input = NamedTempFile::with_suffix(".png")?;
        region
            .save(temp_input.path())
            .map_err(|e| ScanError::Ocr(format!("failed to write OCR input: {}", e)))?;

        let mut command = Command::new(&self.executable);
        command.arg(temp_input.path()).arg("stdout");
        if let Some(tessdata) = &self.tessdata {
            command.arg("--tessdata-dir").arg(tessdata);
        }
        command.arg("-l").arg(&self.language).args(config.to_args());

        let output = command.output().map_err(|e| match e.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied => ScanError::OcrUnavailable(format!(
                "cannot run {}: {}. Install Tesseract and add it to PATH or set TESSERACT_CMD.",
                self.executable.display(),
                e
            )),
            _ => ScanError::Io(e),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScanError::Ocr(format!("Tesseract failed: {}", stderr.trim())));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
