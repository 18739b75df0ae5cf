use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the scan entry points.
///
/// Lookup misses are not errors; they resolve to default records. Only
/// problems no fallback can work around end up here.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The OCR engine binary is missing or cannot be started.
    #[error("OCR engine unavailable: {0}")]
    OcrUnavailable(String),

    /// The OCR engine ran but reported a failure.
    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("failed to load image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ScanError {
    /// True for errors that make every further scan pointless.
    ///
    /// Only a missing OCR engine qualifies; everything else is specific to
    /// one image.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ScanError::OcrUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_missing_engine_is_fatal() {
        assert!(ScanError::OcrUnavailable("tesseract not found".into()).is_fatal());
        assert!(!ScanError::Ocr("Tesseract failed".into()).is_fatal());
        assert!(!ScanError::Io(std::io::Error::other("disk full")).is_fatal());
    }
}
