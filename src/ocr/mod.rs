//! OCR boundary: locating tesseract, preparing regions, reading text.

pub mod engine;
pub mod preprocess;
pub mod setup;

pub use engine::{OcrConfig, OcrEngine, TesseractEngine};
pub use preprocess::{crop_region, enhance_for_ocr};

use image::GrayImage;

use crate::config::RelativeRect;
use crate::error::ScanError;
use crate::log;

/// Crops `region`, enhances it and runs OCR with `config`.
///
/// A region that rounds down to zero pixels reads as empty text.
pub fn read_region(
    engine: &dyn OcrEngine,
    img: &GrayImage,
    region: &RelativeRect,
    config: &OcrConfig,
) -> Result<String, ScanError> {
    let cropped = crop_region(img, region);
    if cropped.width() == 0 || cropped.height() == 0 {
        log(&format!(
            "[OCR] Region {:?} of a {}x{} image is empty, skipping OCR",
            region,
            img.width(),
            img.height()
        ));
        return Ok(String::new());
    }
    let enhanced = enhance_for_ocr(&cropped);
    engine.extract_text(&enhanced, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingOcr {
        calls: Cell<usize>,
    }

    impl OcrEngine for CountingOcr {
        fn extract_text(&self, _region: &GrayImage, _config: &OcrConfig) -> Result<String, ScanError> {
            self.calls.set(self.calls.get() + 1);
            Ok("Pikachu".to_string())
        }
    }

    #[test]
    fn test_empty_region_skips_engine() {
        let engine = CountingOcr { calls: Cell::new(0) };
        // 8% of an 8px strip floors to zero rows
        let img = GrayImage::new(2000, 8);
        let region = RelativeRect { x: 0.0, y: 0.02, width: 0.7, height: 0.08 };

        let text = read_region(&engine, &img, &region, &OcrConfig::name_region()).unwrap();
        assert_eq!(text, "");
        assert_eq!(engine.calls.get(), 0);
    }

    #[test]
    fn test_region_is_read() {
        let engine = CountingOcr { calls: Cell::new(0) };
        let img = GrayImage::new(100, 100);
        let text = read_region(&engine, &img, &RelativeRect::default(), &OcrConfig::full_fragment()).unwrap();
        assert_eq!(text, "Pikachu");
        assert_eq!(engine.calls.get(), 1);
    }
}
