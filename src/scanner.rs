//! Image → card record pipeline.
//!
//! Small images are treated as pre-cropped fragments and read in one OCR
//! pass. Full card photos have their name and number strips cropped and read
//! separately. The text then goes through the resolver; an optional
//! classifier fills in the card type and rescues cards OCR could not resolve.

use image::DynamicImage;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::card::{clean_number, extract_card_name, parse_set, CardIdentity, Confidence, SetTable, UNKNOWN};
use crate::classifier::{split_card_id, ClassifierHandle};
use crate::config::{RelativeRect, ScanConfig};
use crate::error::ScanError;
use crate::log;
use crate::ocr::{self, OcrConfig, OcrEngine};
use crate::resolve::{Resolution, Resolver, Strategy};

/// Extensions picked up by `scan_directory`, in scan order.
const IMAGE_EXTENSIONS: [&str; 2] = ["jpg", "png"];

/// One scanned image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanRecord {
    #[serde(flatten)]
    pub identity: CardIdentity,
    /// Catalog id predicted by the classifier, when it was consulted
    pub card_id: Option<String>,
    pub card_type: String,
    pub image_path: PathBuf,
    pub confidence: Option<Confidence>,
    pub strategy: Option<Strategy>,
}

pub struct CardScanner<'a> {
    resolver: Resolver<'a>,
    ocr: &'a dyn OcrEngine,
    classifier: Option<&'a ClassifierHandle>,
    settings: ScanConfig,
}

impl<'a> CardScanner<'a> {
    pub fn new(resolver: Resolver<'a>, ocr: &'a dyn OcrEngine, settings: ScanConfig) -> Self {
        Self {
            resolver,
            ocr,
            classifier: None,
            settings,
        }
    }

    pub fn with_classifier(mut self, classifier: &'a ClassifierHandle) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Loads and scans one image file.
    pub fn scan_image(&self, path: &Path) -> Result<ScanRecord, ScanError> {
        let image = image::open(path).map_err(|source| ScanError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        self.scan_loaded(&image, path)
    }

    /// Scans an already decoded image; `path` is only recorded.
    pub fn scan_loaded(&self, image: &DynamicImage, path: &Path) -> Result<ScanRecord, ScanError> {
        let gray = image.to_luma8();
        let (width, height) = gray.dimensions();

        let resolution = if is_small_image(width, height, self.settings.small_image_max_area) {
            log(&format!(
                "[SCAN] {} is {}x{}, reading as a single fragment",
                path.display(),
                width,
                height
            ));
            let text = ocr::read_region(
                self.ocr,
                &gray,
                &RelativeRect::default(),
                &OcrConfig::full_fragment(),
            )?;
            let cleaned = extract_card_name(&name_candidates(&text));
            self.resolver.resolve(&text, &text, Some(&cleaned))
        } else {
            let name_text = ocr::read_region(
                self.ocr,
                &gray,
                &self.settings.name_region,
                &OcrConfig::name_region(),
            )?;
            let number_text = ocr::read_region(
                self.ocr,
                &gray,
                &self.settings.number_region,
                &OcrConfig::number_region(),
            )?;
            let lines: Vec<&str> = name_text.lines().collect();
            let cleaned = extract_card_name(&lines);
            self.resolver.resolve(&name_text, &number_text, Some(&cleaned))
        };

        Ok(self.finish_record(image, path, resolution))
    }

    fn finish_record(&self, image: &DynamicImage, path: &Path, resolution: Resolution) -> ScanRecord {
        let mut record = ScanRecord {
            identity: resolution.identity.clone(),
            card_id: None,
            card_type: self.settings.default_card_type.clone(),
            image_path: path.to_path_buf(),
            confidence: resolution.confidence,
            strategy: resolution.strategy,
        };

        let Some(classifier) = self.classifier else {
            return record;
        };

        match classifier.predict_type(image) {
            Ok(card_type) => record.card_type = card_type,
            Err(e) => log(&format!("[CLASSIFIER] No type prediction: {:#}", e)),
        }

        if resolution.is_resolved() {
            return record;
        }

        match classifier.predict_card_id(image) {
            Ok(card_id) => {
                log(&format!("[CLASSIFIER] Predicted card id {}", card_id));
                match self.resolver.catalog().query_by_id(&card_id, resolution.language) {
                    Some(candidate) if !candidate.is_empty() => {
                        record.identity.merge(&candidate, true);
                        record.confidence = Some(candidate.confidence);
                    }
                    _ => {
                        if let Some((set, number)) = split_card_id(&card_id) {
                            record.identity.set = set.to_string();
                            record.identity.number = number.to_string();
                        }
                    }
                }
                record.card_id = Some(card_id);
            }
            Err(e) => log(&format!("[CLASSIFIER] No card id prediction: {:#}", e)),
        }

        record
    }

    /// Scans every path in order.
    ///
    /// Images that fail to decode or to OCR are logged and skipped. Only a
    /// missing OCR engine aborts the run.
    pub fn scan_files(
        &self,
        paths: &[PathBuf],
        mut progress: Option<&mut dyn FnMut(usize, usize)>,
    ) -> Result<Vec<ScanRecord>, ScanError> {
        let total = paths.len();
        let mut records = Vec::with_capacity(total);

        for (idx, path) in paths.iter().enumerate() {
            match self.scan_image(path) {
                Ok(record) => {
                    log(&format!(
                        "[SCAN] {} -> {} / {} / {}",
                        path.display(),
                        record.identity.name,
                        record.identity.number,
                        record.identity.set
                    ));
                    records.push(record);
                }
                Err(e) if !e.is_fatal() => {
                    log(&format!("[SCAN] Skipping {}: {}", path.display(), e));
                }
                Err(e) => return Err(e),
            }

            if let Some(report) = progress.as_deref_mut() {
                report(idx + 1, total);
            }
        }

        Ok(records)
    }

    /// Scans the `.jpg` files of `dir`, then its `.png` files, each sorted.
    pub fn scan_directory(&self, dir: &Path) -> Result<Vec<ScanRecord>, ScanError> {
        let paths = list_images(dir)?;
        log(&format!(
            "[SCAN] {} images found in {}",
            paths.len(),
            dir.display()
        ));
        self.scan_files(&paths, None)
    }
}

/// Images with fewer pixels than `max_area` are read as one fragment.
pub fn is_small_image(width: u32, height: u32, max_area: u64) -> bool {
    (width as u64) * (height as u64) < max_area
}

/// Lines of a whole-fragment OCR result that may hold the card name.
///
/// Set lines and lines carrying a card number are left out.
pub fn name_candidates(text: &str) -> Vec<&str> {
    let no_sets = SetTable::empty();
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| parse_set(line, &no_sets).is_none())
        .filter(|line| clean_number(line) == UNKNOWN)
        .collect()
}

/// Image files of `dir` grouped by `IMAGE_EXTENSIONS` order, sorted by path.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    let mut ordered = Vec::with_capacity(files.len());
    for ext in IMAGE_EXTENSIONS {
        ordered.extend(files.iter().filter(|path| has_extension(path, ext)).cloned());
    }
    Ok(ordered)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}
