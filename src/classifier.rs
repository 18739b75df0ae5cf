//! Optional image classifier.
//!
//! The model itself lives outside this crate. A `ClassifierHandle` owns a
//! loader and loads the model lazily on first use; scans run without it when
//! no loader is configured or loading fails.

use anyhow::{anyhow, Result};
use image::DynamicImage;
use std::cell::OnceCell;

/// Card type labels a classifier may report.
pub const CARD_TYPES: [&str; 3] = ["holo", "reverse", "common"];

pub trait Classifier {
    /// Catalog card id of the form `<set>-<number>`.
    fn predict_card_id(&self, image: &DynamicImage) -> Result<String>;

    /// One of `CARD_TYPES`.
    fn predict_type(&self, image: &DynamicImage) -> Result<String>;
}

type Loader = Box<dyn Fn() -> Result<Box<dyn Classifier>>>;

pub struct ClassifierHandle {
    loader: Option<Loader>,
    model: OnceCell<Box<dyn Classifier>>,
}

impl ClassifierHandle {
    pub fn new(loader: impl Fn() -> Result<Box<dyn Classifier>> + 'static) -> Self {
        Self {
            loader: Some(Box::new(loader)),
            model: OnceCell::new(),
        }
    }

    /// A handle whose every prediction fails.
    pub fn unavailable() -> Self {
        Self {
            loader: None,
            model: OnceCell::new(),
        }
    }

    /// Returns the model, loading it on first call. Failed loads are retried.
    pub fn load(&self) -> Result<&dyn Classifier> {
        if let Some(model) = self.model.get() {
            return Ok(model.as_ref());
        }
        let loader = self
            .loader
            .as_ref()
            .ok_or_else(|| anyhow!("no classifier model configured"))?;
        let model = loader()?;
        Ok(self.model.get_or_init(|| model).as_ref())
    }

    pub fn is_loaded(&self) -> bool {
        self.model.get().is_some()
    }

    pub fn predict_card_id(&self, image: &DynamicImage) -> Result<String> {
        self.load()?.predict_card_id(image)
    }

    /// Predicted type label; unknown labels are rejected.
    pub fn predict_type(&self, image: &DynamicImage) -> Result<String> {
        let label = self.load()?.predict_type(image)?;
        if CARD_TYPES.contains(&label.as_str()) {
            Ok(label)
        } else {
            Err(anyhow!("unknown card type label '{}'", label))
        }
    }
}

/// Splits a `<set>-<number>` card id at its last dash.
pub fn split_card_id(card_id: &str) -> Option<(&str, &str)> {
    let (set, number) = card_id.rsplit_once('-')?;
    if set.is_empty() || number.is_empty() {
        return None;
    }
    Some((set, number))
}


#[cfg(test)]
mod tests {
    use super::testing::fixed;
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn blank() -> DynamicImage {
        DynamicImage::new_luma8(4, 4)
    }

    #[test]
    fn test_loads_once() {
        let loads = Rc::new(Cell::new(0));
        let counter = Rc::clone(&loads);
        let handle = ClassifierHandle::new(move || {
            counter.set(counter.get() + 1);
            Ok(Box::new(testing::FixedClassifier {
                card_id: Some("base1-4".into()),
                card_type: Some("holo".into()),
            }) as Box<dyn Classifier>)
        });

        assert!(!handle.is_loaded());
        assert_eq!(handle.predict_card_id(&blank()).unwrap(), "base1-4");
        assert_eq!(handle.predict_type(&blank()).unwrap(), "holo");
        assert!(handle.is_loaded());
        assert_eq!(loads.get(), 1);
    }

    #[test]
    fn test_unavailable_handle_fails() {
        let handle = ClassifierHandle::unavailable();
        assert!(handle.load().is_err());
        assert!(handle.predict_type(&blank()).is_err());
        assert!(!handle.is_loaded());
    }

    #[test]
    fn test_failed_load_is_retried() {
        let attempts = Rc::new(Cell::new(0));
        let counter = Rc::clone(&attempts);
        let handle = ClassifierHandle::new(move || {
            counter.set(counter.get() + 1);
            Err(anyhow!("model file missing"))
        });
        assert!(handle.load().is_err());
        assert!(handle.load().is_err());
        assert_eq!(attempts.get(), 2);
    }

    #[test]
    fn test_rejects_unknown_type_label() {
        let handle = fixed(None, Some("shiny"));
        assert!(handle.predict_type(&blank()).is_err());
    }

    #[test]
    fn test_split_card_id() {
        assert_eq!(split_card_id("base1-4"), Some(("base1", "4")));
        assert_eq!(split_card_id("swsh12.5-GG01"), Some(("swsh12.5", "GG01")));
        assert_eq!(split_card_id("sv-en-126"), Some(("sv-en", "126")));
        assert_eq!(split_card_id("nodash"), None);
        assert_eq!(split_card_id("base1-"), None);
    }
}
