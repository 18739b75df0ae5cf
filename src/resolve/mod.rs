//! Card identity resolution.
//!
//! Turns the name and number OCR fragments into a `CardIdentity`: local
//! extraction first, then the strategy cascade against the catalog. Catalog
//! fields overwrite local ones when populated; local values stay otherwise.

pub mod signals;
pub mod strategy;

pub use signals::ExtractedSignals;
pub use strategy::{Strategy, StrategyContext};

use crate::card::similarity::DEFAULT_THRESHOLD;
use crate::card::{CardIdentity, CatalogCandidate, Confidence, Language, SetTable, UNKNOWN};
use crate::catalog::Catalog;
use crate::log;

/// Outcome of resolving one card.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub identity: CardIdentity,
    /// Strategy whose candidate was merged, if any
    pub strategy: Option<Strategy>,
    pub confidence: Option<Confidence>,
    pub language: Language,
}

impl Resolution {
    /// True when a catalog candidate was merged into the identity.
    pub fn is_resolved(&self) -> bool {
        self.strategy.is_some()
    }
}

pub struct Resolver<'a> {
    catalog: &'a dyn Catalog,
    sets: &'a SetTable,
    similarity_threshold: f64,
}

impl<'a> Resolver<'a> {
    pub fn new(catalog: &'a dyn Catalog, sets: &'a SetTable) -> Self {
        Self {
            catalog,
            sets,
            similarity_threshold: DEFAULT_THRESHOLD,
        }
    }

    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn catalog(&self) -> &'a dyn Catalog {
        self.catalog
    }

    /// Resolves pre-extracted OCR text into a card identity.
    pub fn parse_card_text(&self, name_text: &str, number_text: &str) -> CardIdentity {
        self.resolve(name_text, number_text, None).identity
    }

    /// Full resolution, reporting which strategy answered.
    pub fn resolve(
        &self,
        name_text: &str,
        number_text: &str,
        cleaned_name: Option<&str>,
    ) -> Resolution {
        let signals = ExtractedSignals::extract(name_text, number_text, cleaned_name, self.sets);
        log(&format!("[LANG DETECTED] {}", signals.language));
        log(&format!(
            "[DEBUG] OCR raw name: '{}' -> Cleaned: '{}'",
            name_text.trim(),
            signals.cleaned_name
        ));

        let outcome = self.run_cascade(&signals);
        let mut identity = signals.local_identity();

        if let Some(promo) = &signals.promo_code {
            if !matches!(outcome, Some((Strategy::MergedPromo, _))) {
                identity.number = promo.code.clone();
                identity.set = promo.set_id().unwrap_or(UNKNOWN).to_string();
            }
        }

        match outcome {
            Some((strategy, candidate)) => {
                log(&format!(
                    "[RESOLVED] {} via {} ({})",
                    candidate.name, strategy, candidate.confidence
                ));
                identity.merge(&candidate, signals.accepts_catalog_name);
                Resolution {
                    identity,
                    strategy: Some(strategy),
                    confidence: Some(candidate.confidence),
                    language: signals.language,
                }
            }
            None => {
                log("[UNRESOLVED] Keeping locally extracted fields");
                Resolution {
                    identity,
                    strategy: None,
                    confidence: None,
                    language: signals.language,
                }
            }
        }
    }

    /// Runs strategies in priority order; the first non-empty candidate wins.
    pub fn run_cascade(&self, signals: &ExtractedSignals) -> Option<(Strategy, CatalogCandidate)> {
        let ctx = StrategyContext {
            catalog: self.catalog,
            similarity_threshold: self.similarity_threshold,
        };

        Strategy::CASCADE.into_iter().find_map(|strategy| {
            strategy
                .run(signals, &ctx)
                .filter(|candidate| !candidate.is_empty())
                .map(|candidate| (strategy, candidate))
        })
    }
}
