//! Remote card catalog.
//!
//! The `Catalog` trait is the seam between the resolver and the network.
//! Lookups return `Option`: timeouts, HTTP errors and empty results all
//! collapse to "no candidate" so the resolver can move on to its next
//! strategy. Nothing here retries.

pub mod response;
pub mod tcgdex;

pub use response::SetSummary;
pub use tcgdex::TcgdexClient;

use anyhow::Result;

use crate::card::{is_similar, CatalogCandidate, Confidence, Language};
use crate::log;

pub trait Catalog {
    /// Card search by any combination of name, number and set.
    fn query_by_name_number(
        &self,
        name: Option<&str>,
        number: Option<&str>,
        set_hint: Option<&str>,
        lang: Language,
    ) -> Option<CatalogCandidate>;

    /// Direct lookup of a catalog card id such as `svp-en-126`.
    fn query_by_id(&self, card_id: &str, lang: Language) -> Option<CatalogCandidate>;

    /// Every collection with its declared size.
    fn list_sets(&self) -> Result<Vec<SetSummary>>;

    /// Card `number` within `set_id`; `Ok(None)` when the set has no such card.
    fn fetch_card_in_set(&self, set_id: &str, number: &str) -> Result<Option<CatalogCandidate>>;

    /// Finds a card from its `number/total` when the set itself is unknown.
    ///
    /// Every collection of size `total` is asked for `number`. A card whose
    /// name is similar to `approx_name` wins immediately. Failing that, a
    /// single card found across all those collections is returned with
    /// `Confidence::Low`. Zero or several unnamed hits give `None`.
    fn query_by_number_and_total(
        &self,
        number: &str,
        total: &str,
        approx_name: &str,
        threshold: f64,
    ) -> Option<CatalogCandidate> {
        let sets = match self.list_sets() {
            Ok(sets) => sets,
            Err(e) => {
                log(&format!("[CATALOG] Error loading sets: {:#}", e));
                return None;
            }
        };

        let candidate_sets: Vec<&str> = sets
            .iter()
            .filter(|s| s.total == total)
            .map(|s| s.id.as_str())
            .collect();
        log(&format!(
            "[CATALOG] Candidate sets for total {}: {:?}",
            total, candidate_sets
        ));

        let mut matches: Vec<CatalogCandidate> = Vec::new();
        for set_id in candidate_sets {
            match self.fetch_card_in_set(set_id, number) {
                Ok(Some(mut card)) => {
                    card.set = set_id.to_string();
                    if !approx_name.is_empty() && is_similar(approx_name, &card.name, threshold) {
                        log(&format!(
                            "[MATCH] Found close name match: {} in set {}",
                            card.name, set_id
                        ));
                        return Some(card.with_confidence(Confidence::Verified));
                    }
                    matches.push(card);
                }
                Ok(None) => {}
                Err(e) => {
                    log(&format!(
                        "[WARN] Failed to get card {}-{}: {:#}",
                        set_id, number, e
                    ));
                }
            }
        }

        if matches.len() == 1 {
            let only = matches.remove(0);
            log(&format!(
                "[FALLBACK] Only one possible match: {} from {} (low confidence)",
                only.name, only.set
            ));
            return Some(only.with_confidence(Confidence::Low));
        }

        log(&format!(
            "[FAIL] No reliable match for {}/{} with name '{}' ({} unnamed hits)",
            number,
            total,
            approx_name,
            matches.len()
        ));
        None
    }
}
