//! Catalog lookup strategies, in priority order.
//!
//! Each strategy looks at the extracted signals, issues at most one kind of
//! catalog query and returns a candidate or `None`. The resolver walks
//! `Strategy::CASCADE` and stops at the first non-empty candidate.

use serde::Serialize;
use std::fmt;

use super::signals::ExtractedSignals;
use crate::card::{CatalogCandidate, Language};
use crate::catalog::Catalog;
use crate::log;

/// Shared inputs for every strategy.
pub struct StrategyContext<'a> {
    pub catalog: &'a dyn Catalog,
    pub similarity_threshold: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// `ccp-NN` id from a prefixed (possibly OCR-merged) promo number
    MergedPromo,
    /// Printed promo code such as `SVP EN 126`
    PromoCode,
    /// Spaced `NN NN/NN` layout on Chinese prints
    CjkLayout,
    /// Search by name and number
    NameNumber,
    /// Search by number alone
    NumberOnly,
    /// Search by number within the hinted set
    NumberInSet,
    /// Same-size sets probed for the number, fuzzy name tie-break
    NumberAndTotal,
}

impl Strategy {
    pub const CASCADE: [Strategy; 7] = [
        Strategy::MergedPromo,
        Strategy::PromoCode,
        Strategy::CjkLayout,
        Strategy::NameNumber,
        Strategy::NumberOnly,
        Strategy::NumberInSet,
        Strategy::NumberAndTotal,
    ];

    pub fn run(self, signals: &ExtractedSignals, ctx: &StrategyContext) -> Option<CatalogCandidate> {
        match self {
            Strategy::MergedPromo => merged_promo(signals, ctx),
            Strategy::PromoCode => promo_code(signals, ctx),
            Strategy::CjkLayout => cjk_layout(signals, ctx),
            Strategy::NameNumber => name_number(signals, ctx),
            Strategy::NumberOnly => number_only(signals, ctx),
            Strategy::NumberInSet => number_in_set(signals, ctx),
            Strategy::NumberAndTotal => number_and_total(signals, ctx),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::MergedPromo => "merged_promo",
            Strategy::PromoCode => "promo_code",
            Strategy::CjkLayout => "cjk_layout",
            Strategy::NameNumber => "name_number",
            Strategy::NumberOnly => "number_only",
            Strategy::NumberInSet => "number_in_set",
            Strategy::NumberAndTotal => "number_and_total",
        };
        f.write_str(name)
    }
}

fn merged_promo(signals: &ExtractedSignals, ctx: &StrategyContext) -> Option<CatalogCandidate> {
    let promo_id = signals.promo_id.as_deref()?;
    log(&format!(
        "[PROMO] Detected promo card ID: {}, lang: {}",
        promo_id, signals.language
    ));
    ctx.catalog.query_by_id(promo_id, signals.language)
}

fn promo_code(signals: &ExtractedSignals, ctx: &StrategyContext) -> Option<CatalogCandidate> {
    let promo = signals.promo_code.as_ref()?;
    let card_id = promo.card_id();
    log(&format!("[PROMO] Promo code {} -> {}", promo.code, card_id));
    ctx.catalog.query_by_id(&card_id, signals.language)
}

fn cjk_layout(signals: &ExtractedSignals, ctx: &StrategyContext) -> Option<CatalogCandidate> {
    if signals.language != Language::ZhHans {
        return None;
    }
    let layout_id = signals.layout_id.as_deref()?;
    // Already asked by the merged-promo strategy
    if signals.promo_id.as_deref() == Some(layout_id) {
        return None;
    }
    ctx.catalog.query_by_id(layout_id, signals.language)
}

fn name_number(signals: &ExtractedSignals, ctx: &StrategyContext) -> Option<CatalogCandidate> {
    let name = signals.query_name();
    let number = signals.query_number();
    if name.is_none() && number.is_none() {
        return None;
    }
    ctx.catalog
        .query_by_name_number(name, number, None, signals.language)
}

fn number_only(signals: &ExtractedSignals, ctx: &StrategyContext) -> Option<CatalogCandidate> {
    // Without a name the previous search was already number-only
    if !signals.has_name() {
        return None;
    }
    let number = signals.query_number()?;
    log(&format!("[API fallback] Retrying with only number: {}", number));
    ctx.catalog
        .query_by_name_number(None, Some(number), None, signals.language)
}

fn number_in_set(signals: &ExtractedSignals, ctx: &StrategyContext) -> Option<CatalogCandidate> {
    let set_hint = signals.set_hint.as_deref()?;
    let number = signals.query_number()?;
    log(&format!(
        "[API fallback] Retrying with number {} in set {}",
        number, set_hint
    ));
    ctx.catalog
        .query_by_name_number(None, Some(number), Some(set_hint), signals.language)
}

fn number_and_total(signals: &ExtractedSignals, ctx: &StrategyContext) -> Option<CatalogCandidate> {
    let number = signals.card_number_component.as_deref()?;
    let total = signals.set_total_component.as_deref()?;
    let approx_name = signals.query_name().unwrap_or("");
    log(&format!(
        "[API fallback] Probing sets of size {} for card {}",
        total, number
    ));
    ctx.catalog
        .query_by_number_and_total(number, total, approx_name, ctx.similarity_threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::SetTable;
    use crate::catalog::testing::{set, Call, StubCatalog};

    fn signals(name: &str, number: &str) -> ExtractedSignals {
        ExtractedSignals::extract(name, number, None, &SetTable::empty())
    }

    fn ctx(catalog: &StubCatalog) -> StrategyContext<'_> {
        StrategyContext {
            catalog,
            similarity_threshold: 0.7,
        }
    }

    #[test]
    fn test_merged_promo_queries_ccp_id() {
        let catalog = StubCatalog::new();
        let s = signals("Pikachu", "0512/25");
        assert_eq!(Strategy::MergedPromo.run(&s, &ctx(&catalog)), None);
        assert_eq!(catalog.id_queries(), vec!["ccp-05".to_string()]);
    }

    #[test]
    fn test_promo_code_queries_dashed_id() {
        let catalog = StubCatalog::new();
        let s = signals("Name", "SVP EN 126");
        Strategy::PromoCode.run(&s, &ctx(&catalog));
        assert_eq!(catalog.calls(), vec![Call::ById("svp-en-126".into(), Language::En)]);
    }

    #[test]
    fn test_cjk_layout_needs_chinese() {
        let catalog = StubCatalog::new();
        let mut s = signals("Name", "12/25");
        s.layout_id = Some("ccp-07".to_string());

        s.language = Language::En;
        Strategy::CjkLayout.run(&s, &ctx(&catalog));
        assert!(catalog.calls().is_empty());

        s.language = Language::ZhHans;
        Strategy::CjkLayout.run(&s, &ctx(&catalog));
        assert_eq!(catalog.calls(), vec![Call::ById("ccp-07".into(), Language::ZhHans)]);
    }

    #[test]
    fn test_cjk_layout_skips_id_already_tried() {
        let catalog = StubCatalog::new();
        let s = signals("皮卡丘", "07 12/25");
        assert_eq!(s.promo_id.as_deref(), Some("ccp-07"));
        assert_eq!(s.layout_id.as_deref(), Some("ccp-07"));
        Strategy::CjkLayout.run(&s, &ctx(&catalog));
        assert!(catalog.calls().is_empty());
    }

    #[test]
    fn test_number_only_skipped_without_name() {
        let catalog = StubCatalog::new();
        let s = signals("", "4/102");
        Strategy::NumberOnly.run(&s, &ctx(&catalog));
        assert!(catalog.calls().is_empty());
    }

    #[test]
    fn test_name_number_skipped_without_fields() {
        let catalog = StubCatalog::new();
        let s = signals("", "");
        assert_eq!(Strategy::NameNumber.run(&s, &ctx(&catalog)), None);
        assert!(catalog.calls().is_empty());
    }

    #[test]
    fn test_number_and_total_uses_components() {
        let mut catalog = StubCatalog::new();
        catalog.sets = Some(vec![set("base1", "102")]);
        let s = signals("Pikachu", "58/102");
        Strategy::NumberAndTotal.run(&s, &ctx(&catalog));
        assert_eq!(
            catalog.calls(),
            vec![Call::ListSets, Call::CardInSet("base1".into(), "58".into())]
        );
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Strategy::MergedPromo.to_string(), "merged_promo");
        assert_eq!(Strategy::NumberAndTotal.to_string(), "number_and_total");
    }
}
