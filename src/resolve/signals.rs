use crate::card::{
    clean_card_name, clean_number, detect_language, extract_number_total, extract_promo_card_id,
    fix_card_number, parse_set, patterns, CardIdentity, Language, PromoCode, SetTable, UNKNOWN,
};

/// Minimum cleaned name length accepted as a real name.
const MIN_NAME_LEN: usize = 3;

/// Everything the strategies need, derived from the two OCR fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSignals {
    /// Cleaned name, `"Unknown"` when shorter than three characters
    pub cleaned_name: String,
    /// `X/Y`, a promo code, `"Unknown"`, or empty without a number fragment
    pub number: String,
    pub set_hint: Option<String>,
    /// `ccp-NN` id recovered from a (possibly merged) prefixed promo number
    pub promo_id: Option<String>,
    /// Explicit promo code printed in the number fragment
    pub promo_code: Option<PromoCode>,
    /// `ccp-NN` id from the spaced `NN NN/NN` layout of the number fragment
    pub layout_id: Option<String>,
    pub language: Language,
    /// Name fragment was read and its cleaned form passed the length gate
    pub accepts_catalog_name: bool,
    pub card_number_component: Option<String>,
    pub set_total_component: Option<String>,
}

impl ExtractedSignals {
    /// Derives signals from OCR fragments.
    ///
    /// `cleaned_name` replaces name cleaning when the caller already picked
    /// a name (e.g. from several OCR lines).
    pub fn extract(
        name_text: &str,
        number_text: &str,
        cleaned_name: Option<&str>,
        sets: &SetTable,
    ) -> Self {
        // A pre-cropped fragment arrives as both name and number
        let full_text = if name_text == number_text {
            name_text.to_string()
        } else {
            format!("{}\n{}", name_text, number_text)
        };
        let language = detect_language(&full_text);
        let promo_id = extract_promo_card_id(&full_text);

        let raw_name = if name_text.trim().is_empty() {
            UNKNOWN
        } else {
            name_text.trim()
        };
        let mut name = match cleaned_name {
            Some(cleaned) => cleaned.trim().to_string(),
            None => clean_card_name(raw_name),
        };
        let passes_gate = name.chars().count() >= MIN_NAME_LEN;
        if !passes_gate {
            name = UNKNOWN.to_string();
        }
        let accepts_catalog_name = passes_gate && !name_text.trim().is_empty();

        let mut signals = Self {
            cleaned_name: name,
            number: String::new(),
            set_hint: None,
            promo_id,
            promo_code: None,
            layout_id: None,
            language,
            accepts_catalog_name,
            card_number_component: None,
            set_total_component: None,
        };

        if !number_text.is_empty() {
            let number = clean_number(number_text);
            // A merged promo prefix takes the number over; never split it twice
            signals.number = if signals.promo_id.is_some() {
                number
            } else {
                fix_card_number(&number)
            };
            signals.promo_code = patterns::find_promo_code(number_text);
            signals.set_hint = parse_set(number_text, sets);
            signals.layout_id = patterns::spaced_promo_card_id(number_text);
            let (card_number, total) = extract_number_total(number_text);
            signals.card_number_component = card_number;
            signals.set_total_component = total;
        }

        signals
    }

    /// Name to send to the catalog, if one was read.
    pub fn query_name(&self) -> Option<&str> {
        Some(self.cleaned_name.as_str()).filter(|n| *n != UNKNOWN && !n.is_empty())
    }

    /// Number to send to the catalog, if one was read.
    pub fn query_number(&self) -> Option<&str> {
        Some(self.number.as_str()).filter(|n| *n != UNKNOWN && !n.is_empty())
    }

    /// True when the cleaned name passed the length gate.
    pub fn has_name(&self) -> bool {
        self.query_name().is_some()
    }

    /// The record built from OCR alone.
    pub fn local_identity(&self) -> CardIdentity {
        CardIdentity::new(
            self.cleaned_name.clone(),
            self.number.clone(),
            self.set_hint.clone().unwrap_or_else(|| UNKNOWN.to_string()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(name: &str, number: &str) -> ExtractedSignals {
        ExtractedSignals::extract(name, number, None, &SetTable::empty())
    }

    #[test]
    fn test_standard_card() {
        let s = extract("Basic Pikachu HP 60", "Set: Base\n58/102");
        assert_eq!(s.cleaned_name, "Pikachu");
        assert_eq!(s.number, "58/102");
        assert_eq!(s.set_hint.as_deref(), Some("Base"));
        assert_eq!(s.card_number_component.as_deref(), Some("58"));
        assert_eq!(s.set_total_component.as_deref(), Some("102"));
        assert_eq!(s.language, Language::En);
        assert_eq!(s.promo_id, None);
        assert_eq!(s.promo_code, None);
    }

    #[test]
    fn test_short_name_is_unknown() {
        assert_eq!(extract("Mu", "4/102").cleaned_name, "Unknown");
        assert_eq!(extract("", "4/102").cleaned_name, "Unknown");
        assert_eq!(extract("  \n ", "").cleaned_name, "Unknown");
    }

    #[test]
    fn test_pre_cleaned_name_is_gated_too() {
        let s = ExtractedSignals::extract("xx", "", Some("Ab"), &SetTable::empty());
        assert_eq!(s.cleaned_name, "Unknown");
        let s = ExtractedSignals::extract("xx", "", Some("Abra"), &SetTable::empty());
        assert_eq!(s.cleaned_name, "Abra");
    }

    #[test]
    fn test_number_placeholders() {
        assert_eq!(extract("Pikachu", "").number, "");
        assert_eq!(extract("Pikachu", "illegible").number, "Unknown");
        assert_eq!(extract("Pikachu", "illegible").query_number(), None);
    }

    #[test]
    fn test_promo_code() {
        let s = extract("Name", "SVP EN 126");
        assert_eq!(s.number, "SVP EN 126");
        assert_eq!(s.promo_code.as_ref().map(|p| p.card_id()), Some("svp-en-126".to_string()));
    }

    #[test]
    fn test_three_digit_run_is_split_without_promo() {
        let s = extract("", "123/45");
        assert_eq!(s.promo_id, None);
        assert_eq!(s.number, "12 3/45");
    }

    #[test]
    fn test_merged_promo_suppresses_number_split() {
        // Pre-cropped image: both fragments hold the same text
        let s = extract("123/45", "123/45");
        assert_eq!(s.promo_id.as_deref(), Some("ccp-01"));
        assert_eq!(s.number, "123/45");
    }

    #[test]
    fn test_single_fragment_is_not_joined_with_itself() {
        // "58/102\n58/102" would read as a spaced "02 58/10" promo layout
        let s = extract("58/102", "58/102");
        assert_eq!(s.language, Language::En);
        assert_eq!(s.promo_id, None);
        assert_eq!(s.layout_id, None);
        assert_eq!(s.number, "58/102");
    }

    #[test]
    fn test_catalog_name_acceptance() {
        assert!(extract("Pikachu", "58/102").accepts_catalog_name);
        // Cleans to "Unknown" but was read, so a catalog name may replace it
        assert!(extract("ピカチュウ", "25/102").accepts_catalog_name);
        assert!(!extract("Mu", "8/102").accepts_catalog_name);
        assert!(!extract("  ", "8/102").accepts_catalog_name);
    }

    #[test]
    fn test_local_identity_defaults() {
        assert_eq!(extract("", "").local_identity(), CardIdentity::new("Unknown", "", "Unknown"));
    }
}
