//! Regex-driven extraction from the number strip.
//!
//! Collector numbers come as `number/total`, promo cards carry codes such as
//! `SVP EN 126`, and some regional promos print a two-digit prefix in front of
//! `NN/NN` which OCR likes to glue together.

use regex::Regex;
use std::sync::LazyLock;

use super::model::{Language, UNKNOWN};
use super::sets::SetTable;

static NUMBER_TOTAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,3})/(\d{1,3})").expect("valid number/total regex"));

/// Promo codes like `SVP EN 126` or `SVPEN126`; group 2 is the family prefix.
static PROMO_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(([A-Z]{2,4})\s?EN?\s?\d{1,4})\b").expect("valid promo regex")
});

/// `Set: Base`, `set Jungle`, ...
static SET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)set[:\s]+([A-Za-z0-9 '\-]+)").expect("valid set regex"));

static MERGED_TWO_DIGIT_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})(\d{2}/\d{2})").expect("valid merged prefix regex"));

static MERGED_ONE_DIGIT_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d)(\d{2}/\d{2})").expect("valid merged prefix regex"));

static PROMO_PREFIX_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2})\s*\d{2}/\d{2}").expect("valid promo prefix regex"));

/// Two-digit prefix separated from `NN/NN`, typical for Chinese promos.
static SPACED_PREFIX_LAYOUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2})\s+\d{2}/\d{2}").expect("valid layout regex"));

static THREE_DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3}/\d{2}$").expect("valid number run regex"));

static CJK_IDEOGRAPHS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x{4e00}-\x{9fff}]").expect("valid CJK range"));

static JAPANESE_KANA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ぁ-んァ-ン]").expect("valid kana range"));

/// Promo family prefix → catalog collection id.
const PROMO_SETS: &[(&str, &str)] = &[
    ("SVP", "svpromos"),
    ("SWSH", "swshpromos"),
    ("SM", "smpromos"),
    ("BW", "bwpromos"),
    ("XY", "xypromos"),
];

/// A promo code matched in the number strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoCode {
    /// The code as printed, e.g. `SVP EN 126`
    pub code: String,
    /// Family prefix, e.g. `SVP`
    pub prefix: String,
}

impl PromoCode {
    /// Catalog id for the code: lowercased with spaces turned into dashes.
    pub fn card_id(&self) -> String {
        self.code.to_lowercase().replace(' ', "-")
    }

    /// Collection id for the promo family, if known.
    pub fn set_id(&self) -> Option<&'static str> {
        PROMO_SETS
            .iter()
            .find(|(prefix, _)| *prefix == self.prefix)
            .map(|(_, set)| *set)
    }
}

/// Extracts the card number: `X/Y` first, then a promo code, else `"Unknown"`.
pub fn clean_number(text: &str) -> String {
    if text.is_empty() {
        return UNKNOWN.to_string();
    }
    if let Some(m) = NUMBER_TOTAL_REGEX.find(text) {
        return m.as_str().to_string();
    }
    match find_promo_code(text) {
        Some(promo) => promo.code,
        None => UNKNOWN.to_string(),
    }
}

/// Returns the card number and set total of the first `X/Y` in `text`.
pub fn extract_number_total(text: &str) -> (Option<String>, Option<String>) {
    match NUMBER_TOTAL_REGEX.captures(text) {
        Some(caps) => (
            caps.get(1).map(|m| m.as_str().to_string()),
            caps.get(2).map(|m| m.as_str().to_string()),
        ),
        None => (None, None),
    }
}

/// Finds the first promo code in `text`.
pub fn find_promo_code(text: &str) -> Option<PromoCode> {
    let caps = PROMO_REGEX.captures(text)?;
    Some(PromoCode {
        code: caps.get(1)?.as_str().trim().to_string(),
        prefix: caps.get(2)?.as_str().to_string(),
    })
}

/// Repairs a promo prefix glued onto `NN/NN`.
///
/// `1234/56` becomes `12 34/56`; a one-digit prefix is zero-padded, so
/// `123/45` becomes `01 23/45`. Anything else is returned untouched.
pub fn fix_merged_number(text: &str) -> String {
    let normalized = text.replace(' ', "");
    if let Some(caps) = MERGED_TWO_DIGIT_PREFIX.captures(&normalized) {
        return format!("{} {}", &caps[1], &caps[2]);
    }
    if let Some(caps) = MERGED_ONE_DIGIT_PREFIX.captures(&normalized) {
        return format!("0{} {}", &caps[1], &caps[2]);
    }
    text.to_string()
}

/// Splits a `DDD/DD` number after its second digit: `123/45` → `12 3/45`.
pub fn fix_card_number(number: &str) -> String {
    if THREE_DIGIT_RUN.is_match(number) {
        let head: String = number.chars().take(2).collect();
        let tail: String = number.chars().skip(2).collect();
        return format!("{} {}", head, tail);
    }
    number.to_string()
}

/// Derives the `ccp-NN` id of a prefixed promo from (possibly merged) text.
pub fn extract_promo_card_id(text: &str) -> Option<String> {
    let fixed = fix_merged_number(text);
    PROMO_PREFIX_NUMBER
        .captures(&fixed)
        .map(|caps| format!("ccp-{}", &caps[1]))
}

/// Derives the `ccp-NN` id only from the spaced `NN NN/NN` layout.
pub fn spaced_promo_card_id(text: &str) -> Option<String> {
    SPACED_PREFIX_LAYOUT
        .captures(text)
        .map(|caps| format!("ccp-{}", &caps[1]))
}

/// Guesses the print language. First match wins: CJK ideographs, the spaced
/// promo layout, then Japanese kana.
pub fn detect_language(text: &str) -> Language {
    if text.is_empty() {
        return Language::En;
    }
    if CJK_IDEOGRAPHS.is_match(text) {
        return Language::ZhHans;
    }
    if SPACED_PREFIX_LAYOUT.is_match(text) {
        return Language::ZhHans;
    }
    if JAPANESE_KANA.is_match(text) {
        return Language::Ja;
    }
    Language::En
}

/// Extracts a `Set: <name>` hint, canonicalized through the set table.
pub fn parse_set(text: &str, sets: &SetTable) -> Option<String> {
    let caps = SET_REGEX.captures(text)?;
    let raw = caps.get(1)?.as_str().trim();
    if raw.is_empty() {
        return None;
    }
    Some(sets.canonical(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_number() {
        assert_eq!(clean_number("HP 60\n58/102"), "58/102");
        assert_eq!(clean_number("SVP EN 126"), "SVP EN 126");
        assert_eq!(clean_number("SVPEN126"), "SVPEN126");
        assert_eq!(clean_number("no digits here"), "Unknown");
        assert_eq!(clean_number(""), "Unknown");
    }

    #[test]
    fn test_number_wins_over_promo() {
        assert_eq!(clean_number("SVP EN 126 4/102"), "4/102");
    }

    #[test]
    fn test_extract_number_total() {
        assert_eq!(
            extract_number_total("Set: Base\n1/102"),
            (Some("1".to_string()), Some("102".to_string()))
        );
        assert_eq!(extract_number_total("SVP EN 126"), (None, None));
    }

    #[test]
    fn test_promo_code_parts() {
        let promo = find_promo_code("SVP EN 126").unwrap();
        assert_eq!(promo.prefix, "SVP");
        assert_eq!(promo.card_id(), "svp-en-126");
        assert_eq!(promo.set_id(), Some("svpromos"));

        let promo = find_promo_code("ABC E 12").unwrap();
        assert_eq!(promo.set_id(), None);

        assert!(find_promo_code("Set: Base").is_none());
    }

    #[test]
    fn test_fix_merged_number() {
        assert_eq!(fix_merged_number("1234/56"), "12 34/56");
        assert_eq!(fix_merged_number("12 34/56"), "12 34/56");
        assert_eq!(fix_merged_number("123/45"), "01 23/45");
        assert_eq!(fix_merged_number("Pikachu 58/102"), "Pikachu 58/102");
    }

    #[test]
    fn test_fix_card_number() {
        assert_eq!(fix_card_number("123/45"), "12 3/45");
        assert_eq!(fix_card_number("58/102"), "58/102");
        assert_eq!(fix_card_number("1234/56"), "1234/56");
    }

    #[test]
    fn test_extract_promo_card_id() {
        assert_eq!(extract_promo_card_id("1234/56"), Some("ccp-12".to_string()));
        assert_eq!(extract_promo_card_id("05 12/25"), Some("ccp-05".to_string()));
        assert_eq!(extract_promo_card_id("Name\n1/102"), None);
        assert_eq!(extract_promo_card_id("SVP EN 126"), None);
    }

    #[test]
    fn test_spaced_promo_card_id() {
        assert_eq!(spaced_promo_card_id("07 12/25"), Some("ccp-07".to_string()));
        assert_eq!(spaced_promo_card_id("0712/25"), None);
    }

    #[test]
    fn test_detect_language() {
        assert_eq!(detect_language("Pikachu 58/102"), Language::En);
        assert_eq!(detect_language("皮卡丘"), Language::ZhHans);
        assert_eq!(detect_language("ピカチュウ"), Language::Ja);
        assert_eq!(detect_language("ぴかちゅう"), Language::Ja);
        assert_eq!(detect_language("05 12/25"), Language::ZhHans);
        assert_eq!(detect_language(""), Language::En);
    }

    #[test]
    fn test_detect_language_layout_beats_kana() {
        assert_eq!(detect_language("ピカチュウ 05 12/25"), Language::ZhHans);
    }

    #[test]
    fn test_parse_set() {
        let sets = SetTable::from_json(r#"{ "BS": "Base Set" }"#).unwrap();
        assert_eq!(parse_set("Set: Base\n1/102", &sets), Some("Base".to_string()));
        assert_eq!(parse_set("set bs", &sets), Some("Base Set".to_string()));
        assert_eq!(parse_set("SET:Jungle 12/64", &sets), Some("Jungle 12".to_string()));
        assert_eq!(parse_set("58/102", &sets), None);
    }
}
