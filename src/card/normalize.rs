//! Cleanup of raw OCR name text.
//!
//! OCR of the name strip picks up card furniture ("Basic", "HP", evolution
//! lines, mechanic suffixes) next to the actual name. These helpers strip that
//! noise and pick the line most likely to be the name.

use regex::Regex;
use std::sync::LazyLock;

use super::model::UNKNOWN;

/// Tokens that are never part of a card name.
const EXCLUDED_WORDS: &[&str] = &[
    "basic", "trainer", "supporter", "stage1", "stage2", "stage3", "evolves", "from", "item",
    "stadium", "pokemon", "hp", "ex", "gx", "vmax", "vstar",
];

/// Substrings that disqualify a whole OCR line from being the name.
const FORBIDDEN_WORDS: &[&str] = &[
    "trainer",
    "supporter",
    "basic",
    "evolves from",
    "stage1",
    "stage 1",
    "stage2",
    "stage 2",
    "stage3",
    "stage 3",
];

/// Anything outside lowercase ASCII letters, digits, whitespace and hyphens.
static NON_NAME_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-z0-9\s\-]").expect("name character class is a valid regex")
});

/// Returns `text` reduced to its name tokens, title-cased.
///
/// Returns `"Unknown"` for empty input or when every token is noise.
pub fn clean_card_name(text: &str) -> String {
    if text.trim().is_empty() {
        return UNKNOWN.to_string();
    }

    let lowered = text.to_lowercase();
    let stripped = NON_NAME_CHARS.replace_all(&lowered, " ");

    let tokens: Vec<String> = stripped
        .split_whitespace()
        .filter(|token| !EXCLUDED_WORDS.contains(token))
        .filter(|token| !token.chars().all(|c| c.is_ascii_digit()))
        .map(capitalize)
        .collect();

    if tokens.is_empty() {
        UNKNOWN.to_string()
    } else {
        tokens.join(" ")
    }
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Checks whether an OCR line could plausibly be a card name.
pub fn is_valid_name_line(line: &str) -> bool {
    let lowered = line.to_lowercase();
    if FORBIDDEN_WORDS.iter().any(|w| lowered.contains(w)) {
        return false;
    }
    // Names never carry digits; HP values and numbers do
    if lowered.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    line.trim().chars().count() >= 3
}

/// Picks the most likely card name among OCR lines.
///
/// The longest cleaned line wins; on a tie the first one seen is kept.
pub fn extract_card_name<S: AsRef<str>>(lines: &[S]) -> String {
    let mut best = String::new();
    for line in lines {
        let line = line.as_ref();
        if !is_valid_name_line(line) {
            continue;
        }
        let cleaned = clean_card_name(line);
        if cleaned == UNKNOWN {
            continue;
        }
        if cleaned.chars().count() > best.chars().count() {
            best = cleaned;
        }
    }

    if best.is_empty() {
        UNKNOWN.to_string()
    } else {
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_card_name_strips_noise() {
        assert_eq!(clean_card_name("Basic PIKACHU HP 60"), "Pikachu");
        assert_eq!(clean_card_name("Charizard ex"), "Charizard");
        assert_eq!(clean_card_name("Stage1 Evolves from Charmander Charmeleon"), "Charmander Charmeleon");
        assert_eq!(clean_card_name("Mr. Mime!"), "Mr Mime");
        assert_eq!(clean_card_name("ho-oh"), "Ho-oh");
    }

    #[test]
    fn test_clean_card_name_unknown() {
        assert_eq!(clean_card_name(""), "Unknown");
        assert_eq!(clean_card_name("   "), "Unknown");
        assert_eq!(clean_card_name("Basic HP 120"), "Unknown");
        assert_eq!(clean_card_name("!!!"), "Unknown");
    }

    #[test]
    fn test_clean_card_name_is_fixed_point() {
        for raw in ["Basic PIKACHU HP 60", "Dark  Dragonite GX", "", "Ho-Oh ex", "Pokemon", "Professor's Research"] {
            let once = clean_card_name(raw);
            assert_eq!(clean_card_name(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_is_valid_name_line() {
        assert!(is_valid_name_line("Pikachu"));
        assert!(!is_valid_name_line("Trainer"));
        assert!(!is_valid_name_line("Evolves from Pichu"));
        assert!(!is_valid_name_line("STAGE 1"));
        assert!(!is_valid_name_line("HP 60"));
        assert!(!is_valid_name_line("  ab  "));
    }

    #[test]
    fn test_extract_card_name_prefers_longest() {
        let lines = ["Pika", "Basic", "Raichu Lv", "Pikachu"];
        assert_eq!(extract_card_name(&lines), "Raichu Lv");
    }

    #[test]
    fn test_extract_card_name_tie_keeps_first() {
        let lines = ["Onix", "Abra", "Muk"];
        assert_eq!(extract_card_name(&lines), "Onix");
    }

    #[test]
    fn test_extract_card_name_skips_noise_only_lines() {
        let lines = ["HP ex", "Onix"];
        assert_eq!(extract_card_name(&lines), "Onix");
    }

    #[test]
    fn test_extract_card_name_none_valid() {
        let lines = ["Trainer", "60", "ab"];
        assert_eq!(extract_card_name(&lines), "Unknown");
        let empty: [&str; 0] = [];
        assert_eq!(extract_card_name(&empty), "Unknown");
    }
}
