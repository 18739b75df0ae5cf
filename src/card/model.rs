use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder for any field nothing could resolve.
pub const UNKNOWN: &str = "Unknown";

/// Final record for one scanned card.
///
/// Serialized with the column names used by the collection CSV.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardIdentity {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Number")]
    pub number: String,
    #[serde(rename = "Set")]
    pub set: String,
}

impl Default for CardIdentity {
    fn default() -> Self {
        Self {
            name: UNKNOWN.to_string(),
            number: String::new(),
            set: UNKNOWN.to_string(),
        }
    }
}

impl CardIdentity {
    pub fn new(name: impl Into<String>, number: impl Into<String>, set: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number: number.into(),
            set: set.into(),
        }
    }

    /// Overwrites local fields with every populated catalog field.
    ///
    /// Empty catalog fields never replace local values. The name is only
    /// taken when `accept_name` is set.
    pub fn merge(&mut self, candidate: &CatalogCandidate, accept_name: bool) {
        if accept_name && !candidate.name.trim().is_empty() {
            self.name = candidate.name.clone();
        }
        if !candidate.number.trim().is_empty() {
            self.number = candidate.number.clone();
        }
        if !candidate.set.trim().is_empty() {
            self.set = candidate.set.clone();
        }
    }
}

/// How much a catalog answer can be trusted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Exact id hit, search hit, or a fuzzy name match.
    Verified,
    /// The only card found among same-size sets, with no name evidence.
    Low,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::Verified => write!(f, "verified"),
            Confidence::Low => write!(f, "low"),
        }
    }
}

/// One card as answered by the catalog, with `set` flattened to its id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogCandidate {
    pub name: String,
    pub number: String,
    pub set: String,
    pub confidence: Confidence,
}

impl CatalogCandidate {
    pub fn new(name: impl Into<String>, number: impl Into<String>, set: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number: number.into(),
            set: set.into(),
            confidence: Confidence::Verified,
        }
    }

    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    /// True when no field carries a value.
    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty() && self.number.trim().is_empty() && self.set.trim().is_empty()
    }
}

/// Card print language, as used in catalog URLs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "ja")]
    Ja,
    #[serde(rename = "zh-hans")]
    ZhHans,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ja => "ja",
            Language::ZhHans => "zh-hans",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
