//! Normalization of catalog JSON.
//!
//! Card endpoints answer with a bare card object, a `{"cards": [...]}`
//! wrapper or a top-level array depending on the route. Sets may be nested
//! objects or plain ids. Everything is flattened into `CatalogCandidate`.

use serde_json::Value;

use crate::card::CatalogCandidate;

/// One catalog collection with its declared size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetSummary {
    pub id: String,
    /// Declared card count, as text so `"102"` and `102` compare equal
    pub total: String,
}

fn array_or_single(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        item @ Value::Object(_) => vec![item],
        _ => Vec::new(),
    }
}

/// Text of a string or number field; empty for anything else.
fn field_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Set id from either `"set": "base1"` or `"set": {"id": "base1", ...}`.
fn set_id(value: Option<&Value>) -> String {
    match value {
        Some(Value::Object(set)) => field_text(set.get("id")),
        other => field_text(other),
    }
}

/// Flattens one card object. Returns `None` when it carries no usable field.
pub fn candidate_from_card(card: &Value) -> Option<CatalogCandidate> {
    let card = card.as_object()?;

    let mut number = field_text(card.get("number"));
    if number.is_empty() {
        number = field_text(card.get("localId"));
    }

    let candidate = CatalogCandidate::new(
        field_text(card.get("name")),
        number,
        set_id(card.get("set")),
    );

    if candidate.is_empty() {
        None
    } else {
        Some(candidate)
    }
}

/// All cards in a response, whatever its shape.
pub fn candidates_from_value(value: &Value) -> Vec<CatalogCandidate> {
    let cards = match value {
        Value::Object(map) => match map.get("cards") {
            Some(cards) => array_or_single(cards),
            None => vec![value],
        },
        other => array_or_single(other),
    };

    cards.into_iter().filter_map(candidate_from_card).collect()
}

/// First card in a response, if any.
pub fn first_candidate(value: &Value) -> Option<CatalogCandidate> {
    candidates_from_value(value).into_iter().next()
}

/// Collections from a set listing.
///
/// The size comes from `total`, or from `cardCount.total` on newer payloads.
pub fn sets_from_value(value: &Value) -> Vec<SetSummary> {
    array_or_single(value)
        .into_iter()
        .filter_map(|set| {
            let id = field_text(set.get("id"));
            if id.is_empty() {
                return None;
            }
            let mut total = field_text(set.get("total"));
            if total.is_empty() {
                total = field_text(set.get("cardCount").and_then(|c| c.get("total")));
            }
            Some(SetSummary { id, total })
        })
        .collect()
}
