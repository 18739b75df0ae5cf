//! Card text handling: normalization, pattern extraction, set names and
//! fuzzy matching. Pure functions, no I/O beyond loading the set table.

pub mod model;
pub mod normalize;
pub mod patterns;
pub mod sets;
pub mod similarity;

pub use model::{CardIdentity, CatalogCandidate, Confidence, Language, UNKNOWN};
pub use normalize::{clean_card_name, extract_card_name, is_valid_name_line};
pub use patterns::{
    clean_number, detect_language, extract_number_total, extract_promo_card_id, fix_card_number,
    fix_merged_number, parse_set, PromoCode,
};
pub use sets::SetTable;
pub use similarity::is_similar;
