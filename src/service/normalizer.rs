use crate::models::{CategoryKey, LineItem, MatchKey};

/// Canonical matching key: upper-cased category, trimmed lower-cased description
/// with whitespace runs collapsed. The item itself is left untouched.
pub fn normalize(item: &LineItem) -> MatchKey {
    MatchKey {
        category: CategoryKey::from_raw(&item.category),
        description: normalize_description(&item.description),
    }
}

pub fn normalize_description(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
