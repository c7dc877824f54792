use serde::{Serialize, Serializer};
use std::fmt;

/// Aggregation key for a category. Blank categories collapse into the
/// explicit `Uncategorized` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CategoryKey {
    Named(String),
    Uncategorized,
}

impl CategoryKey {
    pub fn from_raw(raw: &str) -> Self {
        let normalized = raw.trim().to_uppercase();
        if normalized.is_empty() {
            Self::Uncategorized
        } else {
            Self::Named(normalized)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::Uncategorized => "UNCATEGORIZED",
        }
    }

    pub fn is_uncategorized(&self) -> bool {
        matches!(self, Self::Uncategorized)
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CategoryKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Exact-match key: (category, description)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchKey {
    pub category: CategoryKey,
    pub description: String,
}
