use bigdecimal::BigDecimal;
use serde::Serialize;
use std::fmt;

use super::{CategoryKey, LineItem};

/// Outcome of matching one line across the two invoices.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchResult {
    Matched { original: LineItem, supplement: LineItem },
    Added { supplement: LineItem },
    Removed { original: LineItem },
}

impl MatchResult {
    pub fn original(&self) -> Option<&LineItem> {
        match self {
            Self::Matched { original, .. } | Self::Removed { original } => Some(original),
            Self::Added { .. } => None,
        }
    }

    pub fn supplement(&self) -> Option<&LineItem> {
        match self {
            Self::Matched { supplement, .. } | Self::Added { supplement } => Some(supplement),
            Self::Removed { .. } => None,
        }
    }

    /// The item that represents this line in the report: the supplement when
    /// there is one, otherwise the removed original.
    pub fn display_item(&self) -> &LineItem {
        match self {
            Self::Matched { supplement, .. } | Self::Added { supplement } => supplement,
            Self::Removed { original } => original,
        }
    }

    pub fn category(&self) -> CategoryKey {
        CategoryKey::from_raw(&self.display_item().category)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    New,
    Changed,
    Removed,
    Same,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Changed => "CHANGED",
            Self::Removed => "REMOVED",
            Self::Same => "SAME",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deltas for a matched pair. Percentages are `None` when the original value is zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarianceRecord {
    pub quantity_delta: BigDecimal,
    pub unit_price_delta: BigDecimal,
    pub total_delta: BigDecimal,
    pub quantity_pct: Option<BigDecimal>,
    pub unit_price_pct: Option<BigDecimal>,
    pub total_pct: Option<BigDecimal>,
}

/// Amount-level view of any match result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemVariance {
    pub original_amount: Option<BigDecimal>,
    pub supplement_amount: Option<BigDecimal>,
    pub total_delta: BigDecimal,
    pub record: Option<VarianceRecord>,
}

impl ItemVariance {
    pub fn percentage_change(&self) -> Option<&BigDecimal> {
        self.record.as_ref().and_then(|r| r.total_pct.as_ref())
    }
}

/// A match result with everything the report needs about it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciledItem {
    pub result: MatchResult,
    pub status: ItemStatus,
    pub variance: ItemVariance,
    /// `None` when the item carries no cost breakdown.
    pub breakdown_validated: Option<bool>,
}

impl ReconciledItem {
    pub fn category(&self) -> CategoryKey {
        self.result.category()
    }
}
