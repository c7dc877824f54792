use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use super::{CategoryKey, ClaimInfo, Invoice, ItemStatus, LineItem, ReconciledItem};

/// Per-category rollup. Recomputed from reconciliation output, never edited.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: CategoryKey,
    pub items: Vec<ReconciledItem>,
    pub original_subtotal: BigDecimal,
    pub supplement_subtotal: BigDecimal,
    pub increase_sum: BigDecimal,
    pub decrease_sum: BigDecimal,
    pub net_change: BigDecimal,
    pub significant_item_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkType {
    Repair,
    Replacement,
    Service,
}

impl WorkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Repair => "REPAIR",
            Self::Replacement => "REPLACEMENT",
            Self::Service => "SERVICE",
        }
    }
}

impl fmt::Display for WorkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WarrantyFlag {
    pub flagged: bool,
    pub work_type: WorkType,
}

/// Supplement item that needs warranty tracking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarrantyItem {
    pub item: LineItem,
    pub flag: WarrantyFlag,
    pub status: ItemStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub new: usize,
    pub changed: usize,
    pub removed: usize,
    pub same: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: ItemStatus) {
        match status {
            ItemStatus::New => self.new += 1,
            ItemStatus::Changed => self.changed += 1,
            ItemStatus::Removed => self.removed += 1,
            ItemStatus::Same => self.same += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.new + self.changed + self.removed + self.same
    }
}

/// Everything produced for one claim before layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditOutcome {
    pub claim: ClaimInfo,
    pub original: Invoice,
    pub supplement: Invoice,
    pub items: Vec<ReconciledItem>,
    pub categories: Vec<CategorySummary>,
    pub warranty_items: Vec<WarrantyItem>,
    pub counts: StatusCounts,
    pub audited_at: DateTime<Utc>,
}
