pub mod category;
pub mod decimal;
pub mod line_item;
pub mod result;
pub mod summary;

pub use category::{CategoryKey, MatchKey};
pub use line_item::{AuditRequest, ClaimInfo, CostBreakdown, Invoice, LineItem};
pub use result::{ItemStatus, ItemVariance, MatchResult, ReconciledItem, VarianceRecord};
pub use summary::{
    AuditOutcome, CategorySummary, StatusCounts, WarrantyFlag, WarrantyItem, WorkType,
};
