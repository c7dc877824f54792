pub mod aggregator;
pub mod audit;
pub mod normalizer;
pub mod reconciler;
pub mod variance;
pub mod warranty;

pub use aggregator::{aggregate, SignificanceThresholds};
pub use audit::{AuditReport, AuditService};
pub use reconciler::reconcile;
