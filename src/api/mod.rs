pub mod handlers;

pub use handlers::*;

use crate::service::AuditService;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// All routes over a shared audit service
pub fn router(service: Arc<AuditService>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/audit", post(audit_claim))
        .route("/api/audit/report", post(audit_report_pdf))
        .route("/api/audit/export", post(audit_export_csv))
        .route("/api/audit/batch", post(audit_batch))
        .with_state(service)
}
