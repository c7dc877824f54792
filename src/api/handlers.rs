use crate::error::AuditError;
use crate::models::{AuditRequest, CategoryKey, CategorySummary, StatusCounts, WarrantyItem};
use crate::report::{write_csv, PdfRenderer};
use crate::service::{AuditReport, AuditService};
use axum::{
    extract::{Json, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use bigdecimal::BigDecimal;
use serde::Serialize;
use std::sync::Arc;

/// Message shown to callers when layout fails; details go to the log.
pub const REPORT_FAILED: &str = "report generation failed";

/// Response body
#[derive(Debug, Serialize)]
pub struct AuditResponse {
    pub success: bool,
    pub message: String,
    pub summary: Option<AuditSummary>,
}

#[derive(Debug, Serialize)]
pub struct CategoryTotals {
    pub category: CategoryKey,
    pub item_count: usize,
    pub original_subtotal: BigDecimal,
    pub supplement_subtotal: BigDecimal,
    pub increase_sum: BigDecimal,
    pub decrease_sum: BigDecimal,
    pub net_change: BigDecimal,
    pub significant_item_count: usize,
}

impl From<&CategorySummary> for CategoryTotals {
    fn from(s: &CategorySummary) -> Self {
        Self {
            category: s.category.clone(),
            item_count: s.items.len(),
            original_subtotal: s.original_subtotal.clone(),
            supplement_subtotal: s.supplement_subtotal.clone(),
            increase_sum: s.increase_sum.clone(),
            decrease_sum: s.decrease_sum.clone(),
            net_change: s.net_change.clone(),
            significant_item_count: s.significant_item_count,
        }
    }
}

/// Audit summary without the laid-out pages
#[derive(Debug, Serialize)]
pub struct AuditSummary {
    pub claim: String,
    pub counts: StatusCounts,
    pub categories: Vec<CategoryTotals>,
    pub warranty_items: Vec<WarrantyItem>,
    pub page_count: usize,
}

impl From<&AuditReport> for AuditSummary {
    fn from(report: &AuditReport) -> Self {
        let outcome = &report.outcome;
        Self {
            claim: outcome.claim.label(),
            counts: outcome.counts,
            categories: outcome.categories.iter().map(CategoryTotals::from).collect(),
            warranty_items: outcome.warranty_items.clone(),
            page_count: report.document.page_count(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BatchAuditResponse {
    pub success: bool,
    pub message: String,
    pub results: Vec<AuditResponse>,
}

fn failure(status: StatusCode, message: String) -> Response {
    let response = AuditResponse {
        success: false,
        message,
        summary: None,
    };
    (status, Json(response)).into_response()
}

fn error_response(err: &AuditError) -> Response {
    if err.is_layout_overflow() {
        tracing::warn!("Report layout failed: {}", err);
        failure(StatusCode::UNPROCESSABLE_ENTITY, REPORT_FAILED.to_string())
    } else {
        tracing::error!("Audit failed: {}", err);
        failure(StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {}", err))
    }
}

/// CPU-bound work runs off the async executor.
async fn blocking<T, F>(work: F) -> Result<T, Response>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        tracing::error!("Audit task panicked: {}", e);
        failure(StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {}", e))
    })
}

/// Health check
pub async fn health_check() -> &'static str {
    "OK"
}

/// Audit one claim and return the summary
pub async fn audit_claim(
    State(service): State<Arc<AuditService>>,
    Json(req): Json<AuditRequest>,
) -> Response {
    let result = match blocking(move || service.audit(&req)).await {
        Ok(result) => result,
        Err(resp) => return resp,
    };

    match result {
        Ok(report) => {
            let summary = AuditSummary::from(&report);
            let response = AuditResponse {
                success: true,
                message: format!(
                    "Audited claim {}: {} line(s), {} page(s)",
                    summary.claim,
                    summary.counts.total(),
                    summary.page_count
                ),
                summary: Some(summary),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// Audit one claim and return the paginated PDF report
pub async fn audit_report_pdf(
    State(service): State<Arc<AuditService>>,
    Json(req): Json<AuditRequest>,
) -> Response {
    let result = blocking(move || {
        let report = service.audit(&req)?;
        let bytes = PdfRenderer::new(*service.layout_config()).render(&report.document)?;
        Ok::<_, AuditError>((report.outcome.claim.label(), bytes))
    })
    .await;

    match result {
        Ok(Ok((claim, bytes))) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}-audit.pdf\"", file_stem(&claim)),
                ),
            ],
            bytes,
        )
            .into_response(),
        Ok(Err(e)) => error_response(&e),
        Err(resp) => resp,
    }
}

/// Reconcile one claim and return the flat CSV export
pub async fn audit_export_csv(
    State(service): State<Arc<AuditService>>,
    Json(req): Json<AuditRequest>,
) -> Response {
    let result = blocking(move || {
        let outcome = service.run_reconciliation(&req);
        let mut buf = Vec::new();
        write_csv(&outcome.items, &mut buf)?;
        Ok::<_, AuditError>(buf)
    })
    .await;

    match result {
        Ok(Ok(buf)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
            buf,
        )
            .into_response(),
        Ok(Err(e)) => error_response(&e),
        Err(resp) => resp,
    }
}

/// Audit several independent claims in parallel
pub async fn audit_batch(
    State(service): State<Arc<AuditService>>,
    Json(reqs): Json<Vec<AuditRequest>>,
) -> Response {
    let count = reqs.len();
    let results = match blocking(move || service.audit_batch(&reqs)).await {
        Ok(results) => results,
        Err(resp) => return resp,
    };

    let results: Vec<AuditResponse> = results
        .iter()
        .map(|r| match r {
            Ok(report) => AuditResponse {
                success: true,
                message: "OK".to_string(),
                summary: Some(AuditSummary::from(report)),
            },
            Err(e) => {
                tracing::warn!("Batch entry failed: {}", e);
                AuditResponse {
                    success: false,
                    message: if e.is_layout_overflow() {
                        REPORT_FAILED.to_string()
                    } else {
                        format!("Error: {}", e)
                    },
                    summary: None,
                }
            }
        })
        .collect();

    let ok = results.iter().filter(|r| r.success).count();
    let response = BatchAuditResponse {
        success: ok == count,
        message: format!("Audited {} of {} claims", ok, count),
        results,
    };
    (StatusCode::OK, Json(response)).into_response()
}

fn file_stem(claim: &str) -> String {
    claim
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}
