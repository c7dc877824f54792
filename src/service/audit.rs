use bigdecimal::BigDecimal;
use chrono::Utc;
use rayon::prelude::*;

use crate::config::{AppConfig, AuditConfig, LayoutConfig};
use crate::error::Result;
use crate::models::decimal::from_f64;
use crate::models::{
    AuditOutcome, AuditRequest, Invoice, ItemStatus, LineItem, ReconciledItem, StatusCounts,
    WarrantyItem,
};
use crate::report::{build_sections, ReportDocument, ReportLayoutEngine};
use crate::service::aggregator::{aggregate, SignificanceThresholds};
use crate::service::reconciler::reconcile_with_positions;
use crate::service::variance::{item_variance, status_of};
use crate::service::warranty;

/// Finished audit for one claim: the reconciliation outcome and its laid-out report.
#[derive(Debug, Clone)]
pub struct AuditReport {
    pub outcome: AuditOutcome,
    pub document: ReportDocument,
}

/// Runs the reconcile → variance → aggregate → layout pipeline.
pub struct AuditService {
    thresholds: SignificanceThresholds,
    amount_tolerance: BigDecimal,
    breakdown_tolerance: BigDecimal,
    layout: LayoutConfig,
}

impl AuditService {
    pub fn new(audit: &AuditConfig, layout: LayoutConfig) -> Self {
        Self {
            thresholds: SignificanceThresholds::from(audit),
            amount_tolerance: from_f64(audit.amount_tolerance),
            breakdown_tolerance: from_f64(audit.breakdown_tolerance),
            layout,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.audit, config.layout)
    }

    pub fn layout_config(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Full audit including pagination. Fails only on layout overflow.
    pub fn audit(&self, request: &AuditRequest) -> Result<AuditReport> {
        let outcome = self.run_reconciliation(request);
        let sections = build_sections(&outcome, &self.layout);
        let document = ReportLayoutEngine::new(self.layout)
            .with_footer_label(format!("Claim {}", outcome.claim.label()))
            .layout(&sections)?;

        tracing::info!(
            "Claim {}: report laid out on {} page(s)",
            outcome.claim.label(),
            document.page_count()
        );

        Ok(AuditReport { outcome, document })
    }

    /// Reconciliation, variance and aggregation without layout.
    pub fn run_reconciliation(&self, request: &AuditRequest) -> AuditOutcome {
        let claim = request.claim.label();
        tracing::info!(
            "Claim {}: auditing {} original / {} supplement lines",
            claim,
            request.original.len(),
            request.supplement.len()
        );

        // warranty tagging only reads the supplement, so it runs beside matching
        let (results, flags) = rayon::join(
            || reconcile_with_positions(&request.original, &request.supplement),
            || {
                request
                    .supplement
                    .line_items
                    .iter()
                    .enumerate()
                    .map(|(idx, item)| (idx, warranty::classify(&item.description)))
                    .filter(|(_, flag)| flag.flagged)
                    .collect::<Vec<_>>()
            },
        );

        self.check_extensions(&request.original);
        self.check_extensions(&request.supplement);

        let mut counts = StatusCounts::default();
        let mut supplement_status = vec![ItemStatus::New; request.supplement.len()];
        let items: Vec<ReconciledItem> = results
            .into_iter()
            .map(|(result, position)| {
                let variance = item_variance(&result);
                let status = status_of(&result, &variance, &self.amount_tolerance);
                counts.record(status);
                if let Some(idx) = position.supplement {
                    supplement_status[idx] = status;
                }
                let breakdown_validated = self.validate_breakdown(result.display_item());
                ReconciledItem {
                    result,
                    status,
                    variance,
                    breakdown_validated,
                }
            })
            .collect();

        let categories = aggregate(&items, &self.thresholds);

        let warranty_items: Vec<WarrantyItem> = flags
            .into_iter()
            .map(|(idx, flag)| WarrantyItem {
                item: request.supplement.line_items[idx].clone(),
                flag,
                status: supplement_status[idx],
            })
            .collect();

        tracing::info!(
            "Claim {}: {} new, {} changed, {} removed, {} same; {} categories, {} warranty item(s)",
            claim,
            counts.new,
            counts.changed,
            counts.removed,
            counts.same,
            categories.len(),
            warranty_items.len()
        );

        AuditOutcome {
            claim: request.claim.clone(),
            original: request.original.clone(),
            supplement: request.supplement.clone(),
            items,
            categories,
            warranty_items,
            counts,
            audited_at: Utc::now(),
        }
    }

    /// Audits claims independently across the rayon pool, one result per request.
    pub fn audit_batch(&self, requests: &[AuditRequest]) -> Vec<Result<AuditReport>> {
        tracing::info!("Batch audit of {} claim(s)", requests.len());
        requests.par_iter().map(|req| self.audit(req)).collect()
    }

    fn validate_breakdown(&self, item: &LineItem) -> Option<bool> {
        let breakdown = item.cost_breakdown.as_ref()?;
        let ok = breakdown.validates(&item.total, &self.breakdown_tolerance);
        if !ok {
            tracing::warn!(
                "Line '{}' ({}): cost breakdown sums to {} but total is {}",
                item.description,
                item.id,
                breakdown.sum(),
                item.total
            );
        }
        Some(ok)
    }

    fn check_extensions(&self, invoice: &Invoice) {
        for item in &invoice.line_items {
            let gap = item.extension_gap();
            if gap > self.amount_tolerance {
                tracing::debug!(
                    "Line '{}' ({}): total {} differs from qty x price by {}",
                    item.description,
                    item.id,
                    item.total,
                    gap
                );
            }
        }
    }
}

impl Default for AuditService {
    fn default() -> Self {
        Self::new(&AuditConfig::default(), LayoutConfig::default())
    }
}
