use bigdecimal::{BigDecimal, Zero};
use indexmap::IndexMap;

use crate::config::AuditConfig;
use crate::models::decimal::from_f64;
use crate::models::{CategoryKey, CategorySummary, MatchResult, ReconciledItem};

/// Cut-offs for counting an item as significant.
#[derive(Debug, Clone, PartialEq)]
pub struct SignificanceThresholds {
    pub pct: BigDecimal,
    pub amount: BigDecimal,
}

impl Default for SignificanceThresholds {
    fn default() -> Self {
        Self {
            pct: BigDecimal::from(10),
            amount: BigDecimal::from(500),
        }
    }
}

impl From<&AuditConfig> for SignificanceThresholds {
    fn from(cfg: &AuditConfig) -> Self {
        Self {
            pct: from_f64(cfg.pct_threshold),
            amount: from_f64(cfg.amount_threshold),
        }
    }
}

impl SignificanceThresholds {
    pub fn is_significant(&self, item: &ReconciledItem) -> bool {
        let pct_hit = item
            .variance
            .percentage_change()
            .map_or(false, |pct| pct.abs() >= self.pct);
        pct_hit || item.variance.total_delta.abs() >= self.amount
    }
}

/// Groups reconciled items by category and sorts by descending |net change|.
/// Ties keep the order in which categories first appeared.
pub fn aggregate(items: &[ReconciledItem], thresholds: &SignificanceThresholds) -> Vec<CategorySummary> {
    let mut groups: IndexMap<CategoryKey, Vec<ReconciledItem>> = IndexMap::new();
    for item in items {
        groups.entry(item.category()).or_default().push(item.clone());
    }

    let mut summaries: Vec<CategorySummary> = groups
        .into_iter()
        .map(|(category, items)| summarize(category, items, thresholds))
        .collect();

    // sort_by is stable, so equal magnitudes stay in first-seen order
    summaries.sort_by(|a, b| b.net_change.abs().cmp(&a.net_change.abs()));

    tracing::debug!("aggregated {} items into {} categories", items.len(), summaries.len());
    summaries
}

fn summarize(
    category: CategoryKey,
    items: Vec<ReconciledItem>,
    thresholds: &SignificanceThresholds,
) -> CategorySummary {
    let mut original_subtotal = BigDecimal::zero();
    let mut supplement_subtotal = BigDecimal::zero();
    let mut increase_sum = BigDecimal::zero();
    let mut decrease_sum = BigDecimal::zero();
    let mut significant_item_count = 0;

    for item in &items {
        if let Some(o) = item.result.original() {
            original_subtotal += &o.total;
        }
        if let MatchResult::Matched { supplement, .. } | MatchResult::Added { supplement } = &item.result {
            supplement_subtotal += &supplement.total;
        }

        let delta = &item.variance.total_delta;
        if *delta > BigDecimal::zero() {
            increase_sum += delta;
        } else if *delta < BigDecimal::zero() {
            decrease_sum += delta.abs();
        }

        if thresholds.is_significant(item) {
            significant_item_count += 1;
        }
    }

    let net_change = &supplement_subtotal - &original_subtotal;

    CategorySummary {
        category,
        items,
        original_subtotal,
        supplement_subtotal,
        increase_sum,
        decrease_sum,
        net_change,
        significant_item_count,
    }
}
