use bigdecimal::{BigDecimal, Zero};

use crate::models::{ItemStatus, ItemVariance, LineItem, MatchResult, VarianceRecord};

/// `delta / baseline * 100`, rounded to 2 places; `None` for a zero baseline.
pub fn percentage(delta: &BigDecimal, baseline: &BigDecimal) -> Option<BigDecimal> {
    if baseline.is_zero() {
        return None;
    }
    Some(((delta / baseline) * BigDecimal::from(100)).round(2))
}

/// Field-level deltas between an original line and its supplement counterpart.
pub fn variance_record(original: &LineItem, supplement: &LineItem) -> VarianceRecord {
    let quantity_delta = &supplement.quantity - &original.quantity;
    let unit_price_delta = &supplement.unit_price - &original.unit_price;
    let total_delta = &supplement.total - &original.total;

    VarianceRecord {
        quantity_pct: percentage(&quantity_delta, &original.quantity),
        unit_price_pct: percentage(&unit_price_delta, &original.unit_price),
        total_pct: percentage(&total_delta, &original.total),
        quantity_delta,
        unit_price_delta,
        total_delta,
    }
}

pub fn item_variance(result: &MatchResult) -> ItemVariance {
    match result {
        MatchResult::Matched { original, supplement } => {
            let record = variance_record(original, supplement);
            ItemVariance {
                original_amount: Some(original.total.clone()),
                supplement_amount: Some(supplement.total.clone()),
                total_delta: record.total_delta.clone(),
                record: Some(record),
            }
        }
        MatchResult::Added { supplement } => ItemVariance {
            original_amount: None,
            supplement_amount: Some(supplement.total.clone()),
            total_delta: supplement.total.clone(),
            record: None,
        },
        MatchResult::Removed { original } => ItemVariance {
            original_amount: Some(original.total.clone()),
            supplement_amount: None,
            total_delta: -original.total.clone(),
            record: None,
        },
    }
}

/// A matched pair is `Changed` once any of quantity, unit price or total moves by
/// more than `tolerance`.
pub fn status_of(result: &MatchResult, variance: &ItemVariance, tolerance: &BigDecimal) -> ItemStatus {
    match result {
        MatchResult::Added { .. } => ItemStatus::New,
        MatchResult::Removed { .. } => ItemStatus::Removed,
        MatchResult::Matched { .. } => {
            let moved = variance.record.as_ref().map_or(false, |r| {
                r.quantity_delta.abs() > *tolerance
                    || r.unit_price_delta.abs() > *tolerance
                    || r.total_delta.abs() > *tolerance
            });
            if moved {
                ItemStatus::Changed
            } else {
                ItemStatus::Same
            }
        }
    }
}
