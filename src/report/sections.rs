use bigdecimal::{BigDecimal, Zero};

use super::layout::{Section, SectionKind, SectionRow};
use super::table::{Cell, CellTone, ColumnSpec};
use crate::config::LayoutConfig;
use crate::models::decimal::{format_delta, format_money, format_pct, format_qty};
use crate::models::{AuditOutcome, CategorySummary, LineItem, ReconciledItem};
use crate::service::variance::percentage;

pub const BREAKDOWN_NOTE: &str = "[breakdown not validated]";

const CATEGORY_HEADER: [&str; 10] = [
    "Status",
    "Description",
    "Orig Qty",
    "Orig Price",
    "Orig Total",
    "Supp Qty",
    "Supp Price",
    "Supp Total",
    "Change",
    "Change %",
];

/// Report sections in print order: overview, category tables by impact, grand
/// total, then the warranty table when anything was flagged.
pub fn build_sections(outcome: &AuditOutcome, layout: &LayoutConfig) -> Vec<Section> {
    let width = layout.content_width();
    let mut sections = Vec::with_capacity(outcome.categories.len() + 3);

    sections.push(overview_section(outcome, width));
    sections.extend(outcome.categories.iter().map(|c| category_section(c, width)));
    sections.push(grand_total_section(outcome, width));
    if !outcome.warranty_items.is_empty() {
        sections.push(warranty_section(outcome, width));
    }
    sections
}

fn columns(width: f32, spec: &[(f32, bool)]) -> Vec<ColumnSpec> {
    spec.iter()
        .map(|&(share, right)| {
            if right {
                ColumnSpec::right(width * share)
            } else {
                ColumnSpec::left(width * share)
            }
        })
        .collect()
}

fn tone_for(delta: &BigDecimal) -> CellTone {
    if *delta > BigDecimal::zero() {
        CellTone::Increase
    } else if *delta < BigDecimal::zero() {
        CellTone::Decrease
    } else {
        CellTone::Plain
    }
}

fn overview_section(outcome: &AuditOutcome, width: f32) -> Section {
    let claim = &outcome.claim;
    let counts = &outcome.counts;
    let mut rows = vec![SectionRow::new(vec![Cell::plain("Claim"), Cell::plain(claim.label())])];
    for (label, value) in [
        ("Insured", &claim.insured),
        ("Vehicle", &claim.vehicle),
        ("Repair facility", &claim.shop),
    ] {
        if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
            rows.push(SectionRow::new(vec![Cell::plain(label), Cell::plain(value)]));
        }
    }
    rows.push(SectionRow::new(vec![
        Cell::plain("Lines audited"),
        Cell::plain(format!(
            "{} total: {} new, {} changed, {} removed, {} unchanged",
            counts.total(),
            counts.new,
            counts.changed,
            counts.removed,
            counts.same
        )),
    ]));
    rows.push(SectionRow::new(vec![
        Cell::plain("Audited"),
        Cell::plain(outcome.audited_at.format("%Y-%m-%d %H:%M UTC").to_string()),
    ]));

    Section {
        id: "overview".to_string(),
        kind: SectionKind::Overview,
        title: "Supplement Audit".to_string(),
        columns: columns(width, &[(0.25, false), (0.75, false)]),
        header: vec!["Field".to_string(), "Value".to_string()],
        rows,
    }
}

fn quantity_price_total(item: Option<&LineItem>) -> [Cell; 3] {
    match item {
        Some(item) => [
            Cell::plain(format_qty(&item.quantity)),
            Cell::plain(format_money(&item.unit_price)),
            Cell::plain(format_money(&item.total)),
        ],
        None => [Cell::plain("-"), Cell::plain("-"), Cell::plain("-")],
    }
}

fn item_row(item: &ReconciledItem) -> SectionRow {
    let display = item.result.display_item();
    let description = if item.breakdown_validated == Some(false) {
        Cell::toned(format!("{} {}", display.description, BREAKDOWN_NOTE), CellTone::Flagged)
    } else {
        Cell::plain(display.description.clone())
    };
    let delta = &item.variance.total_delta;
    let tone = tone_for(delta);

    let mut cells = vec![Cell::toned(item.status.as_str(), tone), description];
    cells.extend(quantity_price_total(item.result.original()));
    cells.extend(quantity_price_total(item.result.supplement()));
    cells.push(Cell::toned(format_delta(delta), tone));
    cells.push(Cell::toned(format_pct(item.variance.percentage_change()), tone));
    SectionRow::new(cells)
}

fn category_section(summary: &CategorySummary, width: f32) -> Section {
    let mut rows: Vec<SectionRow> = summary.items.iter().map(item_row).collect();

    let net_tone = tone_for(&summary.net_change);
    let net_pct = percentage(&summary.net_change, &summary.original_subtotal);
    rows.push(SectionRow::new(vec![
        Cell::toned("", CellTone::Strong),
        Cell::toned(format!("{} subtotal", summary.category), CellTone::Strong),
        Cell::plain(""),
        Cell::plain(""),
        Cell::toned(format_money(&summary.original_subtotal), CellTone::Strong),
        Cell::plain(""),
        Cell::plain(""),
        Cell::toned(format_money(&summary.supplement_subtotal), CellTone::Strong),
        Cell::toned(format_delta(&summary.net_change), net_tone),
        Cell::toned(format_pct(net_pct.as_ref()), net_tone),
    ]));

    Section {
        id: format!("category:{}", summary.category),
        kind: SectionKind::CategoryTable,
        title: format!(
            "{} | {} line(s), {} significant | +{} / -{}",
            summary.category,
            summary.items.len(),
            summary.significant_item_count,
            format_money(&summary.increase_sum),
            format_money(&summary.decrease_sum)
        ),
        columns: columns(
            width,
            &[
                (0.08, false),
                (0.26, false),
                (0.06, true),
                (0.09, true),
                (0.09, true),
                (0.06, true),
                (0.09, true),
                (0.09, true),
                (0.10, true),
                (0.08, true),
            ],
        ),
        header: CATEGORY_HEADER.iter().map(|h| h.to_string()).collect(),
        rows,
    }
}

fn totals_row(label: &str, original: &BigDecimal, supplement: &BigDecimal) -> SectionRow {
    let delta = supplement - original;
    SectionRow::new(vec![
        Cell::plain(label),
        Cell::plain(format_money(original)),
        Cell::plain(format_money(supplement)),
        Cell::toned(format_delta(&delta), tone_for(&delta)),
    ])
}

fn grand_total_section(outcome: &AuditOutcome, width: f32) -> Section {
    let (line_original, line_supplement) = outcome.categories.iter().fold(
        (BigDecimal::zero(), BigDecimal::zero()),
        |(o, s), c| (o + &c.original_subtotal, s + &c.supplement_subtotal),
    );
    let original = &outcome.original;
    let supplement = &outcome.supplement;

    let mut rows = vec![
        totals_row("Line items", &line_original, &line_supplement),
        totals_row("Invoice subtotal", &original.subtotal, &supplement.subtotal),
        totals_row("Tax", &original.tax, &supplement.tax),
        totals_row("Invoice total", &original.total, &supplement.total),
    ];
    if let Some(last) = rows.last_mut() {
        for cell in last.cells.iter_mut().take(3) {
            cell.tone = CellTone::Strong;
        }
    }
    let counts = &outcome.counts;
    rows.push(SectionRow::new(vec![
        Cell::plain("Line status"),
        Cell::plain(format!("{} removed", counts.removed)),
        Cell::plain(format!("{} new, {} changed", counts.new, counts.changed)),
        Cell::plain(format!("{} unchanged", counts.same)),
    ]));

    Section {
        id: "grand-total".to_string(),
        kind: SectionKind::GrandTotal,
        title: "Grand Total".to_string(),
        columns: columns(width, &[(0.40, false), (0.20, true), (0.20, true), (0.20, true)]),
        header: vec![
            "".to_string(),
            "Original".to_string(),
            "Supplement".to_string(),
            "Change".to_string(),
        ],
        rows,
    }
}

fn warranty_section(outcome: &AuditOutcome, width: f32) -> Section {
    let rows = outcome
        .warranty_items
        .iter()
        .map(|w| {
            SectionRow::new(vec![
                Cell::toned(w.flag.work_type.as_str(), CellTone::Flagged),
                Cell::plain(crate::models::CategoryKey::from_raw(&w.item.category).to_string()),
                Cell::plain(w.item.description.clone()),
                Cell::plain(format_qty(&w.item.quantity)),
                Cell::plain(format_money(&w.item.total)),
                Cell::plain(w.status.as_str()),
            ])
        })
        .collect();

    Section {
        id: "warranty".to_string(),
        kind: SectionKind::WarrantyTable,
        title: format!("Warranty Tracking ({} item(s))", outcome.warranty_items.len()),
        columns: columns(
            width,
            &[(0.14, false), (0.14, false), (0.40, false), (0.08, true), (0.12, true), (0.12, false)],
        ),
        header: ["Work Type", "Category", "Description", "Qty", "Total", "Status"]
            .iter()
            .map(|h| h.to_string())
            .collect(),
        rows,
    }
}
