use bigdecimal::BigDecimal;
use csv::Writer;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::models::{CategoryKey, ReconciledItem};

pub const CSV_HEADER: [&str; 11] = [
    "status",
    "category",
    "description",
    "quantity",
    "unit_price",
    "total",
    "original_quantity",
    "original_unit_price",
    "original_total",
    "total_delta",
    "total_pct",
];

fn option_to_csv(val: Option<&BigDecimal>) -> String {
    val.map(|v| v.to_string()).unwrap_or_default()
}

fn pct_to_csv(val: Option<&BigDecimal>) -> String {
    val.map(|v| v.with_scale(2).to_string()).unwrap_or_default()
}

/// One record per reconciled line. Removed lines put the original values in the
/// item columns and leave the `original_*` columns empty.
pub fn write_csv<W: Write>(items: &[ReconciledItem], writer: W) -> Result<()> {
    let mut writer = Writer::from_writer(writer);
    writer.write_record(CSV_HEADER)?;

    for item in items {
        let shown = item.result.display_item();
        let baseline = item.result.original().filter(|_| item.result.supplement().is_some());

        writer.write_record(&[
            item.status.as_str().to_string(),
            CategoryKey::from_raw(&shown.category).to_string(),
            shown.description.clone(),
            shown.quantity.to_string(),
            shown.unit_price.to_string(),
            shown.total.to_string(),
            option_to_csv(baseline.map(|o| &o.quantity)),
            option_to_csv(baseline.map(|o| &o.unit_price)),
            option_to_csv(baseline.map(|o| &o.total)),
            item.variance.total_delta.to_string(),
            pct_to_csv(item.variance.percentage_change()),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

pub fn export_to_csv(items: &[ReconciledItem], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    write_csv(items, file)?;
    tracing::info!("Exported {} line(s) to {}", items.len(), output_path.display());
    Ok(())
}
