use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

use super::decimal::{deserialize_trimmed, deserialize_trimmed_opt, zero};

/// Estimate line item as delivered by the extraction service.
///
/// Legacy `isNew` / `isChanged` / `isRemoved` flags are not part of this type;
/// status comes from reconciliation only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "zero", deserialize_with = "deserialize_trimmed")]
    pub quantity: BigDecimal,
    #[serde(default = "zero", deserialize_with = "deserialize_trimmed")]
    pub unit_price: BigDecimal,
    #[serde(default = "zero", deserialize_with = "deserialize_trimmed")]
    pub total: BigDecimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_breakdown: Option<CostBreakdown>,
}

impl LineItem {
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
        quantity: BigDecimal,
        unit_price: BigDecimal,
        total: BigDecimal,
    ) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            description: description.into(),
            quantity,
            unit_price,
            total,
            cost_breakdown: None,
        }
    }

    pub fn with_breakdown(mut self, breakdown: CostBreakdown) -> Self {
        self.cost_breakdown = Some(breakdown);
        self
    }

    /// Difference between the stated total and quantity × unit price.
    pub fn extension_gap(&self) -> BigDecimal {
        (&self.total - &self.quantity * &self.unit_price).abs()
    }
}

/// Parts / labor / materials split of a line total
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    #[serde(default, deserialize_with = "deserialize_trimmed_opt")]
    pub parts: Option<BigDecimal>,
    #[serde(default, deserialize_with = "deserialize_trimmed_opt")]
    pub labor: Option<BigDecimal>,
    #[serde(default, deserialize_with = "deserialize_trimmed_opt")]
    pub materials: Option<BigDecimal>,
}

impl CostBreakdown {
    pub fn sum(&self) -> BigDecimal {
        [&self.parts, &self.labor, &self.materials]
            .into_iter()
            .flatten()
            .fold(BigDecimal::zero(), |acc, v| acc + v)
    }

    /// True when the components add up to `total` within `tolerance`.
    pub fn validates(&self, total: &BigDecimal, tolerance: &BigDecimal) -> bool {
        (self.sum() - total).abs() <= *tolerance
    }
}

/// One side of the audit: the original estimate or the supplement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(default, alias = "items")]
    pub line_items: Vec<LineItem>,
    #[serde(default = "zero", deserialize_with = "deserialize_trimmed")]
    pub subtotal: BigDecimal,
    #[serde(default = "zero", deserialize_with = "deserialize_trimmed")]
    pub tax: BigDecimal,
    #[serde(default = "zero", deserialize_with = "deserialize_trimmed")]
    pub total: BigDecimal,
}

impl Invoice {
    pub fn new(line_items: Vec<LineItem>) -> Self {
        let subtotal = line_items
            .iter()
            .fold(BigDecimal::zero(), |acc, item| acc + &item.total);
        Self {
            line_items,
            total: subtotal.clone(),
            subtotal,
            tax: BigDecimal::zero(),
        }
    }

    pub fn len(&self) -> usize {
        self.line_items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }
}

/// Claim metadata passed through from extraction, used for the report banner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimInfo {
    #[serde(default)]
    pub claim_number: Option<String>,
    #[serde(default)]
    pub insured: Option<String>,
    #[serde(default)]
    pub vehicle: Option<String>,
    #[serde(default)]
    pub shop: Option<String>,
}

impl ClaimInfo {
    pub fn label(&self) -> String {
        self.claim_number
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "unnumbered claim".to_string())
    }
}

/// Input for one audit run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditRequest {
    #[serde(default)]
    pub claim: ClaimInfo,
    pub original: Invoice,
    pub supplement: Invoice,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn deserializes_camel_case_and_tolerates_gaps() {
        let json = r#"{
            "lineItems": [
                {"id": "1", "category": "LABOR", "description": "Body Labor",
                 "quantity": 1, "unitPrice": 100, "total": 100, "isNew": true},
                {"description": "Trim Clip", "total": "12.00"}
            ],
            "subtotal": 112,
            "tax": 0,
            "total": 112
        }"#;
        let invoice: Invoice = serde_json::from_str(json).unwrap();
        assert_eq!(invoice.len(), 2);
        assert_eq!(invoice.line_items[0].unit_price, dec("100"));
        assert_eq!(invoice.line_items[1].category, "");
        assert_eq!(invoice.line_items[1].quantity, dec("0"));
        assert_eq!(invoice.line_items[1].total, dec("12"));
    }

    #[test]
    fn float_json_numbers_keep_their_written_digits() {
        let json = r#"{"quantity": 1.5, "unitPrice": 19.99, "total": 29.985,
                       "costBreakdown": {"parts": 9.99, "labor": 20}}"#;
        let item: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.quantity.to_string(), "1.5");
        assert_eq!(item.unit_price.to_string(), "19.99");
        assert_eq!(item.total.to_string(), "29.985");
        let breakdown = item.cost_breakdown.unwrap();
        assert_eq!(breakdown.parts.map(|p| p.to_string()), Some("9.99".to_string()));
        assert_eq!(breakdown.labor.map(|l| l.to_string()), Some("20".to_string()));
    }

    #[test]
    fn items_alias_is_accepted() {
        let invoice: Invoice = serde_json::from_str(r#"{"items": [{"description": "x"}]}"#).unwrap();
        assert_eq!(invoice.len(), 1);
        assert_eq!(invoice.total, dec("0"));
    }

    #[test]
    fn breakdown_validation_uses_tolerance() {
        let breakdown = CostBreakdown {
            parts: Some(dec("80.00")),
            labor: Some(dec("19.995")),
            materials: None,
        };
        assert!(breakdown.validates(&dec("100"), &dec("0.01")));
        assert!(!breakdown.validates(&dec("100.50"), &dec("0.01")));
    }

    #[test]
    fn extension_gap_measures_inconsistent_totals() {
        let item = LineItem::new("1", "PARTS", "Bumper", dec("2"), dec("10"), dec("25"));
        assert_eq!(item.extension_gap(), dec("5"));
    }
}
