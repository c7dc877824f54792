use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

/// serde default for numeric fields the extraction service leaves out
pub fn zero() -> BigDecimal {
    BigDecimal::zero()
}

/// Lossless-as-printed conversion for config thresholds given as floats.
pub fn from_f64(value: f64) -> BigDecimal {
    if !value.is_finite() {
        return BigDecimal::zero();
    }
    BigDecimal::from_str(&value.to_string()).unwrap_or_else(|_| BigDecimal::zero())
}

/// Drops trailing zeros left by float-shaped JSON numbers (`19.99000000000000`)
/// without going below scale 0, so `100` stays `100`.
pub fn trimmed(value: BigDecimal) -> BigDecimal {
    let normalized = value.normalized();
    if normalized.as_bigint_and_exponent().1 < 0 {
        normalized.with_scale(0)
    } else {
        normalized
    }
}

pub fn deserialize_trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigDecimal, D::Error> {
    BigDecimal::deserialize(deserializer).map(trimmed)
}

pub fn deserialize_trimmed_opt<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<BigDecimal>, D::Error> {
    Option::<BigDecimal>::deserialize(deserializer).map(|v| v.map(trimmed))
}

/// `$1,234.50`, negatives as `-$12.00`. The sign follows the rounded value.
pub fn format_money(value: &BigDecimal) -> String {
    let rounded = value.round(2);
    let sign = if rounded < BigDecimal::zero() { "-" } else { "" };
    let fixed = rounded.abs().with_scale(2).to_string();
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{}${}.{}", sign, group_thousands(whole), frac)
}

/// Signed change, always with a leading `+` or `-` unless it rounds to zero.
pub fn format_delta(value: &BigDecimal) -> String {
    if value.round(2) > BigDecimal::zero() {
        format!("+{}", format_money(value))
    } else {
        format_money(value)
    }
}

pub fn format_pct(value: Option<&BigDecimal>) -> String {
    match value.map(|v| v.round(1)) {
        Some(v) if v > BigDecimal::zero() => format!("+{}%", v.with_scale(1)),
        Some(v) => format!("{}%", v.with_scale(1)),
        None => "n/a".to_string(),
    }
}

/// Quantities print without trailing zeros (`1`, `2.5`).
pub fn format_qty(value: &BigDecimal) -> String {
    let fixed = value.round(2).with_scale(2).to_string();
    match fixed.split_once('.') {
        Some((whole, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                whole.to_string()
            } else {
                format!("{}.{}", whole, frac)
            }
        }
        None => fixed,
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
