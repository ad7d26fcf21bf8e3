use rust_decimal::Decimal;
use shared::{NetGstPosition, RawAmount};
use std::str::FromStr;

use crate::domain::errors::{EngineError, EngineResult};

pub use shared::round2;

/// Parse a raw store amount into an exact decimal. Rejects empty input,
/// non-numeric text (including `NaN`) and negative values.
pub fn parse_money(field: &str, raw: &RawAmount) -> EngineResult<Decimal> {
    let text = raw.as_text();
    if text.is_empty() {
        return Err(EngineError::invalid(field, "value is empty"));
    }

    let value = Decimal::from_str(&text)
        .map_err(|_| EngineError::invalid(field, format!("'{}' is not a decimal number", text)))?;

    ensure_non_negative(field, value)
}

pub fn ensure_non_negative(field: &str, value: Decimal) -> EngineResult<Decimal> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(EngineError::invalid(field, format!("{} must not be negative", value)));
    }
    Ok(value)
}

fn overflow(field: &str) -> EngineError {
    EngineError::invalid(field, "value is too large to compute")
}

pub fn checked_add(field: &str, a: Decimal, b: Decimal) -> EngineResult<Decimal> {
    a.checked_add(b).ok_or_else(|| overflow(field))
}

pub fn checked_sub(field: &str, a: Decimal, b: Decimal) -> EngineResult<Decimal> {
    a.checked_sub(b).ok_or_else(|| overflow(field))
}

pub fn checked_mul(field: &str, a: Decimal, b: Decimal) -> EngineResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| overflow(field))
}

/// Sum `values`, failing with `InvalidRecord` on overflow
pub fn checked_sum<I>(field: &str, values: I) -> EngineResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |total, value| checked_add(field, total, value))
}

/// Format a money value with exactly two decimals and a currency prefix,
/// e.g. `$118.00` or `-$4.50`
pub fn format_money(prefix: &str, value: Decimal) -> String {
    let rounded = round2(value);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{}{:.2}", prefix, rounded.abs())
    } else {
        format!("{}{:.2}", prefix, rounded.abs())
    }
}

/// Net GST magnitude with its position, e.g. `$130.00 (Payable)` or
/// `$10.00 (Refund)`
pub fn format_net_gst(prefix: &str, net_gst: Decimal) -> String {
    let amount = format_money(prefix, net_gst.abs());
    match NetGstPosition::from_net(round2(net_gst)) {
        NetGstPosition::Settled => amount,
        position => format!("{} {}", amount, position.label()),
    }
}
