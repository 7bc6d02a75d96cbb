//! Money calculation utilities using rust_decimal for precision
//!
//! Line prices travel as `f64` on the wire. Every sum in this module is done
//! with `Decimal` at full precision; rounding to 2 decimal places happens only
//! when a value is presented ([`format_money`], [`to_f64`]).
//!
//! Nothing here fails or panics. Values beyond the `Decimal` range saturate
//! at `Decimal::MAX` / `Decimal::MIN` and are logged at error level.

use rust_decimal::prelude::*;
use shared::{BillView, ExtraDish, Order, OrderLine, SurchargeKind, SurchargeLine, SurchargeRates};

/// Rounding strategy for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
///
/// Non-finite values become zero; finite values out of range saturate.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    if let Some(d) = Decimal::from_f64(value) {
        return d;
    }
    if !value.is_finite() {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        return Decimal::ZERO;
    }
    let saturated = if value.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    };
    saturate("conversion", saturated)
}

fn saturate(op: &'static str, value: Decimal) -> Decimal {
    tracing::error!(op, saturated = %value, "Monetary value out of range, saturating");
    value
}

fn add(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b)
        .unwrap_or_else(|| saturate("addition", a.saturating_add(b)))
}

fn sub(a: Decimal, b: Decimal) -> Decimal {
    a.checked_sub(b)
        .unwrap_or_else(|| saturate("subtraction", a.saturating_sub(b)))
}

fn mul(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b)
        .unwrap_or_else(|| saturate("multiplication", a.saturating_mul(b)))
}

/// `amount × rate%`
///
/// Rates are at most 100, so scaling the rate first keeps the result in
/// range whenever the amount is.
fn percent_of(amount: Decimal, rate: Decimal) -> Decimal {
    amount
        .checked_mul(rate)
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        .unwrap_or_else(|| mul(amount, rate / Decimal::ONE_HUNDRED))
}

/// Round to presentation precision
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or_default()
}

/// Format an amount with exactly two fractional digits ("287.50")
pub fn format_money(value: Decimal) -> String {
    let mut rounded = round_money(value);
    rounded.rescale(DECIMAL_PLACES);
    rounded.to_string()
}

/// quantity × unit price
pub fn line_total(line: &OrderLine) -> Decimal {
    mul(to_decimal(line.unit_price), Decimal::from(line.quantity))
}

/// Lines that take part in the bill
///
/// Extras only count while the modified bill is being previewed.
pub fn active_lines(order: &Order, extras: &[ExtraDish], preview_modified: bool) -> Vec<OrderLine> {
    let mut lines = order.lines.clone();
    if preview_modified && !extras.is_empty() {
        lines.extend(extras.iter().map(ExtraDish::to_line));
    }
    lines
}

/// Derive the bill for an order
///
/// Pure function of its inputs; it never fails. Rates of exactly zero are
/// left out of the surcharge breakdown.
pub fn compute_bill(
    order: &Order,
    rates: &SurchargeRates,
    extras: &[ExtraDish],
    preview_modified: bool,
) -> BillView {
    let lines = active_lines(order, extras, preview_modified);

    let subtotal = lines.iter().map(line_total).fold(Decimal::ZERO, add);
    let discount = to_decimal(order.discount());
    let discounted_subtotal = sub(subtotal, discount);

    if discounted_subtotal.is_sign_negative() && !discounted_subtotal.is_zero() {
        tracing::warn!(
            order_id = %order.order_id,
            subtotal = %subtotal,
            discount = %discount,
            "Discount exceeds subtotal, bill total is negative"
        );
    }

    let surcharges: Vec<SurchargeLine> = SurchargeKind::ALL
        .into_iter()
        .filter(|kind| rates.get(*kind) > 0.0)
        .map(|kind| {
            let rate = to_decimal(rates.get(kind));
            SurchargeLine {
                kind,
                rate,
                amount: percent_of(discounted_subtotal, rate),
            }
        })
        .collect();

    let grand_total = surcharges
        .iter()
        .map(|s| s.amount)
        .fold(discounted_subtotal, add);

    BillView {
        lines,
        subtotal,
        discount,
        discounted_subtotal,
        surcharges,
        grand_total,
    }
}

#[cfg(test)]
mod tests;
