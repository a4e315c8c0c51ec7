//! Order pricing
//!
//! Line amounts are summed with rust_decimal and rounded exactly once, at
//! the end: subtotal after summation, total from the rounded subtotal.
//! Stored amounts are f64, 2 decimal places, half-up.

use rust_decimal::prelude::*;

/// Fixed sales tax rate (18%)
pub const TAX_RATE: f64 = 0.18;

const DECIMAL_PLACES: u32 = 2;

#[inline]
fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

#[inline]
fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// A priced order line: unit price and quantity
#[derive(Debug, Clone, Copy)]
pub struct PricedLine {
    pub unit_price: f64,
    pub quantity: u32,
}

/// Computed order amounts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTotals {
    pub tax: f64,
    pub subtotal: f64,
    pub total: f64,
}

/// Compute subtotal, tax and total for a set of lines
pub fn compute_totals(lines: &[PricedLine]) -> OrderTotals {
    let raw_subtotal: Decimal = lines
        .iter()
        .map(|line| to_decimal(line.unit_price) * Decimal::from(line.quantity))
        .sum();

    let subtotal = to_f64(raw_subtotal);
    let total = to_f64(to_decimal(subtotal) * (Decimal::ONE + to_decimal(TAX_RATE)));

    OrderTotals {
        tax: TAX_RATE,
        subtotal,
        total,
    }
}
