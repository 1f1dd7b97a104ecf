// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Fare Regulator Simulation Suite - Money Formatting

//! Money helpers: converts between the engine's f64 world and `Decimal`
//! for fare quantization and display formatting.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

const CURRENCY_PREFIX: &str = "S$";

/// Convert f64 to Decimal (lossy but sufficient for simulation).
pub fn to_decimal(v: f64) -> Decimal {
    Decimal::from_f64(v).unwrap_or(Decimal::ZERO)
}

/// Convert Decimal to f64.
pub fn from_decimal(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

/// Snap a fare onto the control grid (`step` apart, midpoints away from zero).
pub fn quantize_fare(fare: f64, step: f64) -> f64 {
    let step_dec = to_decimal(step);
    if step_dec <= Decimal::ZERO {
        return fare;
    }
    let steps = (to_decimal(fare) / step_dec)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    from_decimal(steps * step_dec)
}

/// `S$1.20`
pub fn format_fare(fare: f64) -> String {
    let cents = to_decimal(fare).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{}{:.2}", CURRENCY_PREFIX, cents)
}

/// Whole-dollar amount with thousands separators: `S$1,234,567`, `-S$12,000`.
pub fn format_currency(amount: f64) -> String {
    let whole = to_decimal(amount).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let sign = if whole < Decimal::ZERO { "-" } else { "" };
    let digits = whole.abs().trunc().to_string();
    format!("{}{}{}", sign, CURRENCY_PREFIX, group_thousands(&digits))
}

/// `1.23M` style ridership figure.
pub fn format_riders(riders: f64) -> String {
    let millions = (to_decimal(riders) / dec!(1000000))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}M", millions)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_round_trip() {
        assert_eq!(to_decimal(1.2), dec!(1.2));
        assert_eq!(from_decimal(dec!(0.85)), 0.85);
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
    }

    #[test]
    fn quantize_snaps_to_cents() {
        assert_eq!(quantize_fare(1.234, 0.01), 1.23);
        assert_eq!(quantize_fare(1.235, 0.01), 1.24);
        assert_eq!(quantize_fare(0.8, 0.01), 0.8);
        assert_eq!(quantize_fare(1.37, 0.05), 1.35);
        assert_eq!(quantize_fare(1.38, 0.05), 1.4);
    }

    #[test]
    fn quantize_with_non_positive_step_is_identity() {
        assert_eq!(quantize_fare(1.234, 0.0), 1.234);
    }

    #[test]
    fn fare_formatting() {
        assert_eq!(format_fare(1.2), "S$1.20");
        assert_eq!(format_fare(0.0), "S$0.00");
        assert_eq!(format_fare(2.499), "S$2.50");
    }

    #[test]
    fn currency_formatting_groups_thousands() {
        assert_eq!(format_currency(0.0), "S$0");
        assert_eq!(format_currency(999.4), "S$999");
        assert_eq!(format_currency(1_000.0), "S$1,000");
        assert_eq!(format_currency(1_234_567.8), "S$1,234,568");
        assert_eq!(format_currency(-12_000.0), "-S$12,000");
    }

    #[test]
    fn rider_formatting() {
        assert_eq!(format_riders(1_000_000.0), "1.00M");
        assert_eq!(format_riders(1_234_567.0), "1.23M");
    }
}
