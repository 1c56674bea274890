use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Largest quantity or unit price kept by coercion (one billion).
///
/// With both factors at or below this bound a line total stays under
/// 1e18, leaving `Decimal` ten digits of headroom for sums and cents.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Coerces free-form user input into a non-negative amount.
///
/// Plain decimals ("12.5") and scientific notation ("1e3") are accepted.
/// Empty, non-numeric, negative and out-of-range (above [`MAX_AMOUNT`])
/// input all yield zero, so a single bad field can never poison a total.
///
/// # Example
///
/// ```rust
/// use invoice_core::models::money::coerce_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(coerce_amount("abc"), Decimal::ZERO);
/// assert_eq!(coerce_amount(" 3 "), Decimal::from(3));
/// ```
pub fn coerce_amount(raw: &str) -> Decimal {
    let trimmed = raw.trim();
    // `Decimal::from_str` skips digit separators ("1_000"), which a form
    // field should not.
    if trimmed.is_empty() || trimmed.contains('_') {
        return Decimal::ZERO;
    }

    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map(bound_amount)
        .unwrap_or(Decimal::ZERO)
}

/// Converts a float (e.g. from a JSON number) using the same rules as
/// [`coerce_amount`]. Non-finite values become zero.
pub fn coerce_float(value: f64) -> Decimal {
    if !value.is_finite() {
        return Decimal::ZERO;
    }
    Decimal::try_from(value)
        .map(bound_amount)
        .unwrap_or(Decimal::ZERO)
}

/// Keeps `value` if it lies in `(0, MAX_AMOUNT]`, otherwise returns zero.
pub fn bound_amount(value: Decimal) -> Decimal {
    if value > Decimal::ZERO && value <= MAX_AMOUNT {
        value.normalize()
    } else {
        Decimal::ZERO
    }
}

/// Rounds a monetary value to two decimal places, halves away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount with exactly two decimals ("55.50").
pub fn format_amount(value: Decimal) -> String {
    let mut rounded = round_money(value);
    rounded.rescale(2);
    rounded.to_string()
}

/// Formats an amount with a currency label ("RM 55.50").
pub fn format_money(label: &str, value: Decimal) -> String {
    if label.is_empty() {
        format_amount(value)
    } else {
        format!("{} {}", label, format_amount(value))
    }
}

/// Formats a quantity without trailing zeros ("3", "1.5").
pub fn format_quantity(value: Decimal) -> String {
    value.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_plain_numbers() {
        assert_eq!(coerce_amount("3"), Decimal::from(3));
        assert_eq!(coerce_amount("25.50"), Decimal::new(255, 1));
        assert_eq!(coerce_amount("  7.25\n"), Decimal::new(725, 2));
    }

    #[test]
    fn test_coerce_scientific_notation() {
        assert_eq!(coerce_amount("1e3"), Decimal::from(1000));
    }

    #[test]
    fn test_coerce_non_numeric_is_zero() {
        for raw in ["abc", "", "   ", "12abc", "NaN", "Infinity", "--1", "1_000", "_5"] {
            assert_eq!(coerce_amount(raw), Decimal::ZERO, "input {:?}", raw);
        }
    }

    #[test]
    fn test_coerce_negative_is_zero() {
        assert_eq!(coerce_amount("-5"), Decimal::ZERO);
        assert_eq!(coerce_amount("-0.01"), Decimal::ZERO);
    }

    #[test]
    fn test_coerce_out_of_range_is_zero() {
        assert_eq!(coerce_amount("1e20"), Decimal::ZERO);
        assert_eq!(coerce_amount("1000000000.01"), Decimal::ZERO);
        assert_eq!(coerce_amount("99999999999999999999999999999"), Decimal::ZERO);
        assert_eq!(coerce_float(1e10), Decimal::ZERO);
        assert_eq!(coerce_amount("1e9"), MAX_AMOUNT);
        assert_eq!(coerce_float(1e9), MAX_AMOUNT);
    }

    #[test]
    fn test_extreme_inputs_still_format_with_cents() {
        let quantity = coerce_amount("1e20");
        let price = coerce_amount("1e10");
        assert_eq!(format_money("RM", quantity * price), "RM 0.00");

        let largest = MAX_AMOUNT * MAX_AMOUNT;
        assert_eq!(format_money("RM", largest), "RM 1000000000000000000.00");

        let fine = coerce_amount("999999999.999") * coerce_amount("0.0000001");
        assert_eq!(format_money("RM", fine), "RM 100.00");
    }

    #[test]
    fn test_bound_amount() {
        assert_eq!(bound_amount(Decimal::new(-1, 0)), Decimal::ZERO);
        assert_eq!(bound_amount(MAX_AMOUNT), MAX_AMOUNT);
        assert_eq!(bound_amount(MAX_AMOUNT + Decimal::ONE), Decimal::ZERO);
        assert_eq!(bound_amount(Decimal::MAX), Decimal::ZERO);
    }

    #[test]
    fn test_coerce_float() {
        assert_eq!(coerce_float(2.5), Decimal::new(25, 1));
        assert_eq!(coerce_float(-1.0), Decimal::ZERO);
        assert_eq!(coerce_float(f64::NAN), Decimal::ZERO);
        assert_eq!(coerce_float(f64::INFINITY), Decimal::ZERO);
    }

    #[test]
    fn test_format_money_two_decimals() {
        assert_eq!(format_money("RM", Decimal::from(30)), "RM 30.00");
        assert_eq!(format_money("RM", Decimal::new(2555, 2)), "RM 25.55");
        assert_eq!(format_money("RM", Decimal::new(1005, 3)), "RM 1.01");
        assert_eq!(format_money("", Decimal::ZERO), "0.00");
    }

    #[test]
    fn test_format_quantity_drops_trailing_zeros() {
        assert_eq!(format_quantity(Decimal::new(300, 2)), "3");
        assert_eq!(format_quantity(Decimal::new(150, 2)), "1.5");
    }
}
