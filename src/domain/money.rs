use rust_decimal::{Decimal, RoundingStrategy};

/// Formats a price as Brazilian reais, e.g. `R$ 1.234,56`.
pub fn format_price(price: Decimal) -> String {
    let rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };

    // `{:.2}` always yields "<int>.<2 digits>" for a 2dp decimal.
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    format!("{}R$ {},{}", sign, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(dec!(0)), "R$ 0,00");
        assert_eq!(format_price(dec!(10)), "R$ 10,00");
        assert_eq!(format_price(dec!(24.9)), "R$ 24,90");
        assert_eq!(format_price(dec!(999.999)), "R$ 1.000,00");
        assert_eq!(format_price(dec!(1234567.5)), "R$ 1.234.567,50");
        assert_eq!(format_price(dec!(-3.005)), "-R$ 3,01");
    }
}
