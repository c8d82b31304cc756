use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::{Currency, Money};

/// Whole-unit price with a currency-code prefix: `AED 1,841`.
///
/// Presentation only; call it after the numeric result is final.
pub fn format_money(amount: Money, currency: &Currency) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let digits = rounded.abs().trunc().to_string();
    format!("{} {}{}", currency.code(), sign, group_thousands(&digits))
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
