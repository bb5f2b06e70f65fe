// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Currency codes and money formatting shared by every renderer.

use rust_decimal::{Decimal, RoundingStrategy};

/// Codes with a known symbol.
pub const SUPPORTED: &[&str] = &[
    "USD", "EUR", "GBP", "BDT", "INR", "PKR", "JPY", "CNY", "AUD", "CAD", "SGD", "AED", "SAR",
    "MYR", "NPR", "LKR",
];

/// Symbol for a currency code. Unknown codes fall back to the code itself.
pub fn symbol(code: &str) -> &str {
    match code.trim().to_ascii_uppercase().as_str() {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "BDT" => "৳",
        "INR" => "₹",
        "PKR" | "NPR" | "LKR" => "Rs",
        "JPY" | "CNY" => "¥",
        "AUD" => "A$",
        "CAD" => "C$",
        "SGD" => "S$",
        "AED" => "د.إ",
        "SAR" => "﷼",
        "MYR" => "RM",
        _ => code,
    }
}

pub fn is_supported(code: &str) -> bool {
    SUPPORTED.iter().any(|c| c.eq_ignore_ascii_case(code.trim()))
}

/// Two-decimal display rounding. Half-up, the way receipts are printed.
pub fn round(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `1234.5` -> `1,234.50`
pub fn group_thousands(amount: Decimal) -> String {
    let s = format!("{:.2}", round(amount).abs());
    let (int_part, frac) = s.split_once('.').unwrap_or((s.as_str(), "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if round(amount).is_sign_negative() && !round(amount).is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}.{}", sign, grouped, frac)
}

pub fn format_money(amount: Decimal, code: &str) -> String {
    let grouped = group_thousands(amount);
    match grouped.strip_prefix('-') {
        Some(rest) => format!("-{}{}", symbol(code), rest),
        None => format!("{}{}", symbol(code), grouped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_resolve_case_insensitively() {
        assert_eq!(symbol("usd"), "$");
        assert_eq!(symbol("BDT"), "৳");
        assert_eq!(symbol("XYZ"), "XYZ");
    }

    #[test]
    fn every_supported_code_has_a_symbol() {
        for code in SUPPORTED {
            assert_ne!(symbol(code), *code, "{}", code);
        }
        assert!(is_supported(" usd "));
        assert!(!is_supported("XYZ"));
    }

    #[test]
    fn formats_grouped_amounts() {
        assert_eq!(format_money(Decimal::new(123450, 2), "USD"), "$1,234.50");
        assert_eq!(format_money(Decimal::new(-6000, 2), "BDT"), "-৳60.00");
        assert_eq!(format_money(Decimal::new(1234567891, 3), "EUR"), "€1,234,567.89");
        assert_eq!(group_thousands(Decimal::new(5, 3)), "0.01");
        assert_eq!(group_thousands(Decimal::new(-4, 3)), "0.00");
    }
}
