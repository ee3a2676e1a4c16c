//! Locale-aware amount cleaning and minor-unit conversion.
//!
//! Bank exports print amounts in their own number style, often with a
//! currency code or symbol glued on: `"1.234,56 EUR"`, `"CHF 1'234.50"`,
//! `"-12,00 €"`. These helpers reduce such text to a [`Decimal`], then to
//! non-negative integer minor units.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::is_currency_code;
use crate::table::RawCell;

/// Thousands and decimal separators of a number format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberStyle {
    pub thousands: char,
    pub decimal: char,
}

impl NumberStyle {
    /// `1.234,56`
    pub const GERMAN: NumberStyle = NumberStyle {
        thousands: '.',
        decimal: ',',
    };

    /// `1'234.56`
    pub const SWISS: NumberStyle = NumberStyle {
        thousands: '\'',
        decimal: '.',
    };
}

const SYMBOLS: [(char, &str); 5] = [
    ('€', "EUR"),
    ('$', "USD"),
    ('£', "GBP"),
    ('¥', "JPY"),
    ('₣', "CHF"),
];

/// Split a code glued to the end of a number: `"12.50CHF"` → `("12.50", "CHF")`.
fn split_code_suffix(token: &str) -> Option<(&str, &str)> {
    if token.len() <= 3 || !token.is_char_boundary(token.len() - 3) {
        return None;
    }
    let (number, code) = token.split_at(token.len() - 3);
    let glued = number
        .chars()
        .last()
        .is_some_and(|c| !c.is_ascii_alphabetic());
    (glued && is_currency_code(code)).then_some((number, code))
}

fn is_symbol(c: char) -> bool {
    SYMBOLS.iter().any(|(s, _)| *s == c)
}

/// Remove currency codes, symbols and the `Fr.` prefix, leaving the number.
fn strip_currency(text: &str) -> String {
    text.split_whitespace()
        .filter(|token| !is_currency_code(token) && *token != "Fr." && *token != "Fr")
        .map(|token| {
            let token = token.strip_prefix("Fr.").unwrap_or(token);
            let token = split_code_suffix(token).map_or(token, |(number, _)| number);
            token
                .trim_matches(is_symbol)
                .trim_start_matches(|c: char| c.is_ascii_uppercase())
                .to_string()
        })
        .collect::<Vec<_>>()
        .concat()
}

/// Parse amount text in the given style into a signed decimal.
pub fn parse_decimal(text: &str, style: NumberStyle) -> Result<Decimal, String> {
    let stripped = strip_currency(text);
    let mut normalized = String::with_capacity(stripped.len());
    for c in stripped.chars() {
        if c == style.thousands || c == '\u{2019}' || c == '\u{a0}' || c == '\u{202f}' {
            continue;
        }
        if c == style.decimal {
            normalized.push('.');
        } else {
            normalized.push(c);
        }
    }

    if normalized.is_empty() {
        return Err(format!("no amount in '{}'", text.trim()));
    }
    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .map_err(|_| format!("invalid amount '{}'", text.trim()))
}

/// Parse an amount cell. Numeric spreadsheet cells bypass the text style.
pub fn parse_cell(cell: &RawCell, style: NumberStyle) -> Result<Decimal, String> {
    match cell {
        RawCell::Number(n) => {
            let rendered = cell.raw_text();
            Decimal::from_str(&rendered)
                .or_else(|_| Decimal::from_scientific(&rendered))
                .map_err(|_| format!("invalid amount '{}'", n))
        }
        RawCell::Empty => Err("missing amount".to_string()),
        other => parse_decimal(&other.raw_text(), style),
    }
}

/// Absolute value in minor units (two decimals, midpoint away from zero).
pub fn to_minor_units(value: Decimal) -> Result<u64, String> {
    let minor = (value * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .abs();
    minor
        .to_u64()
        .ok_or_else(|| format!("amount {} out of range", value))
}

/// Currency code carried by amount text, if any.
///
/// A trailing code wins (separate or glued to the number), then a leading
/// one, then a currency symbol anywhere in the text.
pub fn extract_currency(text: &str) -> Option<String> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if let Some(last) = tokens.last() {
        if is_currency_code(last) {
            return Some(last.to_string());
        }
        if let Some((_, code)) = split_code_suffix(last) {
            return Some(code.to_string());
        }
    }
    if let Some(first) = tokens.first() {
        if is_currency_code(first) {
            return Some(first.to_string());
        }
        if first.starts_with("Fr") {
            return Some("CHF".to_string());
        }
    }
    text.chars().rev().find_map(|c| {
        SYMBOLS
            .iter()
            .find(|(symbol, _)| *symbol == c)
            .map(|(_, code)| code.to_string())
    })
}

/// `spending / account`, or `None` when the account side is zero.
pub fn spending_account_rate(spending: u64, account: u64) -> Option<f64> {
    if account == 0 {
        None
    } else {
        Some(spending as f64 / account as f64)
    }
}
