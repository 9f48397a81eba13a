//! Normalization of loosely shaped product payloads
//!
//! Products reach checkout from several screens, each with its own field
//! names. Everything downstream works on [`ProductLineItem`]; raw payloads
//! never leave this module.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

const ID_KEYS: &[&str] = &["id", "_id", "productId", "product_id"];
const NAME_KEYS: &[&str] = &["name", "title", "productName", "product_name"];
const RENTAL_PRICE_KEYS: &[&str] = &["rental_price", "rentalPrice", "price"];
const DEPOSIT_KEYS: &[&str] = &["security_deposit", "securityDeposit", "deposit"];

/// A product as it appears in an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductLineItem {
    pub id: String,
    pub name: String,
    pub rental_price: Decimal,
    pub security_deposit: Decimal,
}

impl ProductLineItem {
    /// Normalize a raw product payload, whatever its field names
    pub fn from_raw(raw: &Value) -> Self {
        Self {
            id: first_field(raw, ID_KEYS).map(text).unwrap_or_default(),
            name: first_field(raw, NAME_KEYS).map(text).unwrap_or_default(),
            rental_price: first_field(raw, RENTAL_PRICE_KEYS)
                .map(coerce_amount)
                .unwrap_or_default(),
            security_deposit: first_field(raw, DEPOSIT_KEYS)
                .map(coerce_amount)
                .unwrap_or_default(),
        }
    }

    /// Rental price plus refundable deposit, saturating at the `Decimal` range
    pub fn line_total(&self) -> Decimal {
        self.rental_price.saturating_add(self.security_deposit)
    }
}

fn first_field<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| raw.get(key))
        .find(|value| !value.is_null())
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Coerce a price-like JSON value into an amount.
///
/// Numbers pass through. Strings are stripped of everything except digits,
/// `.` and `-`, then the longest leading number is taken, so `"₹1,200.50"`
/// becomes `1200.5`. Anything unparseable is zero; numbers too large for
/// `Decimal` clamp to `Decimal::MAX` (or `Decimal::MIN`).
pub fn coerce_amount(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => parse_number(&n.to_string()).unwrap_or_default(),
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            parse_number(leading_number(&cleaned)).unwrap_or_default()
        }
        _ => Decimal::ZERO,
    }
}

fn parse_number(s: &str) -> Option<Decimal> {
    match Decimal::from_str(s).or_else(|_| Decimal::from_scientific(s)) {
        Ok(d) => Some(d.normalize()),
        Err(_) => saturate(s),
    }
}

/// Clamp a well-formed number that overflowed `Decimal` to the nearest bound.
///
/// Underflow (a negative exponent) rounds to zero.
fn saturate(s: &str) -> Option<Decimal> {
    let (mantissa, exponent) = match s.split_once(|c| c == 'e' || c == 'E') {
        Some((m, e)) => (m, e.parse::<i64>().ok()?),
        None => (s, 0),
    };
    let digits = mantissa.trim_start_matches(|c| c == '-' || c == '+');
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }

    let overflowed = if exponent > 0 {
        int_part.chars().chain(frac_part.chars()).any(|c| c != '0')
    } else {
        exponent == 0 && int_part.chars().any(|c| c != '0')
    };
    if !overflowed {
        return Some(Decimal::ZERO);
    }
    Some(if mantissa.starts_with('-') { Decimal::MIN } else { Decimal::MAX })
}

/// The longest prefix of `s` shaped like `-?digits(.digits)?`
fn leading_number(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;
    if bytes.first() == Some(&b'-') {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start {
            end = frac_end;
        }
    }
    if end == digits_start {
        return "";
    }
    &s[..end]
}
