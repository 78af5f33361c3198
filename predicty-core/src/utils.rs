//! # Utility Functions
//!
//! Conversions between scaled integers and human-readable decimals, and
//! timestamp formatting.

use crate::{
    error::Result,
    market::{Amount, Price, Timestamp},
    LedgerError,
};

/// Render a scaled amount with `decimals` fractional digits, trailing zeros trimmed.
pub fn format_amount(amount: Amount, decimals: u32) -> String {
    let scale = 10u128.pow(decimals);
    let whole = amount / scale;
    let fraction = amount % scale;
    if fraction == 0 {
        return whole.to_string();
    }
    let digits = format!("{fraction:0width$}", width = decimals as usize);
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

/// Parse a decimal string such as `"1.98"` into a scaled amount.
pub fn parse_amount(input: &str, decimals: u32) -> Result<Amount> {
    let invalid = || LedgerError::Config(format!("invalid amount: {input}"));
    let (whole, fraction) = split_decimal(input.trim(), decimals).ok_or_else(invalid)?;

    let whole: Amount = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let fraction: Amount = if fraction.is_empty() {
        0
    } else {
        let padded = format!("{fraction:0<width$}", width = decimals as usize);
        padded.parse().map_err(|_| invalid())?
    };

    whole
        .checked_mul(10u128.pow(decimals))
        .and_then(|scaled| scaled.checked_add(fraction))
        .ok_or(LedgerError::ArithmeticOverflow("parsed amount"))
}

/// Render a scaled price with `decimals` fractional digits.
pub fn format_price(price: Price, decimals: u32) -> String {
    let sign = if price < 0 { "-" } else { "" };
    format!(
        "{sign}{}",
        format_amount(u128::from(price.unsigned_abs()), decimals)
    )
}

/// Parse a positive decimal price such as `"2000.5"`.
pub fn parse_price(input: &str, decimals: u32) -> Result<Price> {
    let scaled = parse_amount(input, decimals)?;
    Price::try_from(scaled).map_err(|_| LedgerError::ArithmeticOverflow("parsed price"))
}

fn split_decimal(input: &str, decimals: u32) -> Option<(&str, &str)> {
    if input.is_empty() || input.starts_with('-') || input.starts_with('+') {
        return None;
    }
    let (whole, fraction) = input.split_once('.').unwrap_or((input, ""));
    let digits_only = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !digits_only(whole) || !digits_only(fraction) || fraction.len() > decimals as usize {
        return None;
    }
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    Some((whole, fraction))
}

/// Format timestamp as human-readable string
pub fn format_timestamp(timestamp: Timestamp) -> String {
    use chrono::DateTime;
    let dt = DateTime::from_timestamp(timestamp as i64, 0).unwrap_or_default();
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Current wall-clock time as a unix timestamp
pub fn now_timestamp() -> Timestamp {
    chrono::Utc::now().timestamp().max(0) as Timestamp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(1_980_000_000_000_000_000, 18), "1.98");
        assert_eq!(format_amount(2_000_000_000_000_000_000, 18), "2");
        assert_eq!(format_amount(9_000_000_000_000_000, 18), "0.009");
        assert_eq!(format_amount(1, 18), "0.000000000000000001");
        assert_eq!(format_amount(42, 0), "42");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1.98", 18).unwrap(), 1_980_000_000_000_000_000);
        assert_eq!(parse_amount("2", 18).unwrap(), 2_000_000_000_000_000_000);
        assert_eq!(parse_amount(".5", 2).unwrap(), 50);
        assert_eq!(parse_amount("3.", 2).unwrap(), 300);
        assert!(parse_amount("", 18).is_err());
        assert!(parse_amount("-1", 18).is_err());
        assert!(parse_amount("1.2.3", 18).is_err());
        assert!(parse_amount("0.001", 2).is_err());
        assert!(parse_amount("abc", 18).is_err());
    }

    #[test]
    fn test_price_conversion() {
        assert_eq!(parse_price("2000", 8).unwrap(), 2_000_00000000);
        assert_eq!(parse_price("1999.5", 8).unwrap(), 1_999_50000000);
        assert_eq!(format_price(2_010_00000000, 8), "2010");
        assert_eq!(format_price(-150000000, 8), "-1.5");
        assert!(parse_price("99999999999999999999", 8).is_err());
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(1_735_689_600), "2025-01-01 00:00:00 UTC");
        assert!(now_timestamp() > 1_735_689_600);
    }
}
