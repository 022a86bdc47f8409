//! Parsing of subgraph decimal strings and address normalization.
//!
//! The subgraph reports every numeric field as a decimal string. The engine
//! works in `f64`; anything that fails to parse or is not finite becomes `0.0`.

use alloy::primitives::{hex, Address};

// ============================================
// Hex / Address
// ============================================

/// Encode bytes as a lowercase hex string with 0x prefix.
pub fn hex_encode(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Lowercase 0x-prefixed form of an address.
///
/// Valid 20-byte addresses are re-encoded (dropping any checksum casing).
/// Anything else is trimmed and lowercased as-is.
pub fn normalize_address(address: &str) -> String {
    let trimmed = address.trim();
    match trimmed.parse::<Address>() {
        Ok(parsed) => hex_encode(parsed.as_slice()),
        Err(_) => trimmed.to_lowercase(),
    }
}

// ============================================
// Decimal String Conversions
// ============================================

/// Replace NaN and infinities with `0.0`.
#[inline]
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Parse a decimal string to f64, or `0.0` if it is empty, malformed or not finite.
///
/// # Example
/// ```ignore
/// assert_eq!(parse_decimal("1234.5"), 1234.5);
/// assert_eq!(parse_decimal(""), 0.0);
/// ```
pub fn parse_decimal(value: &str) -> f64 {
    value
        .trim()
        .parse::<f64>()
        .map(finite_or_zero)
        .unwrap_or(0.0)
}

/// Parse an optional decimal string, `None` parses as `0.0`.
pub fn parse_decimal_opt(value: Option<&str>) -> f64 {
    value.map(parse_decimal).unwrap_or(0.0)
}

/// Parse an integer field such as a fee tier.
///
/// Leading integer digits are accepted (`"3000.0"` parses as 3000).
/// Negative, malformed or out-of-range values parse as 0.
pub fn parse_u32(value: &str) -> u32 {
    let trimmed = value.trim();
    let digits = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .map_or(trimmed, |end| &trimmed[..end]);
    digits.parse().unwrap_or(0)
}

/// Parse token decimals; values outside `u8` parse as 0.
pub fn parse_u8(value: &str) -> u8 {
    u8::try_from(parse_u32(value)).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("1234.5"), 1234.5);
        assert_eq!(parse_decimal(" 42 "), 42.0);
        assert_eq!(parse_decimal("1e3"), 1000.0);
        assert_eq!(parse_decimal("-7.25"), -7.25);
    }

    #[test]
    fn test_parse_decimal_normalizes_garbage_to_zero() {
        assert_eq!(parse_decimal(""), 0.0);
        assert_eq!(parse_decimal("abc"), 0.0);
        assert_eq!(parse_decimal("NaN"), 0.0);
        assert_eq!(parse_decimal("inf"), 0.0);
        assert_eq!(parse_decimal_opt(None), 0.0);
    }

    #[test]
    fn test_parse_decimal_large_integers() {
        let sqrt_price = parse_decimal("79228162514264337593543950336");
        assert!((sqrt_price - 7.922816251426434e28).abs() / sqrt_price < 1e-12);
    }

    #[test]
    fn test_parse_integers() {
        assert_eq!(parse_u32("3000"), 3000);
        assert_eq!(parse_u32("3000.0"), 3000);
        assert_eq!(parse_u32("-5"), 0);
        assert_eq!(parse_u32(""), 0);
        assert_eq!(parse_u8("18"), 18);
        assert_eq!(parse_u8("300"), 0);
    }

    #[test]
    fn test_normalize_address() {
        assert_eq!(
            normalize_address("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
            "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"
        );
        assert_eq!(normalize_address(" 0xABC "), "0xabc");
    }
}
