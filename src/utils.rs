//! Utility functions for fixed-point amounts and token addresses.
//!
//! Pool reserves and fees travel as 18-decimal fixed-point integers (`WAD`
//! units) so they can be combined exactly. This module converts between
//! human-readable decimal strings, `BigUint` fixed-point values and
//! approximate `f64` values, and handles the `0x`-prefixed hex addresses used
//! to identify tokens.
//!
//! # Core Functionality
//!
//! - **Fixed-point parsing**: decimal strings to `BigUint` with a fixed scale
//! - **Fixed-point display**: `BigUint` back to a trimmed decimal string
//! - **Address handling**: parsing, formatting and serde support for hex addresses

use crate::errors::UtilityError;
use crate::UtilityResult;
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

/// Number of decimals in a `WAD` fixed-point value.
pub const WAD_DECIMALS: u32 = 18;

/// `10^18`, the fixed-point unit for reserves and fees.
pub const WAD: u64 = 1_000_000_000_000_000_000;

/// `WAD` as a `BigUint`.
pub fn wad() -> BigUint {
    BigUint::from(WAD)
}

/// `10^decimals` as a `BigUint`.
pub fn scale(decimals: u32) -> BigUint {
    BigUint::from(10u32).pow(decimals)
}

/// Parse a non-negative decimal string into a fixed-point integer.
///
/// `"1.5"` with 18 decimals becomes `1_500_000_000_000_000_000`. Leading and
/// trailing whitespace is ignored; signs, exponents and digit separators are
/// not accepted.
///
/// # Arguments
///
/// * `input` - The decimal string to parse
/// * `decimals` - The number of fractional digits of the fixed-point scale
///
/// # Errors
///
/// This function will return an error if:
/// - The input is empty or contains anything but digits and a single `.`
/// - The fractional part has more digits than `decimals`
pub fn parse_fixed_point(input: &str, decimals: u32) -> UtilityResult<BigUint> {
    let trimmed = input.trim();
    let failed = |reason: &str| UtilityError::FixedPointParsingFailed {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let (integer, fraction) = match trimmed.split_once('.') {
        Some((integer, fraction)) => (integer, fraction),
        None => (trimmed, ""),
    };

    if integer.is_empty() && fraction.is_empty() {
        return Err(failed("no digits"));
    }
    if !integer.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(failed("only digits and a single '.' are allowed"));
    }
    if fraction.len() > decimals as usize {
        return Err(UtilityError::TooManyDecimals {
            input: input.to_string(),
            max: decimals,
            actual: fraction.len(),
        });
    }

    let mut digits = String::with_capacity(integer.len() + decimals as usize);
    digits.push_str(integer);
    digits.push_str(fraction);
    digits.extend(std::iter::repeat('0').take(decimals as usize - fraction.len()));

    BigUint::parse_bytes(digits.as_bytes(), 10).ok_or_else(|| failed("not a number"))
}

/// Render a fixed-point integer as a decimal string with trailing zeros trimmed.
pub fn format_fixed_point(value: &BigUint, decimals: u32) -> String {
    let unit = scale(decimals);
    let integer = value / &unit;
    let fraction = value % &unit;

    if fraction.is_zero() {
        return integer.to_string();
    }

    let fraction = format!("{:0>width$}", fraction.to_string(), width = decimals as usize);
    format!("{}.{}", integer, fraction.trim_end_matches('0'))
}

/// Approximate a fixed-point integer as `f64`.
///
/// # Errors
///
/// Returns `UtilityError::NotRepresentable` if the value overflows `f64`.
pub fn fixed_point_to_f64(value: &BigUint, decimals: u32) -> UtilityResult<f64> {
    let raw = value
        .to_f64()
        .filter(|v| v.is_finite())
        .ok_or(UtilityError::NotRepresentable)?;
    Ok(raw / 10f64.powi(decimals as i32))
}

/// Parse a hex token address, with or without the `0x` prefix.
///
/// # Errors
///
/// Returns `UtilityError::AddressParsingFailed` on invalid hex.
pub fn parse_address(input: &str) -> UtilityResult<Vec<u8>> {
    let digits = input.strip_prefix("0x").unwrap_or(input);
    hex::decode(digits).map_err(|source| UtilityError::AddressParsingFailed {
        input: input.to_string(),
        source,
    })
}

/// Format address bytes as a `0x`-prefixed lowercase hex string.
pub fn format_address(address: &[u8]) -> String {
    format!("0x{}", hex::encode(address))
}

/// Serde adapter storing address bytes as `0x` hex strings.
///
/// Use with `#[serde(with = "crate::utils::hex_address")]`.
pub mod hex_address {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(address: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_address(address))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_address(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fixed_point() {
        assert_eq!(parse_fixed_point("1", WAD_DECIMALS).unwrap(), wad());
        assert_eq!(
            parse_fixed_point("1.5", WAD_DECIMALS).unwrap(),
            BigUint::from(1_500_000_000_000_000_000u64)
        );
        assert_eq!(parse_fixed_point(" 0.003 ", 3).unwrap(), BigUint::from(3u32));
        assert_eq!(parse_fixed_point(".25", 2).unwrap(), BigUint::from(25u32));
        assert_eq!(parse_fixed_point("7.", 1).unwrap(), BigUint::from(70u32));
    }

    #[test]
    fn test_parse_fixed_point_beyond_u64() {
        let reserve = parse_fixed_point("123456789012.000000000000000001", WAD_DECIMALS).unwrap();
        assert_eq!(reserve.to_string(), "123456789012000000000000000001");
    }

    #[test]
    fn test_parse_fixed_point_rejects_bad_input() {
        assert!(matches!(
            parse_fixed_point("", 18),
            Err(UtilityError::FixedPointParsingFailed { .. })
        ));
        assert!(matches!(
            parse_fixed_point("-1", 18),
            Err(UtilityError::FixedPointParsingFailed { .. })
        ));
        assert!(matches!(
            parse_fixed_point("1.2.3", 18),
            Err(UtilityError::FixedPointParsingFailed { .. })
        ));
        assert!(matches!(
            parse_fixed_point("1_000", 18),
            Err(UtilityError::FixedPointParsingFailed { .. })
        ));
        assert!(matches!(
            parse_fixed_point("0.123", 2),
            Err(UtilityError::TooManyDecimals { max: 2, actual: 3, .. })
        ));
    }

    #[test]
    fn test_format_fixed_point() {
        assert_eq!(format_fixed_point(&wad(), WAD_DECIMALS), "1");
        assert_eq!(format_fixed_point(&BigUint::from(3_000_000_000_000_000u64), WAD_DECIMALS), "0.003");
        assert_eq!(format_fixed_point(&BigUint::from(1_250u32), 3), "1.25");
    }

    #[test]
    fn test_fixed_point_to_f64() {
        let value = parse_fixed_point("2.5", WAD_DECIMALS).unwrap();
        assert!((fixed_point_to_f64(&value, WAD_DECIMALS).unwrap() - 2.5).abs() < 1e-12);

        let huge = BigUint::from(1u32) << 2000;
        assert!(matches!(
            fixed_point_to_f64(&huge, WAD_DECIMALS),
            Err(UtilityError::NotRepresentable)
        ));
    }

    #[test]
    fn test_address_round_trip() {
        let address = parse_address("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2").unwrap();
        assert_eq!(address.len(), 20);
        assert_eq!(format_address(&address), "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
        assert_eq!(parse_address("abcd").unwrap(), vec![0xab, 0xcd]);
        assert!(matches!(
            parse_address("0xzz"),
            Err(UtilityError::AddressParsingFailed { .. })
        ));
    }
}
