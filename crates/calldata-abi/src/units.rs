//! Decimal amount conversion
//!
//! Human amounts such as `"2000000000"` ether are scaled to integer base
//! units with exact digit arithmetic. Floating point is never involved.

use calldata_primitives::U256;

use crate::AbiError;

/// Decimals of the ether unit
pub const ETHER_DECIMALS: u32 = 18;

/// Decimals of the gwei unit
pub const GWEI_DECIMALS: u32 = 9;

/// Largest power of ten that fits in 256 bits
pub const MAX_DECIMALS: u32 = 77;

/// Decimals for a named unit: `wei`, `gwei`, `ether`/`eth`, or `units:N`
pub fn unit_decimals(unit: &str) -> Result<u32, AbiError> {
    match unit.trim().to_ascii_lowercase().as_str() {
        "wei" => Ok(0),
        "gwei" => Ok(GWEI_DECIMALS),
        "ether" | "eth" => Ok(ETHER_DECIMALS),
        other => {
            let decimals = other
                .strip_prefix("units:")
                .and_then(|n| n.parse::<u32>().ok())
                .ok_or_else(|| AbiError::InvalidAmount(format!("unknown unit '{}'", unit)))?;
            check_decimals(decimals)?;
            Ok(decimals)
        }
    }
}

/// Reject decimal counts whose scale factor cannot fit in 256 bits
pub fn check_decimals(decimals: u32) -> Result<(), AbiError> {
    if decimals > MAX_DECIMALS {
        return Err(AbiError::InvalidAmount(format!(
            "{} decimals exceeds the maximum of {}",
            decimals, MAX_DECIMALS
        )));
    }
    Ok(())
}

/// Scale a decimal amount by `10^decimals`
///
/// Fractional digits beyond `decimals` are accepted only when they are all
/// zero; anything else would silently lose value.
pub fn parse_units(amount: &str, decimals: u32) -> Result<U256, AbiError> {
    check_decimals(decimals)?;
    let cleaned: String = amount.trim().chars().filter(|c| *c != '_').collect();
    if cleaned.starts_with('-') {
        return Err(AbiError::InvalidAmount(format!("negative amount '{}'", amount)));
    }
    let cleaned = cleaned.strip_prefix('+').unwrap_or(&cleaned);

    let (whole, frac) = match cleaned.split_once('.') {
        Some((w, f)) => (w, f),
        None => (cleaned, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(AbiError::InvalidAmount(format!("empty amount '{}'", amount)));
    }
    if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
        return Err(AbiError::InvalidAmount(format!("'{}' is not a decimal number", amount)));
    }

    let decimals_len = decimals as usize;
    let (kept, dropped) = frac.split_at(frac.len().min(decimals_len));
    if dropped.chars().any(|c| c != '0') {
        return Err(AbiError::InvalidAmount(format!(
            "'{}' has more than {} decimal places",
            amount, decimals
        )));
    }

    let mut digits = String::with_capacity(whole.len() + decimals_len);
    digits.push_str(whole);
    digits.push_str(kept);
    digits.extend(std::iter::repeat('0').take(decimals_len - kept.len()));

    parse_decimal(&digits).map_err(|_| {
        AbiError::IntegerOverflow(format!("{} scaled by 10^{} exceeds 256 bits", amount, decimals))
    })
}

/// Scale an ether amount to wei
pub fn parse_ether(amount: &str) -> Result<U256, AbiError> {
    parse_units(amount, ETHER_DECIMALS)
}

/// Render base units as a decimal amount, trimming trailing zeros
pub fn format_units(value: U256, decimals: u32) -> Result<String, AbiError> {
    check_decimals(decimals)?;
    let digits = value.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return Ok(digits);
    }

    let padded = format!("{:0>width$}", digits, width = decimals + 1);
    let (whole, frac) = padded.split_at(padded.len() - decimals);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        Ok(whole.to_string())
    } else {
        Ok(format!("{}.{}", whole, frac))
    }
}

/// Parse a string of ASCII digits into a U256 with overflow checks
pub(crate) fn parse_decimal(digits: &str) -> Result<U256, AbiError> {
    if digits.is_empty() {
        return Err(AbiError::InvalidAmount("empty number".to_string()));
    }
    let ten = U256::from(10u8);
    digits.chars().try_fold(U256::zero(), |acc, c| {
        let digit = c
            .to_digit(10)
            .ok_or_else(|| AbiError::InvalidAmount(format!("'{}' is not a decimal digit", c)))?;
        acc.checked_mul(ten)
            .and_then(|v| v.checked_add(U256::from(digit)))
            .ok_or_else(|| AbiError::IntegerOverflow(format!("{} exceeds 256 bits", digits)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ether_two_billion() {
        let wei = parse_ether("2000000000").unwrap();
        assert_eq!(wei, U256::from_dec_str("2000000000000000000000000000").unwrap());
        assert_eq!(format!("{:x}", wei), "6765c793fa10079d0000000");
    }

    #[test]
    fn test_parse_units_fractions() {
        assert_eq!(parse_ether("1").unwrap(), U256::from(1_000_000_000_000_000_000u64));
        assert_eq!(parse_ether("0.5").unwrap(), U256::from(500_000_000_000_000_000u64));
        assert_eq!(parse_ether(".1").unwrap(), U256::from(100_000_000_000_000_000u64));
        assert_eq!(parse_ether("0").unwrap(), U256::zero());
        assert_eq!(parse_units("12.34", 6).unwrap(), U256::from(12_340_000u64));
        assert_eq!(parse_units("1_000", 0).unwrap(), U256::from(1000u64));
    }

    #[test]
    fn test_parse_units_extra_zero_decimals_ok() {
        assert_eq!(parse_units("1.500", 1).unwrap(), U256::from(15u64));
        assert!(parse_units("1.55", 1).is_err());
    }

    #[test]
    fn test_parse_units_rejects_garbage() {
        for bad in ["", ".", "-1", "1.2.3", "1e18", "abc", "0x10"] {
            assert!(parse_units(bad, 18).is_err(), "{bad} should fail");
        }
    }

    #[test]
    fn test_parse_units_overflow() {
        let err = parse_units("1000000000000000000000000000000000000000000000000000000000000", 18).unwrap_err();
        assert!(matches!(err, AbiError::IntegerOverflow(_)));
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(U256::from(1_500_000_000_000_000_000u64), 18).unwrap(), "1.5");
        assert_eq!(format_units(U256::from(1u64), 18).unwrap(), "0.000000000000000001");
        assert_eq!(format_units(U256::zero(), 18).unwrap(), "0");
        assert_eq!(format_units(U256::from(42u64), 0).unwrap(), "42");
        assert_eq!(format_units(parse_ether("2000000000").unwrap(), 18).unwrap(), "2000000000");
        assert_eq!(format_units(U256::MAX, MAX_DECIMALS).unwrap().len(), 79);
    }

    #[test]
    fn test_decimals_capped() {
        assert!(check_decimals(MAX_DECIMALS).is_ok());
        assert!(matches!(parse_units("1", 78), Err(AbiError::InvalidAmount(_))));
        assert!(matches!(parse_units("1", 200_000_000), Err(AbiError::InvalidAmount(_))));
        assert!(parse_units("0", u32::MAX).is_err());
        assert!(matches!(format_units(U256::one(), 200_000_000), Err(AbiError::InvalidAmount(_))));
        assert!(format_units(U256::one(), 70_000).is_err());
        assert_eq!(parse_units("1", MAX_DECIMALS).unwrap(), U256::exp10(77));
    }

    #[test]
    fn test_unit_decimals() {
        assert_eq!(unit_decimals("wei").unwrap(), 0);
        assert_eq!(unit_decimals("GWEI").unwrap(), 9);
        assert_eq!(unit_decimals("ether").unwrap(), 18);
        assert_eq!(unit_decimals("units:6").unwrap(), 6);
        assert!(unit_decimals("units:78").is_err());
        assert!(unit_decimals("finney").is_err());
    }
}
