//! Miscellaneous helper utilities.

use bigdecimal::BigDecimal;
use ethers::types::U256;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize `tracing` subscriber with env-based filter.
///
/// If `RUST_LOG` is not set, defaults to `info` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Scale a raw integer token amount (e.g. an ERC-20 `balanceOf`) by its
/// decimals into a floating display amount.
pub fn token_units_to_f64(raw: U256, decimals: u8) -> f64 {
    // U256 -> decimal string -> BigInt keeps all 256 bits before scaling
    let digits = BigInt::parse_bytes(raw.to_string().as_bytes(), 10).unwrap_or_default();
    BigDecimal::new(digits, decimals as i64)
        .to_f64()
        .unwrap_or(0.0)
}

const SUBSCRIPT_DIGITS: [char; 10] = ['₀', '₁', '₂', '₃', '₄', '₅', '₆', '₇', '₈', '₉'];

/// Render a USD price for display.
///
/// Prices at or above `0.0001` are printed with 8 decimals and trailing zeros
/// trimmed. Smaller prices collapse their run of leading fractional zeros into
/// a subscript count followed by 4 significant digits, e.g. `0.00001234`
/// becomes `0.0₄1234`.
pub fn format_small_price(price: f64) -> String {
    if price == 0.0 {
        return "0.00000000".to_string();
    }
    if price >= 0.0001 {
        return trim_fixed(&format!("{:.8}", price));
    }
    if price < 0.0 || !price.is_finite() {
        return format!("{:.8}", price);
    }

    // `{:e}` yields the shortest round-trip mantissa, e.g. "1.234e-5"
    let sci = format!("{:e}", price);
    let Some((mantissa, exponent)) = sci.split_once('e') else {
        return format!("{:.8}", price);
    };
    let (Ok(mantissa), Ok(exponent)) = (mantissa.parse::<f64>(), exponent.parse::<i32>()) else {
        return format!("{:.8}", price);
    };

    let digits: String = format!("{:.4}", mantissa)
        .replace('.', "")
        .trim_start_matches('0')
        .chars()
        .take(4)
        .collect();
    let zeros = exponent.unsigned_abs() - 1;
    let subscript: String = zeros
        .to_string()
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| SUBSCRIPT_DIGITS[d as usize])
        .collect();

    format!("0.0{}{}", subscript, digits)
}

/// Exponential notation with two fractional digits and an explicit exponent
/// sign, e.g. `1.23e+18`.
pub fn format_exponential(value: f64) -> String {
    let sci = format!("{:.2e}", value);
    match sci.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => sci,
    }
}

fn trim_fixed(fixed: &str) -> String {
    if !fixed.contains('.') {
        return fixed.to_string();
    }
    fixed
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_price_keeps_eight_decimals() {
        assert_eq!(format_small_price(0.0), "0.00000000");
    }

    #[test]
    fn regular_prices_trim_trailing_zeros() {
        assert_eq!(format_small_price(1234.5), "1234.5");
        assert_eq!(format_small_price(100.0), "100");
        assert_eq!(format_small_price(0.0001), "0.0001");
        assert_eq!(format_small_price(3800.12345678), "3800.12345678");
    }

    #[test]
    fn tiny_prices_use_subscript_zero_count() {
        assert_eq!(format_small_price(0.00001234), "0.0₄1234");
        assert_eq!(format_small_price(0.0000012345), "0.0₅1234");
        assert_eq!(format_small_price(0.00000000000005), "0.0₁₃5000");
    }

    #[test]
    fn exponential_has_signed_exponent() {
        assert_eq!(format_exponential(1.234e18), "1.23e+18");
        assert_eq!(format_exponential(5.0), "5.00e+0");
        assert_eq!(format_exponential(0.00125), "1.25e-3");
    }

    #[test]
    fn token_units_scale_by_decimals() {
        let raw = U256::from(1_500_000u64);
        assert!((token_units_to_f64(raw, 6) - 1.5).abs() < 1e-12);

        let wei = U256::from_dec_str("2500000000000000000").unwrap();
        assert!((token_units_to_f64(wei, 18) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn token_units_zero_is_zero() {
        assert_eq!(token_units_to_f64(U256::zero(), 18), 0.0);
    }
}
