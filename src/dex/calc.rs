//! Closed-form concentrated-liquidity math in `f64`.
//!
//! Everything here mirrors the display-oriented math of the order book
//! service: prices come from `1.0001^tick` rather than the exact Q64.96
//! `TickMath`, which is accurate enough for depth visualization.

/// Base of the tick price curve, `price = TICK_BASE^tick`.
pub const TICK_BASE: f64 = 1.0001;

/// Token amounts backing a uniform-liquidity tick range, in whole units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeAmounts {
    pub amount0: f64,
    pub amount1: f64,
}

/// Raw `token1/token0` ratio at a tick (no decimal adjustment).
pub fn price_at_tick(tick: i32) -> f64 {
    TICK_BASE.powf(tick as f64)
}

/// `sqrt(1.0001^tick)`.
pub fn sqrt_price_at_tick(tick: i32) -> f64 {
    price_at_tick(tick).sqrt()
}

/// Whole-unit token1 per token0 at a tick.
pub fn token1_per_token0_at_tick(tick: i32, decimals0: u8, decimals1: u8) -> f64 {
    price_at_tick(tick) * 10_f64.powi(decimals0 as i32 - decimals1 as i32)
}

/// Number of ticks needed to move the price by the factor `ratio`
/// (e.g. `0.5` for -50%, `2.0` for +100%). Always non-negative.
pub fn ticks_for_ratio(ratio: f64) -> f64 {
    (ratio.ln() / TICK_BASE.ln()).abs()
}

/// Amounts of token0 and token1 held by liquidity `liquidity` spread evenly
/// over `[tick_lower, tick_lower + spacing)`.
///
/// ```text
/// amount0 = L * (1/sqrtLower - 1/sqrtUpper) / 10^decimals0
/// amount1 = L * (sqrtUpper - sqrtLower)     / 10^decimals1
/// ```
pub fn amounts_for_range(
    tick_lower: i32,
    spacing: i32,
    liquidity: f64,
    decimals0: u8,
    decimals1: u8,
) -> RangeAmounts {
    let sqrt_lower = sqrt_price_at_tick(tick_lower);
    let sqrt_upper = sqrt_price_at_tick(tick_lower + spacing);

    let amount0 = liquidity * (1.0 / sqrt_lower - 1.0 / sqrt_upper);
    let amount1 = liquidity * (sqrt_upper - sqrt_lower);

    RangeAmounts {
        amount0: amount0 / 10_f64.powi(decimals0 as i32),
        amount1: amount1 / 10_f64.powi(decimals1 as i32),
    }
}
