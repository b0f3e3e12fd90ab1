//! Scan window selection around the current tick.

use crate::dex::calc::ticks_for_ratio;
use uniswap_v3_math::tick_math::{MAX_TICK, MIN_TICK};

/// Hard cap on spacing-steps sampled on either side of the current tick.
pub const MAX_TICK_LEVELS: i32 = 5000;

/// Tick window to sample, expressed in spacing-steps around the aligned tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanPlan {
    /// Steps below the aligned tick.
    pub range_lower: i32,
    /// Steps above the aligned tick.
    pub range_upper: i32,
    /// `floor(current_tick / spacing) * spacing`.
    pub aligned_tick: i32,
    pub spacing: i32,
}

impl ScanPlan {
    /// Every tick to read: `aligned + i * spacing` for `i` in
    /// `[-range_lower, range_upper]` except `0`, restricted to valid ticks.
    pub fn ticks(&self) -> Vec<i32> {
        (-self.range_lower..=self.range_upper)
            .filter(|&i| i != 0)
            .filter_map(|i| i.checked_mul(self.spacing)?.checked_add(self.aligned_tick))
            .filter(|tick| (MIN_TICK..=MAX_TICK).contains(tick))
            .collect()
    }
}

/// Choose how far to scan from the base token's USD price.
///
/// * above $1000: ±50%
/// * $10 – $1000: -20% / +100%
/// * $10 and below: -99% / +100%
pub fn plan_scan(base_price_usd: f64, tick_spacing: i32, current_tick: i32) -> ScanPlan {
    let spacing = tick_spacing.max(1);
    let steps = |ratio: f64| -> i32 {
        let steps = (ticks_for_ratio(ratio) / spacing as f64).floor() as i32;
        steps.min(MAX_TICK_LEVELS)
    };

    let (range_lower, range_upper) = if base_price_usd > 1000.0 {
        (steps(0.5), steps(0.5))
    } else if base_price_usd > 10.0 {
        (steps(0.8), steps(2.0))
    } else {
        (steps(0.01), steps(2.0))
    };

    ScanPlan {
        range_lower,
        range_upper,
        aligned_tick: align_tick(current_tick, spacing),
        spacing,
    }
}

/// Round a tick down to the nearest multiple of `spacing` (towards -inf).
pub fn align_tick(tick: i32, spacing: i32) -> i32 {
    tick.div_euclid(spacing) * spacing
}
