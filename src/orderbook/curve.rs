//! Liquidity curve reconstruction.
//!
//! Starting from the pool's in-range liquidity, the sampled tick map is walked
//! outwards in both directions. Crossing a tick boundary upwards adds its
//! `liquidityNet`, so walking down undoes that addition and walking up applies
//! it. The walk stops as soon as the running value turns negative: the sampled
//! window no longer agrees with the pool's accounting and anything further out
//! would be a guess.

use crate::dex::{TickRecord, amounts_for_range, token1_per_token0_at_tick};
use crate::models::Side;
use tracing::{debug, info};

/// Levels smaller than this (in their own size unit) are dropped.
pub const DUST_SIZE: f64 = 0.00001;

/// A tick range with uniform reconstructed liquidity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: f64,
}

/// A segment converted into a USD price and token sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricedSegment {
    /// Side implied by the tick walk; the assembler re-splits by price.
    pub side: Side,
    pub price_usd: f64,
    /// Quote amount for bid-side segments, base amount for ask-side ones.
    pub size: f64,
    /// The other token's amount.
    pub counter_amount: f64,
    pub liquidity: f64,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

/// Pool facts and prices the curve needs.
#[derive(Debug, Clone, Copy)]
pub struct CurveParams {
    pub current_tick: i32,
    pub spacing: i32,
    pub active_liquidity: u128,
    pub decimals0: u8,
    pub decimals1: u8,
    pub base_is_token0: bool,
    pub quote_price_usd: f64,
}

/// Walk the tick map and price every surviving segment.
pub fn build_curve(ticks: &[TickRecord], params: &CurveParams) -> Vec<PricedSegment> {
    let mut active: Vec<TickRecord> = ticks.iter().copied().filter(TickRecord::is_active).collect();
    active.sort_by_key(|t| t.tick_index);

    let split = active.partition_point(|t| t.tick_index < params.current_tick);
    let (below, above) = active.split_at(split);
    info!(
        active = active.len(),
        below = below.len(),
        above = above.len(),
        "[CURVE] active ticks split around current tick"
    );

    let down = walk_down(below, params.active_liquidity, params.spacing);
    let up = walk_up(above, params.active_liquidity, params.spacing);

    let (below_side, above_side) = if params.base_is_token0 {
        (Side::Bid, Side::Ask)
    } else {
        (Side::Ask, Side::Bid)
    };

    let priced: Vec<PricedSegment> = down
        .iter()
        .map(|s| (s, below_side))
        .chain(up.iter().map(|s| (s, above_side)))
        .filter_map(|(segment, side)| price_segment(segment, side, params))
        .collect();
    debug!(
        walked_down = down.len(),
        walked_up = up.len(),
        priced = priced.len(),
        "[CURVE] segments priced"
    );
    priced
}

/// Walk `below` (sorted ascending) from the tick nearest the price outwards.
///
/// Before each tick except the nearest, the `liquidity_net` of the previously
/// visited tick is subtracted.
pub fn walk_down(below: &[TickRecord], active_liquidity: u128, spacing: i32) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = i128::try_from(active_liquidity).unwrap_or(i128::MAX);

    for (i, tick) in below.iter().enumerate().rev() {
        if let Some(boundary) = below.get(i + 1) {
            match current.checked_sub(boundary.liquidity_net) {
                Some(next) => current = next,
                None => break,
            }
        }
        if current < 0 {
            debug!(tick = tick.tick_index, "[CURVE] liquidity went negative walking down, stopping");
            break;
        }
        if current == 0 {
            continue;
        }
        segments.push(Segment {
            tick_lower: tick.tick_index,
            tick_upper: tick.tick_index + spacing,
            liquidity: current as f64,
        });
    }
    segments
}

/// Walk `above` (sorted ascending) from the tick nearest the price outwards.
///
/// Before each tick except the nearest, that tick's own `liquidity_net` is
/// added.
pub fn walk_up(above: &[TickRecord], active_liquidity: u128, spacing: i32) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = i128::try_from(active_liquidity).unwrap_or(i128::MAX);

    for (i, tick) in above.iter().enumerate() {
        if i > 0 {
            match current.checked_add(tick.liquidity_net) {
                Some(next) => current = next,
                None => break,
            }
        }
        if current < 0 {
            debug!(tick = tick.tick_index, "[CURVE] liquidity went negative walking up, stopping");
            break;
        }
        if current == 0 {
            continue;
        }
        segments.push(Segment {
            tick_lower: tick.tick_index,
            tick_upper: tick.tick_index + spacing,
            liquidity: current as f64,
        });
    }
    segments
}

/// Bids are priced at the segment's lower boundary, asks at its upper one.
fn price_segment(segment: &Segment, side: Side, params: &CurveParams) -> Option<PricedSegment> {
    let amounts = amounts_for_range(
        segment.tick_lower,
        segment.tick_upper - segment.tick_lower,
        segment.liquidity,
        params.decimals0,
        params.decimals1,
    );

    let boundary = match side {
        Side::Bid => segment.tick_lower,
        Side::Ask => segment.tick_upper,
    };
    let token1_per_token0 = token1_per_token0_at_tick(boundary, params.decimals0, params.decimals1);
    let pair_price = if params.base_is_token0 {
        token1_per_token0
    } else {
        1.0 / token1_per_token0
    };
    let price_usd = pair_price * params.quote_price_usd;

    let (base_amount, quote_amount) = if params.base_is_token0 {
        (amounts.amount0, amounts.amount1)
    } else {
        (amounts.amount1, amounts.amount0)
    };
    let (size, counter_amount) = match side {
        Side::Bid => (quote_amount, base_amount),
        Side::Ask => (base_amount, quote_amount),
    };

    if size <= DUST_SIZE || price_usd <= 0.0 || !price_usd.is_finite() {
        return None;
    }
    Some(PricedSegment {
        side,
        price_usd,
        size,
        counter_amount,
        liquidity: segment.liquidity,
        tick_lower: segment.tick_lower,
        tick_upper: segment.tick_upper,
    })
}
