//! Turns priced segments into bounded, cumulative bid/ask ladders.

use crate::models::{DiagnosticInfo, Level, OrderBook};
use crate::orderbook::curve::PricedSegment;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy)]
pub struct AssemblyParams {
    /// Price that separates bids (strictly below) from asks.
    pub base_price_usd: f64,
    pub quote_price_usd: f64,
    /// Pool balance of the base token, whole units.
    pub base_reserve: f64,
    /// Pool balance of the quote token, whole units.
    pub quote_reserve: f64,
    pub num_levels: usize,
    pub include_diagnostics: bool,
}

/// Split by price, sort, accumulate USD depth and cap each side by the
/// reserve backing it.
pub fn assemble(segments: &[PricedSegment], params: &AssemblyParams) -> OrderBook {
    let (mut bids_raw, mut asks_raw): (Vec<PricedSegment>, Vec<PricedSegment>) = segments
        .iter()
        .copied()
        .partition(|s| s.price_usd < params.base_price_usd);
    bids_raw.sort_by(|a, b| b.price_usd.total_cmp(&a.price_usd));
    asks_raw.sort_by(|a, b| a.price_usd.total_cmp(&b.price_usd));
    debug!(
        bids = bids_raw.len(),
        asks = asks_raw.len(),
        base_price_usd = params.base_price_usd,
        "[BOOK] candidates split by price"
    );

    let bids = ladder(
        &bids_raw,
        params.num_levels,
        params.quote_price_usd,
        params.quote_reserve,
        |segment, total_usd| Level::Bid {
            price_usd: segment.price_usd,
            size: segment.size,
            base_amount: segment.counter_amount,
            total_usd,
            diagnostics: diagnostics(segment, params.include_diagnostics),
        },
    );
    let asks = ladder(
        &asks_raw,
        params.num_levels,
        params.base_price_usd,
        params.base_reserve,
        |segment, total_usd| Level::Ask {
            price_usd: segment.price_usd,
            size: segment.size,
            quote_amount: segment.counter_amount,
            total_usd,
            diagnostics: diagnostics(segment, params.include_diagnostics),
        },
    );

    let book = OrderBook { bids, asks };
    info!(
        bids = book.bids.len(),
        bid_depth_usd = book.bid_depth_usd(),
        asks = book.asks.len(),
        ask_depth_usd = book.ask_depth_usd(),
        "[BOOK] ladders assembled"
    );
    book
}

/// Emit up to `num_levels` levels, stopping before cumulative size (in the
/// side's own token) would exceed `reserve`.
fn ladder(
    sorted: &[PricedSegment],
    num_levels: usize,
    unit_price_usd: f64,
    reserve: f64,
    make_level: impl Fn(&PricedSegment, f64) -> Level,
) -> Vec<Level> {
    let mut levels = Vec::with_capacity(num_levels.min(sorted.len()));
    let mut running_usd = 0.0;

    for segment in sorted.iter().take(num_levels) {
        if running_usd / unit_price_usd + segment.size > reserve {
            debug!(
                reserve,
                emitted = levels.len(),
                "[BOOK] reached pool reserve limit"
            );
            break;
        }
        running_usd += segment.size * unit_price_usd;
        levels.push(make_level(segment, running_usd));
    }
    levels
}

fn diagnostics(segment: &PricedSegment, include: bool) -> Option<DiagnosticInfo> {
    include.then(|| DiagnosticInfo {
        liquidity: segment.liquidity,
        tick_lower: segment.tick_lower,
        tick_upper: segment.tick_upper,
    })
}
