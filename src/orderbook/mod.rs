//! Synthetic order book reconstruction from a pool's tick map.
//!
//! The phases run strictly in sequence, each fanning out internally:
//! plan the tick window, sample it, walk the liquidity curve, assemble the
//! ladders.

use crate::dex::{PoolReader, PoolSnapshot};
use crate::models::{Mode, OrderBook};
use ethers::types::Address;
use tracing::info;

pub mod assembler;
pub mod curve;
pub mod planner;
pub mod sampler;

pub use assembler::{AssemblyParams, assemble};
pub use curve::{CurveParams, PricedSegment, build_curve};
pub use planner::{ScanPlan, plan_scan};
pub use sampler::{TickSample, sample_ticks};

/// Per-request inputs that do not come from the pool itself.
#[derive(Debug, Clone, Copy)]
pub struct BookRequest {
    pub pool: Address,
    pub mode: Mode,
    pub base_is_token0: bool,
    pub base_price_usd: f64,
    pub quote_price_usd: f64,
    /// Upper bound on concurrent tick reads.
    pub max_in_flight: usize,
}

/// What the tick scan covered, reported alongside the book.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub range_lower: i32,
    pub range_upper: i32,
    pub ticks_sampled: usize,
    pub active_ticks: usize,
    pub degraded_ticks: usize,
}

#[derive(Debug, Clone)]
pub struct ReconstructedBook {
    pub book: OrderBook,
    pub scan: ScanSummary,
}

/// Rebuild the order book for one pool snapshot.
///
/// Only tick reads touch the chain here; their failures degrade the book
/// instead of failing it, so this never errors.
pub async fn reconstruct(
    reader: &dyn PoolReader,
    snapshot: &PoolSnapshot,
    request: &BookRequest,
) -> ReconstructedBook {
    let plan = plan_scan(
        request.base_price_usd,
        snapshot.tick_spacing,
        snapshot.current_tick,
    );
    let ticks = plan.ticks();
    info!(
        pool = ?request.pool,
        base_price_usd = request.base_price_usd,
        range_lower = plan.range_lower,
        range_upper = plan.range_upper,
        aligned_tick = plan.aligned_tick,
        ticks = ticks.len(),
        "[BOOK] scan planned"
    );

    let sample = sample_ticks(reader, request.pool, &ticks, request.max_in_flight).await;
    let active_ticks = sample.records.iter().filter(|t| t.is_active()).count();

    let segments = build_curve(
        &sample.records,
        &CurveParams {
            current_tick: snapshot.current_tick,
            spacing: plan.spacing,
            active_liquidity: snapshot.active_liquidity,
            decimals0: snapshot.decimals0,
            decimals1: snapshot.decimals1,
            base_is_token0: request.base_is_token0,
            quote_price_usd: request.quote_price_usd,
        },
    );

    let (base_reserve, quote_reserve) = if request.base_is_token0 {
        (snapshot.reserve0, snapshot.reserve1)
    } else {
        (snapshot.reserve1, snapshot.reserve0)
    };
    let book = assemble(
        &segments,
        &AssemblyParams {
            base_price_usd: request.base_price_usd,
            quote_price_usd: request.quote_price_usd,
            base_reserve,
            quote_reserve,
            num_levels: request.mode.num_levels(),
            include_diagnostics: request.mode.is_advanced(),
        },
    );

    ReconstructedBook {
        book,
        scan: ScanSummary {
            range_lower: plan.range_lower,
            range_upper: plan.range_upper,
            ticks_sampled: ticks.len(),
            active_ticks,
            degraded_ticks: sample.degraded,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dex::TickRecord;
    use crate::errors::{AppError, Result};
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// Fixed tick map; anything not in it reads as uninitialized, and
    /// `broken` ticks fail.
    struct MapReader {
        ticks: HashMap<i32, i128>,
        broken: Vec<i32>,
    }

    #[async_trait]
    impl PoolReader for MapReader {
        async fn snapshot(&self, _pool: Address) -> Result<PoolSnapshot> {
            Err(AppError::Other("unused".into()))
        }

        async fn tick(&self, _pool: Address, tick: i32) -> Result<TickRecord> {
            if self.broken.contains(&tick) {
                return Err(AppError::Other("execution reverted".into()));
            }
            Ok(match self.ticks.get(&tick) {
                Some(&net) => TickRecord {
                    tick_index: tick,
                    liquidity_gross: net.unsigned_abs(),
                    liquidity_net: net,
                    initialized: true,
                },
                None => TickRecord::uninitialized(tick),
            })
        }
    }

    fn snapshot() -> PoolSnapshot {
        PoolSnapshot {
            token0: Address::repeat_byte(0x11),
            token1: Address::repeat_byte(0x22),
            current_tick: 30,
            active_liquidity: 10u128.pow(22),
            fee: 3000,
            tick_spacing: 60,
            decimals0: 18,
            decimals1: 18,
            symbol0: "AAA".into(),
            symbol1: "BBB".into(),
            reserve0: 1_000_000.0,
            reserve1: 1_000_000.0,
        }
    }

    fn request(mode: Mode) -> BookRequest {
        BookRequest {
            pool: Address::repeat_byte(0x33),
            mode,
            base_is_token0: true,
            base_price_usd: 1.0,
            quote_price_usd: 1.0,
            max_in_flight: 8,
        }
    }

    /// Symmetric position from -600 to +600 around price ~1.
    fn reader(broken: Vec<i32>) -> MapReader {
        let mut ticks = HashMap::new();
        for t in (-600..=600).step_by(60).filter(|t| *t != 0) {
            ticks.insert(t, 0);
        }
        MapReader { ticks, broken }
    }

    #[tokio::test]
    async fn reconstructs_both_sides_around_price() {
        let out = reconstruct(&reader(vec![]), &snapshot(), &request(Mode::Simple)).await;

        assert!(!out.book.bids.is_empty());
        assert!(!out.book.asks.is_empty());
        assert!(out.book.bids.iter().all(|l| l.price_usd() < 1.0));
        assert!(out.book.asks.iter().all(|l| l.price_usd() >= 1.0));
        assert!(out.book.bids.len() <= 20 && out.book.asks.len() <= 20);
        assert!(out.book.bids.iter().all(|l| l.diagnostics().is_none()));

        // price <= 10: -99% / +100% window at spacing 60
        assert_eq!(out.scan.range_lower, 767);
        assert_eq!(out.scan.range_upper, 115);
        assert_eq!(out.scan.ticks_sampled, 767 + 115);
        assert_eq!(out.scan.active_ticks, 20);
        assert_eq!(out.scan.degraded_ticks, 0);
    }

    #[tokio::test]
    async fn advanced_mode_carries_diagnostics() {
        let out = reconstruct(&reader(vec![]), &snapshot(), &request(Mode::Advanced)).await;
        let first = &out.book.asks[0];
        let diag = first.diagnostics().unwrap();
        assert_eq!(diag.tick_upper - diag.tick_lower, 60);
        assert_eq!(diag.liquidity, 1e22);
    }

    #[tokio::test]
    async fn failed_tick_reads_are_counted() {
        let out = reconstruct(
            &reader(vec![-120, 120, 180]),
            &snapshot(),
            &request(Mode::Simple),
        )
        .await;
        assert_eq!(out.scan.degraded_ticks, 3);
        assert_eq!(out.scan.active_ticks, 17);
        assert!(!out.book.asks.is_empty());
    }
}
