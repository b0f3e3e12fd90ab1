//! Concurrent tick-map sampling.

use crate::dex::{PoolReader, TickRecord};
use ethers::types::Address;
use futures::{StreamExt, stream};
use tracing::{debug, info, warn};

/// Result of reading every planned tick.
#[derive(Debug, Clone, Default)]
pub struct TickSample {
    /// One record per requested tick, in request order.
    pub records: Vec<TickRecord>,
    /// Reads that failed and were replaced by an uninitialized record.
    pub degraded: usize,
}

/// Read `ticks` from `pool` with at most `max_in_flight` concurrent calls.
///
/// A failed read never aborts the scan; the tick is reported as empty and
/// counted in [`TickSample::degraded`].
pub async fn sample_ticks(
    reader: &dyn PoolReader,
    pool: Address,
    ticks: &[i32],
    max_in_flight: usize,
) -> TickSample {
    let results: Vec<_> = stream::iter(ticks.iter().copied())
        .map(|tick| async move { (tick, reader.tick(pool, tick).await) })
        .buffered(max_in_flight.max(1))
        .collect()
        .await;

    let mut sample = TickSample {
        records: Vec::with_capacity(results.len()),
        degraded: 0,
    };
    for (tick, result) in results {
        match result {
            Ok(record) => sample.records.push(record),
            Err(e) => {
                debug!(tick, error = %e, "[SCAN] tick read failed, treating as empty");
                sample.degraded += 1;
                sample.records.push(TickRecord::uninitialized(tick));
            }
        }
    }

    let initialized = sample.records.iter().filter(|t| t.initialized).count();
    let with_liquidity = sample
        .records
        .iter()
        .filter(|t| t.liquidity_gross > 0)
        .count();
    info!(
        checked = sample.records.len(),
        initialized,
        with_liquidity,
        degraded = sample.degraded,
        "[SCAN] tick scan finished"
    );
    if sample.degraded > 0 {
        warn!(
            degraded = sample.degraded,
            "[SCAN] some tick reads failed, book may be incomplete"
        );
    }
    sample
}
