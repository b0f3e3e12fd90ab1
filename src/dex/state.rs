use ethers::types::Address;

/// Immutable snapshot of a Uniswap V3 pool taken once at the start of a
/// request: everything the book reconstruction needs besides the tick map.
#[derive(Clone, Debug)]
pub struct PoolSnapshot {
    pub token0: Address,
    pub token1: Address,
    /// Current tick index (Uniswap V3 `slot0.tick`).
    pub current_tick: i32,
    /// Current in-range liquidity L (Uniswap V3 `liquidity()`), raw uint128 value.
    pub active_liquidity: u128,
    /// Fee tier in hundredths of a basis point (e.g. 3000 = 0.30%).
    pub fee: u32,
    pub tick_spacing: i32,
    pub decimals0: u8,
    pub decimals1: u8,
    pub symbol0: String,
    pub symbol1: String,
    /// Pool balance of token0, scaled by `decimals0`.
    pub reserve0: f64,
    /// Pool balance of token1, scaled by `decimals1`.
    pub reserve1: f64,
}

/// One entry of the pool's tick map (`ticks(int24)`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickRecord {
    pub tick_index: i32,
    pub liquidity_gross: u128,
    pub liquidity_net: i128,
    pub initialized: bool,
}

impl TickRecord {
    /// Placeholder used when a tick read fails.
    pub fn uninitialized(tick_index: i32) -> Self {
        Self {
            tick_index,
            ..Self::default()
        }
    }

    /// A tick takes part in the curve walk when it is flagged initialized or
    /// still references liquidity.
    pub fn is_active(&self) -> bool {
        self.initialized || self.liquidity_gross > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uninitialized_tick_is_inactive() {
        let t = TickRecord::uninitialized(-60);
        assert_eq!(t.tick_index, -60);
        assert!(!t.is_active());
    }

    #[test]
    fn gross_liquidity_alone_marks_tick_active() {
        let t = TickRecord {
            tick_index: 120,
            liquidity_gross: 5,
            liquidity_net: 0,
            initialized: false,
        };
        assert!(t.is_active());
    }
}
