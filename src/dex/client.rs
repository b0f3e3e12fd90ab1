use crate::dex::PoolReader;
use crate::dex::state::{PoolSnapshot, TickRecord};
use crate::errors::{AppError, Result};
use crate::models::Chain;
use crate::utils::token_units_to_f64;
use async_trait::async_trait;
use ethers::{
    contract::abigen,
    providers::{Http, Provider},
    types::Address,
};
use std::sync::Arc;
use tracing::{debug, info};

abigen!(
    UniswapV3Pool,
    r#"[
        function token0() view returns (address)
        function token1() view returns (address)
        function slot0() view returns (uint160 sqrtPriceX96, int24 tick, uint16 observationIndex, uint16 observationCardinality, uint16 observationCardinalityNext, uint8 feeProtocol, bool unlocked)
        function liquidity() view returns (uint128)
        function fee() view returns (uint24)
        function tickSpacing() view returns (int24)
        function ticks(int24 tick) view returns (uint128 liquidityGross, int128 liquidityNet, uint256 feeGrowthOutside0X128, uint256 feeGrowthOutside1X128, int56 tickCumulativeOutside, uint160 secondsPerLiquidityOutsideX128, uint32 secondsOutside, bool initialized)
    ]"#,
);

abigen!(
    Erc20,
    r#"[
        function symbol() view returns (string)
        function decimals() view returns (uint8)
        function balanceOf(address account) view returns (uint256)
    ]"#,
);

/// JSON-RPC backed reader for Uniswap V3 pools on a single chain.
#[derive(Clone)]
pub struct Dex {
    chain: Chain,
    provider: Arc<Provider<Http>>,
}

impl Dex {
    pub fn new(chain: Chain, rpc_url: &str) -> Result<Self> {
        let provider = Arc::new(Provider::<Http>::try_from(rpc_url)?);
        Ok(Self { chain, provider })
    }

    pub fn chain(&self) -> Chain {
        self.chain
    }

    fn pool(&self, pool: Address) -> UniswapV3Pool<Provider<Http>> {
        UniswapV3Pool::new(pool, self.provider.clone())
    }
}

#[async_trait]
impl PoolReader for Dex {
    async fn snapshot(&self, pool: Address) -> Result<PoolSnapshot> {
        let contract = self.pool(pool);

        let token0_call = contract.token_0();
        let token1_call = contract.token_1();
        let slot0_call = contract.slot_0();
        let liquidity_call = contract.liquidity();
        let fee_call = contract.fee();
        let spacing_call = contract.tick_spacing();

        let (token0, token1, slot0, active_liquidity, fee, tick_spacing) = futures::try_join!(
            token0_call.call(),
            token1_call.call(),
            slot0_call.call(),
            liquidity_call.call(),
            fee_call.call(),
            spacing_call.call(),
        )
        .map_err(|e| AppError::InvalidPool {
            chain: self.chain.to_string(),
            details: e.to_string(),
        })?;
        let (_sqrt_price_x96, current_tick, _, _, _, _fee_protocol, _unlocked) = slot0;

        let erc0 = Erc20::new(token0, self.provider.clone());
        let erc1 = Erc20::new(token1, self.provider.clone());
        let symbol0_call = erc0.symbol();
        let symbol1_call = erc1.symbol();
        let decimals0_call = erc0.decimals();
        let decimals1_call = erc1.decimals();
        let balance0_call = erc0.balance_of(pool);
        let balance1_call = erc1.balance_of(pool);

        let (symbol0, symbol1, decimals0, decimals1, balance0, balance1) = futures::try_join!(
            symbol0_call.call(),
            symbol1_call.call(),
            decimals0_call.call(),
            decimals1_call.call(),
            balance0_call.call(),
            balance1_call.call(),
        )?;

        let snapshot = PoolSnapshot {
            token0,
            token1,
            current_tick,
            active_liquidity,
            fee,
            tick_spacing,
            decimals0,
            decimals1,
            reserve0: token_units_to_f64(balance0, decimals0),
            reserve1: token_units_to_f64(balance1, decimals1),
            symbol0,
            symbol1,
        };
        info!(
            chain = %self.chain,
            pair = %format!("{}/{}", snapshot.symbol0, snapshot.symbol1),
            current_tick,
            active_liquidity,
            fee,
            tick_spacing,
            reserve0 = snapshot.reserve0,
            reserve1 = snapshot.reserve1,
            "[POOL] snapshot loaded"
        );
        Ok(snapshot)
    }

    async fn tick(&self, pool: Address, tick: i32) -> Result<TickRecord> {
        let contract = self.pool(pool);
        let call = contract.ticks(tick);
        let (liquidity_gross, liquidity_net, _, _, _, _, _, initialized) = call.call().await?;
        debug!(tick, liquidity_gross, liquidity_net, initialized, "[SCAN] tick read");
        Ok(TickRecord {
            tick_index: tick,
            liquidity_gross,
            liquidity_net,
            initialized,
        })
    }
}
