//! Request orchestration: validation, caching, and the reconstruction
//! pipeline.

use crate::cache::ResultCache;
use crate::config::AppConfig;
use crate::dex::{ChainRegistry, PoolSnapshot};
use crate::errors::{AppError, Result};
use crate::models::{Chain, Mode};
use crate::orderbook::{BookRequest, ReconstructedBook, reconstruct};
use crate::pricing::{BaseQuote, MarketData, quote_price_usd, resolve_base};
use crate::response::{LevelDto, OrderBookResponse, PricesDto, ReservesDto};
use crate::utils::format_small_price;
use chrono::{SecondsFormat, Utc};
use ethers::types::Address;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy)]
pub struct ServiceSettings {
    pub max_tick_reads: usize,
    pub simple_ttl: Duration,
    pub advanced_ttl: Duration,
}

impl ServiceSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_tick_reads: config.max_tick_reads,
            simple_ttl: config.ttl_for(Mode::Simple),
            advanced_ttl: config.ttl_for(Mode::Advanced),
        }
    }

    fn ttl_for(&self, mode: Mode) -> Duration {
        match mode {
            Mode::Simple => self.simple_ttl,
            Mode::Advanced => self.advanced_ttl,
        }
    }
}

/// A validated `/orderbook` query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookQuery {
    pub chain: Chain,
    pub pool: Address,
    pub mode: Mode,
}

impl BookQuery {
    /// Missing `chain` means ethereum and missing `mode` means simple; a
    /// missing pool is an error.
    pub fn parse(chain: Option<&str>, pool: Option<&str>, mode: Option<&str>) -> Result<Self> {
        let pool = pool
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::InvalidInput("Pool address required".into()))?;
        let chain = chain.map(str::parse::<Chain>).transpose()?.unwrap_or(Chain::Ethereum);
        let mode = mode.map(str::parse::<Mode>).transpose()?.unwrap_or_default();
        let pool = pool
            .parse::<Address>()
            .map_err(|_| AppError::InvalidInput(format!("Invalid pool address: {}", pool)))?;
        Ok(Self { chain, pool, mode })
    }

    pub fn cache_key(&self) -> String {
        format!("orderbook:{}:{}:{:#x}", self.mode, self.chain, self.pool)
    }
}

#[derive(Clone)]
pub struct OrderBookService {
    registry: ChainRegistry,
    market: Arc<dyn MarketData>,
    cache: Arc<dyn ResultCache>,
    settings: ServiceSettings,
}

impl OrderBookService {
    pub fn new(
        registry: ChainRegistry,
        market: Arc<dyn MarketData>,
        cache: Arc<dyn ResultCache>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            registry,
            market,
            cache,
            settings,
        }
    }

    /// Serve a book from cache or rebuild it from chain state.
    pub async fn order_book(&self, query: BookQuery) -> Result<OrderBookResponse> {
        let key = query.cache_key();

        if let Some(payload) = self.cache.get(&key).await {
            match serde_json::from_str::<OrderBookResponse>(&payload) {
                Ok(mut response) => {
                    info!(%key, "[CACHE] hit");
                    response.cached = true;
                    return Ok(response);
                }
                Err(e) => warn!(%key, error = %e, "[CACHE] unreadable entry, recomputing"),
            }
        }
        info!(%key, "[CACHE] miss, computing");

        let response = self.compute(query).await?;

        let payload = serde_json::to_string(&response)?;
        self.cache
            .set(&key, payload, self.settings.ttl_for(query.mode))
            .await;
        Ok(response)
    }

    async fn compute(&self, query: BookQuery) -> Result<OrderBookResponse> {
        let reader = self.registry.reader(query.chain)?;
        let snapshot = reader.snapshot(query.pool).await?;

        let base = resolve_base(self.market.as_ref(), query.chain, query.pool, &snapshot).await;
        let (quote_symbol, quote_address) = if base.base_is_token0 {
            (snapshot.symbol1.as_str(), snapshot.token1)
        } else {
            (snapshot.symbol0.as_str(), snapshot.token0)
        };
        let quote_price =
            quote_price_usd(self.market.as_ref(), query.chain, quote_symbol, quote_address).await;

        let rebuilt = reconstruct(
            reader.as_ref(),
            &snapshot,
            &BookRequest {
                pool: query.pool,
                mode: query.mode,
                base_is_token0: base.base_is_token0,
                base_price_usd: base.base_price_usd,
                quote_price_usd: quote_price,
                max_in_flight: self.settings.max_tick_reads,
            },
        )
        .await;

        Ok(render(&query, &snapshot, base, quote_price, &rebuilt))
    }
}

/// Lay the book out in base/quote order for the wire.
fn render(
    query: &BookQuery,
    snapshot: &PoolSnapshot,
    base: BaseQuote,
    quote_price: f64,
    rebuilt: &ReconstructedBook,
) -> OrderBookResponse {
    let base_price = base.base_price_usd;
    let token0_is_base = base.base_is_token0;
    let (token0_price, token1_price) = base_first(token0_is_base, base_price, quote_price);
    let tvl = snapshot.reserve0 * token0_price + snapshot.reserve1 * token1_price;

    let (symbol0, symbol1) = base_first(
        token0_is_base,
        snapshot.symbol0.clone(),
        snapshot.symbol1.clone(),
    );
    let (decimals0, decimals1) = base_first(token0_is_base, snapshot.decimals0, snapshot.decimals1);
    let (reserve0, reserve1) = base_first(token0_is_base, snapshot.reserve0, snapshot.reserve1);

    OrderBookResponse {
        chain: query.chain.to_string(),
        chain_id: query.chain.chain_id(),
        pool: format!("{:#x}", query.pool),
        quote_token: symbol1.clone(),
        symbol0,
        symbol1,
        decimals0,
        decimals1,
        current_tick: snapshot.current_tick,
        active_liquidity: tvl,
        prices: PricesDto {
            token0_usd: base_price,
            token1_usd: quote_price,
            current_price_usd: base_price,
            current_price_formatted: format_small_price(base_price),
        },
        reserves: ReservesDto {
            token0: reserve0,
            token1: reserve1,
        },
        bids: rebuilt.book.bids.iter().map(LevelDto::from).collect(),
        asks: rebuilt.book.asks.iter().map(LevelDto::from).collect(),
        mode: query.mode.to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        cached: false,
        scan: rebuilt.scan.into(),
    }
}

/// Order a raw token0/token1 pair as (base, quote).
fn base_first<T>(token0_is_base: bool, token0: T, token1: T) -> (T, T) {
    if token0_is_base {
        (token0, token1)
    } else {
        (token1, token0)
    }
}
