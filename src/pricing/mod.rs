//! USD pricing for the pool's tokens.
//!
//! Prices come from a pair search service; every lookup failure falls back
//! to a static table so a book can always be built.

use crate::dex::PoolSnapshot;
use crate::errors::Result;
use crate::models::Chain;
use async_trait::async_trait;
use ethers::types::Address;
use tracing::{info, warn};

pub mod dexscreener;

pub use dexscreener::DexScreener;

/// Symbols priced at exactly one dollar without any lookup.
const STABLECOINS: [&str; 6] = ["USDC", "USDT", "DAI", "USDBC", "USDC.E", "FDUSD"];

/// Quote symbols a search result must be denominated in to be trusted.
const REFERENCE_QUOTES: [&str; 3] = ["WETH", "USDC", "USDT"];

#[derive(Debug, Clone, PartialEq)]
pub struct TokenRef {
    /// Kept as text: search results span non-EVM chains too.
    pub address: String,
    pub symbol: String,
}

/// The subset of a trading pair record this service relies on.
#[derive(Debug, Clone, PartialEq)]
pub struct PairSummary {
    pub chain_id: String,
    pub base_token: TokenRef,
    pub quote_token: TokenRef,
    pub price_usd: Option<f64>,
    pub liquidity_usd: Option<f64>,
}

/// Pair lookups against an external market data source.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketData: Send + Sync {
    /// The pair record for a pool address, `None` if the source does not know it.
    async fn pool_pair(&self, chain: Chain, pool: Address) -> Result<Option<PairSummary>>;

    /// Every pair mentioning `token`, across all chains.
    async fn search_pairs(&self, token: Address) -> Result<Vec<PairSummary>>;
}

/// Which raw token is the base, and what it is worth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseQuote {
    pub base_is_token0: bool,
    pub base_price_usd: f64,
}

pub fn is_stablecoin(symbol: &str) -> bool {
    let upper = symbol.to_ascii_uppercase();
    STABLECOINS.contains(&upper.as_str())
}

/// Last-resort USD price by symbol; unknown tokens are worth one dollar.
pub fn fallback_price(symbol: &str) -> f64 {
    match symbol.to_ascii_uppercase().as_str() {
        "WETH" | "ETH" => 3800.0,
        "USDC" | "USDT" | "DAI" | "USDBC" => 1.0,
        "WBTC" => 95000.0,
        "CBETH" => 4000.0,
        "ONDO" => 0.75,
        _ => 1.0,
    }
}

/// Price of the deepest same-chain pair quoted in a reference token; the
/// first listed pair wins a tie.
///
/// `None` when no pair qualifies or the deepest one carries no positive price.
pub fn select_best_pair(pairs: &[PairSummary], chain: Chain) -> Option<f64> {
    pairs
        .iter()
        .filter(|p| p.chain_id == chain.as_str())
        .filter(|p| REFERENCE_QUOTES.contains(&p.quote_token.symbol.as_str()))
        .fold(None::<&PairSummary>, |best, p| match best {
            // ties keep the earlier pair
            Some(b) if p.liquidity_usd.unwrap_or(0.0) <= b.liquidity_usd.unwrap_or(0.0) => best,
            _ => Some(p),
        })
        .and_then(|p| p.price_usd)
        .filter(|price| *price > 0.0)
}

/// USD price of the quote token.
pub async fn quote_price_usd(
    market: &dyn MarketData,
    chain: Chain,
    symbol: &str,
    address: Address,
) -> f64 {
    if is_stablecoin(symbol) {
        info!(symbol, "[PRICE] quote token is a stablecoin");
        return 1.0;
    }

    match market.search_pairs(address).await {
        Ok(pairs) => {
            if let Some(price) = select_best_pair(&pairs, chain) {
                info!(symbol, price, "[PRICE] quote token priced from market data");
                return price;
            }
            warn!(
                symbol,
                candidates = pairs.len(),
                "[PRICE] no usable quote pair, using fallback price"
            );
        }
        Err(e) => {
            warn!(symbol, error = %e, "[PRICE] quote price lookup failed, using fallback price");
        }
    }
    fallback_price(symbol)
}

/// Decide the base token of `pool` and its USD price.
///
/// Without a pair record token0 is the base.
pub async fn resolve_base(
    market: &dyn MarketData,
    chain: Chain,
    pool: Address,
    snapshot: &PoolSnapshot,
) -> BaseQuote {
    let pair = match market.pool_pair(chain, pool).await {
        Ok(pair) => pair,
        Err(e) => {
            warn!(pool = ?pool, error = %e, "[PRICE] pair lookup failed, assuming token0 is base");
            None
        }
    };

    let Some(pair) = pair else {
        let price = fallback_price(&snapshot.symbol0);
        info!(symbol = %snapshot.symbol0, price, "[PRICE] unknown pair, base priced from fallback");
        return BaseQuote {
            base_is_token0: true,
            base_price_usd: price,
        };
    };

    let token0 = format!("{:#x}", snapshot.token0);
    let base_is_token0 = token0.eq_ignore_ascii_case(&pair.base_token.address);
    let base_symbol = if base_is_token0 {
        &snapshot.symbol0
    } else {
        &snapshot.symbol1
    };
    let base_price_usd = match pair.price_usd.filter(|p| *p > 0.0) {
        Some(price) => price,
        None => {
            warn!(symbol = %base_symbol, "[PRICE] pair has no USD price, using fallback price");
            fallback_price(base_symbol)
        }
    };
    info!(
        symbol = %base_symbol,
        base_is_token0,
        price = base_price_usd,
        "[PRICE] base token resolved"
    );

    BaseQuote {
        base_is_token0,
        base_price_usd,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    fn pair(chain: &str, quote: &str, price: Option<f64>, liquidity: Option<f64>) -> PairSummary {
        PairSummary {
            chain_id: chain.into(),
            base_token: TokenRef {
                address: "0xabc".into(),
                symbol: "TKN".into(),
            },
            quote_token: TokenRef {
                address: "0xdef".into(),
                symbol: quote.into(),
            },
            price_usd: price,
            liquidity_usd: liquidity,
        }
    }

    fn snapshot() -> PoolSnapshot {
        PoolSnapshot {
            token0: Address::repeat_byte(0xaa),
            token1: Address::repeat_byte(0xbb),
            current_tick: 0,
            active_liquidity: 0,
            fee: 500,
            tick_spacing: 10,
            decimals0: 18,
            decimals1: 6,
            symbol0: "WETH".into(),
            symbol1: "USDC".into(),
            reserve0: 0.0,
            reserve1: 0.0,
        }
    }

    #[test]
    fn stablecoins_match_case_insensitively() {
        assert!(is_stablecoin("usdc"));
        assert!(is_stablecoin("USDbC"));
        assert!(is_stablecoin("USDC.e"));
        assert!(!is_stablecoin("WETH"));
    }

    #[test]
    fn fallback_table() {
        assert_eq!(fallback_price("weth"), 3800.0);
        assert_eq!(fallback_price("WBTC"), 95000.0);
        assert_eq!(fallback_price("ONDO"), 0.75);
        assert_eq!(fallback_price("PEPE"), 1.0);
    }

    #[test]
    fn best_pair_is_deepest_on_same_chain() {
        let pairs = vec![
            pair("base", "USDC", Some(9.0), Some(1e9)),
            pair("ethereum", "DAI", Some(8.0), Some(1e8)),
            pair("ethereum", "WETH", Some(2.0), Some(5e5)),
            pair("ethereum", "USDC", Some(2.5), Some(2e6)),
            pair("ethereum", "USDT", Some(2.4), None),
        ];
        assert_eq!(select_best_pair(&pairs, Chain::Ethereum), Some(2.5));
        assert_eq!(select_best_pair(&pairs, Chain::Arbitrum), None);
    }

    #[test]
    fn liquidity_tie_keeps_first_listed_pair() {
        let unranked = vec![
            pair("ethereum", "USDC", Some(2.0), None),
            pair("ethereum", "WETH", Some(3.0), None),
        ];
        assert_eq!(select_best_pair(&unranked, Chain::Ethereum), Some(2.0));

        let equal = vec![
            pair("base", "USDT", Some(4.0), Some(1e6)),
            pair("base", "USDC", Some(5.0), Some(1e6)),
        ];
        assert_eq!(select_best_pair(&equal, Chain::Base), Some(4.0));
    }

    #[test]
    fn deepest_pair_without_price_gives_none() {
        let pairs = vec![
            pair("ethereum", "USDC", None, Some(2e6)),
            pair("ethereum", "WETH", Some(2.0), Some(1e3)),
        ];
        assert_eq!(select_best_pair(&pairs, Chain::Ethereum), None);
    }

    #[tokio::test]
    async fn stablecoin_quote_skips_lookup() {
        let mut market = MockMarketData::new();
        market.expect_search_pairs().never();
        let price = quote_price_usd(&market, Chain::Base, "USDbC", Address::zero()).await;
        assert_eq!(price, 1.0);
    }

    #[tokio::test]
    async fn quote_price_from_search() {
        let mut market = MockMarketData::new();
        market
            .expect_search_pairs()
            .times(1)
            .returning(|_| Ok(vec![pair("arbitrum", "USDC", Some(3712.5), Some(1e7))]));
        let price = quote_price_usd(&market, Chain::Arbitrum, "WETH", Address::zero()).await;
        assert_eq!(price, 3712.5);
    }

    #[tokio::test]
    async fn quote_price_falls_back_on_error() {
        let mut market = MockMarketData::new();
        market
            .expect_search_pairs()
            .returning(|_| Err(AppError::Other("timeout".into())));
        let price = quote_price_usd(&market, Chain::Ethereum, "WBTC", Address::zero()).await;
        assert_eq!(price, 95000.0);
    }

    #[tokio::test]
    async fn base_follows_pair_record() {
        let snap = snapshot();
        let token1 = format!("{:#x}", snap.token1).to_uppercase().replace("0X", "0x");
        let mut market = MockMarketData::new();
        market.expect_pool_pair().returning(move |_, _| {
            let mut p = pair("ethereum", "WETH", Some(1.01), Some(1e6));
            p.base_token.address = token1.clone();
            Ok(Some(p))
        });

        let quote = resolve_base(&market, Chain::Ethereum, Address::zero(), &snap).await;
        assert!(!quote.base_is_token0);
        assert_eq!(quote.base_price_usd, 1.01);
    }

    #[tokio::test]
    async fn unknown_pair_defaults_to_token0_with_fallback_price() {
        let mut market = MockMarketData::new();
        market.expect_pool_pair().returning(|_, _| Ok(None));
        let quote = resolve_base(&market, Chain::Ethereum, Address::zero(), &snapshot()).await;
        assert_eq!(
            quote,
            BaseQuote {
                base_is_token0: true,
                base_price_usd: 3800.0,
            }
        );
    }

    #[tokio::test]
    async fn zero_pair_price_uses_fallback() {
        let snap = snapshot();
        let token0 = format!("{:#x}", snap.token0);
        let mut market = MockMarketData::new();
        market.expect_pool_pair().returning(move |_, _| {
            let mut p = pair("ethereum", "USDC", Some(0.0), None);
            p.base_token.address = token0.clone();
            Ok(Some(p))
        });
        let quote = resolve_base(&market, Chain::Ethereum, Address::zero(), &snap).await;
        assert!(quote.base_is_token0);
        assert_eq!(quote.base_price_usd, 3800.0);
    }
}
