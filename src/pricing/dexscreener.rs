//! DexScreener REST client.

use crate::errors::{AppError, Result};
use crate::models::Chain;
use crate::pricing::{MarketData, PairSummary, TokenRef};
use async_trait::async_trait;
use ethers::types::Address;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

#[derive(Debug, Deserialize)]
struct PairsResponse {
    #[serde(default)]
    pair: Option<PairDto>,
    #[serde(default)]
    pairs: Option<Vec<PairDto>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PairDto {
    chain_id: String,
    base_token: TokenDto,
    quote_token: TokenDto,
    /// Sent as a decimal string.
    #[serde(default)]
    price_usd: Option<String>,
    #[serde(default)]
    liquidity: Option<LiquidityDto>,
}

#[derive(Debug, Deserialize)]
struct TokenDto {
    address: String,
    symbol: String,
}

#[derive(Debug, Deserialize)]
struct LiquidityDto {
    #[serde(default)]
    usd: Option<f64>,
}

impl From<TokenDto> for TokenRef {
    fn from(t: TokenDto) -> Self {
        TokenRef {
            address: t.address,
            symbol: t.symbol,
        }
    }
}

impl From<PairDto> for PairSummary {
    fn from(p: PairDto) -> Self {
        PairSummary {
            chain_id: p.chain_id,
            base_token: p.base_token.into(),
            quote_token: p.quote_token.into(),
            price_usd: p.price_usd.and_then(|s| s.parse::<f64>().ok()),
            liquidity_usd: p.liquidity.and_then(|l| l.usd),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DexScreener {
    http: Client,
    base_url: Url,
}

impl DexScreener {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn fetch(&self, url: Url) -> Result<PairsResponse> {
        debug!(%url, "[PRICE] querying DexScreener");
        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<PairsResponse>()
            .await?;
        Ok(body)
    }
}

#[async_trait]
impl MarketData for DexScreener {
    async fn pool_pair(&self, chain: Chain, pool: Address) -> Result<Option<PairSummary>> {
        let pool = format!("{:#x}", pool);
        let url = self.endpoint(&["latest", "dex", "pairs", chain.as_str(), &pool])?;
        let body = self.fetch(url).await?;
        let pair = body
            .pair
            .or_else(|| body.pairs.and_then(|pairs| pairs.into_iter().next()));
        Ok(pair.map(PairSummary::from))
    }

    async fn search_pairs(&self, token: Address) -> Result<Vec<PairSummary>> {
        let mut url = self.endpoint(&["latest", "dex", "search"])?;
        url.query_pairs_mut().append_pair("q", &format!("{:#x}", token));
        let body = self.fetch(url).await?;
        Ok(body
            .pairs
            .unwrap_or_default()
            .into_iter()
            .map(PairSummary::from)
            .collect())
    }
}
