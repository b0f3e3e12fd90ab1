use anyhow::Result;
use clmm_orderbook::{
    api,
    cache::MemoryCache,
    config::AppConfig,
    dex::ChainRegistry,
    pricing::DexScreener,
    service::{OrderBookService, ServiceSettings},
    utils,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    utils::init_logging();

    let config = AppConfig::load()?;
    tracing::info!(
        listen_addr = %config.listen_addr,
        max_tick_reads = config.max_tick_reads,
        simple_ttl_secs = config.simple_ttl.as_secs(),
        advanced_ttl_secs = config.advanced_ttl.as_secs(),
        "[INIT] clmm-orderbook starting"
    );

    let registry = ChainRegistry::from_config(&config)?;
    let market = DexScreener::new(config.dexscreener_url.clone(), config.http_timeout)?;
    let cache = MemoryCache::new(config.cache_capacity);
    let service = OrderBookService::new(
        registry,
        Arc::new(market),
        Arc::new(cache),
        ServiceSettings::from_config(&config),
    );

    api::serve(config.listen_addr, Arc::new(service)).await?;
    Ok(())
}
