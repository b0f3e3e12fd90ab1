//! Command-line flags, each with an environment variable fallback.

use clap::Parser;
use std::net::SocketAddr;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "clmm-orderbook",
    about = "Synthetic order books reconstructed from Uniswap V3 pool liquidity"
)]
pub struct Cli {
    /// Address the HTTP server binds to.
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:3000")]
    pub listen_addr: SocketAddr,

    #[arg(
        long,
        env = "ETH_RPC_URL",
        default_value = "https://ethereum-rpc.publicnode.com"
    )]
    pub eth_rpc_url: String,

    #[arg(
        long,
        env = "BASE_RPC_URL",
        default_value = "https://base-rpc.publicnode.com"
    )]
    pub base_rpc_url: String,

    #[arg(
        long,
        env = "ARB_RPC_URL",
        default_value = "https://arbitrum-one-rpc.publicnode.com"
    )]
    pub arb_rpc_url: String,

    /// DexScreener API root.
    #[arg(
        long,
        env = "DEXSCREENER_URL",
        default_value = "https://api.dexscreener.com"
    )]
    pub dexscreener_url: String,

    /// Upper bound on concurrent `ticks()` reads per request.
    #[arg(long, env = "MAX_TICK_READS", default_value_t = 64)]
    pub max_tick_reads: usize,

    /// Maximum number of cached order books.
    #[arg(long, env = "CACHE_CAPACITY", default_value_t = 1_000)]
    pub cache_capacity: u64,

    #[arg(long, env = "SIMPLE_TTL_SECS", default_value_t = 60)]
    pub simple_ttl_secs: u64,

    #[arg(long, env = "ADVANCED_TTL_SECS", default_value_t = 120)]
    pub advanced_ttl_secs: u64,

    /// Timeout for market-data HTTP calls.
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value_t = 10)]
    pub http_timeout_secs: u64,
}
