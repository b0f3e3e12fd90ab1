//! Configuration loader and application settings.

use crate::cli::Cli;
use crate::errors::{AppError, Result};
use crate::models::{Chain, Mode};
use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;

/// Consolidated application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub ethereum_rpc: Url,
    pub base_rpc: Url,
    pub arbitrum_rpc: Url,
    /// Root of the DexScreener REST API.
    pub dexscreener_url: Url,
    pub max_tick_reads: usize,
    pub cache_capacity: u64,
    pub simple_ttl: Duration,
    pub advanced_ttl: Duration,
    pub http_timeout: Duration,
}

impl AppConfig {
    /// Load configuration from CLI flags, falling back to environment variables.
    pub fn load() -> Result<Self> {
        Self::from_cli(Cli::parse())
    }

    pub fn from_cli(cli: Cli) -> Result<Self> {
        if cli.max_tick_reads == 0 {
            return Err(AppError::Config("MAX_TICK_READS must be at least 1".into()));
        }
        if cli.cache_capacity == 0 {
            return Err(AppError::Config("CACHE_CAPACITY must be at least 1".into()));
        }
        Ok(Self {
            listen_addr: cli.listen_addr,
            ethereum_rpc: Url::parse(&cli.eth_rpc_url)?,
            base_rpc: Url::parse(&cli.base_rpc_url)?,
            arbitrum_rpc: Url::parse(&cli.arb_rpc_url)?,
            dexscreener_url: Url::parse(&cli.dexscreener_url)?,
            max_tick_reads: cli.max_tick_reads,
            cache_capacity: cli.cache_capacity,
            simple_ttl: Duration::from_secs(cli.simple_ttl_secs),
            advanced_ttl: Duration::from_secs(cli.advanced_ttl_secs),
            http_timeout: Duration::from_secs(cli.http_timeout_secs),
        })
    }

    pub fn rpc_url(&self, chain: Chain) -> &Url {
        match chain {
            Chain::Ethereum => &self.ethereum_rpc,
            Chain::Base => &self.base_rpc,
            Chain::Arbitrum => &self.arbitrum_rpc,
        }
    }

    /// How long an assembled book stays cached.
    pub fn ttl_for(&self, mode: Mode) -> Duration {
        match mode {
            Mode::Simple => self.simple_ttl,
            Mode::Advanced => self.advanced_ttl,
        }
    }
}
