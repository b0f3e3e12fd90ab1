//! DEX integration for Uniswap V3 pools.
//!
//! Responsibilities:
//! • Read a consistent [`PoolSnapshot`] (pool slots, token metadata, reserves).
//! • Read individual tick-map entries for the liquidity curve.
//! • Map each supported chain to its reader.

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::models::Chain;
use async_trait::async_trait;
use ethers::types::Address;
use std::collections::HashMap;
use std::sync::Arc;

pub mod calc;
pub mod client;
pub mod state;

pub use calc::{RangeAmounts, amounts_for_range, token1_per_token0_at_tick};
pub use client::Dex;
pub use state::{PoolSnapshot, TickRecord};

/// Read surface of a concentrated-liquidity pool on one chain.
#[async_trait]
pub trait PoolReader: Send + Sync {
    /// Pool-level state plus token metadata and balances.
    ///
    /// Fails with [`AppError::InvalidPool`] when the address does not answer
    /// the pool interface on this chain.
    async fn snapshot(&self, pool: Address) -> Result<PoolSnapshot>;

    /// A single `ticks(int24)` entry.
    async fn tick(&self, pool: Address, tick: i32) -> Result<TickRecord>;
}

/// Immutable chain -> reader table, built once at startup.
#[derive(Clone, Default)]
pub struct ChainRegistry {
    readers: HashMap<Chain, Arc<dyn PoolReader>>,
}

impl ChainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// One HTTP JSON-RPC reader per configured chain.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let mut registry = Self::new();
        for chain in Chain::ALL {
            let dex = Dex::new(chain, config.rpc_url(chain).as_str())?;
            registry = registry.with_reader(dex.chain(), Arc::new(dex));
        }
        Ok(registry)
    }

    pub fn with_reader(mut self, chain: Chain, reader: Arc<dyn PoolReader>) -> Self {
        self.readers.insert(chain, reader);
        self
    }

    pub fn reader(&self, chain: Chain) -> Result<Arc<dyn PoolReader>> {
        self.readers
            .get(&chain)
            .cloned()
            .ok_or_else(|| AppError::InvalidInput(format!("Chain {} is not configured", chain)))
    }
}
