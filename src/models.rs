//! Shared data structures used throughout the application.

use crate::errors::AppError;
use std::fmt;
use std::str::FromStr;

/// Chains the service can read pools from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chain {
    Ethereum,
    Base,
    Arbitrum,
}

impl Chain {
    pub const ALL: [Chain; 3] = [Chain::Ethereum, Chain::Base, Chain::Arbitrum];

    pub fn chain_id(self) -> u64 {
        match self {
            Chain::Ethereum => 1,
            Chain::Base => 8453,
            Chain::Arbitrum => 42161,
        }
    }

    /// Lowercase name, also the chain slug used by DexScreener.
    pub fn as_str(self) -> &'static str {
        match self {
            Chain::Ethereum => "ethereum",
            Chain::Base => "base",
            Chain::Arbitrum => "arbitrum",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chain {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ethereum" => Ok(Chain::Ethereum),
            "base" => Ok(Chain::Base),
            "arbitrum" => Ok(Chain::Arbitrum),
            _ => Err(AppError::InvalidInput("Invalid chain".to_string())),
        }
    }
}

/// Response flavour: `Simple` shows 20 levels per side, `Advanced` shows 50
/// and attaches per-level liquidity diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Simple,
    Advanced,
}

impl Mode {
    pub fn num_levels(self) -> usize {
        match self {
            Mode::Simple => 20,
            Mode::Advanced => 50,
        }
    }

    pub fn is_advanced(self) -> bool {
        self == Mode::Advanced
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Simple => "simple",
            Mode::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "simple" => Ok(Mode::Simple),
            "advanced" => Ok(Mode::Advanced),
            _ => Err(AppError::InvalidInput(format!("Invalid mode: {}", s))),
        }
    }
}

/// Which ladder a level belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Bid,
    Ask,
}

/// Liquidity behind a level, shown in advanced mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagnosticInfo {
    pub liquidity: f64,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

/// One emitted rung of the synthetic book.
///
/// Bid sizes are quote-denominated and carry the base amount they would buy;
/// ask sizes are base-denominated and carry the quote amount they would fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum Level {
    Bid {
        price_usd: f64,
        size: f64,
        base_amount: f64,
        total_usd: f64,
        diagnostics: Option<DiagnosticInfo>,
    },
    Ask {
        price_usd: f64,
        size: f64,
        quote_amount: f64,
        total_usd: f64,
        diagnostics: Option<DiagnosticInfo>,
    },
}

impl Level {
    pub fn side(&self) -> Side {
        match self {
            Level::Bid { .. } => Side::Bid,
            Level::Ask { .. } => Side::Ask,
        }
    }

    pub fn price_usd(&self) -> f64 {
        match self {
            Level::Bid { price_usd, .. } | Level::Ask { price_usd, .. } => *price_usd,
        }
    }

    pub fn size(&self) -> f64 {
        match self {
            Level::Bid { size, .. } | Level::Ask { size, .. } => *size,
        }
    }

    /// The other token of the level (base for bids, quote for asks).
    pub fn counter_amount(&self) -> f64 {
        match self {
            Level::Bid { base_amount, .. } => *base_amount,
            Level::Ask { quote_amount, .. } => *quote_amount,
        }
    }

    /// Cumulative USD depth up to and including this level.
    pub fn total_usd(&self) -> f64 {
        match self {
            Level::Bid { total_usd, .. } | Level::Ask { total_usd, .. } => *total_usd,
        }
    }

    pub fn diagnostics(&self) -> Option<&DiagnosticInfo> {
        match self {
            Level::Bid { diagnostics, .. } | Level::Ask { diagnostics, .. } => {
                diagnostics.as_ref()
            }
        }
    }
}

/// Bids descending and asks ascending by price.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderBook {
    pub bids: Vec<Level>,
    pub asks: Vec<Level>,
}

impl OrderBook {
    pub fn bid_depth_usd(&self) -> f64 {
        self.bids.last().map(Level::total_usd).unwrap_or(0.0)
    }

    pub fn ask_depth_usd(&self) -> f64 {
        self.asks.last().map(Level::total_usd).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_parses_case_insensitively() {
        assert_eq!("Base".parse::<Chain>().unwrap(), Chain::Base);
        assert_eq!("ARBITRUM".parse::<Chain>().unwrap(), Chain::Arbitrum);
        assert!("solana".parse::<Chain>().is_err());
    }

    #[test]
    fn chain_ids_match_networks() {
        assert_eq!(Chain::Ethereum.chain_id(), 1);
        assert_eq!(Chain::Base.chain_id(), 8453);
        assert_eq!(Chain::Arbitrum.chain_id(), 42161);
    }

    #[test]
    fn mode_controls_level_count() {
        assert_eq!(Mode::Simple.num_levels(), 20);
        assert_eq!(Mode::Advanced.num_levels(), 50);
        assert_eq!(Mode::default(), Mode::Simple);
        assert!("pro".parse::<Mode>().is_err());
    }

    #[test]
    fn level_accessors_cover_both_sides() {
        let bid = Level::Bid {
            price_usd: 99.0,
            size: 10.0,
            base_amount: 0.1,
            total_usd: 10.0,
            diagnostics: None,
        };
        let ask = Level::Ask {
            price_usd: 101.0,
            size: 0.5,
            quote_amount: 50.5,
            total_usd: 50.5,
            diagnostics: Some(DiagnosticInfo {
                liquidity: 1e18,
                tick_lower: 0,
                tick_upper: 60,
            }),
        };
        assert_eq!(bid.side(), Side::Bid);
        assert_eq!(bid.counter_amount(), 0.1);
        assert!(bid.diagnostics().is_none());
        assert_eq!(ask.side(), Side::Ask);
        assert_eq!(ask.counter_amount(), 50.5);
        assert_eq!(ask.diagnostics().map(|d| d.tick_upper), Some(60));

        let book = OrderBook {
            bids: vec![bid],
            asks: vec![ask],
        };
        assert_eq!(book.bid_depth_usd(), 10.0);
        assert_eq!(book.ask_depth_usd(), 50.5);
    }
}
