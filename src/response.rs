//! Wire representation of an order book response.
//!
//! Token fields are reordered so that "0" is always the base token and "1"
//! the quote token, regardless of the pool's raw token order.

use crate::models::{Level, Side};
use crate::orderbook::ScanSummary;
use crate::utils::{format_exponential, format_small_price};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBookResponse {
    pub chain: String,
    pub chain_id: u64,
    pub pool: String,
    pub symbol0: String,
    pub symbol1: String,
    pub decimals0: u8,
    pub decimals1: u8,
    pub quote_token: String,
    pub current_tick: i32,
    /// Pool TVL in USD.
    pub active_liquidity: f64,
    pub prices: PricesDto,
    pub reserves: ReservesDto,
    pub bids: Vec<LevelDto>,
    pub asks: Vec<LevelDto>,
    pub mode: String,
    /// RFC 3339, millisecond precision, UTC.
    pub timestamp: String,
    pub cached: bool,
    pub scan: ScanDto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricesDto {
    #[serde(rename = "token0USD")]
    pub token0_usd: f64,
    #[serde(rename = "token1USD")]
    pub token1_usd: f64,
    #[serde(rename = "currentPriceUSD")]
    pub current_price_usd: f64,
    #[serde(rename = "currentPriceFormatted")]
    pub current_price_formatted: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservesDto {
    pub token0: f64,
    pub token1: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDto {
    pub price: String,
    pub size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_amount: Option<String>,
    /// Cumulative USD depth.
    pub total: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liquidity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_range: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanDto {
    pub range_lower: i32,
    pub range_upper: i32,
    pub ticks_sampled: usize,
    pub active_ticks: usize,
    pub degraded_ticks: usize,
}

impl From<&Level> for LevelDto {
    fn from(level: &Level) -> Self {
        let counter = format!("{:.4}", level.counter_amount());
        let (base_amount, quote_amount) = match level.side() {
            Side::Bid => (Some(counter), None),
            Side::Ask => (None, Some(counter)),
        };
        let diagnostics = level.diagnostics();
        LevelDto {
            price: format_small_price(level.price_usd()),
            size: format!("{:.4}", level.size()),
            base_amount,
            quote_amount,
            total: format!("{:.2}", level.total_usd()),
            liquidity: diagnostics.map(|d| format_exponential(d.liquidity)),
            tick_range: diagnostics.map(|d| format!("[{}, {}]", d.tick_lower, d.tick_upper)),
        }
    }
}

impl From<ScanSummary> for ScanDto {
    fn from(s: ScanSummary) -> Self {
        ScanDto {
            range_lower: s.range_lower,
            range_upper: s.range_upper,
            ticks_sampled: s.ticks_sampled,
            active_ticks: s.active_ticks,
            degraded_ticks: s.degraded_ticks,
        }
    }
}

/// Error body returned with every non-2xx status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DiagnosticInfo;
    use serde_json::json;

    #[test]
    fn bid_level_wire_format() {
        let level = Level::Bid {
            price_usd: 3712.123456789,
            size: 1234.56789,
            base_amount: 0.33333333,
            total_usd: 1234.567,
            diagnostics: None,
        };
        let value = serde_json::to_value(LevelDto::from(&level)).unwrap();
        assert_eq!(
            value,
            json!({
                "price": "3712.12345679",
                "size": "1234.5679",
                "baseAmount": "0.3333",
                "total": "1234.57"
            })
        );
    }

    #[test]
    fn ask_level_carries_diagnostics_when_present() {
        let level = Level::Ask {
            price_usd: 0.00001234,
            size: 5.0,
            quote_amount: 0.0000617,
            total_usd: 0.0000617,
            diagnostics: Some(DiagnosticInfo {
                liquidity: 1.234e18,
                tick_lower: -887220,
                tick_upper: -887160,
            }),
        };
        let dto = LevelDto::from(&level);
        assert_eq!(dto.price, "0.0₄1234");
        assert_eq!(dto.quote_amount.as_deref(), Some("0.0001"));
        assert!(dto.base_amount.is_none());
        assert_eq!(dto.total, "0.00");
        assert_eq!(dto.liquidity.as_deref(), Some("1.23e+18"));
        assert_eq!(dto.tick_range.as_deref(), Some("[-887220, -887160]"));
    }

    #[test]
    fn price_keys_keep_usd_suffix() {
        let prices = PricesDto {
            token0_usd: 2.0,
            token1_usd: 1.0,
            current_price_usd: 2.0,
            current_price_formatted: "2".into(),
        };
        let value = serde_json::to_value(&prices).unwrap();
        assert!(value.get("token0USD").is_some());
        assert!(value.get("currentPriceUSD").is_some());
        assert!(value.get("currentPriceFormatted").is_some());
    }

    #[test]
    fn error_body_omits_missing_details() {
        let body = ErrorBody {
            error: "Invalid chain".into(),
            details: None,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"error":"Invalid chain"}"#
        );
    }
}
