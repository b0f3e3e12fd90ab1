//! Core library for the clmm-orderbook service.
//!
//! Rebuilds a synthetic limit order book from a Uniswap V3 pool's tick map
//! and serves it over HTTP.

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod dex;
pub mod errors;
pub mod models;
pub mod orderbook;
pub mod pricing;
pub mod response;
pub mod service;
pub mod utils;
