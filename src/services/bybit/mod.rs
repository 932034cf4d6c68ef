//! Bybit v5 REST integration (linear perpetuals)

pub mod client;
pub mod messages;

pub use client::BybitClient;
