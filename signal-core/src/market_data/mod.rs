//! Market data gateway
//!
//! Wraps the exchange REST endpoints behind typed fetchers. The trait seam
//! exists so the pipeline can run against a mock source in tests.

pub mod binance;
pub mod symbol;

pub use binance::BinanceMarketData;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::AnalysisResult;
use crate::types::{FundingRateData, OpenInterestData, RealtimeData};

/// Read-only market data operations the pipeline depends on.
///
/// The asymmetric signatures are deliberate: spot failure must be handled by
/// the caller, the best-effort fetchers never fail.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn fetch_spot(&self, symbol: &str) -> AnalysisResult<RealtimeData>;
    async fn fetch_funding_rate(&self, symbol: &str) -> FundingRateData;
    async fn fetch_open_interest(&self, symbol: &str) -> OpenInterestData;
}

#[async_trait]
impl MarketDataSource for BinanceMarketData {
    async fn fetch_spot(&self, symbol: &str) -> AnalysisResult<RealtimeData> {
        BinanceMarketData::fetch_spot(self, symbol).await
    }

    async fn fetch_funding_rate(&self, symbol: &str) -> FundingRateData {
        BinanceMarketData::fetch_funding_rate(self, symbol).await
    }

    async fn fetch_open_interest(&self, symbol: &str) -> OpenInterestData {
        BinanceMarketData::fetch_open_interest(self, symbol).await
    }
}

#[async_trait]
impl<M: MarketDataSource + ?Sized> MarketDataSource for Arc<M> {
    async fn fetch_spot(&self, symbol: &str) -> AnalysisResult<RealtimeData> {
        (**self).fetch_spot(symbol).await
    }

    async fn fetch_funding_rate(&self, symbol: &str) -> FundingRateData {
        (**self).fetch_funding_rate(symbol).await
    }

    async fn fetch_open_interest(&self, symbol: &str) -> OpenInterestData {
        (**self).fetch_open_interest(symbol).await
    }
}
