//! Binance REST market data client
//!
//! Spot price is load-bearing for every price the decision step quotes, so a
//! failed ticker fetch is fatal. Funding rate and open interest are sentiment
//! enrichment only; their fetchers are infallible and fall back to a zeroed
//! default, which downstream treats as a neutral signal.

use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use crate::error::{AnalysisError, AnalysisResult};
use crate::types::{FundingRateData, OpenInterestData, RealtimeData};

const SPOT_BASE_URL: &str = "https://api.binance.com";
const FUTURES_BASE_URL: &str = "https://fapi.binance.com";

/// How many funding samples the history fetch asks for
const FUNDING_HISTORY_LIMIT: usize = 8;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ticker24hr {
    last_price: String,
    price_change_percent: String,
    volume: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FundingRateEntry {
    funding_rate: String,
    #[allow(dead_code)]
    funding_time: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PremiumIndex {
    next_funding_time: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpenInterestStat {
    sum_open_interest: String,
    sum_open_interest_value: String,
    timestamp: i64,
}

/// REST client over the spot and futures endpoints. No caching, no rate-limit
/// handling: every call issues fresh requests.
#[derive(Clone)]
pub struct BinanceMarketData {
    client: Client,
    spot_base_url: String,
    futures_base_url: String,
}

impl BinanceMarketData {
    pub fn new() -> Self {
        Self::with_base_urls(SPOT_BASE_URL, FUTURES_BASE_URL)
    }

    pub fn with_base_urls(spot: impl Into<String>, futures: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            spot_base_url: spot.into(),
            futures_base_url: futures.into(),
        }
    }

    /// 24h ticker snapshot. Non-success status is fatal.
    pub async fn fetch_spot(&self, symbol: &str) -> AnalysisResult<RealtimeData> {
        let url = format!("{}/api/v3/ticker/24hr", self.spot_base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("symbol", symbol)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::MarketDataUnavailable {
                symbol: symbol.to_string(),
                status: status.as_u16(),
            });
        }

        let ticker: Ticker24hr = response.json().await?;
        let current_price = ticker.last_price.parse().map_err(|_| {
            AnalysisError::Parse(format!("invalid lastPrice '{}'", ticker.last_price))
        })?;

        Ok(RealtimeData {
            current_price,
            price_change_24h: ticker.price_change_percent,
            volume_24h: Some(ticker.volume),
        })
    }

    /// Recent funding history plus the next funding timestamp. Best effort:
    /// any failure degrades to the zeroed default.
    pub async fn fetch_funding_rate(&self, symbol: &str) -> FundingRateData {
        match self.try_fetch_funding_rate(symbol).await {
            Ok(data) => data,
            Err(err) => {
                warn!(symbol, error = %err, "funding rate fetch failed, using neutral default");
                FundingRateData::default()
            }
        }
    }

    async fn try_fetch_funding_rate(&self, symbol: &str) -> AnalysisResult<FundingRateData> {
        let history_url = format!("{}/fapi/v1/fundingRate", self.futures_base_url);
        let limit = FUNDING_HISTORY_LIMIT.to_string();
        let response = self
            .client
            .get(&history_url)
            .query(&[("symbol", symbol), ("limit", limit.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::Network(format!(
                "funding rate history returned {status}"
            )));
        }

        let entries: Vec<FundingRateEntry> = response.json().await?;
        let funding = funding_from_history(entries);

        let premium_url = format!("{}/fapi/v1/premiumIndex", self.futures_base_url);
        let response = self
            .client
            .get(&premium_url)
            .query(&[("symbol", symbol)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::Network(format!(
                "premium index returned {status}"
            )));
        }

        let premium: PremiumIndex = response.json().await?;
        Ok(FundingRateData {
            next_funding_time: premium.next_funding_time,
            ..funding
        })
    }

    /// Latest open interest bucket. Best effort, same degradation policy as
    /// funding rate.
    pub async fn fetch_open_interest(&self, symbol: &str) -> OpenInterestData {
        match self.try_fetch_open_interest(symbol).await {
            Ok(data) => data,
            Err(err) => {
                warn!(symbol, error = %err, "open interest fetch failed, using neutral default");
                OpenInterestData::default()
            }
        }
    }

    async fn try_fetch_open_interest(&self, symbol: &str) -> AnalysisResult<OpenInterestData> {
        let url = format!("{}/futures/data/openInterestHist", self.futures_base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("symbol", symbol), ("period", "5m"), ("limit", "1")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::Network(format!(
                "open interest returned {status}"
            )));
        }

        let stats: Vec<OpenInterestStat> = response.json().await?;
        let latest = stats
            .into_iter()
            .next_back()
            .ok_or_else(|| AnalysisError::Parse("empty open interest history".to_string()))?;

        Ok(OpenInterestData {
            open_interest: latest.sum_open_interest.parse().unwrap_or(0.0),
            open_interest_value: latest.sum_open_interest_value.parse().unwrap_or(0.0),
            timestamp: latest.timestamp,
        })
    }
}

impl Default for BinanceMarketData {
    fn default() -> Self {
        Self::new()
    }
}

/// Fold the funding history (exchange order: oldest first) into newest-first
/// samples with the latest rate up front.
fn funding_from_history(entries: Vec<FundingRateEntry>) -> FundingRateData {
    let mut recent_rates: Vec<f64> = entries
        .iter()
        .filter_map(|e| e.funding_rate.parse().ok())
        .collect();
    recent_rates.reverse();

    FundingRateData {
        current_rate: recent_rates.first().copied().unwrap_or(0.0),
        next_funding_time: 0,
        recent_rates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_wire_shape_deserializes() {
        let raw = r#"{
            "symbol": "BTCUSDT",
            "priceChange": "1200.5",
            "priceChangePercent": "1.23",
            "lastPrice": "100000.00",
            "volume": "12345.6"
        }"#;

        let ticker: Ticker24hr = serde_json::from_str(raw).unwrap();
        assert_eq!(ticker.last_price, "100000.00");
        assert_eq!(ticker.price_change_percent, "1.23");
    }

    #[test]
    fn funding_history_is_reordered_newest_first() {
        let entries = vec![
            FundingRateEntry {
                funding_rate: "0.0001".to_string(),
                funding_time: 1,
            },
            FundingRateEntry {
                funding_rate: "0.0002".to_string(),
                funding_time: 2,
            },
            FundingRateEntry {
                funding_rate: "0.0003".to_string(),
                funding_time: 3,
            },
        ];

        let funding = funding_from_history(entries);
        assert_eq!(funding.recent_rates, vec![0.0003, 0.0002, 0.0001]);
        assert_eq!(funding.current_rate, 0.0003);
    }

    #[test]
    fn empty_funding_history_yields_zero_rate() {
        let funding = funding_from_history(Vec::new());
        assert_eq!(funding.current_rate, 0.0);
        assert!(funding.recent_rates.is_empty());
    }

    #[tokio::test]
    async fn funding_rate_failure_degrades_to_default() {
        // Port 9 (discard) is unroutable for HTTP; the fetch fails at the
        // transport layer and must fall back to the neutral default.
        let client = BinanceMarketData::with_base_urls("http://127.0.0.1:9", "http://127.0.0.1:9");

        let funding = client.fetch_funding_rate("BTCUSDT").await;
        assert_eq!(funding, FundingRateData::default());
        assert_eq!(funding.current_rate, 0.0);
        assert_eq!(funding.next_funding_time, 0);
        assert!(funding.recent_rates.is_empty());
    }

    #[tokio::test]
    async fn open_interest_failure_degrades_to_default() {
        let client = BinanceMarketData::with_base_urls("http://127.0.0.1:9", "http://127.0.0.1:9");

        let open_interest = client.fetch_open_interest("BTCUSDT").await;
        assert_eq!(open_interest, OpenInterestData::default());
    }

    #[test]
    fn open_interest_stat_deserializes() {
        let raw = r#"[{
            "symbol": "BTCUSDT",
            "sumOpenInterest": "85000.5",
            "sumOpenInterestValue": "8500000000.0",
            "timestamp": 1718000000000
        }]"#;

        let stats: Vec<OpenInterestStat> = serde_json::from_str(raw).unwrap();
        assert_eq!(stats[0].sum_open_interest, "85000.5");
        assert_eq!(stats[0].timestamp, 1718000000000);
    }
}
