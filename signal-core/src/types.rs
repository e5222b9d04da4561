//! Domain value objects shared across the pipeline
//!
//! Everything here is transient: produced for one analysis request, serialized
//! back to the caller, never persisted. Wire names are camelCase to match the
//! browser client.

use serde::{Deserialize, Serialize};

/// Overall chart trend
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Range,
}

/// Market state read from the chart
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MarketState {
    Breakout,
    Pullback,
    Range,
}

/// Volatility level
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Volatility {
    Low,
    Medium,
    High,
}

/// Directional bias for the futures leg
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Bias {
    Long,
    Short,
    Neutral,
}

/// Risk appetite implied by a macro scenario
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum RiskBias {
    #[serde(rename = "risk-on")]
    RiskOn,
    #[serde(rename = "risk-off")]
    RiskOff,
    #[serde(rename = "neutral")]
    Neutral,
}

/// Expected price impact of a macro scenario
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Positive,
    Negative,
    Uncertain,
}

/// Importance of a macro calendar event
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    Medium,
    Low,
}

/// Macro scenario the caller can attach to a request
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MacroScenario {
    pub id: String,
    pub label: String,
    pub bias: RiskBias,
    pub impact: Impact,
}

/// What the vision model detected in the screenshot
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetectedInfo {
    pub symbol: String,
    pub timeframe: String,
    pub price_range: String,
}

/// Direction read off the MACD pane
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MacdTrend {
    Bullish,
    Bearish,
    Neutral,
}

/// RSI zone
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RsiSignal {
    Overbought,
    Oversold,
    Neutral,
}

/// Price position relative to the Bollinger bands
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BandPosition {
    Upper,
    Middle,
    Lower,
}

/// Volume direction
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VolumeTrend {
    Increasing,
    Decreasing,
    Stable,
}

/// MACD reading, present only if the indicator pane is visible
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MacdReading {
    pub trend: MacdTrend,
    /// Free-text descriptor, e.g. "golden cross forming"
    pub signal: String,
}

/// RSI reading
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RsiReading {
    pub value: f64,
    pub signal: RsiSignal,
}

/// Bollinger band position
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BollingerReading {
    pub position: BandPosition,
    pub squeeze: bool,
}

/// Volume behaviour
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VolumeReading {
    pub trend: VolumeTrend,
    pub anomaly: bool,
}

/// Indicator sub-readings; every field is optional because the model reports
/// only what is actually visible in the screenshot
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalIndicators {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd: Option<MacdReading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<RsiReading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bollinger_bands: Option<BollingerReading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<VolumeReading>,
}

/// Structured technical read of the chart
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalAnalysis {
    pub trend: Trend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicators: Option<TechnicalIndicators>,
    pub support: Vec<String>,
    pub resistance: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    pub market_state: MarketState,
    pub volatility: Volatility,
    /// Reported in [0,1]; passed through unclamped
    pub confidence: f64,
}

/// Vision client output: detection plus technical analysis
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ImageAnalysis {
    pub detected: DetectedInfo,
    pub analysis: TechnicalAnalysis,
}

/// Snapshot of the 24h spot ticker
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeData {
    pub current_price: f64,
    pub price_change_24h: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_24h: Option<String>,
}

/// Perp funding snapshot; zeroed default when the fetch fails
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FundingRateData {
    pub current_rate: f64,
    /// Epoch milliseconds
    pub next_funding_time: i64,
    /// Newest first, at most 8 samples
    pub recent_rates: Vec<f64>,
}

/// Open interest snapshot; zeroed default when the fetch fails
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OpenInterestData {
    pub open_interest: f64,
    pub open_interest_value: f64,
    /// Epoch milliseconds
    pub timestamp: i64,
}

/// Spot leg of the recommendation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpotAdvice {
    pub action: String,
    pub price_zone: String,
    pub logic: String,
}

/// Futures leg of the recommendation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FuturesAdvice {
    pub bias: Bias,
    pub entry: String,
    pub stop_loss: String,
    pub risk_reward: String,
}

/// Options leg of the recommendation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct OptionsAdvice {
    pub strategy: String,
    pub logic: String,
}

/// Macro calendar event recalled by the text model
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MacroEvent {
    pub date: String,
    pub event: String,
    pub importance: Importance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_impact: Option<String>,
}

/// Scenario probabilities; expected to total 100 but not validated
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProbabilityDistribution {
    pub bullish: f64,
    pub bearish: f64,
    pub neutral: f64,
    pub reasoning: String,
}

/// Decision shape of the standard deployment: flat price range plus risks
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StandardDecision {
    pub spot: SpotAdvice,
    pub futures: FuturesAdvice,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<OptionsAdvice>,
    pub price_range: String,
    pub risks: Vec<String>,
}

/// Decision shape of the intelligent deployment: macro events and an explicit
/// probability distribution instead of the flat range
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IntelligentDecision {
    pub macro_events: Vec<MacroEvent>,
    pub probability: ProbabilityDistribution,
    pub spot: SpotAdvice,
    pub futures: FuturesAdvice,
    pub options: OptionsAdvice,
    pub reasoning: String,
}

/// Union of the two decision schemas, discriminated by which fields are
/// present (`macroEvents`/`probability` mark the intelligent shape). The
/// variants are never interchangeable; each deployment produces exactly one.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TradingDecision {
    Intelligent(IntelligentDecision),
    Standard(StandardDecision),
}

impl TradingDecision {
    pub fn futures(&self) -> &FuturesAdvice {
        match self {
            Self::Intelligent(d) => &d.futures,
            Self::Standard(d) => &d.futures,
        }
    }

    pub fn spot(&self) -> &SpotAdvice {
        match self {
            Self::Intelligent(d) => &d.spot,
            Self::Standard(d) => &d.spot,
        }
    }
}

/// Inbound request body
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// Data-URI encoded screenshot
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macro_scenarios: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

/// Final combined artifact returned to the caller
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AnalyzeResponse {
    pub detected: DetectedInfo,
    pub analysis: TechnicalAnalysis,
    pub realtime: RealtimeData,
    pub decision: TradingDecision,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn realtime_data_uses_camel_case_wire_names() {
        let data = RealtimeData {
            current_price: 100000.0,
            price_change_24h: "2.45".to_string(),
            volume_24h: Some("12345.6".to_string()),
        };

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["currentPrice"], 100000.0);
        assert_eq!(json["priceChange24h"], "2.45");
        assert_eq!(json["volume24h"], "12345.6");
    }

    #[test]
    fn decision_union_picks_standard_shape() {
        let raw = r#"{
            "spot": {"action": "accumulate", "priceZone": "64000-66000", "logic": "trend intact"},
            "futures": {"bias": "long", "entry": "break of 72000", "stopLoss": "below 64000", "riskReward": "1:2"},
            "priceRange": "65000-75000",
            "risks": ["macro disappointment", "false breakout", "stop hunts"]
        }"#;

        let decision: TradingDecision = serde_json::from_str(raw).unwrap();
        match decision {
            TradingDecision::Standard(d) => {
                assert_eq!(d.futures.bias, Bias::Long);
                assert_eq!(d.risks.len(), 3);
                assert!(d.options.is_none());
            }
            TradingDecision::Intelligent(_) => panic!("expected standard shape"),
        }
    }

    #[test]
    fn decision_union_picks_intelligent_shape() {
        let raw = r#"{
            "macroEvents": [{"date": "2024-06-12", "event": "FOMC", "importance": "high"}],
            "probability": {"bullish": 45, "bearish": 30, "neutral": 25, "reasoning": "funding positive"},
            "spot": {"action": "hold", "priceZone": "64000-66000", "logic": "wait for confirmation"},
            "futures": {"bias": "neutral", "entry": "none", "stopLoss": "n/a", "riskReward": "n/a"},
            "options": {"strategy": "straddle", "logic": "event week"},
            "reasoning": "mixed signals into FOMC"
        }"#;

        let decision: TradingDecision = serde_json::from_str(raw).unwrap();
        match decision {
            TradingDecision::Intelligent(d) => {
                assert_eq!(d.macro_events.len(), 1);
                assert_eq!(d.macro_events[0].importance, Importance::High);
                assert_eq!(d.probability.bullish, 45.0);
            }
            TradingDecision::Standard(_) => panic!("expected intelligent shape"),
        }
    }

    #[test]
    fn indicator_readings_use_constrained_values() {
        let raw = r#"{
            "macd": {"trend": "bullish", "signal": "golden cross forming"},
            "rsi": {"value": 72.5, "signal": "overbought"},
            "bollingerBands": {"position": "upper", "squeeze": false},
            "volume": {"trend": "increasing", "anomaly": true}
        }"#;

        let indicators: TechnicalIndicators = serde_json::from_str(raw).unwrap();
        assert_eq!(indicators.macd.as_ref().unwrap().trend, MacdTrend::Bullish);
        assert_eq!(indicators.rsi.as_ref().unwrap().signal, RsiSignal::Overbought);
        assert_eq!(
            indicators.bollinger_bands.as_ref().unwrap().position,
            BandPosition::Upper
        );
        assert_eq!(indicators.volume.as_ref().unwrap().trend, VolumeTrend::Increasing);

        let err = serde_json::from_str::<TechnicalIndicators>(
            r#"{"rsi": {"value": 50, "signal": "sideways"}}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn missing_indicators_deserialize_as_none() {
        let raw = r#"{
            "trend": "up",
            "support": ["64000"],
            "resistance": ["72000"],
            "marketState": "breakout",
            "volatility": "medium",
            "confidence": 0.75
        }"#;

        let analysis: TechnicalAnalysis = serde_json::from_str(raw).unwrap();
        assert!(analysis.indicators.is_none());
        assert!(analysis.pattern.is_none());
        assert_eq!(analysis.trend, Trend::Up);
    }
}
