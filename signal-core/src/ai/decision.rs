//! Decision synthesis client
//!
//! Combines the vision result with live market data into a structured trading
//! recommendation. Two prompt schemas exist, one per deployment variant, and
//! they are not interchangeable: the standard schema carries a flat price
//! range plus risks, the intelligent schema carries macro events and a
//! probability distribution.

use super::client::{ChatBackend, ChatMessage, ChatRequest};
use super::extract::parse_response;
use crate::error::AnalysisResult;
use crate::types::{
    FundingRateData, ImageAnalysis, IntelligentDecision, OpenInterestData, RealtimeData,
    StandardDecision,
};

const DECISION_TEMPERATURE: f64 = 0.5;
const DECISION_MAX_TOKENS: u32 = 1500;

/// Funding rate magnitude below which sentiment reads as neutral
pub const FUNDING_NEUTRAL_BAND: f64 = 0.0001;

/// Coarse crowd-positioning label derived from the current funding rate.
/// Embedded as plain prompt text to bias the model's qualitative reasoning;
/// never asserted as ground truth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FundingSentiment {
    Bullish,
    Bearish,
    Neutral,
}

impl FundingSentiment {
    pub fn from_rate(rate: f64) -> Self {
        if rate > FUNDING_NEUTRAL_BAND {
            Self::Bullish
        } else if rate < -FUNDING_NEUTRAL_BAND {
            Self::Bearish
        } else {
            Self::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bullish => "bullish (longs paying shorts)",
            Self::Bearish => "bearish (shorts paying longs)",
            Self::Neutral => "neutral",
        }
    }
}

/// Mean of the recent funding samples; 0 when no history survived the fetch.
pub fn average_rate(rates: &[f64]) -> f64 {
    if rates.is_empty() {
        return 0.0;
    }
    rates.iter().sum::<f64>() / rates.len() as f64
}

/// Inputs for the standard (macro-scenario) variant
pub struct StandardContext<'a> {
    pub image_analysis: &'a ImageAnalysis,
    pub realtime: &'a RealtimeData,
    pub macro_scenarios: &'a [String],
    pub period: &'a str,
}

/// Inputs for the intelligent (derivatives-sentiment) variant
pub struct IntelligentContext<'a> {
    pub image_analysis: &'a ImageAnalysis,
    pub realtime: &'a RealtimeData,
    pub funding: &'a FundingRateData,
    pub open_interest: &'a OpenInterestData,
}

/// Client for the text-model decision step.
pub struct DecisionSynthesizer<C: ChatBackend> {
    backend: C,
    model: String,
}

impl<C: ChatBackend> DecisionSynthesizer<C> {
    pub fn new(backend: C, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
        }
    }

    pub async fn synthesize_standard(
        &self,
        ctx: &StandardContext<'_>,
    ) -> AnalysisResult<StandardDecision> {
        let prompt = standard_prompt(ctx);
        let content = self.complete_text(prompt).await?;
        parse_response(&content)
    }

    pub async fn synthesize_intelligent(
        &self,
        ctx: &IntelligentContext<'_>,
    ) -> AnalysisResult<IntelligentDecision> {
        let prompt = intelligent_prompt(ctx);
        let content = self.complete_text(prompt).await?;
        parse_response(&content)
    }

    async fn complete_text(&self, prompt: String) -> AnalysisResult<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user_text(prompt)],
            temperature: DECISION_TEMPERATURE,
            max_tokens: DECISION_MAX_TOKENS,
        };
        self.backend.complete(request).await
    }
}

fn standard_prompt(ctx: &StandardContext<'_>) -> String {
    let analysis_json = serde_json::to_string_pretty(ctx.image_analysis)
        .unwrap_or_else(|_| "{}".to_string());
    let macro_text = if ctx.macro_scenarios.is_empty() {
        "No specific macro scenario".to_string()
    } else {
        ctx.macro_scenarios.join(", ")
    };

    format!(
        r#"You are a professional cryptocurrency trading advisor.

[Image analysis result]
{analysis_json}

[Realtime market data]
Pair: {symbol}
Current price: {price}
24h change: {change}%

[Macro scenarios]
{macro_text}

Produce trading advice for the coming {period}:

Requirements:
- Spot: accumulate/hold/reduce, with a precise price zone derived from the realtime data
- Futures: long/short bias, entry trigger, stop loss
- Options: an optional strategy suggestion (calls/puts, spreads)
- Blend the chart read with the realtime precision
- Risks: at least 3 items
- Avoid absolute statements; phrase in conditions and probabilities

Answer strictly in this JSON format:
{{
  "spot": {{
    "action": "accumulate on pullbacks",
    "priceZone": "64000-66000",
    "logic": "trend intact, pullback to support is a favourable entry"
  }},
  "futures": {{
    "bias": "long",
    "entry": "retest after breaking 72000",
    "stopLoss": "below 64000",
    "riskReward": "at least 1:2"
  }},
  "options": {{
    "strategy": "buy calls or a bull call spread",
    "logic": "rising volatility favours directional plays, spread caps cost"
  }},
  "priceRange": "expected 65000-75000 over the coming week",
  "risks": [
    "macro expectations failing could trigger a sharp drop",
    "false breakout followed by reversal",
    "stops vulnerable in a high volatility regime"
  ]
}}"#,
        symbol = ctx.image_analysis.detected.symbol,
        price = ctx.realtime.current_price,
        change = ctx.realtime.price_change_24h,
        period = ctx.period,
    )
}

fn intelligent_prompt(ctx: &IntelligentContext<'_>) -> String {
    let analysis_json = serde_json::to_string_pretty(ctx.image_analysis)
        .unwrap_or_else(|_| "{}".to_string());
    let avg_rate = average_rate(&ctx.funding.recent_rates);
    let sentiment = FundingSentiment::from_rate(ctx.funding.current_rate);

    format!(
        r#"You are a professional cryptocurrency trading advisor.

[Image analysis result]
{analysis_json}

[Realtime market data]
Pair: {symbol}
Current price: {price}
24h change: {change}%

[Derivatives sentiment]
Current funding rate: {current_rate}
Average of recent funding rates: {avg_rate}
Crowd positioning: {sentiment}
Next funding time (epoch ms): {next_funding}
Open interest: {oi} contracts, notional {oi_value}

[Macro calendar]
From your own knowledge, list the relevant macro events of the coming week
(FOMC, CPI, payrolls, ...) with date and importance. Best effort; mark
uncertain dates as such.

Requirements:
- Spot: accumulate/hold/reduce with a precise price zone
- Futures: long/short bias, entry trigger, stop loss
- Options: strategy suggestion
- Probability distribution over bullish/bearish/neutral for the coming week,
  summing to 100, with its reasoning
- Treat the funding and open-interest figures as sentiment hints, not truth
- Avoid absolute statements

Answer strictly in this JSON format:
{{
  "macroEvents": [
    {{"date": "2024-06-12", "event": "FOMC rate decision", "importance": "high", "expectedImpact": "volatility spike"}}
  ],
  "probability": {{
    "bullish": 45,
    "bearish": 30,
    "neutral": 25,
    "reasoning": "trend up but funding crowded"
  }},
  "spot": {{
    "action": "accumulate on pullbacks",
    "priceZone": "64000-66000",
    "logic": "trend intact, pullback to support is a favourable entry"
  }},
  "futures": {{
    "bias": "long",
    "entry": "retest after breaking 72000",
    "stopLoss": "below 64000",
    "riskReward": "at least 1:2"
  }},
  "options": {{
    "strategy": "buy calls or a bull call spread",
    "logic": "event week, spreads cap premium outlay"
  }},
  "reasoning": "overall synthesis of chart, funding and calendar"
}}"#,
        symbol = ctx.image_analysis.detected.symbol,
        price = ctx.realtime.current_price,
        change = ctx.realtime.price_change_24h,
        current_rate = ctx.funding.current_rate,
        avg_rate = avg_rate,
        sentiment = sentiment.as_str(),
        next_funding = ctx.funding.next_funding_time,
        oi = ctx.open_interest.open_interest,
        oi_value = ctx.open_interest.open_interest_value,
    )
}
