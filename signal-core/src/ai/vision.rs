//! Vision analysis client
//!
//! Drives the multimodal model from a chart screenshot to the structured
//! detection + technical analysis shape. Single attempt per invocation.

use super::client::{ChatBackend, ChatMessage, ChatRequest};
use super::extract::parse_response;
use crate::error::AnalysisResult;
use crate::types::ImageAnalysis;

const VISION_TEMPERATURE: f64 = 0.3;
const VISION_MAX_TOKENS: u32 = 1000;

const VISION_PROMPT: &str = r#"You are a professional cryptocurrency technical analyst.

Analyze this candlestick chart screenshot and complete the following tasks:

[Detection]
1. Identify the trading pair (e.g. BTC/USDT, ETH/USDT)
2. Identify the timeframe (e.g. 1H, 4H, 1D)
3. Identify the approximate current price range

[Technical Analysis]
4. Determine the overall trend (up/down/range)
5. Identify key support and resistance levels (approximate is fine)
6. Identify significant chart patterns (triangles, double tops, head & shoulders, ...)
7. Determine the market state (breakout/pullback/range)
8. Assess the volatility level from candle amplitude
9. If indicator panes are visible (MACD, RSI, Bollinger Bands, volume), read them;
   omit any indicator that is not visible

[Important]
- Analyze only what is visible in the image
- Price levels may be approximate ranges
- If the image is blurry or incomplete, reflect that in confidence

Answer strictly in this JSON format:
{
  "detected": {
    "symbol": "BTCUSDT",
    "timeframe": "4H",
    "priceRange": "64000-72000"
  },
  "analysis": {
    "trend": "up",
    "indicators": {
      "macd": {"trend": "bullish", "signal": "golden cross forming"},
      "rsi": {"value": 62, "signal": "neutral"}
    },
    "support": ["around 64000", "around 62000"],
    "resistance": ["around 72000", "around 75000"],
    "pattern": "ascending_triangle",
    "marketState": "breakout",
    "volatility": "medium",
    "confidence": 0.75
  }
}"#;

/// Client for the image-to-structure step.
pub struct VisionAnalyst<C: ChatBackend> {
    backend: C,
    model: String,
}

impl<C: ChatBackend> VisionAnalyst<C> {
    pub fn new(backend: C, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
        }
    }

    /// Submit the screenshot with the fixed instruction prompt and parse the
    /// constrained JSON result out of the model's free text.
    pub async fn analyze_image(&self, image_base64: &str) -> AnalysisResult<ImageAnalysis> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user_with_image(VISION_PROMPT, image_base64)],
            temperature: VISION_TEMPERATURE,
            max_tokens: VISION_MAX_TOKENS,
        };

        let content = self.backend.complete(request).await?;
        parse_response(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use async_trait::async_trait;

    struct CannedBackend(&'static str);

    #[async_trait]
    impl ChatBackend for CannedBackend {
        async fn complete(&self, request: ChatRequest) -> AnalysisResult<String> {
            assert_eq!(request.model, "test-vision");
            assert_eq!(request.max_tokens, 1000);
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn extracts_analysis_from_prose_wrapped_json() {
        let backend = CannedBackend(
            r#"Sure, here is the structured read of your chart:
{"detected":{"symbol":"BTCUSDT","timeframe":"4H","priceRange":"64000-72000"},"analysis":{"trend":"up","support":["64000"],"resistance":["72000"],"marketState":"breakout","volatility":"medium","confidence":0.75}}
Trade carefully."#,
        );
        let analyst = VisionAnalyst::new(backend, "test-vision");

        let result = analyst.analyze_image("data:image/png;base64,AAAA").await.unwrap();
        assert_eq!(result.detected.symbol, "BTCUSDT");
        assert_eq!(result.detected.timeframe, "4H");
        assert_eq!(result.analysis.confidence, 0.75);
        assert!(result.analysis.indicators.is_none());
    }

    #[tokio::test]
    async fn prose_without_json_is_malformed() {
        let backend = CannedBackend("I am unable to read this screenshot clearly.");
        let analyst = VisionAnalyst::new(backend, "test-vision");

        let err = analyst.analyze_image("data:image/png;base64,AAAA").await.unwrap_err();
        assert!(matches!(err, AnalysisError::AiResponseMalformed { .. }));
    }
}
