//! Analysis orchestration
//!
//! Sequences vision analysis, market data and decision synthesis into one
//! end-to-end operation. The success path is linear; the first unrecovered
//! component error aborts the whole request and propagates unchanged.

use std::sync::Arc;

use tracing::info;

use crate::ai::client::{ChatBackend, HttpChatBackend};
use crate::ai::config::AiConfig;
use crate::ai::decision::{DecisionSynthesizer, IntelligentContext, StandardContext};
use crate::ai::vision::VisionAnalyst;
use crate::error::{AnalysisError, AnalysisResult};
use crate::market_data::{symbol, BinanceMarketData, MarketDataSource};
use crate::types::{AnalyzeRequest, AnalyzeResponse, TradingDecision};

/// Symbol the intelligent variant prefetches market data for while the vision
/// call is still running.
pub const DEFAULT_PREFETCH_SYMBOL: &str = "BTCUSDT";

const DEFAULT_PERIOD: &str = "1w";

/// Deployment variant of the decision step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnalysisMode {
    /// Vision first, then market data keyed by the detected symbol
    #[default]
    Standard,
    /// Market data prefetched for [`DEFAULT_PREFETCH_SYMBOL`] in parallel
    /// with vision, validated post hoc against the detected asset family
    Intelligent,
}

impl AnalysisMode {
    pub fn from_env() -> Self {
        match std::env::var("ANALYSIS_MODE") {
            Ok(value) if value.eq_ignore_ascii_case("intelligent") => Self::Intelligent,
            _ => Self::Standard,
        }
    }
}

/// End-to-end analysis pipeline over a chat backend and a market data source.
pub struct AnalysisPipeline<C: ChatBackend, M: MarketDataSource> {
    vision: VisionAnalyst<Arc<C>>,
    decision: DecisionSynthesizer<Arc<C>>,
    market: M,
    mode: AnalysisMode,
}

impl<M: MarketDataSource> AnalysisPipeline<HttpChatBackend, M> {
    /// Wire the pipeline to the configured provider's HTTP backend.
    pub fn with_config(config: AiConfig, market: M, mode: AnalysisMode) -> Self {
        let vision_model = config.vision_model.clone();
        let text_model = config.text_model.clone();
        Self::new(HttpChatBackend::new(config), market, mode, vision_model, text_model)
    }
}

impl AnalysisPipeline<HttpChatBackend, BinanceMarketData> {
    /// Resolve credentials from the environment and target Binance.
    /// Fails fast with a configuration error before any network call.
    pub fn from_env(mode: AnalysisMode) -> AnalysisResult<Self> {
        let config = AiConfig::from_env()?;
        Ok(Self::with_config(config, BinanceMarketData::new(), mode))
    }
}

impl<C: ChatBackend, M: MarketDataSource> AnalysisPipeline<C, M> {
    pub fn new(
        backend: C,
        market: M,
        mode: AnalysisMode,
        vision_model: impl Into<String>,
        text_model: impl Into<String>,
    ) -> Self {
        let backend = Arc::new(backend);
        Self {
            vision: VisionAnalyst::new(backend.clone(), vision_model),
            decision: DecisionSynthesizer::new(backend, text_model),
            market,
            mode,
        }
    }

    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    /// Run one analysis request to completion.
    pub async fn run(&self, request: &AnalyzeRequest) -> AnalysisResult<AnalyzeResponse> {
        match self.mode {
            AnalysisMode::Standard => self.run_standard(request).await,
            AnalysisMode::Intelligent => self.run_intelligent(&request.image).await,
        }
    }

    /// Standard ordering: the market data key is only known once vision has
    /// detected the symbol, so the steps are strictly sequential.
    async fn run_standard(&self, request: &AnalyzeRequest) -> AnalysisResult<AnalyzeResponse> {
        let image_analysis = self.vision.analyze_image(&request.image).await?;
        let normalized = symbol::normalize(&image_analysis.detected.symbol);
        info!(
            symbol = %normalized,
            confidence = image_analysis.analysis.confidence,
            "vision analysis complete"
        );

        let realtime = self.market.fetch_spot(&normalized).await?;

        let empty = Vec::new();
        let macro_scenarios = request.macro_scenarios.as_ref().unwrap_or(&empty);
        let period = request.period.as_deref().unwrap_or(DEFAULT_PERIOD);
        let decision = self
            .decision
            .synthesize_standard(&StandardContext {
                image_analysis: &image_analysis,
                realtime: &realtime,
                macro_scenarios,
                period,
            })
            .await?;
        info!(symbol = %normalized, "decision synthesis complete");

        let mut detected = image_analysis.detected;
        detected.symbol = normalized;
        Ok(AnalyzeResponse {
            detected,
            analysis: image_analysis.analysis,
            realtime,
            decision: TradingDecision::Standard(decision),
        })
    }

    /// Intelligent ordering: prefetch all market data for the default symbol
    /// concurrently with the vision call, trading a wasted fetch when the
    /// guess is wrong for lower latency when it is right.
    async fn run_intelligent(&self, image: &str) -> AnalysisResult<AnalyzeResponse> {
        let prefetch = DEFAULT_PREFETCH_SYMBOL;
        let (vision_result, spot_result, funding, open_interest) = tokio::join!(
            self.vision.analyze_image(image),
            self.market.fetch_spot(prefetch),
            self.market.fetch_funding_rate(prefetch),
            self.market.fetch_open_interest(prefetch),
        );

        let image_analysis = vision_result?;
        let realtime = spot_result?;

        let normalized = symbol::normalize(&image_analysis.detected.symbol);
        if symbol::base_asset(&normalized) != symbol::base_asset(prefetch) {
            return Err(AnalysisError::SymbolMismatch {
                expected: prefetch.to_string(),
                detected: normalized,
            });
        }
        info!(
            symbol = %normalized,
            funding_rate = funding.current_rate,
            "prefetched market data validated"
        );

        let decision = self
            .decision
            .synthesize_intelligent(&IntelligentContext {
                image_analysis: &image_analysis,
                realtime: &realtime,
                funding: &funding,
                open_interest: &open_interest,
            })
            .await?;
        info!(symbol = %normalized, "decision synthesis complete");

        let mut detected = image_analysis.detected;
        detected.symbol = normalized;
        Ok(AnalyzeResponse {
            detected,
            analysis: image_analysis.analysis,
            realtime,
            decision: TradingDecision::Intelligent(decision),
        })
    }
}
