//! Signal Core Library
//!
//! Analysis pipeline for candlestick-chart screenshots: a multimodal AI call
//! extracts a structured technical read, live exchange data is fetched and
//! reconciled, and a second AI call produces a structured trading decision.
//! Every invocation is pure request/response; nothing persists between calls.

pub mod ai;
pub mod error;
pub mod market_data;
pub mod pipeline;
pub mod scenarios;
pub mod types;

// Re-export main types for easy access
pub use ai::{
    AiConfig, AiProvider, ChatBackend, DecisionSynthesizer, FundingSentiment, HttpChatBackend,
    VisionAnalyst,
};
pub use error::{AnalysisError, AnalysisResult};
pub use market_data::{BinanceMarketData, MarketDataSource};
pub use pipeline::{AnalysisMode, AnalysisPipeline, DEFAULT_PREFETCH_SYMBOL};
pub use scenarios::builtin_scenarios;
pub use types::{
    AnalyzeRequest, AnalyzeResponse, DetectedInfo, FundingRateData, ImageAnalysis,
    IntelligentDecision, OpenInterestData, RealtimeData, StandardDecision, TechnicalAnalysis,
    TradingDecision,
};
