//! Error taxonomy for the analysis pipeline

use thiserror::Error;

/// Custom result type for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Fatal error conditions of the analysis pipeline.
///
/// Funding-rate and open-interest fetch failures are deliberately absent:
/// those calls degrade to a zeroed default instead of failing.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("AI credential not configured: {message}")]
    Configuration { message: String },

    #[error("AI API error {status}: {message}")]
    AiApi { status: u16, message: String },

    #[error("AI response malformed: {detail}")]
    AiResponseMalformed { detail: String },

    #[error("market data unavailable for {symbol} (status {status})")]
    MarketDataUnavailable { symbol: String, status: u16 },

    #[error("detected symbol {detected} does not match prefetched market data for {expected}")]
    SymbolMismatch { expected: String, detected: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
