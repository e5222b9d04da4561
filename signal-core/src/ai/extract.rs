//! JSON extraction from free-text model output
//!
//! The model is told to answer with a single JSON object but routinely wraps
//! it in prose. The contract here mirrors a greedy `{...}` match: first `{`
//! to last `}`. Anything that then fails to parse is a malformed-response
//! error, never a transport error.

use serde::de::DeserializeOwned;

use crate::error::{AnalysisError, AnalysisResult};

/// Slice out the first-`{`-to-last-`}` candidate object.
pub fn extract_json(text: &str) -> AnalysisResult<&str> {
    let start = text.find('{').ok_or_else(|| AnalysisError::AiResponseMalformed {
        detail: "no JSON object in model output".to_string(),
    })?;
    let end = text
        .rfind('}')
        .filter(|end| *end > start)
        .ok_or_else(|| AnalysisError::AiResponseMalformed {
            detail: "unterminated JSON object in model output".to_string(),
        })?;

    Ok(&text[start..=end])
}

/// Extract and parse the model output into the expected shape.
pub fn parse_response<T: DeserializeOwned>(text: &str) -> AnalysisResult<T> {
    let candidate = extract_json(text)?;
    serde_json::from_str(candidate).map_err(|err| AnalysisError::AiResponseMalformed {
        detail: err.to_string(),
    })
}
