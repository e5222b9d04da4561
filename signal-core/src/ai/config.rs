//! AI provider selection and credentials
//!
//! Which credential is present is the sole signal for which provider to
//! target. Resolution happens once per request, before any network call, so a
//! missing credential fails fast as a configuration error.

use std::env;

use crate::error::{AnalysisError, AnalysisResult};

pub const OPENROUTER_API_KEY_VAR: &str = "OPENROUTER_API_KEY";
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

const OPENROUTER_REFERER: &str = "https://signal-crypto.vercel.app";
const OPENROUTER_TITLE: &str = "Signal Trading Assistant";

/// Supported chat-completion providers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AiProvider {
    OpenRouter,
    OpenAi,
}

/// Resolved provider configuration for one request
#[derive(Clone, Debug)]
pub struct AiConfig {
    pub provider: AiProvider,
    pub api_key: String,
    pub base_url: String,
    pub vision_model: String,
    pub text_model: String,
    /// Attribution headers required by OpenRouter, absent for OpenAI
    pub referer: Option<String>,
    pub title: Option<String>,
}

impl AiConfig {
    /// Resolve from the process environment. OpenRouter wins when both keys
    /// are set.
    pub fn from_env() -> AnalysisResult<Self> {
        Self::resolve(
            env::var(OPENROUTER_API_KEY_VAR).ok(),
            env::var(OPENAI_API_KEY_VAR).ok(),
        )
    }

    /// Pure resolution from explicit credential values.
    pub fn resolve(
        openrouter_key: Option<String>,
        openai_key: Option<String>,
    ) -> AnalysisResult<Self> {
        let non_empty = |key: Option<String>| key.filter(|k| !k.trim().is_empty());

        if let Some(api_key) = non_empty(openrouter_key) {
            return Ok(Self {
                provider: AiProvider::OpenRouter,
                api_key,
                base_url: OPENROUTER_BASE_URL.to_string(),
                vision_model: "anthropic/claude-3.5-sonnet".to_string(),
                text_model: "anthropic/claude-3.5-sonnet".to_string(),
                referer: Some(OPENROUTER_REFERER.to_string()),
                title: Some(OPENROUTER_TITLE.to_string()),
            });
        }

        if let Some(api_key) = non_empty(openai_key) {
            return Ok(Self {
                provider: AiProvider::OpenAi,
                api_key,
                base_url: OPENAI_BASE_URL.to_string(),
                vision_model: "gpt-4-vision-preview".to_string(),
                text_model: "gpt-4-turbo-preview".to_string(),
                referer: None,
                title: None,
            });
        }

        Err(AnalysisError::Configuration {
            message: format!("set {OPENROUTER_API_KEY_VAR} or {OPENAI_API_KEY_VAR}"),
        })
    }
}
