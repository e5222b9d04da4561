//! AI provider integration
//!
//! Configuration resolution, the chat-completions transport, free-text JSON
//! extraction and the two prompt-building clients (vision, decision).

pub mod client;
pub mod config;
pub mod decision;
pub mod extract;
pub mod vision;

pub use client::{ChatBackend, ChatMessage, ChatRequest, HttpChatBackend, MessageContent};
pub use config::{AiConfig, AiProvider};
pub use decision::{
    average_rate, DecisionSynthesizer, FundingSentiment, IntelligentContext, StandardContext,
};
pub use extract::{extract_json, parse_response};
pub use vision::VisionAnalyst;
