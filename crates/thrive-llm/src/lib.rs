//! Reasoning-model client for the Thrive engine.
//!
//! The engine treats the model as an opaque request/response function:
//! an ordered list of chat messages in, assistant text plus the raw API
//! payload out. The raw payload is kept verbatim so every call can be
//! audited through step records.
//!
//! [`ChatClient`] is the seam: production code uses [`OpenAiClient`]
//! against any OpenAI-compatible endpoint, tests use
//! [`mock::ScriptedClient`].

/// Model endpoint configuration.
pub mod config;
/// Scripted in-process client for tests.
pub mod mock;
/// OpenAI-compatible HTTP backend.
pub mod openai;

pub use config::ModelConfig;
pub use mock::ScriptedClient;
pub use openai::OpenAiClient;

use async_trait::async_trait;
use thrive_core::{ChatMessage, ThriveResult};

/// The assistant text plus the raw provider payload for audit logging.
#[derive(Debug, Clone)]
pub struct ChatCompletion {
    /// Assistant message content.
    pub content: String,
    /// The provider response as received, for step records.
    pub raw: serde_json::Value,
}

/// An opaque chat-completion function.
///
/// Implementations must fail with an error on empty or absent output
/// rather than returning an empty completion.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send one chat completion request.
    async fn chat(&self, messages: &[ChatMessage]) -> ThriveResult<ChatCompletion>;
}
