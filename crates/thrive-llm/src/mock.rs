use crate::{ChatClient, ChatCompletion};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use thrive_core::{ChatMessage, ThriveError, ThriveResult};

/// A chat client that replays a fixed script of responses.
///
/// Each call pops the next scripted response; running past the script is
/// an error so tests notice unexpected extra reasoning calls. Every
/// request transcript is recorded for assertions.
pub struct ScriptedClient {
    script: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
    /// When set, every call fails with this message instead.
    failure: Option<String>,
}

impl ScriptedClient {
    /// Create a client that returns the given responses in order.
    pub fn new(responses: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            script: Mutex::new(responses.into_iter().map(Into::into).collect()),
            calls: Mutex::new(Vec::new()),
            failure: None,
        }
    }

    /// Create a client whose every call fails (credential errors etc).
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            failure: Some(message.into()),
        }
    }

    /// Number of chat calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    /// The message transcript of the nth call.
    pub fn call(&self, n: usize) -> Option<Vec<ChatMessage>> {
        self.calls.lock().ok()?.get(n).cloned()
    }
}

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn chat(&self, messages: &[ChatMessage]) -> ThriveResult<ChatCompletion> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(messages.to_vec());
        }

        if let Some(message) = &self.failure {
            return Err(ThriveError::Http(message.clone()));
        }

        let next = self
            .script
            .lock()
            .ok()
            .and_then(|mut s| s.pop_front())
            .ok_or_else(|| ThriveError::Agent("scripted client exhausted".to_string()))?;

        Ok(ChatCompletion {
            raw: serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": next}}],
                "scripted": true,
            }),
            content: next,
        })
    }
}
