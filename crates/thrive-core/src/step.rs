use crate::message::ChatMessage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One audit entry capturing an external call made during a turn.
///
/// A record is appended for every reasoning call (orchestrator or
/// specialist) and every specialist invocation, including failed ones.
/// The collection for a turn is owned by the top-level call and handed
/// back to the boundary layer for traceability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    /// The agent or specialist that made the call.
    pub module: String,
    /// The request payload (chat messages or a task description).
    pub prompt: serde_json::Value,
    /// The raw response payload, or an error marker for failed calls.
    pub response: serde_json::Value,
    /// UTC timestamp of when the record was created.
    pub created_at: DateTime<Utc>,
}

impl StepRecord {
    /// Creates a step record from arbitrary prompt/response payloads.
    pub fn new(
        module: impl Into<String>,
        prompt: serde_json::Value,
        response: serde_json::Value,
    ) -> Self {
        Self {
            module: module.into(),
            prompt,
            response,
            created_at: Utc::now(),
        }
    }

    /// Creates a step record for a reasoning call.
    pub fn chat(
        module: impl Into<String>,
        messages: &[ChatMessage],
        raw_response: serde_json::Value,
    ) -> Self {
        Self::new(
            module,
            serde_json::json!({ "messages": messages }),
            raw_response,
        )
    }

    /// Creates a step record for a failed call, keeping the error in the
    /// audit trail instead of losing it.
    pub fn error(module: impl Into<String>, task: &str, error: &str) -> Self {
        Self::new(
            module,
            serde_json::json!({ "task": task }),
            serde_json::json!({ "error": error }),
        )
    }
}
