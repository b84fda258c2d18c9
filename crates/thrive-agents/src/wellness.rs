//! Wellness specialist: sleep, stress, exercise, and habit guidance.

use crate::react::tool_argument;
use crate::registry::{Specialist, SpecialistId, SpecialistOutcome};
use crate::runner::{self, ToolSet};
use async_trait::async_trait;
use std::sync::Arc;
use thrive_core::ThriveResult;
use thrive_llm::ChatClient;
use thrive_memory::ContextSource;

const SYSTEM_PROMPT: &str = "You are a wellness coach. You give practical guidance on \
sleep, stress, exercise, and habits, grounded in research.

You have these tools:
- search_wellness(<query>): look up wellness research for the query. Always call this first.
- finish: give your final answer in Action Input.

Respond in exactly this format:
Thought: <your reasoning>
Action: <one tool name>
Action Input: <the tool argument or your final answer>";

const EMPTY_SEARCH: &str = "No wellness research data found.";

/// The wellness specialist.
pub struct WellnessAgent {
    client: Arc<dyn ChatClient>,
    context: Arc<dyn ContextSource>,
}

impl WellnessAgent {
    /// Create the specialist over a chat client and the wellness
    /// retrieval source.
    pub fn new(client: Arc<dyn ChatClient>, context: Arc<dyn ContextSource>) -> Self {
        Self { client, context }
    }
}

#[async_trait]
impl ToolSet for WellnessAgent {
    fn names(&self) -> &'static [&'static str] {
        &["search_wellness"]
    }

    async fn invoke(&self, action: &str, input: &str) -> Option<String> {
        let query = tool_argument(action, input, "search_wellness")?;
        let context = self.context.get_context(&query).await;
        Some(if context.is_empty() {
            EMPTY_SEARCH.to_string()
        } else {
            context
        })
    }
}

#[async_trait]
impl Specialist for WellnessAgent {
    fn id(&self) -> SpecialistId {
        SpecialistId::WellnessCoach
    }

    async fn run(&self, task: &str) -> ThriveResult<SpecialistOutcome> {
        runner::drive_loop(self.client.as_ref(), self.id(), SYSTEM_PROMPT, self, task).await
    }
}
