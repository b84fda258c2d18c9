//! Nutrition specialist: food-database retrieval plus the TDEE tool.

use crate::react::tool_argument;
use crate::registry::{Specialist, SpecialistId, SpecialistOutcome};
use crate::runner::{self, ToolSet};
use crate::tdee::calculate_tdee;
use async_trait::async_trait;
use std::sync::Arc;
use thrive_core::ThriveResult;
use thrive_llm::ChatClient;
use thrive_memory::ContextSource;

const SYSTEM_PROMPT: &str = "You are a nutrition expert. You answer questions about \
food composition, macros, calories, and meal planning.

You have these tools:
- search_nutrition(<query>): look up food composition data. Always call this first.
- calculate_tdee(weight=<kg>, height=<cm>, age=<years>, sex=<male|female>, activity=<level>): \
compute daily energy needs.
- finish: give your final answer in Action Input.

Respond in exactly this format:
Thought: <your reasoning>
Action: <one tool name>
Action Input: <the tool argument or your final answer>";

const EMPTY_SEARCH: &str = "No nutrition data found.";

/// The nutrition specialist.
pub struct NutritionAgent {
    client: Arc<dyn ChatClient>,
    context: Arc<dyn ContextSource>,
}

impl NutritionAgent {
    /// Create the specialist over a chat client and the nutrition
    /// retrieval source.
    pub fn new(client: Arc<dyn ChatClient>, context: Arc<dyn ContextSource>) -> Self {
        Self { client, context }
    }
}

#[async_trait]
impl ToolSet for NutritionAgent {
    fn names(&self) -> &'static [&'static str] {
        &["search_nutrition", "calculate_tdee"]
    }

    async fn invoke(&self, action: &str, input: &str) -> Option<String> {
        if let Some(query) = tool_argument(action, input, "search_nutrition") {
            let context = self.context.get_context(&query).await;
            return Some(if context.is_empty() {
                EMPTY_SEARCH.to_string()
            } else {
                context
            });
        }
        tool_argument(action, input, "calculate_tdee").map(|params| calculate_tdee(&params))
    }
}

#[async_trait]
impl Specialist for NutritionAgent {
    fn id(&self) -> SpecialistId {
        SpecialistId::NutritionExpert
    }

    async fn run(&self, task: &str) -> ThriveResult<SpecialistOutcome> {
        runner::drive_loop(self.client.as_ref(), self.id(), SYSTEM_PROMPT, self, task).await
    }
}
