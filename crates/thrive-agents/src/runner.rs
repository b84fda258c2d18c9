//! Shared bounded reasoning loop for the domain specialists.
//!
//! All three specialists run the same shape: at most two reasoning
//! iterations, each feeding the scratchpad of prior tool observations
//! back into the prompt, then a forced synthesis call when the budget
//! runs out without a `finish`.

use crate::react::{finish_payload, parse_reasoning};
use crate::registry::{SpecialistId, SpecialistOutcome};
use async_trait::async_trait;
use thrive_core::{ChatMessage, StepRecord, ThriveResult};
use thrive_llm::ChatClient;
use tracing::debug;

/// Reasoning iterations before synthesis is forced.
pub(crate) const MAX_ITERATIONS: usize = 2;

const SYNTHESIS_PROMPT: &str = "You have gathered all the information available. \
Compose your final answer now. Be structured, cite sources from your observations \
where they exist, and keep the answer under 250 words.";

/// The tool surface a specialist exposes to its loop.
#[async_trait]
pub(crate) trait ToolSet: Send + Sync {
    /// Tool names, quoted in the unknown-action diagnostic.
    fn names(&self) -> &'static [&'static str];

    /// Run whichever tool the action names; `None` when none matches.
    async fn invoke(&self, action: &str, input: &str) -> Option<String>;
}

/// Drive one task through the reasoning loop.
pub(crate) async fn drive_loop(
    client: &dyn ChatClient,
    id: SpecialistId,
    system_prompt: &str,
    tools: &dyn ToolSet,
    task: &str,
) -> ThriveResult<SpecialistOutcome> {
    let mut steps = Vec::new();
    let mut scratchpad = String::new();

    for iteration in 0..MAX_ITERATIONS {
        let messages = vec![
            ChatMessage::system(system_prompt),
            ChatMessage::user(format!("Task: {task}\n\n{scratchpad}")),
        ];
        let completion = client.chat(&messages).await?;
        steps.push(StepRecord::chat(id.module_name(), &messages, completion.raw));

        let step = parse_reasoning(&completion.content);
        debug!(specialist = %id, iteration, action = %step.action, "Specialist step");

        if let Some(answer) = finish_payload(&step.action, &step.action_input) {
            return Ok(SpecialistOutcome { answer, steps });
        }

        let observation = match tools.invoke(&step.action, &step.action_input).await {
            Some(text) => text,
            None => format!(
                "Unknown action: {}. Available actions: {}, finish.",
                step.action,
                tools.names().join(", ")
            ),
        };
        scratchpad.push_str(&format!(
            "Thought: {}\nAction: {}\nAction Input: {}\nObservation: {}\n\n",
            step.thought, step.action, step.action_input, observation
        ));
    }

    debug!(specialist = %id, "Iteration budget exhausted, forcing synthesis");
    let messages = vec![
        ChatMessage::system(SYNTHESIS_PROMPT),
        ChatMessage::user(format!(
            "Task: {task}\n\n{scratchpad}Provide your final answer now."
        )),
    ];
    let completion = client.chat(&messages).await?;
    steps.push(StepRecord::chat(id.module_name(), &messages, completion.raw));
    Ok(SpecialistOutcome {
        answer: completion.content,
        steps,
    })
}
