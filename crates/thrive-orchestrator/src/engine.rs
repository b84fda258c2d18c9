//! The supervising reasoning loop and the turn-level entry point.

use crate::dispatcher::{summarize, Dispatcher};
use crate::extract;
use std::collections::HashSet;
use std::sync::Arc;
use thrive_agents::{classify_verb, parse_reasoning, ReasoningStep, SpecialistRegistry, Verb};
use thrive_core::{
    ChatMessage, ProgressEvent, ProgressSink, Role, StepRecord, ThriveResult,
};
use thrive_llm::ChatClient;
use thrive_memory::ProfileStore;
use tracing::{debug, info};

/// Supervisor reasoning iterations before synthesis is forced.
const MAX_ITERATIONS: usize = 4;
/// History turns rendered into the prompt.
const HISTORY_WINDOW: usize = 10;
const MODULE: &str = "orchestrator";

const SYSTEM_PROMPT: &str = "You are the supervisor of a team of three specialists:
- Nutrition Expert: food composition, macros, calories, meal planning, energy needs.
- Science Researcher: scientific literature lookups.
- Wellness Coach: sleep, stress, exercise, habits.

You have two actions:
- call_specialists: delegate work. In Action Input, put one specialist per line in the format: SpecialistName | task
- finish: deliver the final answer to the user in Action Input.

Rules:
- You are responsible for the final answer; review what the specialists report before finishing.
- Never call a specialist again once it has reported this turn.
- If the request is off-topic for the team, answer it briefly yourself with finish.
- Always give the user an answer.

Respond in exactly this format:
Thought: <your reasoning>
Action: <call_specialists or finish>
Action Input: <specialist lines, or the final answer>";

const SYNTHESIS_PROMPT: &str = "The consultation budget for this turn is spent. Compose \
the final answer from the findings below. Discard anything irrelevant or contradictory, \
and answer the user's request directly.";

/// What a completed turn hands back to the boundary.
#[derive(Debug)]
pub struct TurnOutcome {
    /// The final answer text.
    pub answer: String,
    /// Audit trail of every reasoning call and specialist invocation.
    pub steps: Vec<StepRecord>,
}

/// The top-level coaching engine: one instance serves many turns.
///
/// All collaborators are injected; business-level degradation (unknown
/// specialists, failed searches, exhausted iteration budgets) is folded
/// into the answer, and only reasoning-call or configuration failures
/// surface as errors.
pub struct Coach {
    client: Arc<dyn ChatClient>,
    dispatcher: Dispatcher,
    profiles: Arc<dyn ProfileStore>,
}

impl Coach {
    /// Create a coach over a chat client, a specialist registry, and a
    /// profile store.
    pub fn new(
        client: Arc<dyn ChatClient>,
        registry: Arc<SpecialistRegistry>,
        profiles: Arc<dyn ProfileStore>,
    ) -> Self {
        Self {
            client,
            dispatcher: Dispatcher::new(registry),
            profiles,
        }
    }

    /// Run one conversational turn to completion.
    pub async fn run_turn(
        &self,
        request: &str,
        history: &[ChatMessage],
        progress: &dyn ProgressSink,
    ) -> ThriveResult<TurnOutcome> {
        info!(request_chars = request.len(), "Turn started");
        progress.emit(ProgressEvent::OrchestratorStart);
        extract::apply(self.profiles.as_ref(), request).await;

        let profile_summary = self.profiles.get_profile_summary().await;
        let mut scratchpad = String::new();
        let mut steps: Vec<StepRecord> = Vec::new();
        let mut consulted = HashSet::new();

        for iteration in 1..=MAX_ITERATIONS {
            progress.emit(ProgressEvent::OrchestratorThinking { iteration });
            let messages =
                build_messages(SYSTEM_PROMPT, request, history, &profile_summary, &scratchpad);
            let completion = self.client.chat(&messages).await?;
            steps.push(StepRecord::chat(MODULE, &messages, completion.raw));

            let step = parse_reasoning(&completion.content);
            debug!(iteration, action = %step.action, "Supervisor step");
            if !step.thought.is_empty() {
                progress.emit(ProgressEvent::OrchestratorThought {
                    preview: summarize(&step.thought),
                });
            }

            match classify_verb(&step.action) {
                Verb::Finish(payload) => {
                    progress.emit(ProgressEvent::Composing);
                    let answer = payload.unwrap_or_else(|| step.action_input.clone());
                    info!(iterations = iteration, "Turn finished");
                    return Ok(TurnOutcome { answer, steps });
                }
                Verb::CallSpecialists => {
                    let (observation, specialist_steps) = self
                        .dispatcher
                        .dispatch(&step.action_input, &mut consulted, progress)
                        .await;
                    steps.extend(specialist_steps);
                    push_quadruple(&mut scratchpad, &step, &observation);
                }
                Verb::Other(action) => {
                    let observation = if action.is_empty() {
                        "No action found. Use call_specialists or finish.".to_string()
                    } else {
                        format!("Unknown action: {action}. Use call_specialists or finish.")
                    };
                    push_quadruple(&mut scratchpad, &step, &observation);
                }
            }
        }

        info!("Iteration budget exhausted, forcing synthesis");
        progress.emit(ProgressEvent::Composing);
        let messages = build_messages(
            SYNTHESIS_PROMPT,
            request,
            history,
            &profile_summary,
            &format!("{scratchpad}Compose the final answer now."),
        );
        let completion = self.client.chat(&messages).await?;
        steps.push(StepRecord::chat(MODULE, &messages, completion.raw));
        Ok(TurnOutcome {
            answer: completion.content,
            steps,
        })
    }
}

/// Assemble the user-side prompt: profile block, recent history, the
/// request, and the scratchpad of prior iterations.
fn build_messages(
    system_prompt: &str,
    request: &str,
    history: &[ChatMessage],
    profile_summary: &str,
    scratchpad: &str,
) -> Vec<ChatMessage> {
    let mut content = String::new();
    if !profile_summary.is_empty() {
        content.push_str(&format!("Known user profile:\n{profile_summary}\n\n"));
    }

    let recent_start = history.len().saturating_sub(HISTORY_WINDOW);
    let recent = &history[recent_start..];
    if !recent.is_empty() {
        content.push_str("Conversation so far:\n");
        for message in recent {
            content.push_str(&format!("{}: {}\n", role_label(message.role), message.content));
        }
        content.push('\n');
    }

    content.push_str(&format!("User request: {request}\n\n{scratchpad}"));
    vec![
        ChatMessage::system(system_prompt),
        ChatMessage::user(content),
    ]
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "User",
        Role::Assistant => "Assistant",
        Role::System => "System",
    }
}

fn push_quadruple(scratchpad: &mut String, step: &ReasoningStep, observation: &str) {
    scratchpad.push_str(&format!(
        "Thought: {}\nAction: {}\nAction Input: {}\nObservation: {}\n\n",
        step.thought, step.action, step.action_input, observation
    ));
}
