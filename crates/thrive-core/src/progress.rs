use serde::Serialize;

/// A live status event emitted while a turn is running.
///
/// Events are advisory: they exist so a caller can render progress while
/// the loop works, and losing them never affects the turn outcome.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// The orchestrator began analyzing the request.
    OrchestratorStart,
    /// The orchestrator is about to make a reasoning call.
    OrchestratorThinking {
        /// 1-based loop iteration.
        iteration: usize,
    },
    /// A short preview of the orchestrator's latest thought.
    OrchestratorThought {
        /// Truncated thought text.
        preview: String,
    },
    /// Two or more specialists were dispatched in parallel.
    SpecialistsDispatched {
        /// Display names of all dispatched specialists, in request order.
        specialists: Vec<String>,
    },
    /// A specialist began working on its task.
    SpecialistStart {
        /// Display name of the specialist.
        specialist: String,
        /// The task it was handed.
        task: String,
    },
    /// A specialist finished (in completion order, not request order).
    SpecialistDone {
        /// Display name of the specialist.
        specialist: String,
        /// First-line summary of its answer.
        summary: String,
    },
    /// The final answer is being composed.
    Composing,
}

impl ProgressEvent {
    /// Human-readable status line for this event.
    pub fn message(&self) -> String {
        match self {
            Self::OrchestratorStart => "Analyzing your question...".to_string(),
            Self::OrchestratorThinking { iteration } => {
                if *iteration == 1 {
                    "Deciding which experts to consult...".to_string()
                } else {
                    "Reviewing specialist findings...".to_string()
                }
            }
            Self::OrchestratorThought { preview } => preview.clone(),
            Self::SpecialistsDispatched { specialists } => format!(
                "Consulting {} specialists in parallel: {}",
                specialists.len(),
                specialists.join(", ")
            ),
            Self::SpecialistStart { specialist, task } => {
                format!("{specialist} is researching: {task}")
            }
            Self::SpecialistDone { specialist, .. } => format!("{specialist} found results"),
            Self::Composing => "Composing your answer...".to_string(),
        }
    }
}

/// One-way sink for [`ProgressEvent`]s.
///
/// Implementations must never block the loop for long and must never
/// fail it; emission is fire-and-forget.
pub trait ProgressSink: Send + Sync {
    /// Deliver one event.
    fn emit(&self, event: ProgressEvent);
}

/// A sink that discards every event. Used when the caller did not ask
/// for progress updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _event: ProgressEvent) {}
}
