//! Parallel specialist dispatch with failure isolation.
//!
//! The dispatcher takes the raw `Action Input` payload of a
//! `call_specialists` action, parses it into per-specialist tasks, runs
//! the specialists (inline for one, under a bounded worker pool for
//! more), and folds the results back into a single observation. A
//! failing specialist never takes the batch down: its slot carries a
//! labeled error line instead.

use std::collections::HashSet;
use std::sync::Arc;
use thrive_agents::{Specialist, SpecialistId, SpecialistRegistry};
use thrive_core::{ProgressEvent, ProgressSink, StepRecord};
use tokio::sync::{mpsc, Semaphore};
use tracing::{info, warn};

/// Specialists running at once, regardless of batch size.
const MAX_CONCURRENT: usize = 3;

const PARSE_DIAGNOSTIC: &str =
    "No valid specialist calls found in Action Input. Use format: SpecialistName | task";

const SUMMARY_MAX_CHARS: usize = 100;

/// Runs batches of specialist tasks against the registry.
pub struct Dispatcher {
    registry: Arc<SpecialistRegistry>,
}

impl Dispatcher {
    /// Create a dispatcher over a registry.
    pub fn new(registry: Arc<SpecialistRegistry>) -> Self {
        Self { registry }
    }

    /// Run one `call_specialists` payload.
    ///
    /// Returns the aggregated observation (blocks in request order) and
    /// the step records accumulated across all specialists. Never
    /// errors: parse problems, unknown names, repeat consultations, and
    /// specialist failures all become labeled text in the observation.
    /// Specialists already in `consulted` are not re-invoked.
    pub async fn dispatch(
        &self,
        payload: &str,
        consulted: &mut HashSet<SpecialistId>,
        progress: &dyn ProgressSink,
    ) -> (String, Vec<StepRecord>) {
        let calls = parse_task_lines(payload);
        if calls.is_empty() {
            return (PARSE_DIAGNOSTIC.to_string(), Vec::new());
        }

        let mut blocks: Vec<Option<String>> = vec![None; calls.len()];
        let mut steps: Vec<StepRecord> = Vec::new();
        let mut runnable: Vec<(usize, SpecialistId, Arc<dyn Specialist>, String)> = Vec::new();
        let mut requested: Vec<String> = Vec::new();

        for (index, (name, task)) in calls.into_iter().enumerate() {
            match self.registry.dispatch(&name) {
                Ok(specialist) => {
                    let id = specialist.id();
                    requested.push(id.display_name().to_string());
                    if consulted.insert(id) {
                        runnable.push((index, id, specialist, task));
                    } else {
                        blocks[index] = Some(format!("[{id}]: Already consulted this turn."));
                    }
                }
                Err(e) => {
                    warn!(specialist = %name, error = %e, "Specialist dispatch refused");
                    requested.push(name.clone());
                    steps.push(StepRecord::error(&name, &task, &e.to_string()));
                    blocks[index] = Some(format!("[{name}] Error: {e}"));
                }
            }
        }

        // The batch event keys on how many tasks were requested, not on
        // how many survive refusal.
        if requested.len() >= 2 {
            info!(specialists = ?requested, "Dispatching specialist batch");
            progress.emit(ProgressEvent::SpecialistsDispatched {
                specialists: requested,
            });
        }

        match runnable.len() {
            0 => {}
            1 => {
                if let Some((index, id, specialist, task)) = runnable.pop() {
                    let (block, task_steps) =
                        run_one(id, specialist.as_ref(), &task, progress).await;
                    blocks[index] = Some(block);
                    steps.extend(task_steps);
                }
            }
            _ => {
                self.run_pool(runnable, &mut blocks, &mut steps, progress)
                    .await;
            }
        }

        let observation = blocks
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join("\n\n");
        (observation, steps)
    }

    /// Run two or more tasks under the worker pool. Done events fire in
    /// completion order; result blocks keep request order.
    async fn run_pool(
        &self,
        runnable: Vec<(usize, SpecialistId, Arc<dyn Specialist>, String)>,
        blocks: &mut [Option<String>],
        steps: &mut Vec<StepRecord>,
        progress: &dyn ProgressSink,
    ) {
        let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT));
        let expected = runnable.len();
        let (tx, mut rx) = mpsc::channel(expected);

        for (index, id, specialist, task) in runnable {
            progress.emit(ProgressEvent::SpecialistStart {
                specialist: id.display_name().to_string(),
                task: task.clone(),
            });
            let semaphore = Arc::clone(&semaphore);
            let tx = tx.clone();
            tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                let result = specialist.run(&task).await;
                let _ = tx.send((index, id, task, result)).await;
            });
        }
        drop(tx);

        // Per-slot step batches so the flattened trail keeps request order.
        let mut step_slots: Vec<Vec<StepRecord>> = vec![Vec::new(); blocks.len()];
        while let Some((index, id, task, result)) = rx.recv().await {
            match result {
                Ok(outcome) => {
                    progress.emit(ProgressEvent::SpecialistDone {
                        specialist: id.display_name().to_string(),
                        summary: summarize(&outcome.answer),
                    });
                    blocks[index] = Some(format!("[{id}]: {}", outcome.answer));
                    step_slots[index] = outcome.steps;
                }
                Err(e) => {
                    warn!(specialist = %id, error = %e, "Specialist failed");
                    progress.emit(ProgressEvent::SpecialistDone {
                        specialist: id.display_name().to_string(),
                        summary: format!("Error: {e}"),
                    });
                    blocks[index] = Some(format!("[{id}] Error: {e}"));
                    step_slots[index] = vec![StepRecord::error(id.module_name(), &task, &e.to_string())];
                }
            }
        }
        steps.extend(step_slots.into_iter().flatten());
    }
}

/// Run a single task inline, with the same events and error capture as
/// the pooled path.
async fn run_one(
    id: SpecialistId,
    specialist: &dyn Specialist,
    task: &str,
    progress: &dyn ProgressSink,
) -> (String, Vec<StepRecord>) {
    progress.emit(ProgressEvent::SpecialistStart {
        specialist: id.display_name().to_string(),
        task: task.to_string(),
    });
    match specialist.run(task).await {
        Ok(outcome) => {
            progress.emit(ProgressEvent::SpecialistDone {
                specialist: id.display_name().to_string(),
                summary: summarize(&outcome.answer),
            });
            (format!("[{id}]: {}", outcome.answer), outcome.steps)
        }
        Err(e) => {
            warn!(specialist = %id, error = %e, "Specialist failed");
            progress.emit(ProgressEvent::SpecialistDone {
                specialist: id.display_name().to_string(),
                summary: format!("Error: {e}"),
            });
            (
                format!("[{id}] Error: {e}"),
                vec![StepRecord::error(id.module_name(), task, &e.to_string())],
            )
        }
    }
}

/// Parse `Name | task` lines. Lines without a separator or with an empty
/// side are dropped; if that leaves nothing but the payload does contain
/// a separator, the whole payload is retried as a single line.
fn parse_task_lines(payload: &str) -> Vec<(String, String)> {
    let mut calls: Vec<(String, String)> = payload.trim().lines().filter_map(parse_line).collect();
    if calls.is_empty() && payload.contains('|') {
        calls = parse_line(payload.trim()).into_iter().collect();
    }
    calls
}

fn parse_line(line: &str) -> Option<(String, String)> {
    let (name, task) = line.split_once('|')?;
    let name = name.trim();
    let task = task.trim();
    if name.is_empty() || task.is_empty() {
        return None;
    }
    Some((name.to_string(), task.to_string()))
}

/// First sentence of the first line, capped at 100 characters.
pub(crate) fn summarize(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or("");
    let sentence = first_line.split(". ").next().unwrap_or(first_line);
    if sentence.chars().count() > SUMMARY_MAX_CHARS {
        let truncated: String = sentence.chars().take(SUMMARY_MAX_CHARS).collect();
        format!("{truncated}...")
    } else {
        sentence.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;
    use thrive_agents::SpecialistOutcome;
    use thrive_core::{NullSink, ThriveError, ThriveResult};

    /// Stub specialist: answers after an optional delay, or fails.
    struct Stub {
        id: SpecialistId,
        delay_ms: u64,
        fail: bool,
    }

    #[async_trait]
    impl Specialist for Stub {
        fn id(&self) -> SpecialistId {
            self.id
        }

        async fn run(&self, task: &str) -> ThriveResult<SpecialistOutcome> {
            if self.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            }
            if self.fail {
                return Err(ThriveError::Agent("scripted failure".to_string()));
            }
            Ok(SpecialistOutcome {
                answer: format!("answer to: {task}"),
                steps: vec![StepRecord::error(self.id.module_name(), task, "none")],
            })
        }
    }

    fn registry(stubs: Vec<Stub>) -> Arc<SpecialistRegistry> {
        let mut registry = SpecialistRegistry::new();
        for stub in stubs {
            registry.register(Arc::new(stub));
        }
        Arc::new(registry)
    }

    fn stub(id: SpecialistId) -> Stub {
        Stub {
            id,
            delay_ms: 0,
            fail: false,
        }
    }

    struct Recorder(Mutex<Vec<ProgressEvent>>);

    impl Recorder {
        fn new() -> Self {
            Self(Mutex::new(Vec::new()))
        }

        fn events(&self) -> Vec<ProgressEvent> {
            self.0.lock().unwrap().clone()
        }
    }

    impl ProgressSink for Recorder {
        fn emit(&self, event: ProgressEvent) {
            self.0.lock().unwrap().push(event);
        }
    }

    #[test]
    fn test_task_line_parsing_drops_malformed_lines() {
        let calls = parse_task_lines(
            "Nutrition Expert | list snacks\nnot a call\n | empty name\nWellness Coach | sleep tips",
        );
        assert_eq!(
            calls,
            vec![
                ("Nutrition Expert".to_string(), "list snacks".to_string()),
                ("Wellness Coach".to_string(), "sleep tips".to_string()),
            ]
        );
    }

    #[test]
    fn test_parsing_retries_whole_payload_as_one_line() {
        let calls = parse_task_lines("Nutrition Expert |\n protein snacks");
        assert_eq!(
            calls,
            vec![("Nutrition Expert".to_string(), "protein snacks".to_string())]
        );
    }

    #[tokio::test]
    async fn test_empty_payload_yields_syntax_diagnostic() {
        let dispatcher = Dispatcher::new(registry(vec![]));
        let mut consulted = HashSet::new();
        let (observation, steps) = dispatcher
            .dispatch("go do things", &mut consulted, &NullSink)
            .await;
        assert_eq!(observation, PARSE_DIAGNOSTIC);
        assert!(steps.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_specialist_becomes_labeled_error() {
        let dispatcher = Dispatcher::new(registry(vec![stub(SpecialistId::NutritionExpert)]));
        let mut consulted = HashSet::new();
        let (observation, steps) = dispatcher
            .dispatch(
                "Tarot Reader | read the cards\nNutrition Expert | snacks",
                &mut consulted,
                &NullSink,
            )
            .await;
        assert!(observation.contains("[Tarot Reader] Error: Unknown specialist: Tarot Reader"));
        assert!(observation.contains("[Nutrition Expert]: answer to: snacks"));
        assert!(steps
            .iter()
            .any(|s| s.response["error"].as_str() == Some("Unknown specialist: Tarot Reader")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_blocks_keep_request_order_under_reversed_completion() {
        let dispatcher = Dispatcher::new(registry(vec![
            Stub {
                id: SpecialistId::NutritionExpert,
                delay_ms: 500,
                fail: false,
            },
            Stub {
                id: SpecialistId::WellnessCoach,
                delay_ms: 10,
                fail: false,
            },
        ]));
        let recorder = Recorder::new();
        let mut consulted = HashSet::new();
        let (observation, _) = dispatcher
            .dispatch(
                "Nutrition Expert | slow task\nWellness Coach | fast task",
                &mut consulted,
                &recorder,
            )
            .await;

        let nutrition = observation.find("[Nutrition Expert]").unwrap();
        let wellness = observation.find("[Wellness Coach]").unwrap();
        assert!(nutrition < wellness, "request order must win: {observation}");

        // Done events arrive in completion order, fast specialist first.
        let done: Vec<String> = recorder
            .events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::SpecialistDone { specialist, .. } => Some(specialist),
                _ => None,
            })
            .collect();
        assert_eq!(done, vec!["Wellness Coach", "Nutrition Expert"]);
    }

    #[tokio::test]
    async fn test_single_failure_does_not_poison_the_batch() {
        let dispatcher = Dispatcher::new(registry(vec![
            stub(SpecialistId::NutritionExpert),
            Stub {
                id: SpecialistId::ScienceResearcher,
                delay_ms: 0,
                fail: true,
            },
            stub(SpecialistId::WellnessCoach),
        ]));
        let mut consulted = HashSet::new();
        let (observation, steps) = dispatcher
            .dispatch(
                "Nutrition Expert | a\nScience Researcher | b\nWellness Coach | c",
                &mut consulted,
                &NullSink,
            )
            .await;

        assert!(observation.contains("[Nutrition Expert]: answer to: a"));
        assert!(observation.contains("[Science Researcher] Error: Agent error: scripted failure"));
        assert!(observation.contains("[Wellness Coach]: answer to: c"));
        assert_eq!(steps.len(), 3);
    }

    #[tokio::test]
    async fn test_batch_event_fires_even_when_refusals_leave_one_runnable() {
        let dispatcher = Dispatcher::new(registry(vec![stub(SpecialistId::NutritionExpert)]));
        let recorder = Recorder::new();
        let mut consulted = HashSet::new();
        let (observation, _) = dispatcher
            .dispatch(
                "Tarot Reader | read the cards\nNutrition Expert | snacks",
                &mut consulted,
                &recorder,
            )
            .await;
        assert!(observation.contains("[Nutrition Expert]: answer to: snacks"));

        let dispatched = recorder.events().into_iter().find_map(|e| match e {
            ProgressEvent::SpecialistsDispatched { specialists } => Some(specialists),
            _ => None,
        });
        assert_eq!(dispatched.unwrap(), vec!["Tarot Reader", "Nutrition Expert"]);
    }

    #[tokio::test]
    async fn test_repeat_consultation_is_blocked() {
        let dispatcher = Dispatcher::new(registry(vec![stub(SpecialistId::NutritionExpert)]));
        let mut consulted = HashSet::new();
        dispatcher
            .dispatch("Nutrition Expert | first", &mut consulted, &NullSink)
            .await;
        let (observation, steps) = dispatcher
            .dispatch("Nutrition Expert | again", &mut consulted, &NullSink)
            .await;
        assert_eq!(observation, "[Nutrition Expert]: Already consulted this turn.");
        assert!(steps.is_empty());
    }

    #[test]
    fn test_summarize_takes_first_sentence_and_caps_length() {
        assert_eq!(summarize("Eat more beans. Also lentils."), "Eat more beans");
        assert_eq!(summarize("first line\nsecond line"), "first line");
        let long = "x".repeat(150);
        let summary = summarize(&long);
        assert_eq!(summary.chars().count(), SUMMARY_MAX_CHARS + 3);
        assert!(summary.ends_with("..."));
    }
}
