//! Research specialist: live literature search with static fallback.

use crate::react::tool_argument;
use crate::registry::{Specialist, SpecialistId, SpecialistOutcome};
use crate::runner::{self, ToolSet};
use async_trait::async_trait;
use std::sync::Arc;
use thrive_core::ThriveResult;
use thrive_llm::ChatClient;
use thrive_memory::PubMedSearch;

const SYSTEM_PROMPT: &str = "You are a scientific researcher. You answer health and \
nutrition questions by consulting the research literature.

You have these tools:
- search_research(<query>): search research abstracts for the query.
- finish: give your final answer in Action Input, citing PMIDs where available.

Respond in exactly this format:
Thought: <your reasoning>
Action: <one tool name>
Action Input: <the tool argument or your final answer>";

const EMPTY_SEARCH: &str = "No research data found.";
const MAX_RESULTS: usize = 3;

/// The literature-search seam, so tests can script results.
#[async_trait]
pub trait LiveSearch: Send + Sync {
    /// Search abstracts. Empty string when nothing is found; never raises.
    async fn search(&self, query: &str, max_results: usize) -> String;
}

#[async_trait]
impl LiveSearch for PubMedSearch {
    async fn search(&self, query: &str, max_results: usize) -> String {
        PubMedSearch::search(self, query, max_results).await
    }
}

/// The research specialist.
pub struct ResearchAgent {
    client: Arc<dyn ChatClient>,
    search: Arc<dyn LiveSearch>,
}

impl ResearchAgent {
    /// Create the specialist over a chat client and a literature search.
    pub fn new(client: Arc<dyn ChatClient>, search: Arc<dyn LiveSearch>) -> Self {
        Self { client, search }
    }
}

#[async_trait]
impl ToolSet for ResearchAgent {
    fn names(&self) -> &'static [&'static str] {
        &["search_research"]
    }

    async fn invoke(&self, action: &str, input: &str) -> Option<String> {
        let query = tool_argument(action, input, "search_research")?;
        let results = self.search.search(&query, MAX_RESULTS).await;
        Some(if results.is_empty() {
            EMPTY_SEARCH.to_string()
        } else {
            results
        })
    }
}

#[async_trait]
impl Specialist for ResearchAgent {
    fn id(&self) -> SpecialistId {
        SpecialistId::ScienceResearcher
    }

    async fn run(&self, task: &str) -> ThriveResult<SpecialistOutcome> {
        runner::drive_loop(self.client.as_ref(), self.id(), SYSTEM_PROMPT, self, task).await
    }
}
