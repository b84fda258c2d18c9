//! Specialist identities, alias resolution, and the dispatch registry.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thrive_core::{StepRecord, ThriveError, ThriveResult};

/// The three domain specialists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialistId {
    /// Food composition, macros, and energy math.
    NutritionExpert,
    /// Scientific literature lookups.
    ScienceResearcher,
    /// Sleep, stress, exercise, habits.
    WellnessCoach,
}

impl SpecialistId {
    /// Canonical display name, used in prompts, observations, and
    /// progress events.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::NutritionExpert => "Nutrition Expert",
            Self::ScienceResearcher => "Science Researcher",
            Self::WellnessCoach => "Wellness Coach",
        }
    }

    /// Snake-case identifier used as the `module` field of step records.
    pub fn module_name(self) -> &'static str {
        match self {
            Self::NutritionExpert => "nutrition_expert",
            Self::ScienceResearcher => "science_researcher",
            Self::WellnessCoach => "wellness_coach",
        }
    }

    /// All known specialists.
    pub fn all() -> [SpecialistId; 3] {
        [
            Self::NutritionExpert,
            Self::ScienceResearcher,
            Self::WellnessCoach,
        ]
    }
}

impl fmt::Display for SpecialistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Outcome of an alias lookup. Unknown names keep their trimmed raw
/// spelling so error reports can echo what the model actually wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// A known specialist.
    Known(SpecialistId),
    /// Not in the alias table; carries the trimmed original.
    Unknown(String),
}

/// Resolve a raw specialist name, case-insensitively, against the alias
/// table.
pub fn resolve(raw: &str) -> Resolved {
    let trimmed = raw.trim();
    let id = match trimmed.to_lowercase().as_str() {
        "nutrition" | "nutrition expert" | "nutritionexpert" | "nutritionist" => {
            SpecialistId::NutritionExpert
        }
        "science" | "researcher" | "science researcher" | "scienceresearcher" | "research" => {
            SpecialistId::ScienceResearcher
        }
        "wellness" | "coach" | "wellness coach" | "wellnesscoach" => SpecialistId::WellnessCoach,
        _ => return Resolved::Unknown(trimmed.to_string()),
    };
    Resolved::Known(id)
}

/// What a specialist hands back: the answer text plus the audit records
/// accumulated while producing it.
#[derive(Debug, Clone)]
pub struct SpecialistOutcome {
    /// Final answer text.
    pub answer: String,
    /// Audit trail of every reasoning call made.
    pub steps: Vec<StepRecord>,
}

/// A domain specialist, as the dispatcher sees one.
#[async_trait]
pub trait Specialist: Send + Sync {
    /// Which specialist this is.
    fn id(&self) -> SpecialistId;

    /// Work the delegated task to completion.
    async fn run(&self, task: &str) -> ThriveResult<SpecialistOutcome>;
}

/// Lookup table from identity to running specialist.
#[derive(Default)]
pub struct SpecialistRegistry {
    specialists: HashMap<SpecialistId, Arc<dyn Specialist>>,
}

impl SpecialistRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a specialist under its own identity.
    pub fn register(&mut self, specialist: Arc<dyn Specialist>) {
        self.specialists.insert(specialist.id(), specialist);
    }

    /// Look up a specialist by identity.
    pub fn get(&self, id: SpecialistId) -> Option<Arc<dyn Specialist>> {
        self.specialists.get(&id).map(Arc::clone)
    }

    /// Resolve a raw name and return the matching specialist, or the
    /// unknown-specialist error carrying the raw name.
    pub fn dispatch(&self, raw: &str) -> ThriveResult<Arc<dyn Specialist>> {
        match resolve(raw) {
            Resolved::Known(id) => self
                .get(id)
                .ok_or_else(|| ThriveError::UnknownSpecialist(id.display_name().to_string())),
            Resolved::Unknown(name) => Err(ThriveError::UnknownSpecialist(name)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_resolve_case_insensitively() {
        assert_eq!(
            resolve("  Nutrition Expert "),
            Resolved::Known(SpecialistId::NutritionExpert)
        );
        assert_eq!(resolve("NUTRITION"), Resolved::Known(SpecialistId::NutritionExpert));
        assert_eq!(
            resolve("researcher"),
            Resolved::Known(SpecialistId::ScienceResearcher)
        );
        assert_eq!(resolve("WellnessCoach"), Resolved::Known(SpecialistId::WellnessCoach));
    }

    #[test]
    fn test_unknown_names_pass_through_trimmed() {
        assert_eq!(
            resolve("  Tarot Reader  "),
            Resolved::Unknown("Tarot Reader".to_string())
        );
    }

    struct Echo(SpecialistId);

    #[async_trait]
    impl Specialist for Echo {
        fn id(&self) -> SpecialistId {
            self.0
        }

        async fn run(&self, task: &str) -> ThriveResult<SpecialistOutcome> {
            Ok(SpecialistOutcome {
                answer: format!("echo: {task}"),
                steps: Vec::new(),
            })
        }
    }

    #[tokio::test]
    async fn test_registry_dispatches_by_alias() {
        let mut registry = SpecialistRegistry::new();
        registry.register(Arc::new(Echo(SpecialistId::WellnessCoach)));

        let specialist = registry.dispatch("coach").unwrap();
        let outcome = specialist.run("sleep tips").await.unwrap();
        assert_eq!(outcome.answer, "echo: sleep tips");
    }

    #[test]
    fn test_registry_reports_unknown_specialist() {
        let registry = SpecialistRegistry::new();
        let err = registry.dispatch("Tarot Reader").err().unwrap();
        assert!(matches!(err, ThriveError::UnknownSpecialist(name) if name == "Tarot Reader"));
    }

    #[test]
    fn test_known_but_unregistered_is_also_unknown() {
        let registry = SpecialistRegistry::new();
        let err = registry.dispatch("nutrition").err().unwrap();
        assert!(matches!(err, ThriveError::UnknownSpecialist(name) if name == "Nutrition Expert"));
    }
}
