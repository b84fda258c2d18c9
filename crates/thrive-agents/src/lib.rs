//! Domain specialists for Thrive.
//!
//! This crate holds the reasoning-step parser shared by the orchestrator
//! and the specialists, the specialist registry with alias resolution,
//! and the three specialists themselves (nutrition, research, wellness),
//! each running a bounded tool loop with forced synthesis.

pub mod nutrition;
pub mod react;
pub mod registry;
pub mod research;
mod runner;
pub mod tdee;
pub mod wellness;

pub use nutrition::NutritionAgent;
pub use react::{classify_verb, finish_payload, parse_reasoning, tool_argument, ReasoningStep, Verb};
pub use registry::{resolve, Resolved, Specialist, SpecialistId, SpecialistOutcome, SpecialistRegistry};
pub use research::{LiveSearch, ResearchAgent};
pub use tdee::{calculate_tdee, energy_breakdown, EnergyBreakdown};
pub use wellness::WellnessAgent;
