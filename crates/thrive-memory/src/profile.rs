use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Everything known about the user, all fields optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    /// Display name.
    pub name: Option<String>,
    /// Age in years.
    pub age: Option<u32>,
    /// "male" or "female" (the BMR formula only knows these two).
    pub sex: Option<String>,
    /// Body mass in kilograms.
    pub weight_kg: Option<f64>,
    /// Height in centimeters.
    pub height_cm: Option<f64>,
    /// sedentary / light / moderate / active / very_active.
    pub activity_level: Option<String>,
    /// Free-text dietary restriction (vegan, kosher, ...).
    pub dietary_restrictions: Option<String>,
    /// Free-text goal (weight loss, muscle gain, ...).
    pub goals: Option<String>,
    /// Last update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// Human-readable summary for the orchestrator prompt; empty string
    /// when nothing is known.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(name) = &self.name {
            parts.push(format!("Name: {name}"));
        }
        if let Some(age) = self.age {
            parts.push(format!("Age: {age}"));
        }
        if let Some(sex) = &self.sex {
            parts.push(format!("Sex: {sex}"));
        }
        if let Some(weight) = self.weight_kg {
            parts.push(format!("Weight: {weight} kg"));
        }
        if let Some(height) = self.height_cm {
            parts.push(format!("Height: {height} cm"));
        }
        if let Some(activity) = &self.activity_level {
            parts.push(format!("Activity: {activity}"));
        }
        if let Some(diet) = &self.dietary_restrictions {
            parts.push(format!("Dietary restrictions: {diet}"));
        }
        if let Some(goals) = &self.goals {
            parts.push(format!("Goals: {goals}"));
        }
        parts.join("\n")
    }
}

/// A partial profile update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// Display name.
    pub name: Option<String>,
    /// Age in years.
    pub age: Option<u32>,
    /// Biological sex.
    pub sex: Option<String>,
    /// Body mass in kilograms.
    pub weight_kg: Option<f64>,
    /// Height in centimeters.
    pub height_cm: Option<f64>,
    /// Activity level keyword.
    pub activity_level: Option<String>,
    /// Dietary restriction keyword.
    pub dietary_restrictions: Option<String>,
    /// Goal keyword.
    pub goals: Option<String>,
}

impl ProfileUpdate {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.sex.is_none()
            && self.weight_kg.is_none()
            && self.height_cm.is_none()
            && self.activity_level.is_none()
            && self.dietary_restrictions.is_none()
            && self.goals.is_none()
    }
}

/// Long-term profile store.
///
/// Contract: never raises to the caller. Updates report success as a
/// boolean; the summary is empty when nothing is known or the backing
/// store is unavailable.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Merge the given fields into the stored profile.
    async fn update_profile(&self, update: ProfileUpdate) -> bool;

    /// Human-readable profile summary, empty if none known.
    async fn get_profile_summary(&self) -> String;
}

/// In-memory profile store for a single default user.
#[derive(Default)]
pub struct InMemoryProfileStore {
    profile: RwLock<Profile>,
}

impl InMemoryProfileStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current profile.
    pub async fn profile(&self) -> Profile {
        self.profile.read().await.clone()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn update_profile(&self, update: ProfileUpdate) -> bool {
        if update.is_empty() {
            return false;
        }
        let mut profile = self.profile.write().await;
        if update.name.is_some() {
            profile.name = update.name;
        }
        if update.age.is_some() {
            profile.age = update.age;
        }
        if update.sex.is_some() {
            profile.sex = update.sex;
        }
        if update.weight_kg.is_some() {
            profile.weight_kg = update.weight_kg;
        }
        if update.height_cm.is_some() {
            profile.height_cm = update.height_cm;
        }
        if update.activity_level.is_some() {
            profile.activity_level = update.activity_level;
        }
        if update.dietary_restrictions.is_some() {
            profile.dietary_restrictions = update.dietary_restrictions;
        }
        if update.goals.is_some() {
            profile.goals = update.goals;
        }
        profile.updated_at = Some(Utc::now());
        true
    }

    async fn get_profile_summary(&self) -> String {
        self.profile.read().await.summary()
    }
}
