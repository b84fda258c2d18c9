//! Rule-based profile extraction from free-form user text.
//!
//! Runs before each turn: anything that looks like a body stat, a
//! dietary restriction, or a goal is merged into the profile store so
//! later turns can use it. Extraction is best effort in English and
//! Spanish; nothing here can fail a turn.

use regex::Regex;
use thrive_memory::{ProfileStore, ProfileUpdate};
use tracing::debug;

/// Extract whatever profile fields the text mentions.
pub fn extract_profile(text: &str) -> ProfileUpdate {
    let lowered = text.to_lowercase();
    ProfileUpdate {
        name: capture_str(
            text,
            r"(?i)\b(?:my name is|i'm called|me llamo)\s+([A-Za-zÀ-ÿ]+)",
        ),
        age: capture_num::<u32>(
            text,
            r"(?i)\b(\d{1,3})\s*(?:years?\s*old|year-old|yo\b|años)",
        ),
        weight_kg: capture_num::<f64>(text, r"(?i)\b(\d{2,3}(?:\.\d+)?)\s*(?:kg|kilos?|kilograms?)\b"),
        height_cm: height_cm(text),
        sex: sex(text),
        activity_level: activity_level(&lowered),
        dietary_restrictions: dietary_restrictions(&lowered),
        goals: goals(&lowered),
    }
}

/// Extract from the text and merge into the store. Never fails.
pub async fn apply(store: &dyn ProfileStore, text: &str) {
    let update = extract_profile(text);
    if update.is_empty() {
        return;
    }
    if store.update_profile(update).await {
        debug!("Profile updated from request text");
    }
}

fn capture_str(text: &str, pattern: &str) -> Option<String> {
    let re = Regex::new(pattern).ok()?;
    Some(re.captures(text)?.get(1)?.as_str().to_string())
}

fn capture_num<T: std::str::FromStr>(text: &str, pattern: &str) -> Option<T> {
    capture_str(text, pattern)?.parse().ok()
}

fn height_cm(text: &str) -> Option<f64> {
    if let Some(cm) = capture_num::<f64>(
        text,
        r"(?i)\b(\d{3}(?:\.\d+)?)\s*(?:cm|centimeters?|centímetros)\b",
    ) {
        return Some(cm);
    }
    // "1.75 m" / "mido 1.75"
    capture_num::<f64>(text, r"(?i)\b([12]\.\d{1,2})\s*(?:m\b|meters?|metros)").map(|m| m * 100.0)
}

fn sex(text: &str) -> Option<String> {
    // Female first: "female" would otherwise match the male pattern's
    // alternatives in careless orderings.
    if capture_str(text, r"(?i)\b(female|woman|mujer|femenino)\b").is_some() {
        return Some("female".to_string());
    }
    if capture_str(text, r"(?i)\b(male|man|hombre|varón|masculino)\b").is_some() {
        return Some("male".to_string());
    }
    None
}

fn activity_level(lowered: &str) -> Option<String> {
    let level = if lowered.contains("very active") || lowered.contains("muy activo") {
        "very_active"
    } else if lowered.contains("sedentary") || lowered.contains("sedentari") {
        "sedentary"
    } else if lowered.contains("lightly active") || lowered.contains("light activity") {
        "light"
    } else if lowered.contains("moderate") || lowered.contains("moderad") {
        "moderate"
    } else if lowered.contains("active") || lowered.contains("activo") || lowered.contains("activa")
    {
        "active"
    } else {
        return None;
    };
    Some(level.to_string())
}

fn dietary_restrictions(lowered: &str) -> Option<String> {
    // "vegetariano" also matches the "vegetarian" substring.
    let diet = if lowered.contains("vegetarian") {
        "vegetarian"
    } else if lowered.contains("vegan") {
        "vegan"
    } else if lowered.contains("gluten") {
        "gluten-free"
    } else if lowered.contains("lactose") || lowered.contains("lactosa") {
        "lactose-free"
    } else if lowered.contains("kosher") {
        "kosher"
    } else if lowered.contains("halal") {
        "halal"
    } else {
        return None;
    };
    Some(diet.to_string())
}

fn goals(lowered: &str) -> Option<String> {
    let goal = if lowered.contains("lose weight")
        || lowered.contains("losing weight")
        || lowered.contains("bajar de peso")
        || lowered.contains("perder peso")
        || lowered.contains("adelgazar")
    {
        "weight loss"
    } else if lowered.contains("gain muscle")
        || lowered.contains("build muscle")
        || lowered.contains("ganar músculo")
        || lowered.contains("ganar masa")
    {
        "muscle gain"
    } else if lowered.contains("maintain") || lowered.contains("mantener") {
        "maintenance"
    } else {
        return None;
    };
    Some(goal.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use thrive_memory::InMemoryProfileStore;

    #[test]
    fn test_english_sentence_extracts_all_fields() {
        let update = extract_profile(
            "I'm a 30 years old male, 70 kg, 180 cm, moderately active, vegan, trying to lose weight",
        );
        assert_eq!(update.age, Some(30));
        assert_eq!(update.sex.as_deref(), Some("male"));
        assert_eq!(update.weight_kg, Some(70.0));
        assert_eq!(update.height_cm, Some(180.0));
        assert_eq!(update.activity_level.as_deref(), Some("moderate"));
        assert_eq!(update.dietary_restrictions.as_deref(), Some("vegan"));
        assert_eq!(update.goals.as_deref(), Some("weight loss"));
    }

    #[test]
    fn test_spanish_sentence_extracts_fields() {
        let update = extract_profile(
            "Me llamo Ana, soy mujer, tengo 25 años, peso 60 kg y quiero bajar de peso",
        );
        assert_eq!(update.name.as_deref(), Some("Ana"));
        assert_eq!(update.sex.as_deref(), Some("female"));
        assert_eq!(update.age, Some(25));
        assert_eq!(update.weight_kg, Some(60.0));
        assert_eq!(update.goals.as_deref(), Some("weight loss"));
    }

    #[test]
    fn test_height_in_meters_converts_to_cm() {
        let update = extract_profile("I am 1.75 m tall");
        assert_eq!(update.height_cm, Some(175.0));
    }

    #[test]
    fn test_vegetarian_wins_over_vegan_substring() {
        let update = extract_profile("I'm vegetarian");
        assert_eq!(update.dietary_restrictions.as_deref(), Some("vegetarian"));
    }

    #[test]
    fn test_plain_question_extracts_nothing() {
        assert!(extract_profile("What are good protein sources?").is_empty());
    }

    #[tokio::test]
    async fn test_apply_merges_into_store() {
        let store = InMemoryProfileStore::new();
        apply(&store, "I'm 28 years old and want to gain muscle").await;
        let summary = store.get_profile_summary().await;
        assert!(summary.contains("Age: 28"));
        assert!(summary.contains("Goals: muscle gain"));
    }
}
