//! Deterministic energy-expenditure tool (Mifflin-St Jeor).
//!
//! This is the one specialist tool that never touches a model or the
//! network: given body stats it computes BMR, TDEE, calorie targets,
//! and a protein range. Malformed input yields a usage string rather
//! than an error, so the calling loop can feed it straight back as an
//! observation.

/// Activity multipliers applied to BMR.
const ACTIVITY_FACTORS: [(&str, f64); 5] = [
    ("sedentary", 1.2),
    ("light", 1.375),
    ("moderate", 1.55),
    ("active", 1.725),
    ("very_active", 1.9),
];

const DEFAULT_ACTIVITY: &str = "moderate";
const DEFICIT_KCAL: i64 = 500;
const SURPLUS_KCAL: i64 = 300;
const PROTEIN_LOW_G_PER_KG: f64 = 1.2;
const PROTEIN_HIGH_G_PER_KG: f64 = 2.0;

const USAGE: &str = "Could not parse TDEE input. Expected: \
weight=<kg>, height=<cm>, age=<years>, sex=<male|female>[, activity=<level>]";

/// A fully computed energy breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyBreakdown {
    /// Basal metabolic rate, rounded to whole kcal.
    pub bmr: i64,
    /// Total daily energy expenditure, rounded to whole kcal.
    pub tdee: i64,
    /// Activity level the TDEE was computed for.
    pub activity: String,
    /// TDEE minus the weight-loss deficit.
    pub weight_loss_target: i64,
    /// TDEE plus the muscle-gain surplus.
    pub muscle_gain_target: i64,
    /// Daily protein range in grams, rounded.
    pub protein_g: (i64, i64),
}

/// Compute the breakdown from raw body stats.
///
/// BMR is rounded to whole kcal before the activity multiplier is
/// applied, and the product is rounded again; downstream targets are
/// plain integer offsets from the rounded TDEE.
pub fn energy_breakdown(
    weight_kg: f64,
    height_cm: f64,
    age_years: u32,
    sex: &str,
    activity: &str,
) -> EnergyBreakdown {
    let sex_term = if sex.eq_ignore_ascii_case("female") {
        -161.0
    } else {
        5.0
    };
    let bmr_raw = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age_years) + sex_term;
    let bmr = bmr_raw.round() as i64;

    let activity = normalize_activity(activity);
    let factor = ACTIVITY_FACTORS
        .iter()
        .find(|(name, _)| *name == activity)
        .map_or(1.55, |(_, f)| *f);
    let tdee = (bmr as f64 * factor).round() as i64;

    EnergyBreakdown {
        bmr,
        tdee,
        activity,
        weight_loss_target: tdee - DEFICIT_KCAL,
        muscle_gain_target: tdee + SURPLUS_KCAL,
        protein_g: (
            (weight_kg * PROTEIN_LOW_G_PER_KG).round() as i64,
            (weight_kg * PROTEIN_HIGH_G_PER_KG).round() as i64,
        ),
    }
}

fn normalize_activity(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase().replace([' ', '-'], "_");
    if ACTIVITY_FACTORS.iter().any(|(name, _)| *name == lowered) {
        lowered
    } else {
        DEFAULT_ACTIVITY.to_string()
    }
}

/// Tool entry point: parse `key=value` pairs and render the breakdown
/// as observation text. Parse failures return the usage string.
pub fn calculate_tdee(params: &str) -> String {
    let mut weight = None;
    let mut height = None;
    let mut age = None;
    let mut sex = None;
    let mut activity = DEFAULT_ACTIVITY.to_string();

    for pair in params.split(',') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let key = key.trim().to_lowercase();
        let value = value.trim();
        if key.starts_with("weight") {
            weight = value.parse::<f64>().ok();
        } else if key.starts_with("height") {
            height = value.parse::<f64>().ok();
        } else if key.starts_with("age") {
            age = value.parse::<u32>().ok();
        } else if key.starts_with("sex") {
            sex = Some(value.to_lowercase());
        } else if key.starts_with("activity") {
            activity = value.to_string();
        }
    }

    let (Some(weight), Some(height), Some(age), Some(sex)) = (weight, height, age, sex) else {
        return USAGE.to_string();
    };

    let breakdown = energy_breakdown(weight, height, age, &sex, &activity);
    format!(
        "BMR: {bmr} kcal\n\
         TDEE ({activity}): {tdee} kcal/day\n\
         Weight loss target: {loss} kcal/day\n\
         Muscle gain target: {gain} kcal/day\n\
         Protein range: {p_low}-{p_high} g/day",
        bmr = breakdown.bmr,
        activity = breakdown.activity,
        tdee = breakdown.tdee,
        loss = breakdown.weight_loss_target,
        gain = breakdown.muscle_gain_target,
        p_low = breakdown.protein_g.0,
        p_high = breakdown.protein_g.1,
    )
}
