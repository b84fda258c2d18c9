//! Built-in demo corpora so retrieval answers without external services.

/// Seed chunks per retrieval namespace.
pub const SEEDS: [(&str, &[&str]); 4] = [
    (
        "openfoodfacts",
        &[
            "Rolled oats: 389 kcal per 100g, 13.2g protein, 10.1g fiber, low sugar.",
            "Canned chickpeas: 139 kcal per 100g, 7g protein, 6g fiber.",
            "Greek yogurt (plain, whole): 97 kcal per 100g, 9g protein, 5g fat.",
            "Peanut butter: 588 kcal per 100g, 25g protein, high in unsaturated fat.",
        ],
    ),
    (
        "usda",
        &[
            "Chicken breast, cooked: 165 kcal per 100g, 31g protein, 3.6g fat.",
            "Lentils, boiled: 116 kcal per 100g, 9g protein, 8g fiber, rich in iron.",
            "Salmon, Atlantic, cooked: 206 kcal per 100g, 22g protein, rich in omega-3.",
            "Egg, whole, hard-boiled: 155 kcal per 100g, 13g protein.",
        ],
    ),
    (
        "pubmed",
        &[
            "PMID 28642676: Higher protein intake during caloric restriction preserves lean body mass in adults.",
            "PMID 23858091: Dietary fiber intake is associated with reduced cardiovascular risk in prospective cohorts.",
            "PMID 30215930: Creatine monohydrate supplementation improves strength outcomes in resistance training.",
        ],
    ),
    (
        "wellness",
        &[
            "PMID 29073398: Consistent sleep schedules improve sleep quality more than extended weekend sleep.",
            "PMID 26168926: Regular aerobic exercise reduces perceived stress and anxiety symptoms in adults.",
            "PMID 24892891: Mindfulness-based interventions show moderate effects on stress reduction.",
            "PMID 31004881: Daily step counts above 7500 are associated with lower all-cause mortality.",
        ],
    ),
];
