//! Deterministic keyword rules mapping merchant + SMS text to a spending Category.
//!
//! No network, no model: substring matches over a fixed table. Categories are
//! checked in table order and the first hit wins, so a merchant matching both
//! a Food and a Shopping keyword is Food.

use taqqafi_core::Category;

/// Keyword table in evaluation order. `Misc` is the fallback and has no keywords.
pub const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Food,
        &[
            "mcdonald", "mcdonalds", "burger king", "kfc", "pizza hut", "dominos", "subway",
            "starbucks", "dunkin", "costa", "jarir bakery", "shutter", "restaurant", "cafe",
            "coffee", "bakery", "kitchen", "grill", "food", "lunch", "dinner", "breakfast",
            "meal", "shawarma", "falafel", "مطعم", "كافيه", "قهوة", "مخبز", "وجبة", "أكل",
            "طعام", "noon food", "hungerstation", "jahez", "toyor",
        ],
    ),
    (
        Category::Transport,
        &[
            "uber", "careem", "taxi", "lyft", "gas", "petrol", "fuel", "aramco", "salik",
            "parking", "metro", "bus", "train", "airline", "saudia", "flynas", "flyadeal",
            "riyadh airport", "jeddah airport", "سيارة", "تاكسي", "وقود", "محطة", "طيران",
            "مطار",
        ],
    ),
    (
        Category::Shopping,
        &[
            "amazon", "noon", "namshi", "sivvi", "shein", "h&m", "zara", "aldo", "nike",
            "adidas", "puma", "apple store", "samsung", "extra", "jarir", "lulu", "carrefour",
            "hyper", "mall", "ikea", "danube", "tamimi", "bin dawood", "تسوق", "متجر", "محل",
            "بوتيك",
        ],
    ),
    (
        Category::Bills,
        &[
            "stc", "mobily", "zain", "electricity", "water", "sec", "sewage", "dewa",
            "kahramaa", "internet", "broadband", "subscription", "netflix", "spotify", "apple",
            "google play", "microsoft", "insurance", "bank charge", "fee", "annual", "فاتورة",
            "اشتراك", "كهرباء", "مياه", "اتصالات",
        ],
    ),
    (
        Category::Health,
        &[
            "pharmacy", "hospital", "clinic", "doctor", "medical", "dentist", "vision", "lab",
            "nahdi", "al dawaa", "binzagr", "chemist", "health", "صيدلية", "مستشفى", "عيادة",
            "طبيب", "دواء",
        ],
    ),
    (
        Category::Entertainment,
        &[
            "cinema", "vox", "muvi", "imax", "reel", "bowl", "game", "playstation", "xbox",
            "steam", "netflix", "spotify", "anghami", "shahid", "sports", "gym", "fitness",
            "سينما", "ترفيه", "ألعاب", "رياضة",
        ],
    ),
    (
        Category::Education,
        &[
            "university", "college", "school", "tuition", "course", "udemy", "coursera", "book",
            "stationary", "جامعة", "مدرسة", "تعليم", "كتاب",
        ],
    ),
];

/// Keywords registered for `category` (empty for `Misc`).
pub fn keywords_for(category: Category) -> &'static [&'static str] {
    CATEGORY_KEYWORDS
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, kws)| *kws)
        .unwrap_or(&[])
}

/// Categorize a transaction from its merchant and raw SMS text.
/// Priority follows `CATEGORY_KEYWORDS` order; no hit at all is `Misc`.
pub fn map_category(merchant: &str, raw_text: &str) -> Category {
    let combined = format!("{} {}", merchant, raw_text).to_lowercase();

    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| combined.contains(&kw.to_lowercase())))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Misc)
}
