//! Product category taxonomy
//!
//! The taxonomy is static configuration compiled into the crate: a
//! priority-ordered classification rule list, a synonym table normalizing
//! the group labels that appear in sales spreadsheets, and the restock
//! blacklist that keeps field defensives and veterinary lines out of the
//! store-restock queue.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

/// Catch-all category for products no rule claims
pub const OTHER_CATEGORY: &str = "OUTROS";

/// Classification rules, checked in order; the first keyword hit wins.
/// More specific categories come before the generic ones so that e.g. a
/// foliar fertilizer is never swallowed by the adjuvant rule.
pub const CLASSIFY_RULES: &[(&str, &[&str])] = &[
    ("HERBICIDAS", &["HERBICIDA"]),
    ("FUNGICIDAS", &["FUNGICIDA"]),
    ("INSETICIDAS", &["INSETICIDA"]),
    ("NEMATICIDAS", &["NEMATICIDA"]),
    ("ADUBOS FOLIARES", &["ADUBO FOLIAR"]),
    ("ADUBOS QUÍMICOS", &["ADUBO Q"]),
    ("ADUBOS CORRETIVOS", &["ADUBO CORRETIVO", "CALCARIO", "CALCÁRIO"]),
    ("ÓLEOS", &["OLEO", "ÓLEO"]),
    ("SEMENTES", &["SEMENTE"]),
    ("ADJUVANTES", &["ADJUVANTE", "ESPALHANTE"]),
    (
        "MEDICAMENTOS",
        &[
            "MEDICAMENTO",
            "VERMIFUGO",
            "VERMÍFUGO",
            "VACINA",
            "ANTIBIOTICO",
            "ANTIBIÓTICO",
        ],
    ),
];

/// Display ordering for categories; unknown categories sort last,
/// alphabetically among themselves
pub const CATEGORY_PRIORITY: &[&str] = &[
    "HERBICIDAS",
    "FUNGICIDAS",
    "INSETICIDAS",
    "NEMATICIDAS",
    "ADUBOS FOLIARES",
    "ADUBOS QUÍMICOS",
    "ADUBOS CORRETIVOS",
    "ADJUVANTES",
    "ÓLEOS",
    "SEMENTES",
    "MEDICAMENTOS",
];

static CATEGORY_RANK: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    CATEGORY_PRIORITY
        .iter()
        .enumerate()
        .map(|(i, c)| (*c, i))
        .collect()
});

/// Synonym table for raw group labels, accented and unaccented variants
/// included. Veterinary groups normalize to the exact spellings used by
/// the restock blacklist.
static GROUP_MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("ADUBOS FOLIARES", "ADUBOS FOLIARES"),
        ("ADUBOS QUIMICOS", "ADUBOS QUÍMICOS"),
        ("ADUBOS CORRETIVOS", "ADUBOS CORRETIVOS"),
        ("HERBICIDAS", "HERBICIDAS"),
        ("FUNGICIDAS", "FUNGICIDAS"),
        ("INSETICIDAS", "INSETICIDAS"),
        ("NEMATICIDAS", "NEMATICIDAS"),
        ("OLEO MINERAL E VEGETAL", "ÓLEOS"),
        ("ADJUVANTES", "ADJUVANTES"),
        ("SEMENTES", "SEMENTES"),
        ("MEDICAMENTOS", "MEDICAMENTOS"),
        ("MEDICAMENTOS VETERINÁRIOS", "MEDICAMENTOS"),
        ("MEDICAMENTOS VETERINARIOS", "MEDICAMENTOS"),
        ("VACINA AFTOSA", "VACINA AFTOSA"),
        ("VACINAS DIVERSAS/SOROS", "VACINAS DIVERSAS/SOROS"),
        ("ANTIBIOTICOS/ANTI-INFLAMATORIO", "ANTIBIOTICOS/ANTI-INFLAMATORIO"),
        ("ANESTESICO/ANALGESICO/DIURETIC", "ANESTESICO/ANALGESICO/DIURETIC"),
        ("ANTITOXICOS", "ANTITOXICOS"),
        ("VERMIFUGOS", "VERMIFUGOS"),
        ("MOSQUICIDA/CARRAPATICIDA/BERNI", "MOSQUICIDA/CARRAPATICIDA/BERNI"),
        ("UNGUENTOS/POMADAS", "UNGUENTOS/POMADAS"),
        ("HOMEOPATICO", "HOMEOPATICO"),
        ("HORMONIOS LEITEIROS", "HORMONIOS LEITEIROS"),
        ("TONICO MINERAL/VITAMINAS", "TONICO MINERAL/VITAMINAS"),
        ("REPRODUCAO ANIMAL", "REPRODUCAO ANIMAL"),
        ("REPRODUTORES", "REPRODUTORES"),
        ("IDENTIFICACAO ANIMAL", "IDENTIFICACAO ANIMAL"),
        ("INOCULANTES P/ SILAGEM", "INOCULANTES P/ SILAGEM"),
        ("DIETA ANIMAL", "DIETA ANIMAL"),
        ("RATICIDAS", "RATICIDAS"),
    ])
});

/// Categories that never enter the store-restock queue: field defensives,
/// seeds and the veterinary lines are replenished through other channels.
pub static RESTOCK_EXCLUDED_CATEGORIES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "HERBICIDAS",
        "FUNGICIDAS",
        "INSETICIDAS",
        "NEMATICIDAS",
        "ÓLEOS",
        "ADUBOS FOLIARES",
        "ADUBOS QUÍMICOS",
        "ADUBOS CORRETIVOS",
        "ADJUVANTES",
        "ADJUVANTES/ESPALHANTES ADESIVO",
        "SUPLEMENTO MINERAL",
        "SEMENTES",
        "MEDICAMENTOS",
        "MEDICAMENTOS VETERINÁRIOS",
        "MEDICAMENTOS VETERINARIOS",
        "VACINA AFTOSA",
        "VACINAS DIVERSAS/SOROS",
        "ANTIBIOTICOS/ANTI-INFLAMATORIO",
        "ANESTESICO/ANALGESICO/DIURETIC",
        "ANTITOXICOS",
        "VERMIFUGOS",
        "MOSQUICIDA/CARRAPATICIDA/BERNI",
        "UNGUENTOS/POMADAS",
        "HOMEOPATICO",
        "HORMONIOS LEITEIROS",
        "TONICO MINERAL/VITAMINAS",
        "REPRODUCAO ANIMAL",
        "REPRODUTORES",
        "IDENTIFICACAO ANIMAL",
        "INOCULANTES P/ SILAGEM",
        "DIETA ANIMAL",
        "RATICIDAS",
    ])
});

/// Product-name prefixes that repeat the category; stripped for display
const SHORT_PREFIXES: &[&str] = &[
    "HERBICIDA ",
    "FUNGICIDA ",
    "INSETICIDA ",
    "NEMATICIDA ",
    "ADUBO FOLIAR ",
    "ADUBO Q.",
    "OLEO VEGETAL ",
    "OLEO MINERAL ",
    "ÓLEO VEGETAL ",
    "ÓLEO MINERAL ",
    "ADJUVANTE ",
    "SEMENTE ",
    "MEDICAMENTO ",
];

/// Classify a product name into the fixed taxonomy. First rule whose
/// keyword appears as a substring wins; unmatched names fall into
/// [`OTHER_CATEGORY`].
pub fn classify_product(name: &str) -> &'static str {
    let upper = name.to_uppercase();
    for (category, keywords) in CLASSIFY_RULES {
        if keywords.iter().any(|kw| upper.contains(kw)) {
            return category;
        }
    }
    OTHER_CATEGORY
}

/// Normalize a raw group label to its canonical spelling. Unmapped labels
/// pass through trimmed and uppercased; this is best-effort, not a closed
/// vocabulary.
pub fn normalize_group(group: &str) -> String {
    let upper = group.trim().to_uppercase();
    match GROUP_MAP.get(upper.as_str()) {
        Some(canonical) => (*canonical).to_string(),
        None => upper,
    }
}

/// Strip a redundant category prefix from a product name for display
pub fn short_name(product: &str) -> &str {
    let upper = product.to_uppercase();
    for prefix in SHORT_PREFIXES {
        if upper.starts_with(prefix) {
            if let Some(rest) = product.get(prefix.len()..) {
                return rest.trim();
            }
        }
    }
    product
}

/// Whether a category is blacklisted from the store-restock queue
pub fn is_restock_excluded(category: &str) -> bool {
    RESTOCK_EXCLUDED_CATEGORIES.contains(category.trim().to_uppercase().as_str())
}

/// Sort category names by display priority, then alphabetically
pub fn sort_categories(categories: &mut [String]) {
    let max = CATEGORY_PRIORITY.len();
    categories.sort_by(|a, b| {
        let ra = CATEGORY_RANK.get(a.as_str()).copied().unwrap_or(max);
        let rb = CATEGORY_RANK.get(b.as_str()).copied().unwrap_or(max);
        ra.cmp(&rb).then_with(|| a.cmp(b))
    });
}
